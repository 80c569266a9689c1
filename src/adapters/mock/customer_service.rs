use crate::domain::value_objects::{BusinessId, CustomerId};
use crate::ports::customer_service::{CustomerService as CustomerServiceTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// CustomerServiceのモック実装
///
/// 事業者ごとの顧客IDと予約回数を保持し、状態を持つテストを可能にする。
pub struct CustomerService {
    customers: Mutex<HashMap<(BusinessId, CustomerId), u64>>,
}

impl CustomerService {
    pub fn new() -> Self {
        Self {
            customers: Mutex::new(HashMap::new()),
        }
    }

    fn customers(&self) -> MutexGuard<'_, HashMap<(BusinessId, CustomerId), u64>> {
        self.customers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// テスト用：顧客を追加
    pub fn add_customer(&self, business_id: BusinessId, customer_id: CustomerId) {
        self.customers().entry((business_id, customer_id)).or_insert(0);
    }

    /// テスト用：顧客の現在の予約回数を取得
    pub fn booking_count(&self, business_id: BusinessId, customer_id: CustomerId) -> u64 {
        self.customers()
            .get(&(business_id, customer_id))
            .copied()
            .unwrap_or_default()
    }
}

impl Default for CustomerService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CustomerServiceTrait for CustomerService {
    async fn exists(&self, business_id: BusinessId, customer_id: CustomerId) -> Result<bool> {
        Ok(self.customers().contains_key(&(business_id, customer_id)))
    }

    async fn increment_booking_count(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> Result<()> {
        match self.customers().get_mut(&(business_id, customer_id)) {
            Some(count) => {
                *count += 1;
                Ok(())
            }
            None => Err(format!("customer {} not found", customer_id).into()),
        }
    }
}
