use crate::domain::value_objects::{BusinessId, StaffId};
use crate::ports::staff_service::{Result, StaffService as StaffServiceTrait};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// StaffServiceのモック実装
pub struct StaffService {
    staff: Mutex<HashSet<(BusinessId, StaffId)>>,
}

impl StaffService {
    pub fn new() -> Self {
        Self {
            staff: Mutex::new(HashSet::new()),
        }
    }

    /// テスト用：スタッフを追加
    pub fn add_staff(&self, business_id: BusinessId, staff_id: StaffId) {
        self.staff
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((business_id, staff_id));
    }
}

impl Default for StaffService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StaffServiceTrait for StaffService {
    async fn exists(&self, business_id: BusinessId, staff_id: StaffId) -> Result<bool> {
        Ok(self
            .staff
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&(business_id, staff_id)))
    }
}
