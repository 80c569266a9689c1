use crate::domain::value_objects::{BusinessId, CustomerId, StaffId};
use crate::ports::{customer_service, staff_service};
use async_trait::async_trait;
use sqlx::PgPool;

/// CustomerServiceのPostgreSQL実装
///
/// 顧客のCRUDは別コンテキストの責務。ここでは存在確認と
/// 予約回数の加算だけを行う。
pub struct CustomerService {
    pool: PgPool,
}

impl CustomerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl customer_service::CustomerService for CustomerService {
    async fn exists(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> customer_service::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM customers WHERE business_id = $1 AND customer_id = $2)",
        )
        .bind(business_id.value())
        .bind(customer_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn increment_booking_count(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> customer_service::Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE customers
            SET booking_count = booking_count + 1
            WHERE business_id = $1 AND customer_id = $2
            "#,
        )
        .bind(business_id.value())
        .bind(customer_id.value())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("customer {} not found", customer_id).into());
        }
        Ok(())
    }
}

/// StaffServiceのPostgreSQL実装
pub struct StaffService {
    pool: PgPool,
}

impl StaffService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl staff_service::StaffService for StaffService {
    async fn exists(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
    ) -> staff_service::Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM staff WHERE business_id = $1 AND staff_id = $2)",
        )
        .bind(business_id.value())
        .bind(staff_id.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}
