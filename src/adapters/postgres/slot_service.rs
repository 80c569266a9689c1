use crate::domain::value_objects::{BookingId, BusinessId, SlotId, StaffId};
use crate::ports::slot_service::{Result, SlotService as SlotServiceTrait, SlotView};
use async_trait::async_trait;
use sqlx::{PgPool, Row};

/// SlotServiceのPostgreSQL実装
///
/// 枠の確保は`UPDATE ... WHERE NOT is_reserved`の1文で行う。
/// 行ロックにより、同じ枠への同時確保で更新できるのは1件だけになる。
pub struct SlotService {
    pool: PgPool,
}

impl SlotService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SlotServiceTrait for SlotService {
    /// 存在しない枠・他の事業者の枠は空いていないものとして扱う
    async fn is_available(&self, business_id: BusinessId, slot_id: SlotId) -> Result<bool> {
        let reserved: Option<bool> = sqlx::query_scalar(
            "SELECT is_reserved FROM slots WHERE business_id = $1 AND slot_id = $2",
        )
        .bind(business_id.value())
        .bind(slot_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(reserved == Some(false))
    }

    async fn get_slot(
        &self,
        business_id: BusinessId,
        slot_id: SlotId,
    ) -> Result<Option<SlotView>> {
        let row = sqlx::query(
            r#"
            SELECT slot_id, business_id, staff_id, start_time, end_time
            FROM slots
            WHERE business_id = $1 AND slot_id = $2
            "#,
        )
        .bind(business_id.value())
        .bind(slot_id.value())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| SlotView {
            slot_id: SlotId::from_uuid(row.get("slot_id")),
            business_id: BusinessId::from_uuid(row.get("business_id")),
            staff_id: StaffId::from_uuid(row.get("staff_id")),
            start_time: row.get("start_time"),
            end_time: row.get("end_time"),
        }))
    }

    async fn reserve(&self, slot_id: SlotId, booking_id: BookingId) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET is_reserved = TRUE,
                booking_id = $2,
                updated_at = NOW()
            WHERE slot_id = $1 AND NOT is_reserved
            "#,
        )
        .bind(slot_id.value())
        .bind(booking_id.value())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn release(&self, slot_id: SlotId) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE slots
            SET is_reserved = FALSE,
                booking_id = NULL,
                updated_at = NOW()
            WHERE slot_id = $1
            "#,
        )
        .bind(slot_id.value())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(format!("slot {} not found", slot_id).into());
        }
        Ok(())
    }
}
