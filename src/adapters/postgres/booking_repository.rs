use crate::domain::booking::Booking;
use crate::domain::value_objects::{
    BookingId, BookingStatus, BusinessId, CustomerId, Notes, ServiceId, SlotId, StaffId,
};
use crate::ports::booking_repository::{BookingRepository as BookingRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::str::FromStr;

const BOOKING_COLUMNS: &str = r#"
    booking_id,
    business_id,
    customer_id,
    staff_id,
    service_id,
    slot_id,
    start_time,
    end_time,
    status,
    notes,
    created_at,
    updated_at
"#;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// PostgreSQLの行データをBookingに変換する
///
/// statusの文字列とnotesの長さはドメインの値オブジェクトで再検証し、
/// 不正な値はInvalidDataエラーとして返す。
fn map_row_to_booking(row: &PgRow) -> Result<Booking> {
    let status_str: &str = row.get("status");
    let status = BookingStatus::from_str(status_str).map_err(invalid_data)?;

    let notes_str: String = row.get("notes");
    let notes = Notes::new(notes_str).map_err(|e| invalid_data(e.to_string()))?;

    Ok(Booking {
        id: BookingId::from_uuid(row.get("booking_id")),
        business_id: BusinessId::from_uuid(row.get("business_id")),
        customer_id: CustomerId::from_uuid(row.get("customer_id")),
        staff_id: StaffId::from_uuid(row.get("staff_id")),
        service_id: ServiceId::from_uuid(row.get("service_id")),
        slot_id: SlotId::from_uuid(row.get("slot_id")),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        status,
        notes,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// BookingRepositoryのPostgreSQL実装
///
/// すべてのクエリがWHERE句にbusiness_idを含み、テナント分離を保証する。
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// PostgreSQLコネクションプールから新しいBookingRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// business_idに加えて任意の条件1つで絞り込み、開始時刻順で返す
    async fn fetch_where(
        &self,
        condition: &str,
        business_id: BusinessId,
        other: Option<uuid::Uuid>,
    ) -> Result<Vec<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE business_id = $1 {} ORDER BY start_time ASC",
            BOOKING_COLUMNS, condition
        );

        let mut query = sqlx::query(&sql).bind(business_id.value());
        if let Some(id) = other {
            query = query.bind(id);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(map_row_to_booking).collect()
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn create(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                booking_id,
                business_id,
                customer_id,
                staff_id,
                service_id,
                slot_id,
                start_time,
                end_time,
                status,
                notes,
                created_at,
                updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(booking.id.value())
        .bind(booking.business_id.value())
        .bind(booking.customer_id.value())
        .bind(booking.staff_id.value())
        .bind(booking.service_id.value())
        .bind(booking.slot_id.value())
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status.as_str())
        .bind(booking.notes.as_str())
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_by_id(
        &self,
        business_id: BusinessId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>> {
        let sql = format!(
            "SELECT {} FROM bookings WHERE business_id = $1 AND booking_id = $2",
            BOOKING_COLUMNS
        );

        let row = sqlx::query(&sql)
            .bind(business_id.value())
            .bind(booking_id.value())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(map_row_to_booking).transpose()
    }

    async fn find_by_customer(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> Result<Vec<Booking>> {
        self.fetch_where("AND customer_id = $2", business_id, Some(customer_id.value()))
            .await
    }

    async fn find_by_staff(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
    ) -> Result<Vec<Booking>> {
        self.fetch_where("AND staff_id = $2", business_id, Some(staff_id.value()))
            .await
    }

    async fn find_by_business(&self, business_id: BusinessId) -> Result<Vec<Booking>> {
        self.fetch_where("", business_id, None).await
    }

    /// ステータスを条件にしたUPDATE
    ///
    /// 検証時のステータスのままである行だけを書き換える。
    async fn update(&self, booking: &Booking, expected_status: BookingStatus) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = $3,
                notes = $4,
                updated_at = $5
            WHERE business_id = $1 AND booking_id = $2 AND status = $6
            "#,
        )
        .bind(booking.business_id.value())
        .bind(booking.id.value())
        .bind(booking.status.as_str())
        .bind(booking.notes.as_str())
        .bind(booking.updated_at)
        .bind(expected_status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, business_id: BusinessId, booking_id: BookingId) -> Result<()> {
        sqlx::query("DELETE FROM bookings WHERE business_id = $1 AND booking_id = $2")
            .bind(business_id.value())
            .bind(booking_id.value())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn count_by_status(
        &self,
        business_id: BusinessId,
        status: BookingStatus,
    ) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bookings WHERE business_id = $1 AND status = $2",
        )
        .bind(business_id.value())
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.try_into().unwrap_or_default())
    }
}
