use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    BookingId, BookingStatus, BusinessId, CustomerId, ServiceId, SlotId, StaffId,
    booking::Booking,
    commands::{ChangeBookingStatus, CreateBooking, UpdateBooking},
};

/// 予約作成リクエスト（POST /bookings）
///
/// IDが欠けている場合はnil UUIDとして扱い、アプリケーション層の
/// バリデーションで`*_REQUIRED`として報告する。
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: Option<Uuid>,
    pub staff_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub slot_id: Option<Uuid>,
    #[serde(default)]
    pub notes: String,
}

impl CreateBookingRequest {
    pub fn to_command(self, business_id: BusinessId, requested_at: DateTime<Utc>) -> CreateBooking {
        let id = |value: Option<Uuid>| value.unwrap_or(Uuid::nil());

        CreateBooking {
            business_id,
            customer_id: CustomerId::from_uuid(id(self.customer_id)),
            staff_id: StaffId::from_uuid(id(self.staff_id)),
            service_id: ServiceId::from_uuid(id(self.service_id)),
            slot_id: SlotId::from_uuid(id(self.slot_id)),
            notes: self.notes,
            requested_at,
        }
    }
}

/// 予約更新リクエスト（PATCH /bookings/:id）
#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl UpdateBookingRequest {
    pub fn to_command(
        self,
        business_id: BusinessId,
        booking_id: BookingId,
        requested_at: DateTime<Utc>,
    ) -> Result<UpdateBooking, String> {
        let status = self
            .status
            .as_deref()
            .map(parse_status)
            .transpose()?;

        Ok(UpdateBooking {
            business_id,
            booking_id,
            status,
            notes: self.notes,
            requested_at,
        })
    }
}

/// ステータス遷移コマンドを組み立てる
pub fn change_status_command(
    business_id: BusinessId,
    booking_id: BookingId,
    requested_at: DateTime<Utc>,
) -> ChangeBookingStatus {
    ChangeBookingStatus {
        business_id,
        booking_id,
        requested_at,
    }
}

/// 予約一覧取得のクエリパラメータ
#[derive(Debug, Deserialize)]
pub struct ListBookingsQuery {
    /// 顧客IDでフィルタリング
    pub customer_id: Option<Uuid>,
    /// スタッフIDでフィルタリング
    pub staff_id: Option<Uuid>,
}

/// 予約レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct BookingResponse {
    pub booking_id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub staff_id: Uuid,
    pub service_id: Uuid,
    pub slot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            booking_id: booking.id.value(),
            business_id: booking.business_id.value(),
            customer_id: booking.customer_id.value(),
            staff_id: booking.staff_id.value(),
            service_id: booking.service_id.value(),
            slot_id: booking.slot_id.value(),
            start_time: booking.start_time,
            end_time: booking.end_time,
            status: booking.status.as_str().to_string(),
            notes: booking.notes.into(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// ステータス別件数レスポンス（GET /bookings/stats）
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BookingStatsResponse {
    pub pending: u64,
    pub confirmed: u64,
    pub cancelled: u64,
    pub completed: u64,
}

impl From<Vec<(BookingStatus, u64)>> for BookingStatsResponse {
    fn from(counts: Vec<(BookingStatus, u64)>) -> Self {
        let mut stats = Self::default();
        for (status, count) in counts {
            match status {
                BookingStatus::Pending => stats.pending = count,
                BookingStatus::Confirmed => stats.confirmed = count,
                BookingStatus::Cancelled => stats.cancelled = count,
                BookingStatus::Completed => stats.completed = count,
            }
        }
        stats
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}

/// ステータス文字列のパースとバリデーション
pub fn parse_status(status: &str) -> Result<BookingStatus, String> {
    status.parse::<BookingStatus>()
}
