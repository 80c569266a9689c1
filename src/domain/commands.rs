use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookingId, BookingStatus, BusinessId, CustomerId, ServiceId, SlotId, StaffId};

/// コマンド：枠を予約する
///
/// `notes`は未検証の文字列のまま受け取り、アプリケーション層で検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBooking {
    pub business_id: BusinessId,
    pub customer_id: CustomerId,
    pub staff_id: StaffId,
    pub service_id: ServiceId,
    pub slot_id: SlotId,
    pub notes: String,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約のステータス・メモを更新する
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBooking {
    pub business_id: BusinessId,
    pub booking_id: BookingId,
    pub status: Option<BookingStatus>,
    pub notes: Option<String>,
    pub requested_at: DateTime<Utc>,
}

/// コマンド：予約を指定ステータスへ遷移させる（確定・キャンセル・完了）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBookingStatus {
    pub business_id: BusinessId,
    pub booking_id: BookingId,
    pub requested_at: DateTime<Utc>,
}
