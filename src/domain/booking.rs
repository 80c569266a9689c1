use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookingId, BookingStatus, BookingValidationError, BusinessId, CustomerId, Notes, ServiceId,
    SlotId, StaffId, TransitionError, commands::CreateBooking,
};

/// Booking集約 - 1つの枠に対する1件の予約
///
/// 枠が「埋まっているか」は枠コンテキストが管理する。
/// この集約はテナント側から見た予約記録であり、ロックの意味は持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    // 識別子
    pub id: BookingId,
    pub business_id: BusinessId,

    // 他の集約への参照（IDのみ）
    pub customer_id: CustomerId,
    pub staff_id: StaffId,
    pub service_id: ServiceId,
    pub slot_id: SlotId,

    // 枠からコピーした時間帯（start_time < end_time）
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    pub status: BookingStatus,
    pub notes: Notes,

    // 監査情報
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 純粋関数：ステータス遷移が許可されているか
///
/// | From      | To                   |
/// |-----------|----------------------|
/// | pending   | confirmed, cancelled |
/// | confirmed | cancelled, completed |
/// | cancelled | なし（終端）         |
/// | completed | なし（終端）         |
///
/// すべての変更経路がこの表だけを参照する。
pub fn is_valid_transition(from: BookingStatus, to: BookingStatus) -> bool {
    use BookingStatus::*;

    matches!(
        (from, to),
        (Pending, Confirmed)
            | (Pending, Cancelled)
            | (Confirmed, Cancelled)
            | (Confirmed, Completed)
    )
}

impl BookingStatus {
    /// 遷移先が1つもない終端ステータスか
    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// このステータスから遷移可能なステータス
    pub fn allowed_transitions(&self) -> Vec<BookingStatus> {
        BookingStatus::ALL
            .into_iter()
            .filter(|to| is_valid_transition(*self, *to))
            .collect()
    }
}

/// 純粋関数：予約を作成する
///
/// ビジネスルール：
/// - 状態はPending
/// - 時間帯は枠からコピーし、start_time < end_time であること
///
/// 副作用なし。永続化も枠の確保も行わない。
pub fn create_booking(
    cmd: &CreateBooking,
    notes: Notes,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
) -> Result<Booking, BookingValidationError> {
    if start_time >= end_time {
        return Err(BookingValidationError::InvalidTime);
    }

    Ok(Booking {
        id: BookingId::new(),
        business_id: cmd.business_id,
        customer_id: cmd.customer_id,
        staff_id: cmd.staff_id,
        service_id: cmd.service_id,
        slot_id: cmd.slot_id,
        start_time,
        end_time,
        status: BookingStatus::Pending,
        notes,
        created_at: cmd.requested_at,
        updated_at: cmd.requested_at,
    })
}

/// 純粋関数：ステータスを遷移させる
///
/// 同一ステータスへの遷移も遷移表で検証するため、
/// キャンセル済みの予約をキャンセルするとエラーになる。
pub fn change_status(
    booking: &Booking,
    to: BookingStatus,
    changed_at: DateTime<Utc>,
) -> Result<Booking, TransitionError> {
    if !is_valid_transition(booking.status, to) {
        return Err(TransitionError {
            from: booking.status,
            to,
        });
    }

    Ok(Booking {
        status: to,
        updated_at: changed_at,
        ..booking.clone()
    })
}

/// 純粋関数：予約をキャンセルする
pub fn cancel_booking(
    booking: &Booking,
    cancelled_at: DateTime<Utc>,
) -> Result<Booking, TransitionError> {
    change_status(booking, BookingStatus::Cancelled, cancelled_at)
}

/// 純粋関数：ステータス・メモを更新する
///
/// 現在と同じステータスの指定は「変更なし」とみなし、遷移表は参照しない。
pub fn update_booking(
    booking: &Booking,
    status: Option<BookingStatus>,
    notes: Option<Notes>,
    updated_at: DateTime<Utc>,
) -> Result<Booking, TransitionError> {
    let mut updated = match status {
        Some(to) if to != booking.status => change_status(booking, to, updated_at)?,
        _ => booking.clone(),
    };

    if let Some(notes) = notes {
        updated.notes = notes;
    }
    updated.updated_at = updated_at;

    Ok(updated)
}
