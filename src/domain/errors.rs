use thiserror::Error;

use super::BookingStatus;

/// 予約入力のバリデーションエラー
///
/// 副作用の発生前に検出される。入力を修正すれば再試行できる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingValidationError {
    #[error("business_id is required")]
    BusinessIdRequired,
    #[error("customer_id is required")]
    CustomerIdRequired,
    #[error("staff_id is required")]
    StaffIdRequired,
    #[error("service_id is required")]
    ServiceIdRequired,
    #[error("slot_id is required")]
    SlotIdRequired,
    /// メモが最大文字数を超えている
    #[error("notes must be at most {max} characters (got {actual})")]
    NotesTooLong { max: usize, actual: usize },
    /// 開始時刻が終了時刻以降
    #[error("start time must be before end time")]
    InvalidTime,
}

/// ステータス遷移のエラー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot transition booking from {from} to {to}")]
pub struct TransitionError {
    pub from: BookingStatus,
    pub to: BookingStatus,
}
