use crate::domain::{BookingValidationError, SlotId, TransitionError};
use thiserror::Error;

/// エラーの分類
///
/// HTTP層はこの分類でステータスコードを決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力不正。副作用なし、入力を直せば再試行できる
    Validation,
    /// 参照先が存在しない。副作用なし
    NotFound,
    /// 状態・資源の競合。別の枠や操作を選ぶ必要がある
    Conflict,
    /// 協調先の予期しない障害
    Internal,
}

/// 予約管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookingApplicationError {
    /// 入力バリデーションエラー
    #[error(transparent)]
    Validation(#[from] BookingValidationError),

    /// 予約が見つからない
    #[error("Booking not found")]
    BookingNotFound,

    /// 顧客が存在しない
    #[error("Customer not found")]
    CustomerNotFound,

    /// スタッフが存在しない
    #[error("Staff not found")]
    StaffNotFound,

    /// 枠が確保済み、または確保の競争に負けた
    #[error("Slot is not available")]
    SlotUnavailable,

    /// 許可されていないステータス遷移
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// 検証後に別のリクエストが予約を変更した
    #[error("Booking was modified concurrently")]
    ConcurrentModification,

    /// 空き確認は通ったが枠を読み出せない
    #[error("Slot {0} could not be loaded")]
    SlotNotFound(SlotId),

    /// BookingRepositoryのエラー
    #[error("Booking repository error")]
    RepositoryError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// SlotServiceのエラー
    #[error("Slot service error")]
    SlotServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// CustomerServiceのエラー
    #[error("Customer service error")]
    CustomerServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// StaffServiceのエラー
    #[error("Staff service error")]
    StaffServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 枠確保タスクが完了しなかった
    #[error("Reservation task failed")]
    TaskFailed(#[source] tokio::task::JoinError),
}

impl BookingApplicationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::BookingNotFound | Self::CustomerNotFound | Self::StaffNotFound => {
                ErrorKind::NotFound
            }
            Self::SlotUnavailable | Self::InvalidTransition(_) | Self::ConcurrentModification => {
                ErrorKind::Conflict
            }
            Self::SlotNotFound(_)
            | Self::RepositoryError(_)
            | Self::SlotServiceError(_)
            | Self::CustomerServiceError(_)
            | Self::StaffServiceError(_)
            | Self::TaskFailed(_) => ErrorKind::Internal,
        }
    }

    /// 呼び出し側に公開するエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(e) => match e {
                BookingValidationError::BusinessIdRequired => "BUSINESS_ID_REQUIRED",
                BookingValidationError::CustomerIdRequired => "CUSTOMER_ID_REQUIRED",
                BookingValidationError::StaffIdRequired => "STAFF_ID_REQUIRED",
                BookingValidationError::ServiceIdRequired => "SERVICE_ID_REQUIRED",
                BookingValidationError::SlotIdRequired => "SLOT_ID_REQUIRED",
                BookingValidationError::NotesTooLong { .. } => "NOTES_TOO_LONG",
                BookingValidationError::InvalidTime => "INVALID_TIME",
            },
            Self::BookingNotFound => "BOOKING_NOT_FOUND",
            Self::CustomerNotFound => "CUSTOMER_NOT_FOUND",
            Self::StaffNotFound => "STAFF_NOT_FOUND",
            Self::SlotUnavailable => "SLOT_UNAVAILABLE",
            Self::InvalidTransition(_) => "INVALID_TRANSITION",
            Self::ConcurrentModification => "CONCURRENT_MODIFICATION",
            _ => "INTERNAL_ERROR",
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookingApplicationError>;
