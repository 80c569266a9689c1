use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::BookingValidationError;

/// メモの最大文字数
pub const MAX_NOTES_LENGTH: usize = 500;

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            pub fn value(&self) -> Uuid {
                self.0
            }

            /// nil UUID（未指定）かどうか
            pub fn is_nil(&self) -> bool {
                self.0.is_nil()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

uuid_id!(
    /// 事業者ID - テナントの分割キー。すべての予約データはこれでスコープされる
    BusinessId
);
uuid_id!(
    /// 予約ID - 予約コンテキストの集約ID
    BookingId
);
uuid_id!(
    /// 顧客ID - 顧客管理コンテキストへの参照
    CustomerId
);
uuid_id!(
    /// スタッフID - スタッフ管理コンテキストへの参照
    StaffId
);
uuid_id!(
    /// サービスID - 提供メニューへの参照
    ServiceId
);
uuid_id!(
    /// 枠ID - 枠管理コンテキストへの参照
    SlotId
);

/// 予約ステータス
///
/// 閉じた集合。遷移の可否は`domain::booking::is_valid_transition`のみが判断する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// 仮予約
    Pending,
    /// 確定
    Confirmed,
    /// キャンセル済み（終端）
    Cancelled,
    /// 完了（終端）
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::Completed,
    ];

    /// 文字列表現を取得する
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    /// 枠を占有し続けるステータスか
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            _ => Err(format!("Invalid booking status: {}", s)),
        }
    }
}

/// 予約メモ
///
/// 不変条件：最大500文字（Unicodeスカラー値で数える）
/// 生成時に検証するため、不正な長さのメモは存在できない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Notes(String);

impl Notes {
    pub fn new(value: impl Into<String>) -> Result<Self, BookingValidationError> {
        let value = value.into();
        let length = value.chars().count();
        if length > MAX_NOTES_LENGTH {
            return Err(BookingValidationError::NotesTooLong {
                max: MAX_NOTES_LENGTH,
                actual: length,
            });
        }
        Ok(Self(value))
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Notes {
    type Error = BookingValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Notes::new(value)
    }
}

impl From<Notes> for String {
    fn from(notes: Notes) -> Self {
        notes.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(BookingId::new(), BookingId::new());
        assert_ne!(SlotId::new(), SlotId::new());
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = CustomerId::from_uuid(uuid);
        assert_eq!(id.value(), uuid);
        assert!(!id.is_nil());
    }

    #[test]
    fn test_nil_id_detected() {
        assert!(StaffId::from_uuid(Uuid::nil()).is_nil());
    }

    #[test]
    fn test_status_string_form() {
        for status in BookingStatus::ALL {
            assert_eq!(status.as_str().parse::<BookingStatus>(), Ok(status));
        }
        assert!("failed".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
    }

    #[test]
    fn test_notes_at_limit_accepted() {
        let notes = Notes::new("a".repeat(MAX_NOTES_LENGTH));
        assert!(notes.is_ok());
    }

    #[test]
    fn test_notes_over_limit_rejected() {
        let result = Notes::new("a".repeat(MAX_NOTES_LENGTH + 1));
        assert_eq!(
            result.unwrap_err(),
            BookingValidationError::NotesTooLong {
                max: 500,
                actual: 501
            }
        );
    }

    #[test]
    fn test_notes_counts_characters_not_bytes() {
        // 「予」は3バイトだが1文字として数える
        let notes = Notes::new("予".repeat(MAX_NOTES_LENGTH));
        assert!(notes.is_ok());
    }

    #[test]
    fn test_notes_deserialize_validates_length() {
        let json = serde_json::to_string(&"x".repeat(501)).unwrap();
        assert!(serde_json::from_str::<Notes>(&json).is_err());
    }
}
