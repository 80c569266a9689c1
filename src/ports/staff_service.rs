use crate::domain::value_objects::{BusinessId, StaffId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// スタッフサービスポート
#[async_trait]
pub trait StaffService: Send + Sync {
    /// スタッフがこの事業者に存在するか確認する
    async fn exists(&self, business_id: BusinessId, staff_id: StaffId) -> Result<bool>;
}
