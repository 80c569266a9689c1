use crate::domain::value_objects::{BusinessId, CustomerId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 顧客サービスポート
///
/// 予約コンテキストと顧客コンテキストの境界を維持する。
#[async_trait]
pub trait CustomerService: Send + Sync {
    /// 顧客がこの事業者に存在するか確認する
    async fn exists(&self, business_id: BusinessId, customer_id: CustomerId) -> Result<bool>;

    /// 顧客の予約回数を1増やす
    ///
    /// 集計値であり、失敗しても予約は取り消さない。
    async fn increment_booking_count(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> Result<()>;
}
