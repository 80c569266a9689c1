use crate::domain::value_objects::{BookingId, BusinessId, SlotId, StaffId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 枠の詳細
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotView {
    pub slot_id: SlotId,
    pub business_id: BusinessId,
    pub staff_id: StaffId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// 枠サービスポート
///
/// 「この時間帯は空いているか」の唯一の情報源。
/// 予約コンテキストはSlotIDのみを知り、枠の生成や営業時間は知らない。
#[async_trait]
pub trait SlotService: Send + Sync {
    /// 枠がこの事業者のもので、未確保か確認する
    ///
    /// 参考情報であってロックではない。確保の保証は`reserve`が行う。
    /// 他の事業者の枠は空いていないものとして扱う。
    async fn is_available(&self, business_id: BusinessId, slot_id: SlotId) -> Result<bool>;

    /// 枠の詳細を取得する
    async fn get_slot(&self, business_id: BusinessId, slot_id: SlotId) -> Result<Option<SlotView>>;

    /// 枠を予約のために確保する
    ///
    /// アトミックであること：同じ枠に対して成功するのは最初の1回だけで、
    /// 以降の呼び出しは`Ok(false)`を返す。
    async fn reserve(&self, slot_id: SlotId, booking_id: BookingId) -> Result<bool>;

    /// 枠の確保を解除する
    async fn release(&self, slot_id: SlotId) -> Result<()>;
}
