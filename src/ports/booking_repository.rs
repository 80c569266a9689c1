use crate::domain::booking::Booking;
use crate::domain::value_objects::{BookingId, BookingStatus, BusinessId, CustomerId, StaffId};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 予約リポジトリポート
///
/// すべての読み書きは`business_id`でスコープされる。
/// テナント分離はストレージ層（この実装側）の責務であり、
/// オーケストレーターは他テナントの予約を見ないことを前提とする。
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// 新しい予約を保存する
    async fn create(&self, booking: &Booking) -> Result<()>;

    /// IDで予約を取得する
    async fn get_by_id(
        &self,
        business_id: BusinessId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>>;

    /// 顧客の予約を開始時刻順で取得する
    async fn find_by_customer(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> Result<Vec<Booking>>;

    /// スタッフの予約を開始時刻順で取得する
    async fn find_by_staff(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
    ) -> Result<Vec<Booking>>;

    /// 事業者の全予約を開始時刻順で取得する
    async fn find_by_business(&self, business_id: BusinessId) -> Result<Vec<Booking>>;

    /// 予約を更新する
    ///
    /// 保存済みのステータスが`expected_status`と一致する場合のみ書き込む
    /// （ステータスを楽観的ロックのトークンとして使う）。
    /// 一致しなかった、または行が存在しない場合は`Ok(false)`を返す。
    async fn update(&self, booking: &Booking, expected_status: BookingStatus) -> Result<bool>;

    /// 予約を物理削除する
    ///
    /// 枠の確保に失敗した直後の補償処理でのみ使用される。
    /// 呼び出し元に返されたことのある予約は削除してはならない。
    async fn delete(&self, business_id: BusinessId, booking_id: BookingId) -> Result<()>;

    /// ステータスごとの件数を取得する
    async fn count_by_status(
        &self,
        business_id: BusinessId,
        status: BookingStatus,
    ) -> Result<u64>;
}
