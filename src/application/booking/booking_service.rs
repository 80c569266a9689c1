use crate::domain::{self, BookingStatus, booking::Booking, commands::*, value_objects::*};
use crate::ports::*;
use std::sync::Arc;

use super::errors::{BookingApplicationError, Result};
use super::validation;

/// サービスの依存関係
///
/// 関数型DDDの原則に従い、データ構造として定義。
/// オーケストレーター自体は状態を持たず、共有状態はすべて
/// リポジトリと枠ストアの側にある。並列実行しても安全。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub booking_repository: Arc<dyn BookingRepository>,
    pub slot_service: Arc<dyn SlotService>,
    pub customer_service: Arc<dyn CustomerService>,
    pub staff_service: Arc<dyn StaffService>,
}

/// テナントスコープで予約を読み込むヘルパー関数
///
/// # エラー
/// - RepositoryError: 読み込み失敗
/// - BookingNotFound: このテナントに予約が存在しない
pub(super) async fn load_booking(
    repository: &Arc<dyn BookingRepository>,
    business_id: BusinessId,
    booking_id: BookingId,
) -> Result<Booking> {
    repository
        .get_by_id(business_id, booking_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)?
        .ok_or(BookingApplicationError::BookingNotFound)
}

/// 検証時のステータスを条件に予約を保存するヘルパー関数
///
/// 検証から保存までの間に別のリクエストがステータスを変えていた場合は
/// 何も書き込まずに`ConcurrentModification`を返す。
async fn save_booking(
    repository: &Arc<dyn BookingRepository>,
    booking: &Booking,
    expected_status: BookingStatus,
) -> Result<()> {
    let written = repository
        .update(booking, expected_status)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    if !written {
        return Err(BookingApplicationError::ConcurrentModification);
    }
    Ok(())
}

/// 枠の確保を解除する（ベストエフォート）
///
/// 予約は既にキャンセルとして永続化済みのため、失敗してもエラーにしない。
/// 失敗時は枠が確保されたまま残るので、突き合わせ用にIDをログに残す。
async fn release_slot(slot_service: &Arc<dyn SlotService>, booking: &Booking) {
    if let Err(e) = slot_service.release(booking.slot_id).await {
        tracing::warn!(
            booking_id = %booking.id,
            slot_id = %booking.slot_id,
            error = %e,
            "Failed to release slot for cancelled booking; slot remains reserved"
        );
    }
}

/// 予約を作成する
///
/// ビジネスルール：
/// - 5つのIDがすべて指定されていること、メモが500文字以内であること
/// - 枠が空いていること
/// - 顧客・スタッフがこの事業者に存在すること
/// - 枠の時間帯が start_time < end_time であること
///
/// # 一貫性保証
///
/// 予約レコードと枠の確保は別々のストアにあり、共通のトランザクションはない。
/// 予約をPendingで保存してから枠を確保し、確保に失敗した場合は
/// 保存済みの予約を削除する（補償処理）。呼び出し元が、枠を取れなかった
/// 「作成済み」予約を目にすることはない。
///
/// 保存・確保・補償は切り離したタスクで実行するため、呼び出し元の
/// Futureが途中で破棄されても補償処理は最後まで実行される。
///
/// # 引数
/// * `deps` - サービスの依存関係
/// * `cmd` - 予約作成コマンド
///
/// # 戻り値
/// 成功時はPending状態の予約
pub async fn create_booking(deps: &ServiceDependencies, cmd: CreateBooking) -> Result<Booking> {
    // 1. 入力検証（副作用なし）
    let notes = validation::validate_create_booking(&cmd)?;

    // 2. 枠の空き確認（参考情報。確保の保証は手順6）
    let available = deps
        .slot_service
        .is_available(cmd.business_id, cmd.slot_id)
        .await
        .map_err(BookingApplicationError::SlotServiceError)?;

    if !available {
        return Err(BookingApplicationError::SlotUnavailable);
    }

    // 3. 顧客・スタッフの存在確認
    let customer_exists = deps
        .customer_service
        .exists(cmd.business_id, cmd.customer_id)
        .await
        .map_err(BookingApplicationError::CustomerServiceError)?;

    if !customer_exists {
        return Err(BookingApplicationError::CustomerNotFound);
    }

    let staff_exists = deps
        .staff_service
        .exists(cmd.business_id, cmd.staff_id)
        .await
        .map_err(BookingApplicationError::StaffServiceError)?;

    if !staff_exists {
        return Err(BookingApplicationError::StaffNotFound);
    }

    // 4. 枠の時間帯を取得
    let slot = deps
        .slot_service
        .get_slot(cmd.business_id, cmd.slot_id)
        .await
        .map_err(BookingApplicationError::SlotServiceError)?
        .ok_or(BookingApplicationError::SlotNotFound(cmd.slot_id))?;

    // 5. ドメイン層の純粋関数を呼び出し
    let booking = domain::booking::create_booking(&cmd, notes, slot.start_time, slot.end_time)?;

    // 6. 保存 → 確保 → （失敗時）補償
    let deps = deps.clone();
    tokio::spawn(async move { persist_and_reserve(&deps, booking).await })
        .await
        .map_err(BookingApplicationError::TaskFailed)?
}

/// 予約を保存し、枠を確保する
///
/// ここが最初の永続的な副作用。確保に失敗した予約は孤児になるため、
/// 必ず補償処理を通してからエラーを返す。
async fn persist_and_reserve(deps: &ServiceDependencies, booking: Booking) -> Result<Booking> {
    deps.booking_repository
        .create(&booking)
        .await
        .map_err(BookingApplicationError::RepositoryError)?;

    match deps.slot_service.reserve(booking.slot_id, booking.id).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::info!(
                booking_id = %booking.id,
                slot_id = %booking.slot_id,
                "Lost reservation race; rolling back booking"
            );
            compensate_unreserved_booking(&deps.booking_repository, &booking).await;
            return Err(BookingApplicationError::SlotUnavailable);
        }
        Err(e) => {
            compensate_unreserved_booking(&deps.booking_repository, &booking).await;
            return Err(BookingApplicationError::SlotServiceError(e));
        }
    }

    // 顧客の予約回数は集計値。失敗しても予約は取り消さない
    if let Err(e) = deps
        .customer_service
        .increment_booking_count(booking.business_id, booking.customer_id)
        .await
    {
        tracing::warn!(
            booking_id = %booking.id,
            customer_id = %booking.customer_id,
            error = %e,
            "Failed to increment customer booking count"
        );
    }

    tracing::info!(
        booking_id = %booking.id,
        business_id = %booking.business_id,
        slot_id = %booking.slot_id,
        "Booking created"
    );

    Ok(booking)
}

/// 枠を確保できなかった予約を削除する補償処理
///
/// 削除に失敗するとPendingの孤児予約が残る。これは実行時に回復できる
/// 状態ではなくデータ整合性の障害なので、errorレベルで記録する。
async fn compensate_unreserved_booking(repository: &Arc<dyn BookingRepository>, booking: &Booking) {
    if let Err(e) = repository.delete(booking.business_id, booking.id).await {
        tracing::error!(
            booking_id = %booking.id,
            business_id = %booking.business_id,
            slot_id = %booking.slot_id,
            error = %e,
            "CRITICAL: compensation failed, orphan pending booking left without slot reservation"
        );
    }
}

/// 予約のステータス・メモを更新する
///
/// ビジネスルール：
/// - 予約がこの事業者に存在すること
/// - 現在と異なるステータスが指定された場合は遷移表で検証する
/// - メモは500文字以内
/// - Cancelledへ遷移した場合は枠の確保を解除する（ベストエフォート）
pub async fn update_booking(deps: &ServiceDependencies, cmd: UpdateBooking) -> Result<Booking> {
    // 1. 入力検証
    let notes = validation::validate_notes(cmd.notes)?;

    // 2. 予約を読み込む
    let current = load_booking(&deps.booking_repository, cmd.business_id, cmd.booking_id).await?;

    // 3. ドメイン層の純粋関数を呼び出し
    let updated =
        domain::booking::update_booking(&current, cmd.status, notes, cmd.requested_at)?;

    // 4. 保存 → （キャンセルへ遷移した場合）枠の解放
    commit_in_background(deps, &updated, current.status).await?;

    tracing::info!(
        booking_id = %updated.id,
        from = %current.status,
        to = %updated.status,
        "Booking updated"
    );

    Ok(updated)
}

/// 更新した予約を保存し、キャンセルへ遷移した場合は枠を解放する
///
/// 保存と解放は切り離したタスクで実行する。保存が成功した後に
/// 呼び出し元のFutureが破棄されても、枠の解放（または失敗のログ）は行われる。
async fn commit_in_background(
    deps: &ServiceDependencies,
    updated: &Booking,
    expected_status: BookingStatus,
) -> Result<()> {
    let deps = deps.clone();
    let updated = updated.clone();

    tokio::spawn(async move {
        save_booking(&deps.booking_repository, &updated, expected_status).await?;

        if expected_status.is_active() && updated.status == BookingStatus::Cancelled {
            release_slot(&deps.slot_service, &updated).await;
        }
        Ok::<(), BookingApplicationError>(())
    })
    .await
    .map_err(BookingApplicationError::TaskFailed)?
}

/// 予約を指定ステータスへ遷移させる共通処理
///
/// 同一ステータスも遷移表で検証する（終端からの遷移は常にエラー）。
async fn transition_booking(
    deps: &ServiceDependencies,
    cmd: &ChangeBookingStatus,
    to: BookingStatus,
) -> Result<Booking> {
    let current = load_booking(&deps.booking_repository, cmd.business_id, cmd.booking_id).await?;

    let updated = domain::booking::change_status(&current, to, cmd.requested_at)?;

    commit_in_background(deps, &updated, current.status).await?;

    tracing::info!(
        booking_id = %updated.id,
        from = %current.status,
        to = %updated.status,
        "Booking status changed"
    );

    Ok(updated)
}

/// 予約を確定する（Pending → Confirmed）
pub async fn confirm_booking(
    deps: &ServiceDependencies,
    cmd: ChangeBookingStatus,
) -> Result<Booking> {
    transition_booking(deps, &cmd, BookingStatus::Confirmed).await
}

/// 予約を完了する（Confirmed → Completed）
///
/// 枠は消費済みとして確保したままにする。
pub async fn complete_booking(
    deps: &ServiceDependencies,
    cmd: ChangeBookingStatus,
) -> Result<Booking> {
    transition_booking(deps, &cmd, BookingStatus::Completed).await
}

/// 予約をキャンセルする
///
/// ビジネスルール：
/// - Pending・Confirmedからのみキャンセル可能
/// - キャンセル済み・完了済みの予約は`InvalidTransition`で変更しない
///
/// # 一貫性保証
///
/// ステータスの永続化が成功した時点でキャンセルは成立する。
/// その後の枠の解放はベストエフォートで、失敗はログに記録するのみ。
/// 保存後に呼び出し元が破棄されても解放は最後まで実行される。
pub async fn cancel_booking(
    deps: &ServiceDependencies,
    cmd: ChangeBookingStatus,
) -> Result<Booking> {
    transition_booking(deps, &cmd, BookingStatus::Cancelled).await
}
