use crate::domain::{BookingStatus, booking::Booking, value_objects::*};

use super::booking_service::{ServiceDependencies, load_booking};
use super::errors::{BookingApplicationError, Result};

/// IDで予約を取得する
pub async fn get_booking(
    deps: &ServiceDependencies,
    business_id: BusinessId,
    booking_id: BookingId,
) -> Result<Booking> {
    load_booking(&deps.booking_repository, business_id, booking_id).await
}

/// 顧客の予約一覧
pub async fn list_bookings_for_customer(
    deps: &ServiceDependencies,
    business_id: BusinessId,
    customer_id: CustomerId,
) -> Result<Vec<Booking>> {
    deps.booking_repository
        .find_by_customer(business_id, customer_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)
}

/// スタッフの予約一覧
pub async fn list_bookings_for_staff(
    deps: &ServiceDependencies,
    business_id: BusinessId,
    staff_id: StaffId,
) -> Result<Vec<Booking>> {
    deps.booking_repository
        .find_by_staff(business_id, staff_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)
}

/// 事業者の全予約
pub async fn list_bookings_for_business(
    deps: &ServiceDependencies,
    business_id: BusinessId,
) -> Result<Vec<Booking>> {
    deps.booking_repository
        .find_by_business(business_id)
        .await
        .map_err(BookingApplicationError::RepositoryError)
}

/// ステータスごとの予約件数
///
/// すべてのステータスを`BookingStatus::ALL`の順で返す（0件も含む）。
pub async fn count_bookings_by_status(
    deps: &ServiceDependencies,
    business_id: BusinessId,
) -> Result<Vec<(BookingStatus, u64)>> {
    let mut counts = Vec::with_capacity(BookingStatus::ALL.len());

    for status in BookingStatus::ALL {
        let count = deps
            .booking_repository
            .count_by_status(business_id, status)
            .await
            .map_err(BookingApplicationError::RepositoryError)?;
        counts.push((status, count));
    }

    Ok(counts)
}
