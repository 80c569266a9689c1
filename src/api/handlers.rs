use crate::application::booking::{
    ServiceDependencies, cancel_booking as execute_cancel_booking,
    complete_booking as execute_complete_booking, confirm_booking as execute_confirm_booking,
    count_bookings_by_status, create_booking as execute_create_booking,
    get_booking as execute_get_booking, list_bookings_for_business, list_bookings_for_customer,
    list_bookings_for_staff, update_booking as execute_update_booking,
};
use crate::domain::value_objects::{BookingId, CustomerId, StaffId};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    tenant::BusinessContext,
    types::{
        BookingResponse, BookingStatsResponse, CreateBookingRequest, ListBookingsQuery,
        UpdateBookingRequest, change_status_command,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /bookings - 枠を予約する
///
/// 強制されるビジネスルール:
/// - すべてのIDが指定されていること、メモが500文字以内であること
/// - 枠が空いていること（同時リクエストでは1件だけが成功する）
/// - 顧客・スタッフがこの事業者に存在すること
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), ApiError> {
    let cmd = req.to_command(business_id, chrono::Utc::now());

    let booking = execute_create_booking(&state.service_deps, cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// PATCH /bookings/:id - ステータス・メモを更新する
pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Path(booking_id): Path<Uuid>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = req
        .to_command(
            business_id,
            BookingId::from_uuid(booking_id),
            chrono::Utc::now(),
        )
        .map_err(ApiError::BadRequest)?;

    let booking = execute_update_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// POST /bookings/:id/confirm - 予約を確定する
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = change_status_command(
        business_id,
        BookingId::from_uuid(booking_id),
        chrono::Utc::now(),
    );

    let booking = execute_confirm_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// POST /bookings/:id/cancel - 予約をキャンセルする
///
/// キャンセル済み・完了済みの予約は409（INVALID_TRANSITION）。
/// 枠の解放に失敗してもキャンセル自体は成功として返す。
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = change_status_command(
        business_id,
        BookingId::from_uuid(booking_id),
        chrono::Utc::now(),
    );

    let booking = execute_cancel_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// POST /bookings/:id/complete - 予約を完了する
pub async fn complete_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let cmd = change_status_command(
        business_id,
        BookingId::from_uuid(booking_id),
        chrono::Utc::now(),
    );

    let booking = execute_complete_booking(&state.service_deps, cmd).await?;

    Ok(Json(BookingResponse::from(booking)))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /bookings/:id - 予約詳細をIDで取得
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, ApiError> {
    let booking = execute_get_booking(
        &state.service_deps,
        business_id,
        BookingId::from_uuid(booking_id),
    )
    .await?;

    Ok(Json(BookingResponse::from(booking)))
}

/// GET /bookings - 予約一覧取得
///
/// クエリパラメータ:
/// - customer_id: 顧客IDでフィルタリング
/// - staff_id: スタッフIDでフィルタリング
///
/// どちらも指定されない場合は事業者の全予約を返す。両方の指定は不可。
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let deps = &state.service_deps;

    let bookings = match (query.customer_id, query.staff_id) {
        (Some(_), Some(_)) => {
            return Err(ApiError::BadRequest(
                "customer_id and staff_id cannot be combined".to_string(),
            ));
        }
        (Some(customer_id), None) => {
            list_bookings_for_customer(deps, business_id, CustomerId::from_uuid(customer_id))
                .await?
        }
        (None, Some(staff_id)) => {
            list_bookings_for_staff(deps, business_id, StaffId::from_uuid(staff_id)).await?
        }
        (None, None) => list_bookings_for_business(deps, business_id).await?,
    };

    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

/// GET /bookings/stats - ステータス別の予約件数
pub async fn booking_stats(
    State(state): State<Arc<AppState>>,
    BusinessContext(business_id): BusinessContext,
) -> Result<Json<BookingStatsResponse>, ApiError> {
    let counts = count_bookings_by_status(&state.service_deps, business_id).await?;

    Ok(Json(BookingStatsResponse::from(counts)))
}
