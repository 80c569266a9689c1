mod common;

use chrono::Duration;
use common::{nine_am, nine_thirty_am};
use serial_test::serial;
use slot_booking_ddd::adapters::postgres::{
    PostgresBookingRepository, PostgresCustomerService, PostgresSlotService, PostgresStaffService,
};
use slot_booking_ddd::application::booking::{
    BookingApplicationError, ServiceDependencies, cancel_booking, create_booking,
};
use slot_booking_ddd::domain::booking::{self, Booking};
use slot_booking_ddd::domain::commands::{ChangeBookingStatus, CreateBooking};
use slot_booking_ddd::domain::value_objects::*;
use slot_booking_ddd::ports::*;
use sqlx::PgPool;
use std::sync::Arc;

/// 1事業者分のテストデータ（顧客・スタッフ・枠）を登録する
///
/// 事業者IDは毎回新しく採番するため、テスト間でデータは干渉しない。
struct Seed {
    business_id: BusinessId,
    customer_id: CustomerId,
    staff_id: StaffId,
    slot_id: SlotId,
}

async fn seed(pool: &PgPool) -> Seed {
    let seed = Seed {
        business_id: BusinessId::new(),
        customer_id: CustomerId::new(),
        staff_id: StaffId::new(),
        slot_id: SlotId::new(),
    };

    sqlx::query("INSERT INTO customers (customer_id, business_id) VALUES ($1, $2)")
        .bind(seed.customer_id.value())
        .bind(seed.business_id.value())
        .execute(pool)
        .await
        .expect("Failed to insert customer");

    sqlx::query("INSERT INTO staff (staff_id, business_id) VALUES ($1, $2)")
        .bind(seed.staff_id.value())
        .bind(seed.business_id.value())
        .execute(pool)
        .await
        .expect("Failed to insert staff");

    sqlx::query(
        "INSERT INTO slots (slot_id, business_id, staff_id, start_time, end_time) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(seed.slot_id.value())
    .bind(seed.business_id.value())
    .bind(seed.staff_id.value())
    .bind(nine_am())
    .bind(nine_thirty_am())
    .execute(pool)
    .await
    .expect("Failed to insert slot");

    seed
}

fn command(seed: &Seed) -> CreateBooking {
    CreateBooking {
        business_id: seed.business_id,
        customer_id: seed.customer_id,
        staff_id: seed.staff_id,
        service_id: ServiceId::new(),
        slot_id: seed.slot_id,
        notes: "postgres".to_string(),
        requested_at: nine_am() - Duration::days(1),
    }
}

fn pending_booking(seed: &Seed) -> Booking {
    booking::create_booking(
        &command(seed),
        Notes::new("postgres").unwrap(),
        nine_am(),
        nine_thirty_am(),
    )
    .unwrap()
}

fn deps(pool: &PgPool) -> ServiceDependencies {
    ServiceDependencies {
        booking_repository: Arc::new(PostgresBookingRepository::new(pool.clone())),
        slot_service: Arc::new(PostgresSlotService::new(pool.clone())),
        customer_service: Arc::new(PostgresCustomerService::new(pool.clone())),
        staff_service: Arc::new(PostgresStaffService::new(pool.clone())),
    }
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_booking_repository_round_trip() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let repository = PostgresBookingRepository::new(pool.clone());

    let booking = pending_booking(&seed);
    repository.create(&booking).await.unwrap();

    let stored = repository
        .get_by_id(seed.business_id, booking.id)
        .await
        .unwrap();
    assert_eq!(stored, Some(booking.clone()));

    // 別事業者からは見えない
    let other = repository
        .get_by_id(BusinessId::new(), booking.id)
        .await
        .unwrap();
    assert_eq!(other, None);

    let by_customer = repository
        .find_by_customer(seed.business_id, seed.customer_id)
        .await
        .unwrap();
    assert_eq!(by_customer, vec![booking.clone()]);

    repository.delete(seed.business_id, booking.id).await.unwrap();
    assert_eq!(
        repository
            .get_by_id(seed.business_id, booking.id)
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_booking_repository_update_checks_status() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let repository = PostgresBookingRepository::new(pool.clone());

    let booking = pending_booking(&seed);
    repository.create(&booking).await.unwrap();

    let confirmed = booking::change_status(&booking, BookingStatus::Confirmed, nine_am()).unwrap();
    assert!(
        repository
            .update(&confirmed, BookingStatus::Pending)
            .await
            .unwrap()
    );

    // 既にConfirmedなので、Pendingを前提にした更新は書き込まれない
    let cancelled = booking::cancel_booking(&booking, nine_am()).unwrap();
    assert!(
        !repository
            .update(&cancelled, BookingStatus::Pending)
            .await
            .unwrap()
    );

    let stored = repository
        .get_by_id(seed.business_id, booking.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);

    assert_eq!(
        repository
            .count_by_status(seed.business_id, BookingStatus::Confirmed)
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_slot_service_reserve_is_exclusive() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let slots = PostgresSlotService::new(pool.clone());

    assert!(slots.is_available(seed.business_id, seed.slot_id).await.unwrap());

    let view = slots
        .get_slot(seed.business_id, seed.slot_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(view.start_time, nine_am());
    assert_eq!(view.staff_id, seed.staff_id);

    assert!(slots.reserve(seed.slot_id, BookingId::new()).await.unwrap());
    assert!(!slots.reserve(seed.slot_id, BookingId::new()).await.unwrap());
    assert!(!slots.is_available(seed.business_id, seed.slot_id).await.unwrap());

    slots.release(seed.slot_id).await.unwrap();
    assert!(slots.is_available(seed.business_id, seed.slot_id).await.unwrap());

    // 他の事業者からは空いていないように見える
    assert!(
        !slots
            .is_available(BusinessId::new(), seed.slot_id)
            .await
            .unwrap()
    );

    // 未登録の枠
    assert!(!slots.is_available(seed.business_id, SlotId::new()).await.unwrap());
    assert!(slots.release(SlotId::new()).await.is_err());
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_directory_services() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let customers = PostgresCustomerService::new(pool.clone());
    let staff = PostgresStaffService::new(pool.clone());

    assert!(
        customers
            .exists(seed.business_id, seed.customer_id)
            .await
            .unwrap()
    );
    assert!(
        !customers
            .exists(BusinessId::new(), seed.customer_id)
            .await
            .unwrap()
    );
    assert!(staff.exists(seed.business_id, seed.staff_id).await.unwrap());

    customers
        .increment_booking_count(seed.business_id, seed.customer_id)
        .await
        .unwrap();
    let count: i64 =
        sqlx::query_scalar("SELECT booking_count FROM customers WHERE customer_id = $1")
            .bind(seed.customer_id.value())
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_concurrent_creates_against_postgres() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let deps = deps(&pool);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let deps = deps.clone();
            let cmd = command(&seed);
            tokio::spawn(async move { create_booking(&deps, cmd).await })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(BookingApplicationError::SlotUnavailable) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }
    assert_eq!(successes, 1);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE slot_id = $1")
        .bind(seed.slot_id.value())
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn test_cancel_releases_slot_in_postgres() {
    let pool = common::create_test_pool().await;
    let seed = seed(&pool).await;
    let deps = deps(&pool);

    let booking = create_booking(&deps, command(&seed)).await.unwrap();
    let cancelled = cancel_booking(
        &deps,
        ChangeBookingStatus {
            business_id: seed.business_id,
            booking_id: booking.id,
            requested_at: nine_am() - Duration::hours(1),
        },
    )
    .await
    .unwrap();

    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert!(
        deps.slot_service
            .is_available(seed.business_id, seed.slot_id)
            .await
            .unwrap()
    );
}
