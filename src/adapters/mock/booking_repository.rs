use crate::domain::booking::Booking;
use crate::domain::value_objects::{
    BookingId, BookingStatus, BusinessId, CustomerId, SlotId, StaffId,
};
use crate::ports::booking_repository::{BookingRepository as BookingRepositoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// BookingRepositoryのインメモリ実装
///
/// 予約IDをキーに保持し、読み込みはすべてbusiness_idで絞り込む。
pub struct BookingRepository {
    bookings: Mutex<HashMap<BookingId, Booking>>,
}

impl BookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(HashMap::new()),
        }
    }

    fn bookings(&self) -> MutexGuard<'_, HashMap<BookingId, Booking>> {
        self.bookings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// テスト用：枠に紐づく予約をステータスを問わずすべて取得
    pub fn bookings_for_slot(&self, slot_id: SlotId) -> Vec<Booking> {
        self.bookings()
            .values()
            .filter(|b| b.slot_id == slot_id)
            .cloned()
            .collect()
    }

    fn filter_sorted(&self, predicate: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        let mut found: Vec<Booking> = self
            .bookings()
            .values()
            .filter(|b| predicate(b))
            .cloned()
            .collect();
        found.sort_by_key(|b| b.start_time);
        found
    }
}

impl Default for BookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingRepositoryTrait for BookingRepository {
    async fn create(&self, booking: &Booking) -> Result<()> {
        let mut bookings = self.bookings();
        if bookings.contains_key(&booking.id) {
            return Err(format!("booking {} already exists", booking.id).into());
        }
        bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_by_id(
        &self,
        business_id: BusinessId,
        booking_id: BookingId,
    ) -> Result<Option<Booking>> {
        Ok(self
            .bookings()
            .get(&booking_id)
            .filter(|b| b.business_id == business_id)
            .cloned())
    }

    async fn find_by_customer(
        &self,
        business_id: BusinessId,
        customer_id: CustomerId,
    ) -> Result<Vec<Booking>> {
        Ok(self.filter_sorted(|b| b.business_id == business_id && b.customer_id == customer_id))
    }

    async fn find_by_staff(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
    ) -> Result<Vec<Booking>> {
        Ok(self.filter_sorted(|b| b.business_id == business_id && b.staff_id == staff_id))
    }

    async fn find_by_business(&self, business_id: BusinessId) -> Result<Vec<Booking>> {
        Ok(self.filter_sorted(|b| b.business_id == business_id))
    }

    /// 保存済みのステータスが一致する場合だけ書き換える
    async fn update(&self, booking: &Booking, expected_status: BookingStatus) -> Result<bool> {
        let mut bookings = self.bookings();
        match bookings.get_mut(&booking.id) {
            Some(stored)
                if stored.business_id == booking.business_id
                    && stored.status == expected_status =>
            {
                *stored = booking.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, business_id: BusinessId, booking_id: BookingId) -> Result<()> {
        let mut bookings = self.bookings();
        if bookings
            .get(&booking_id)
            .is_some_and(|b| b.business_id == business_id)
        {
            bookings.remove(&booking_id);
        }
        Ok(())
    }

    async fn count_by_status(
        &self,
        business_id: BusinessId,
        status: BookingStatus,
    ) -> Result<u64> {
        Ok(self
            .bookings()
            .values()
            .filter(|b| b.business_id == business_id && b.status == status)
            .count() as u64)
    }
}
