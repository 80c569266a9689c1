use crate::domain::value_objects::{BookingId, BusinessId, SlotId, StaffId};
use crate::ports::slot_service::{Result, SlotService as SlotServiceTrait, SlotView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

struct SlotEntry {
    view: SlotView,
    reserved_by: Option<BookingId>,
}

/// SlotServiceのインメモリ実装
///
/// 確保は1つのロック内で確認と設定を行うため、
/// 同じ枠への同時`reserve`で`true`を返すのは1件だけ。
pub struct SlotService {
    slots: Mutex<HashMap<SlotId, SlotEntry>>,
}

impl SlotService {
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<SlotId, SlotEntry>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// テスト用：未確保の枠を登録
    pub fn add_slot(
        &self,
        business_id: BusinessId,
        staff_id: StaffId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> SlotId {
        let slot_id = SlotId::new();
        self.slots().insert(
            slot_id,
            SlotEntry {
                view: SlotView {
                    slot_id,
                    business_id,
                    staff_id,
                    start_time,
                    end_time,
                },
                reserved_by: None,
            },
        );
        slot_id
    }

    /// テスト用：枠を確保している予約を取得
    pub fn reserved_by(&self, slot_id: SlotId) -> Option<BookingId> {
        self.slots().get(&slot_id).and_then(|s| s.reserved_by)
    }
}

impl Default for SlotService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SlotServiceTrait for SlotService {
    async fn is_available(&self, business_id: BusinessId, slot_id: SlotId) -> Result<bool> {
        Ok(self
            .slots()
            .get(&slot_id)
            .is_some_and(|s| s.view.business_id == business_id && s.reserved_by.is_none()))
    }

    async fn get_slot(
        &self,
        business_id: BusinessId,
        slot_id: SlotId,
    ) -> Result<Option<SlotView>> {
        Ok(self
            .slots()
            .get(&slot_id)
            .filter(|s| s.view.business_id == business_id)
            .map(|s| s.view.clone()))
    }

    async fn reserve(&self, slot_id: SlotId, booking_id: BookingId) -> Result<bool> {
        let mut slots = self.slots();
        match slots.get_mut(&slot_id) {
            Some(slot) if slot.reserved_by.is_none() => {
                slot.reserved_by = Some(booking_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release(&self, slot_id: SlotId) -> Result<()> {
        match self.slots().get_mut(&slot_id) {
            Some(slot) => {
                slot.reserved_by = None;
                Ok(())
            }
            None => Err(format!("slot {} not found", slot_id).into()),
        }
    }
}
