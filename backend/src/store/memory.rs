//! In-memory `RecordStore` with switchable failures, for tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;

use super::{RecordStore, StoreError};
use crate::models::DailyGameRecord;

#[derive(Default)]
pub struct MemoryRecordStore {
    record: Mutex<Option<DailyGameRecord>>,
    saves: AtomicUsize,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
}

impl MemoryRecordStore {
    pub fn with_record(record: DailyGameRecord) -> Self {
        let store = Self::default();
        *store.record.lock().unwrap() = Some(record);
        store
    }

    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Option<DailyGameRecord> {
        self.record.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn load(&self) -> Result<Option<DailyGameRecord>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("reading", "simulated outage"));
        }
        Ok(self.snapshot())
    }

    async fn save(&self, record: &DailyGameRecord) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("writing", "simulated outage"));
        }
        *self.record.lock().unwrap() = Some(record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
