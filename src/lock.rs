//! Per-warehouse mutual exclusion for allocation passes.
//!
//! Two passes over the same warehouse would read the same unassigned-order
//! snapshot and could hand one order to two agents. A pass holds its
//! warehouse's lock from the first fetch until the last commit; passes over
//! different warehouses never contend.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::models::WarehouseId;

#[derive(Debug, Default)]
pub struct WarehouseLocks {
    locks: Mutex<HashMap<WarehouseId, Arc<Mutex<()>>>>,
}

impl WarehouseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_for(&self, warehouse: WarehouseId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock();
        locks.entry(warehouse).or_default().clone()
    }

    /// Run `f` while holding `warehouse`'s lock, waiting for any pass
    /// already in progress.
    pub fn with_lock<T>(&self, warehouse: WarehouseId, f: impl FnOnce() -> T) -> T {
        let lock = self.lock_for(warehouse);
        let _guard = lock.lock();
        f()
    }

    /// Run `f` only if no other pass holds `warehouse`'s lock.
    pub fn try_with_lock<T>(&self, warehouse: WarehouseId, f: impl FnOnce() -> T) -> Option<T> {
        let lock = self.lock_for(warehouse);
        let _guard = lock.try_lock()?;
        Some(f())
    }
}
