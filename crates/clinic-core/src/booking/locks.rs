//! Per-doctor exclusion locks for reservation operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Registry handing out one lock per doctor id.
///
/// The registry's own mutex is held only for the lookup; the returned lock is
/// what scopes a reservation's check-and-mutate region. Distinct doctors get
/// distinct locks, so their operations never wait on each other here.
#[derive(Default)]
pub struct SlotLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SlotLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for one doctor.
    pub fn doctor(&self, doctor_id: &str) -> Arc<Mutex<()>> {
        // These mutexes guard no data, so a poisoned guard is still a valid
        // exclusion token.
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(doctor_id.to_string()).or_default().clone()
    }
}
