//! Per-session serialisation of inbound messages.
//!
//! Two messages for the same session never interleave their
//! load/append/generate/append sequence inside one process. Entries are
//! removed once the last holder or waiter lets go, so the map only ever
//! contains sessions with traffic in flight.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Default)]
struct Slot {
    lock: Arc<Mutex<()>>,
    users: usize,
}

type SlotMap = DashMap<String, Slot>;

/// Keyed async mutex over session ids.
#[derive(Debug, Default, Clone)]
pub struct SessionLocks {
    inner: Arc<SlotMap>,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `session_id`.
    ///
    /// Cancel-safe: dropping the future while it waits releases this
    /// caller's claim on the entry.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard {
        let lock = {
            let mut slot = self.inner.entry(session_id.to_string()).or_default();
            slot.users += 1;
            Arc::clone(&slot.lock)
        };
        let claim = SlotClaim {
            session_id: session_id.to_string(),
            locks: Arc::clone(&self.inner),
        };
        let guard = lock.lock_owned().await;
        SessionGuard {
            _guard: guard,
            _claim: claim,
        }
    }

    /// Number of sessions currently locked or awaited.
    pub fn active(&self) -> usize {
        self.inner.len()
    }
}

/// One holder's or waiter's registration on a slot.
#[derive(Debug)]
struct SlotClaim {
    session_id: String,
    locks: Arc<SlotMap>,
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        self.locks.remove_if_mut(&self.session_id, |_, slot| {
            slot.users -= 1;
            slot.users == 0
        });
    }
}

/// Held for the duration of one inbound message.
#[derive(Debug)]
pub struct SessionGuard {
    // Field order: the mutex is released before the claim is dropped.
    _guard: OwnedMutexGuard<()>,
    _claim: SlotClaim,
}
