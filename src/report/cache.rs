//! Single-slot cache with expiry.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Holds one value and the time it was stored.
///
/// The value is rebuilt when the slot is empty or older than `ttl`.
/// Building happens outside the lock, so two callers hitting an expired
/// slot at once may both rebuild; the last one stored wins.
pub struct TtlCache<T> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slot: Mutex<Option<(T, DateTime<Utc>)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Returns the cached value, or builds and stores a fresh one.
    pub fn get_or_try_refresh<E>(&self, build: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        let now = self.clock.now();

        if let Some((value, stored_at)) = self.lock().as_ref() {
            if now - *stored_at <= self.ttl {
                return Ok(value.clone());
            }
        }

        debug!("Cache slot empty or expired; rebuilding");
        let value = build()?;
        *self.lock() = Some((value.clone(), now));
        Ok(value)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<(T, DateTime<Utc>)>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
