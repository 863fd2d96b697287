//! TTL Cache
//!
//! A single-slot read-through cache with an injected clock. Callers that
//! poll an upstream quote or rate endpoint wrap the fetch in
//! `get_or_load`; the cached value is served until the TTL elapses. No
//! ambient module state: expiry is decided against the supplied `Clock`,
//! so tests drive time explicitly.

use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// Time source for TTL decisions
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

struct Entry<T> {
    value: T,
    stored_at: SystemTime,
}

/// Single-value cache that serves a clone until the TTL elapses
pub struct TtlCache<T, C = SystemClock> {
    ttl: Duration,
    clock: C,
    slot: Mutex<Option<Entry<T>>>,
}

impl<T: Clone, C: Clock> TtlCache<T, C> {
    pub fn new(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            slot: Mutex::new(None),
        }
    }

    /// Current value, or `None` when empty or expired
    pub fn get(&self) -> Option<T> {
        let slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        let entry = slot.as_ref()?;
        if self.is_fresh(entry) {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Store a value, stamping it with the clock's current time
    pub fn put(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(Entry {
            value,
            stored_at: self.clock.now(),
        });
    }

    /// Serve the cached value, loading a fresh one when empty or expired
    pub fn get_or_load(&self, load: impl FnOnce() -> T) -> T {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(entry) = slot.as_ref()
            && self.is_fresh(entry)
        {
            return entry.value.clone();
        }
        let value = load();
        *slot = Some(Entry {
            value: value.clone(),
            stored_at: self.clock.now(),
        });
        value
    }

    /// Drop the cached value
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }

    fn is_fresh(&self, entry: &Entry<T>) -> bool {
        match entry.stored_at.checked_add(self.ttl) {
            Some(expires_at) => self.clock.now() < expires_at,
            None => false,
        }
    }
}
