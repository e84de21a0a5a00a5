//! Time sources consumed by the timer controller

use std::{
    fmt,
    sync::{Mutex, PoisonError},
    time::Duration,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::ClockError;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Result<DateTime<Utc>, ClockError>;
}

/// Consecutive backwards readings tolerated before the clock re-anchors
pub const MAX_BACKWARDS_READINGS: u32 = 5;

/// System time, rejecting readings that go backwards.
///
/// After [`MAX_BACKWARDS_READINGS`] rejections in a row the earlier reading
/// is taken as the new high-water mark, so a stepped-back clock stalls ticks
/// and presses for a few readings instead of until wall time catches up.
#[derive(Debug, Default)]
pub struct SystemClock {
    anchor: Mutex<Anchor>,
}

#[derive(Debug, Default)]
struct Anchor {
    last: Option<DateTime<Utc>>,
    rejected: u32,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a reading against the last accepted one
    pub(crate) fn observe(&self, now: DateTime<Utc>) -> Result<DateTime<Utc>, ClockError> {
        let mut anchor = self.anchor.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(previous) = anchor.last {
            if now < previous {
                anchor.rejected += 1;
                if anchor.rejected <= MAX_BACKWARDS_READINGS {
                    return Err(ClockError::WentBackwards { previous, now });
                }
                warn!("Clock stepped back from {} to {}, re-anchoring", previous, now);
            }
        }

        anchor.last = Some(now);
        anchor.rejected = 0;
        Ok(now)
    }

    #[cfg(test)]
    fn last(&self) -> Option<DateTime<Utc>> {
        self.anchor.lock().unwrap_or_else(PoisonError::into_inner).last
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        self.observe(Utc::now())
    }
}

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct ManualClock {
    inner: Mutex<ManualInner>,
}

#[derive(Debug)]
struct ManualInner {
    now: DateTime<Utc>,
    available: bool,
}

impl ManualClock {
    /// Create a clock frozen at `start`
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            inner: Mutex::new(ManualInner { now: start, available: true }),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut inner = self.lock();
        // Durations beyond chrono's range saturate to the largest representable step.
        let step = chrono::Duration::from_std(by).unwrap_or(chrono::Duration::MAX);
        inner.now = inner.now.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC);
    }

    /// Jump to an absolute time, which may be in the past
    pub fn set(&self, now: DateTime<Utc>) {
        self.lock().now = now;
    }

    /// Make subsequent readings fail with [`ClockError::Unavailable`]
    pub fn set_available(&self, available: bool) {
        self.lock().available = available;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<DateTime<Utc>, ClockError> {
        let inner = self.lock();
        if inner.available {
            Ok(inner.now)
        } else {
            Err(ClockError::Unavailable)
        }
    }
}
