//! Per-device countdown state machine

use std::time::Duration;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Availability of a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    Available,
    Running,
    Finished,
}

impl DeviceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Running => "running",
            Self::Finished => "finished",
        }
    }
}

/// Result of a press on a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Started { ends_at: DateTime<Utc> },
    Cancelled,
    Reset,
}

/// Result of evaluating a device on a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, nothing to do
    Idle,
    /// Still running with this much time left
    Remaining(Duration),
    /// The countdown reached zero and the device is now finished
    Expired,
}

/// Countdown state of a single device.
///
/// The end timestamp only exists while running, so a stale deadline can
/// never outlive a cancel or an expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceTimerState {
    phase: Phase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Phase {
    #[default]
    Available,
    Running { ends_at: DateTime<Utc> },
    Finished,
}

impl DeviceTimerState {
    /// Create an available timer state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> DeviceStatus {
        match self.phase {
            Phase::Available => DeviceStatus::Available,
            Phase::Running { .. } => DeviceStatus::Running,
            Phase::Finished => DeviceStatus::Finished,
        }
    }

    /// Instant at which the countdown reaches zero, set only while running
    pub fn end_timestamp(&self) -> Option<DateTime<Utc>> {
        match self.phase {
            Phase::Running { ends_at } => Some(ends_at),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Apply a press: start when available, cancel when running, reset when finished
    pub fn press(&mut self, now: DateTime<Utc>, duration: Duration) -> PressOutcome {
        match self.phase {
            Phase::Available => {
                let step = chrono::Duration::from_std(duration).unwrap_or(chrono::Duration::MAX);
                let ends_at = now.checked_add_signed(step).unwrap_or(DateTime::<Utc>::MAX_UTC);
                self.phase = Phase::Running { ends_at };
                PressOutcome::Started { ends_at }
            }
            Phase::Running { .. } => {
                self.phase = Phase::Available;
                PressOutcome::Cancelled
            }
            Phase::Finished => {
                self.phase = Phase::Available;
                PressOutcome::Reset
            }
        }
    }

    /// Evaluate the countdown at `now`, finishing it once the deadline has passed
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        match self.phase {
            Phase::Running { ends_at } if now >= ends_at => {
                self.phase = Phase::Finished;
                TickOutcome::Expired
            }
            Phase::Running { ends_at } => TickOutcome::Remaining(remaining_until(ends_at, now)),
            Phase::Available | Phase::Finished => TickOutcome::Idle,
        }
    }

    /// Time left before the deadline, clamped at zero
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.end_timestamp().map(|ends_at| remaining_until(ends_at, now))
    }
}

fn remaining_until(ends_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    // Negative spans fail the conversion.
    (ends_at - now).to_std().unwrap_or(Duration::ZERO)
}
