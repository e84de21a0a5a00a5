//! Error types

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::state::Device;

/// Failure reading the time source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("time source unavailable")]
    Unavailable,
    #[error("time source went backwards: {now} is before {previous}")]
    WentBackwards {
        previous: DateTime<Utc>,
        now: DateTime<Utc>,
    },
}

/// Errors returned by the device timer controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("unknown device: {0}")]
    InvalidDevice(Device),
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Rejected startup configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} duration must be greater than zero")]
    ZeroDuration(&'static str),
    #[error("{0} duration is too large")]
    DurationTooLarge(&'static str),
    #[error("tick interval must be greater than zero")]
    ZeroTick,
}

/// Unparseable console input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0}")]
    InvalidKind(String),
    #[error("invalid device id '{0}'")]
    InvalidId(String),
}
