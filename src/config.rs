//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::{
    error::ConfigError,
    state::{Device, DeviceKind},
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "laundry-timer")]
#[command(about = "Countdown timers tracking the availability of shared washers and dryers")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Washer cycle duration in minutes
    #[arg(long, default_value = "90")]
    pub washer_minutes: u64,

    /// Dryer cycle duration in minutes
    #[arg(long, default_value = "120")]
    pub dryer_minutes: u64,

    /// Projection refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Number of washers in the room
    #[arg(long, default_value = "2")]
    pub washers: u32,

    /// Number of dryers in the room
    #[arg(long, default_value = "2")]
    pub dryers: u32,

    /// Print running projections on every refresh
    #[arg(short, long)]
    pub follow: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Build the validated timer configuration
    pub fn timer_config(&self) -> Result<TimerConfig, ConfigError> {
        TimerConfig::new(
            minutes("washer", self.washer_minutes)?,
            minutes("dryer", self.dryer_minutes)?,
            Duration::from_millis(self.tick_ms),
        )
    }

    /// The fixed device set, numbered from 1 per kind
    pub fn devices(&self) -> Vec<Device> {
        (1..=self.washers)
            .map(Device::washer)
            .chain((1..=self.dryers).map(Device::dryer))
            .collect()
    }
}

fn minutes(kind: &'static str, minutes: u64) -> Result<Duration, ConfigError> {
    minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or(ConfigError::DurationTooLarge(kind))
}

/// Countdown durations and tick cadence, fixed for the lifetime of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    washer: Duration,
    dryer: Duration,
    tick: Duration,
}

impl TimerConfig {
    pub fn new(washer: Duration, dryer: Duration, tick: Duration) -> Result<Self, ConfigError> {
        if washer.is_zero() {
            return Err(ConfigError::ZeroDuration("washer"));
        }
        if dryer.is_zero() {
            return Err(ConfigError::ZeroDuration("dryer"));
        }
        if tick.is_zero() {
            return Err(ConfigError::ZeroTick);
        }
        Ok(Self { washer, dryer, tick })
    }

    /// Cycle length for a kind of device
    pub fn duration(&self, kind: DeviceKind) -> Duration {
        match kind {
            DeviceKind::Washer => self.washer,
            DeviceKind::Dryer => self.dryer,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            washer: Duration::from_secs(90 * 60),
            dryer: Duration::from_secs(120 * 60),
            tick: Duration::from_secs(1),
        }
    }
}
