//! Laundry Timer - countdown state for shared washers and dryers
//!
//! Each device cycles Available -> Running -> Finished -> Available, driven
//! by presses and by a shared one-second countdown scheduler that publishes
//! "time left" projections while a device is running.

pub mod clock;
pub mod config;
pub mod console;
pub mod error;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, TimerConfig};
pub use error::{ClockError, TimerError};
pub use state::{AppState, Device, DeviceKind, DeviceSnapshot, DeviceStatus};
pub use utils::signals::shutdown_signal;
