//! State management module
//!
//! Device identity, the per-device countdown state machine, and the
//! controller that owns every device in the room.

pub mod app_state;
pub mod device;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use device::{Device, DeviceKind};
pub use snapshot::{DeviceEvent, DeviceSnapshot, RoomSnapshot, Transition};
pub use timer_state::{DeviceStatus, DeviceTimerState, PressOutcome, TickOutcome};
