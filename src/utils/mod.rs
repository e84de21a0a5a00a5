//! Utility functions module
//!
//! Signal handling for shutdown and remaining-time formatting.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::{format_elapsed, format_time_left};
pub use signals::shutdown_signal;
