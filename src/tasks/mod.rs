//! Background tasks module
//!
//! The countdown scheduler and the projection follower that run alongside
//! the console.

pub mod countdown;
pub mod follow;

// Re-export main functions
pub use countdown::countdown_task;
pub use follow::follow_task;
