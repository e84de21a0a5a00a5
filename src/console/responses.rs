//! Console response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::DeviceSnapshot;

/// One JSON line written back for each command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleResponse {
    pub status: String,
    pub message: String,
    /// Clock reading the reply describes; absent when the clock failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub devices: Vec<DeviceSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub uptime: Option<String>,
}

impl ConsoleResponse {
    /// Create a new console response
    pub fn new(
        status: &str,
        message: String,
        devices: Vec<DeviceSnapshot>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            status: status.to_string(),
            message,
            timestamp,
            devices,
            uptime: None,
        }
    }

    pub fn ok(
        message: String,
        devices: Vec<DeviceSnapshot>,
        timestamp: Option<DateTime<Utc>>,
    ) -> Self {
        Self::new("ok", message, devices, timestamp)
    }

    pub fn error(message: String, timestamp: Option<DateTime<Utc>>) -> Self {
        Self::new("error", message, Vec::new(), timestamp)
    }

    pub fn with_uptime(mut self, uptime: String) -> Self {
        self.uptime = Some(uptime);
        self
    }
}
