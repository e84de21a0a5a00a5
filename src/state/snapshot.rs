//! Published views of device state

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Device, DeviceStatus, DeviceTimerState};
use crate::utils::format_time_left;

/// Read-only view of one device, including its projection while running
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub device: Device,
    pub name: String,
    pub status: DeviceStatus,
    pub end_timestamp: Option<DateTime<Utc>>,
    pub time_left: Option<String>,
    pub taken_at: DateTime<Utc>,
}

impl DeviceSnapshot {
    /// Capture `state` as seen at `now`
    pub fn capture(device: Device, state: &DeviceTimerState, now: DateTime<Utc>) -> Self {
        Self {
            device,
            name: device.to_string(),
            status: state.status(),
            end_timestamp: state.end_timestamp(),
            time_left: state.remaining(now).map(format_time_left),
            taken_at: now,
        }
    }

    /// Text shown on the device's tile
    pub fn status_text(&self) -> &str {
        match self.status {
            DeviceStatus::Available => "Available",
            DeviceStatus::Running => self.time_left.as_deref().unwrap_or(""),
            DeviceStatus::Finished => "Finished",
        }
    }
}

/// Every device in the room at one instant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub taken_at: Option<DateTime<Utc>>,
    pub devices: Vec<DeviceSnapshot>,
}

impl RoomSnapshot {
    pub fn get(&self, device: Device) -> Option<&DeviceSnapshot> {
        self.devices.iter().find(|snapshot| snapshot.device == device)
    }

    pub fn running(&self) -> impl Iterator<Item = &DeviceSnapshot> {
        self.devices
            .iter()
            .filter(|snapshot| snapshot.status == DeviceStatus::Running)
    }
}

/// A state change, in the order it was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Transition {
    Started { ends_at: DateTime<Utc> },
    Cancelled,
    Finished,
    Reset,
}

/// Notification of a transition on one device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceEvent {
    pub device: Device,
    pub transition: Transition,
    pub at: DateTime<Utc>,
}
