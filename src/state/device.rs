//! Device identity

use std::{fmt, str::FromStr};
use serde::{Deserialize, Serialize};

/// Kind of appliance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Washer,
    Dryer,
}

impl DeviceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Washer => "washer",
            Self::Dryer => "dryer",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Washer => "Washer",
            Self::Dryer => "Dryer",
        }
    }
}

impl FromStr for DeviceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "washer" => Ok(Self::Washer),
            "dryer" => Ok(Self::Dryer),
            other => Err(format!("unknown device kind '{}'", other)),
        }
    }
}

/// One physical appliance, identified by kind and numeric id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Device {
    pub kind: DeviceKind,
    pub id: u32,
}

impl Device {
    pub fn new(kind: DeviceKind, id: u32) -> Self {
        Self { kind, id }
    }

    pub fn washer(id: u32) -> Self {
        Self::new(DeviceKind::Washer, id)
    }

    pub fn dryer(id: u32) -> Self {
        Self::new(DeviceKind::Dryer, id)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind.label(), self.id)
    }
}
