//! Devices as pushed by the dashboard server.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::DeviceId;

/// Reachability of a device.
///
/// The server reports `online`/`offline`; older server builds send the
/// localized `在线`/`离线` instead. Anything else is kept as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeviceStatus {
    /// Device is reachable.
    #[serde(alias = "在线")]
    Online,
    /// Device is not reachable.
    #[serde(alias = "离线")]
    Offline,
    /// Any status string the client does not recognise.
    #[default]
    #[serde(other)]
    Unknown,
}

impl DeviceStatus {
    /// Returns `true` only for [`DeviceStatus::Online`].
    #[must_use]
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }

    /// Maps a switch position to the status sent in `update_device_status`.
    #[must_use]
    pub const fn from_switch(on: bool) -> Self {
        if on { Self::Online } else { Self::Offline }
    }

    /// Returns the wire string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A device as rendered by the dashboard.
///
/// Fields the client does not model (ip, vendor, ...) are kept verbatim in
/// [`Device::extra`] and forwarded into the detail view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Server-assigned id (`ID` on the wire, `id` also accepted).
    #[serde(rename = "ID", alias = "id")]
    pub id: DeviceId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Reachability.
    #[serde(default)]
    pub status: DeviceStatus,
    /// Free-form fields forwarded as-is.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Device {
    /// Creates a device with no extra fields.
    #[must_use]
    pub fn new(id: impl Into<DeviceId>, name: impl Into<String>, status: DeviceStatus) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status,
            extra: serde_json::Map::new(),
        }
    }

    /// Returns the `ip` extra field when the server supplied one.
    #[must_use]
    pub fn ip(&self) -> Option<&str> {
        self.extra.get("ip").and_then(serde_json::Value::as_str)
    }
}

/// Device list payload: a JSON object keyed by device id.
///
/// Ordered so the rendered list is stable between pushes.
pub type DeviceList = BTreeMap<String, Device>;
