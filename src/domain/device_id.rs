//! Type-safe device identifier.
//!
//! [`DeviceId`] is a newtype wrapper around the server-assigned id string,
//! so device ids cannot be confused with names or pairing codes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a device as assigned by the dashboard server.
///
/// Opaque to the client. Used as the key of the device list and as the
/// target of detail and status requests.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    /// Creates a `DeviceId` from any string-like value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for DeviceId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_plain_string() {
        let id = DeviceId::new("42");
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "\"42\"");
    }

    #[test]
    fn display_matches_inner() {
        assert_eq!(DeviceId::from("lamp-1").to_string(), "lamp-1");
    }

    #[test]
    fn orders_lexicographically() {
        let mut ids = vec![DeviceId::from("b"), DeviceId::from("a")];
        ids.sort();
        assert_eq!(ids.first().map(DeviceId::as_str), Some("a"));
    }
}
