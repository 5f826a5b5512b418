//! Matter server status and fabric information relayed by the dashboard.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection state between the dashboard server and the Matter server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatterServerStatus {
    /// Dashboard server is connected to the Matter server.
    Connected,
    /// Connection lost; the server is retrying.
    Disconnected,
    /// A connection attempt is in progress.
    #[default]
    Connecting,
}

impl MatterServerStatus {
    /// Human-readable status line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connected => "Matter Server connected",
            Self::Disconnected => "Matter Server disconnected",
            Self::Connecting => "Matter Server connecting...",
        }
    }
}

impl fmt::Display for MatterServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Payload of `matter_server_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    /// New status.
    pub status: MatterServerStatus,
}

/// Fabric and SDK information reported by the Matter server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerInfo {
    /// Fabric id.
    pub fabric_id: u64,
    /// Compressed fabric id (64-bit).
    pub compressed_fabric_id: u64,
    /// Schema version the server speaks.
    pub schema_version: u32,
    /// Oldest schema version the server accepts.
    pub min_supported_schema_version: u32,
    /// Matter SDK version string.
    pub sdk_version: String,
    /// Whether Wi-Fi credentials have been provisioned.
    pub wifi_credentials_set: bool,
    /// Whether Thread credentials have been provisioned.
    pub thread_credentials_set: bool,
    /// Whether BLE commissioning is available.
    pub bluetooth_enabled: bool,
}

impl ServerInfo {
    /// Compressed fabric id as `0x` plus 16 upper-case hex digits.
    #[must_use]
    pub fn compressed_fabric_id_hex(&self) -> String {
        format!("0x{:016X}", self.compressed_fabric_id)
    }
}

/// Payload of `matter_server_info`. A missing `info` clears the display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InfoUpdate {
    /// Current info, if the server has any.
    #[serde(default)]
    pub info: Option<ServerInfo>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_snake_case() {
        let Ok(update) = serde_json::from_str::<StatusUpdate>(r#"{"status":"connected"}"#) else {
            panic!("parse failed");
        };
        assert_eq!(update.status, MatterServerStatus::Connected);
    }

    #[test]
    fn compressed_fabric_id_is_zero_padded_hex() {
        let info = ServerInfo {
            compressed_fabric_id: 0xAB,
            ..ServerInfo::default()
        };
        assert_eq!(info.compressed_fabric_id_hex(), "0x00000000000000AB");
    }

    #[test]
    fn info_update_parses_full_payload() {
        let json = r#"{"info":{
            "fabric_id": 1,
            "compressed_fabric_id": 10904920470098451262,
            "schema_version": 11,
            "min_supported_schema_version": 9,
            "sdk_version": "2024.11.4",
            "wifi_credentials_set": false,
            "thread_credentials_set": false,
            "bluetooth_enabled": true
        }}"#;
        let Ok(update) = serde_json::from_str::<InfoUpdate>(json) else {
            panic!("parse failed");
        };
        let Some(info) = update.info else {
            panic!("info missing");
        };
        assert_eq!(info.sdk_version, "2024.11.4");
        assert_eq!(info.compressed_fabric_id_hex(), "0x97560F640C1A9B3E");
        assert!(info.bluetooth_enabled);
    }

    #[test]
    fn missing_info_clears() {
        let Ok(update) = serde_json::from_str::<InfoUpdate>("{}") else {
            panic!("parse failed");
        };
        assert!(update.info.is_none());
    }
}
