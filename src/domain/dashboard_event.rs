//! Events emitted after every dashboard state change.
//!
//! Every handler that mutates the dashboard publishes a [`DashboardEvent`]
//! through the [`super::EventBus`]; the terminal renderer subscribes and
//! redraws the affected section.

use serde::Serialize;

use super::{DeviceId, MatterServerStatus};

/// Dashboard section that changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// The device list was replaced.
    DeviceListUpdated {
        /// Number of devices now listed.
        count: usize,
    },
    /// The device detail view changed.
    DeviceDetailUpdated {
        /// Device now shown.
        device_id: DeviceId,
    },
    /// Matter server status changed.
    ServerStatusChanged {
        /// New status.
        status: MatterServerStatus,
    },
    /// Matter server info was set or cleared.
    ServerInfoChanged {
        /// Whether info is now present.
        present: bool,
    },
    /// A log line was appended.
    LogAppended,
    /// A user-visible alert was raised.
    Alert {
        /// Alert text.
        message: String,
    },
}

impl DashboardEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::DeviceListUpdated { .. } => "device_list_updated",
            Self::DeviceDetailUpdated { .. } => "device_detail_updated",
            Self::ServerStatusChanged { .. } => "server_status_changed",
            Self::ServerInfoChanged { .. } => "server_info_changed",
            Self::LogAppended => "log_appended",
            Self::Alert { .. } => "alert",
        }
    }

    /// Returns `true` if the rendered dashboard is affected.
    ///
    /// Alerts go through the notifier and leave the view unchanged.
    #[must_use]
    pub const fn changes_view(&self) -> bool {
        !matches!(self, Self::Alert { .. })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn event_type_matches_serialized_tag() {
        let event = DashboardEvent::DeviceListUpdated { count: 2 };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains(event.event_type_str()));
        assert!(json.contains("\"count\":2"));
    }

    #[test]
    fn alert_carries_message() {
        let event = DashboardEvent::Alert {
            message: "timeout".to_string(),
        };
        assert_eq!(event.event_type_str(), "alert");
        assert!(!event.changes_view());
        assert!(DashboardEvent::LogAppended.changes_view());
    }
}
