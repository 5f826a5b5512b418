//! Dashboard: state, message handlers, and user actions.
//!
//! [`Dashboard`] is the projection target for every inbound message. It is
//! cheap to clone; all clones share one [`DashboardState`].
//! [`Dashboard::install`] registers a handler for every
//! [`MessageKind`] in a [`HandlerRegistry`].

pub mod actions;
pub mod notifier;
pub mod state;

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

pub use notifier::{Notifier, RecordingNotifier, TerminalNotifier};
pub use state::DashboardState;

use crate::domain::{DashboardEvent, DeviceId, DeviceList, EventBus, LogEntry};
use crate::ws::messages::{Inbound, MessageKind};
use crate::ws::registry::HandlerRegistry;

/// Shared dashboard state plus the channels it reports through.
#[derive(Debug, Clone)]
pub struct Dashboard {
    state: Arc<RwLock<DashboardState>>,
    notifier: Arc<dyn Notifier>,
    events: EventBus,
}

impl Dashboard {
    /// Creates an empty dashboard.
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, events: EventBus, log_capacity: usize) -> Self {
        Self {
            state: Arc::new(RwLock::new(DashboardState::with_log_capacity(log_capacity))),
            notifier,
            events,
        }
    }

    /// Returns the bus change events are published on.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> DashboardState {
        self.read(DashboardState::clone)
    }

    /// Runs `f` against the current state.
    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    /// Binds the detail view to `id`; details for other devices are ignored.
    pub fn watch_device(&self, id: Option<DeviceId>) {
        self.write(|state| {
            if state.watched_device != id {
                state.detail = None;
            }
            state.watched_device = id;
        });
    }

    /// Raises a user-visible alert and publishes it.
    pub fn alert(&self, message: &str) {
        self.notifier.alert(message);
        let _ = self.events.publish(DashboardEvent::Alert {
            message: message.to_string(),
        });
    }

    /// Registers a handler for every inbound message kind.
    ///
    /// Each handler decodes its payload and applies it; payloads that do
    /// not decode are logged and dropped.
    pub fn install(&self, registry: &mut HandlerRegistry) {
        for kind in MessageKind::ALL {
            let dashboard = self.clone();
            registry.register(kind, move |data: &Value| {
                match Inbound::decode(kind, data) {
                    Ok(message) => dashboard.apply(message),
                    Err(err) => {
                        tracing::warn!(
                            kind = kind.as_str(),
                            error = %err,
                            "ignoring undecodable payload"
                        );
                    }
                }
            });
        }
    }

    /// Projects one decoded message onto the dashboard.
    pub fn apply(&self, message: Inbound) {
        match message {
            Inbound::MatterServerStatus(update) => {
                self.write(|state| state.server_status = update.status);
                tracing::info!(status = ?update.status, "matter server status");
                let _ = self.events.publish(DashboardEvent::ServerStatusChanged {
                    status: update.status,
                });
            }
            Inbound::MatterServerInfo(update) => {
                let present = update.info.is_some();
                self.write(|state| state.server_info = update.info);
                let _ = self
                    .events
                    .publish(DashboardEvent::ServerInfoChanged { present });
            }
            Inbound::DeviceList(devices) => self.replace_devices(devices),
            Inbound::DeviceDetail(device) => {
                let device_id = device.id.clone();
                let shown = self.write(|state| {
                    if state.accepts_detail(&device.id) {
                        state.detail = Some(device);
                        true
                    } else {
                        false
                    }
                });
                if shown {
                    let _ = self
                        .events
                        .publish(DashboardEvent::DeviceDetailUpdated { device_id });
                } else {
                    tracing::debug!(%device_id, "ignoring detail for unwatched device");
                }
            }
            Inbound::Log(entry) => self.append_log(entry),
            Inbound::DeviceAdded(devices) => {
                self.alert("device added");
                if !devices.is_empty() {
                    self.replace_devices(devices);
                }
            }
            Inbound::DeviceAddFailed(failure) => {
                self.alert(&format!("failed to add device: {}", failure.reason()));
            }
            Inbound::CommissionError(failure) => {
                self.alert(&format!("commissioning error: {}", failure.reason()));
            }
            Inbound::CommissionSent(payload) => {
                tracing::info!(%payload, "commissioning request sent to matter server");
            }
            Inbound::DeviceEvent(payload) => {
                tracing::debug!(%payload, "device event");
                self.append_log(LogEntry::now(format!("device event: {payload}")));
            }
            Inbound::Error(failure) => {
                self.alert(&format!("server error: {}", failure.reason()));
            }
        }
    }

    fn replace_devices(&self, devices: DeviceList) {
        let count = devices.len();
        self.write(|state| state.devices = devices);
        tracing::debug!(count, "device list replaced");
        let _ = self
            .events
            .publish(DashboardEvent::DeviceListUpdated { count });
    }

    fn append_log(&self, entry: LogEntry) {
        self.write(|state| state.push_log(entry));
        let _ = self.events.publish(DashboardEvent::LogAppended);
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{DeviceStatus, MatterServerStatus};
    use crate::ws::registry::DispatchOutcome;

    fn dashboard() -> (Dashboard, Arc<RecordingNotifier>, HandlerRegistry) {
        let notifier = Arc::new(RecordingNotifier::new());
        let dashboard = Dashboard::new(
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            EventBus::new(32),
            50,
        );
        let mut registry = HandlerRegistry::new();
        dashboard.install(&mut registry);
        (dashboard, notifier, registry)
    }

    fn frame(kind: &str, data: Value) -> String {
        json!({"type": kind, "data": data}).to_string()
    }

    #[test]
    fn install_covers_every_kind() {
        let (_, _, registry) = dashboard();
        assert_eq!(registry.len(), MessageKind::ALL.len());
        for kind in MessageKind::ALL {
            assert!(registry.contains(kind));
        }
    }

    #[test]
    fn device_list_replaces_devices() {
        let (dashboard, notifier, mut registry) = dashboard();
        let outcome = registry.dispatch(&frame(
            "device_list",
            json!({"1": {"ID": "1", "name": "Lamp", "status": "online"}}),
        ));
        assert_eq!(outcome, DispatchOutcome::Handled(MessageKind::DeviceList));

        let state = dashboard.snapshot();
        assert_eq!(state.devices.len(), 1);
        let Some(lamp) = state.devices.get("1") else {
            panic!("lamp missing");
        };
        assert_eq!(lamp.status, DeviceStatus::Online);
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn add_failed_alerts_without_touching_list() {
        let (dashboard, notifier, mut registry) = dashboard();
        registry.dispatch(&frame(
            "device_list",
            json!({"1": {"ID": "1", "name": "Lamp", "status": "online"}}),
        ));
        let before = dashboard.snapshot().devices;

        registry.dispatch(&frame("device_add_failed", json!({"error": "timeout"})));

        let alerts = notifier.alerts();
        assert_eq!(alerts.len(), 1);
        assert!(alerts.iter().any(|a| a.contains("timeout")));
        assert_eq!(dashboard.snapshot().devices, before);
    }

    #[test]
    fn device_added_alerts_and_updates_list() {
        let (dashboard, notifier, mut registry) = dashboard();
        registry.dispatch(&frame(
            "device_added",
            json!({"5": {"ID": "5", "name": "Plug", "status": "offline"}}),
        ));
        assert_eq!(notifier.alerts(), vec!["device added"]);
        assert!(dashboard.snapshot().devices.contains_key("5"));
    }

    #[test]
    fn device_added_alerts_even_without_a_device_list() {
        let (dashboard, notifier, mut registry) = dashboard();
        registry.dispatch(&frame(
            "device_list",
            json!({"1": {"ID": "1", "name": "Lamp", "status": "online"}}),
        ));
        let before = dashboard.snapshot().devices;

        let single = json!({"ID": "5", "name": "Plug", "status": "online"});
        for data in [single, json!({"message": "ok"}), Value::Null] {
            let outcome = registry.dispatch(&frame("device_added", data));
            assert_eq!(outcome, DispatchOutcome::Handled(MessageKind::DeviceAdded));
        }

        assert_eq!(notifier.alerts(), vec!["device added"; 3]);
        assert_eq!(dashboard.snapshot().devices, before);
    }

    #[test]
    fn server_errors_alert() {
        let (_, notifier, mut registry) = dashboard();
        registry.dispatch(&frame("commission_error", json!({"message": "invalid code"})));
        registry.dispatch(&frame("error", json!({"message": "commission request failed"})));
        let alerts = notifier.alerts();
        assert!(alerts.iter().any(|a| a.contains("invalid code")));
        assert!(alerts.iter().any(|a| a.contains("commission request failed")));
    }

    #[test]
    fn detail_for_unwatched_device_is_ignored() {
        let (dashboard, _, mut registry) = dashboard();
        dashboard.watch_device(Some(DeviceId::from("4")));

        registry.dispatch(&frame("device_detail", json!({"ID": "9", "name": "Other"})));
        assert!(dashboard.snapshot().detail.is_none());

        registry.dispatch(&frame(
            "device_detail",
            json!({"id": "4", "name": "Lamp", "status": "在线", "ip": "10.0.0.4"}),
        ));
        let Some(detail) = dashboard.snapshot().detail else {
            panic!("detail missing");
        };
        assert_eq!(detail.name, "Lamp");
        assert_eq!(detail.ip(), Some("10.0.0.4"));
    }

    #[test]
    fn server_status_and_info() {
        let (dashboard, _, mut registry) = dashboard();
        registry.dispatch(&frame("matter_server_status", json!({"status": "connected"})));
        registry.dispatch(&frame(
            "matter_server_info",
            json!({"info": {"fabric_id": 1, "sdk_version": "2024.11.4"}}),
        ));
        let state = dashboard.snapshot();
        assert_eq!(state.server_status, MatterServerStatus::Connected);
        assert_eq!(
            state.server_info.map(|i| i.sdk_version),
            Some("2024.11.4".to_string())
        );

        registry.dispatch(&frame("matter_server_info", json!({})));
        assert!(dashboard.snapshot().server_info.is_none());
    }

    #[test]
    fn undecodable_payload_is_dropped() {
        let (dashboard, notifier, mut registry) = dashboard();
        let outcome = registry.dispatch(&frame("device_list", json!("not a map")));
        assert_eq!(outcome, DispatchOutcome::Handled(MessageKind::DeviceList));
        assert!(dashboard.snapshot().devices.is_empty());
        assert!(notifier.alerts().is_empty());
    }

    #[test]
    fn logs_and_device_events_are_buffered() {
        let (dashboard, _, mut registry) = dashboard();
        registry.dispatch(&frame("log", json!({"time": 0, "message": "started"})));
        registry.dispatch(&frame("device_event", json!({"node_id": 4})));
        let state = dashboard.snapshot();
        assert_eq!(state.logs.len(), 2);
        assert!(state.logs.back().is_some_and(|e| e.message.contains("node_id")));
    }

    #[tokio::test]
    async fn changes_are_published() {
        let (dashboard, _, mut registry) = dashboard();
        let mut rx = dashboard.events().subscribe();
        registry.dispatch(&frame("device_list", json!({})));
        let Ok(event) = rx.recv().await else {
            panic!("expected event");
        };
        assert_eq!(event, DashboardEvent::DeviceListUpdated { count: 0 });
    }
}
