//! Text projection of the dashboard.
//!
//! Pure functions from [`DashboardState`] to display lines; the binary
//! prints them, tests inspect them.

use crate::dashboard::DashboardState;
use crate::domain::{Device, DeviceId, DeviceStatus};

/// Visual style of a device status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusStyle {
    /// Reachable device.
    Online,
    /// Unreachable or unknown device.
    Offline,
}

impl StatusStyle {
    /// Indicator colour.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Online => "#4CAF50",
            Self::Offline => "#999",
        }
    }

    /// Status label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }

    /// Single-character indicator for the terminal.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Online => '●',
            Self::Offline => '○',
        }
    }
}

impl From<DeviceStatus> for StatusStyle {
    fn from(status: DeviceStatus) -> Self {
        if status.is_online() {
            Self::Online
        } else {
            Self::Offline
        }
    }
}

/// One entry of the rendered device list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceRow {
    /// Device id, the target of detail and toggle commands.
    pub id: DeviceId,
    /// Display label (the device name).
    pub label: String,
    /// Indicator style.
    pub style: StatusStyle,
}

impl From<&Device> for DeviceRow {
    fn from(device: &Device) -> Self {
        Self {
            id: device.id.clone(),
            label: device.name.clone(),
            style: device.status.into(),
        }
    }
}

/// Rows of the device list, in id order.
#[must_use]
pub fn device_rows(state: &DashboardState) -> Vec<DeviceRow> {
    state.devices.values().map(DeviceRow::from).collect()
}

/// Device list lines.
#[must_use]
pub fn render_device_list(state: &DashboardState) -> Vec<String> {
    let rows = device_rows(state);
    if rows.is_empty() {
        return vec!["(no devices)".to_string()];
    }
    rows.iter()
        .map(|row| {
            format!(
                "{} {:<24} {:<8} [{}]",
                row.style.marker(),
                row.label,
                row.style.label(),
                row.id
            )
        })
        .collect()
}

/// Detail view lines, including extra fields forwarded by the server.
#[must_use]
pub fn render_device_detail(state: &DashboardState) -> Vec<String> {
    let Some(device) = &state.detail else {
        return match &state.watched_device {
            Some(id) => vec![format!("loading device {id}...")],
            None => vec!["(no device selected)".to_string()],
        };
    };
    let style = StatusStyle::from(device.status);
    let mut lines = vec![
        format!("{} {}", style.marker(), device.name),
        format!("  device id   {}", device.id),
        format!("  name        {}", device.name),
        format!("  status      {}", style.label()),
        format!("  ip address  {}", device.ip().unwrap_or("unknown")),
    ];
    lines.extend(
        device
            .extra
            .iter()
            .filter(|(key, _)| key.as_str() != "ip")
            .map(|(key, value)| match value.as_str() {
                Some(text) => format!("  {key:<11} {text}"),
                None => format!("  {key:<11} {value}"),
            }),
    );
    lines
}

/// Matter server status line.
#[must_use]
pub fn render_server_status(state: &DashboardState) -> String {
    state.server_status.label().to_string()
}

/// Matter server info lines; placeholders when no info is known.
#[must_use]
pub fn render_server_info(state: &DashboardState) -> Vec<String> {
    match &state.server_info {
        Some(info) => vec![
            format!("Fabric ID: {}", info.fabric_id),
            format!("Compressed Fabric ID: {}", info.compressed_fabric_id_hex()),
            format!("SDK Version: {}", info.sdk_version),
            format!("Schema Version: {}", info.schema_version),
        ],
        None => vec![
            "Fabric ID: --".to_string(),
            "Compressed Fabric ID: --".to_string(),
            "SDK Version: --".to_string(),
            "Schema Version: --".to_string(),
        ],
    }
}

/// Log lines as `[HH:MM:SS] message`, oldest first.
#[must_use]
pub fn render_logs(state: &DashboardState) -> Vec<String> {
    state
        .logs
        .iter()
        .map(|entry| format!("[{}] {}", entry.time.clock(), entry.message))
        .collect()
}

/// The whole dashboard, section by section.
#[must_use]
pub fn render(state: &DashboardState) -> Vec<String> {
    let mut lines = vec![format!("== {} ==", render_server_status(state))];
    lines.extend(render_server_info(state));
    lines.push(String::new());
    lines.push("== Devices ==".to_string());
    lines.extend(render_device_list(state));
    if state.watched_device.is_some() || state.detail.is_some() {
        lines.push(String::new());
        lines.push("== Device detail ==".to_string());
        lines.extend(render_device_detail(state));
    }
    lines
}
