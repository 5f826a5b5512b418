//! Dashboard view model.

use std::collections::VecDeque;

use crate::domain::{Device, DeviceId, DeviceList, LogEntry, MatterServerStatus, ServerInfo};

/// Default number of log lines kept.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Everything the dashboard displays.
///
/// Rebuilt from server pushes on every connection; nothing is persisted.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// Device list keyed by device id.
    pub devices: DeviceList,
    /// Device shown in the detail view.
    pub detail: Option<Device>,
    /// Device the detail view is bound to. `None` accepts any detail push.
    pub watched_device: Option<DeviceId>,
    /// Matter server connection state.
    pub server_status: MatterServerStatus,
    /// Matter server fabric info, when known.
    pub server_info: Option<ServerInfo>,
    /// Most recent log lines, oldest first.
    pub logs: VecDeque<LogEntry>,
    log_capacity: usize,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl DashboardState {
    /// Creates an empty state that keeps at most `capacity` log lines.
    #[must_use]
    pub fn with_log_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            devices: DeviceList::new(),
            detail: None,
            watched_device: None,
            server_status: MatterServerStatus::default(),
            server_info: None,
            logs: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            log_capacity: capacity,
        }
    }

    /// Appends a log line, dropping the oldest beyond capacity.
    pub fn push_log(&mut self, entry: LogEntry) {
        while self.logs.len() >= self.log_capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(entry);
    }

    /// Returns `true` if a `device_detail` for `id` should be shown.
    #[must_use]
    pub fn accepts_detail(&self, id: &DeviceId) -> bool {
        self.watched_device.as_ref().is_none_or(|watched| watched == id)
    }

    /// Returns the configured log capacity.
    #[must_use]
    pub const fn log_capacity(&self) -> usize {
        self.log_capacity
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn log_buffer_drops_oldest() {
        let mut state = DashboardState::with_log_capacity(2);
        state.push_log(LogEntry::now("a"));
        state.push_log(LogEntry::now("b"));
        state.push_log(LogEntry::now("c"));
        let messages: Vec<&str> = state.logs.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["b", "c"]);
    }

    #[test]
    fn zero_capacity_still_keeps_latest() {
        let mut state = DashboardState::with_log_capacity(0);
        state.push_log(LogEntry::now("only"));
        assert_eq!(state.logs.len(), 1);
        assert_eq!(state.log_capacity(), 1);
    }

    #[test]
    fn detail_filter_follows_watched_device() {
        let mut state = DashboardState::default();
        assert!(state.accepts_detail(&DeviceId::from("9")));
        state.watched_device = Some(DeviceId::from("4"));
        assert!(state.accepts_detail(&DeviceId::from("4")));
        assert!(!state.accepts_detail(&DeviceId::from("9")));
    }
}
