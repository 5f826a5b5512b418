//! User-visible alerts.

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

/// Channel for messages the user must see (failed commissioning, server
/// errors, rejected input).
pub trait Notifier: Send + Sync + fmt::Debug {
    /// Shows `message` to the user.
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr, one per line.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn alert(&self, message: &str) {
        let mut stderr = std::io::stderr().lock();
        if writeln!(stderr, "[!] {message}").is_err() {
            tracing::warn!(%message, "failed to write alert to stderr");
        }
    }
}

/// Keeps every alert in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all alerts raised so far, oldest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push(message.to_string());
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn recorder_keeps_order() {
        let notifier = RecordingNotifier::new();
        notifier.alert("first");
        notifier.alert("second");
        assert_eq!(notifier.alerts(), vec!["first", "second"]);
    }
}
