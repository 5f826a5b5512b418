//! Server log lines streamed to the dashboard.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp of a log line.
///
/// The server sends either an RFC 3339 string or Unix milliseconds;
/// anything unparseable is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LogTime {
    /// Unix epoch milliseconds.
    Millis(i64),
    /// RFC 3339 timestamp.
    Timestamp(DateTime<Utc>),
    /// Unrecognised time string.
    Raw(String),
}

impl LogTime {
    /// Resolves the time to UTC when possible.
    #[must_use]
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Millis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::Timestamp(ts) => Some(*ts),
            Self::Raw(_) => None,
        }
    }

    /// Formats as `HH:MM:SS` (UTC), or the raw string.
    #[must_use]
    pub fn clock(&self) -> String {
        match (self.to_utc(), self) {
            (Some(ts), _) => ts.format("%H:%M:%S").to_string(),
            (None, Self::Raw(raw)) => raw.clone(),
            (None, _) => "--:--:--".to_string(),
        }
    }
}

impl Default for LogTime {
    fn default() -> Self {
        Self::Timestamp(Utc::now())
    }
}

/// Payload of a `log` message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the server emitted the line.
    #[serde(default)]
    pub time: LogTime,
    /// Log text.
    #[serde(default)]
    pub message: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current time.
    #[must_use]
    pub fn now(message: impl Into<String>) -> Self {
        Self {
            time: LogTime::default(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn parse(json: &str) -> LogEntry {
        let Ok(entry) = serde_json::from_str::<LogEntry>(json) else {
            panic!("failed to parse {json}");
        };
        entry
    }

    #[test]
    fn millis_time() {
        let entry = parse(r#"{"time":3723000,"message":"boot"}"#);
        assert_eq!(entry.time.clock(), "01:02:03");
        assert_eq!(entry.message, "boot");
    }

    #[test]
    fn rfc3339_time() {
        let entry = parse(r#"{"time":"2024-05-01T10:20:30Z","message":"paired"}"#);
        assert_eq!(entry.time.clock(), "10:20:30");
    }

    #[test]
    fn raw_time_is_kept() {
        let entry = parse(r#"{"time":"yesterday","message":"x"}"#);
        assert_eq!(entry.time, LogTime::Raw("yesterday".to_string()));
        assert_eq!(entry.time.clock(), "yesterday");
    }
}
