//! Dashboard configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::time::Duration;

use crate::error::ClientError;
use crate::ws::client::ReconnectPolicy;

/// Default WebSocket endpoint of the dashboard server.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws";

/// Smallest reconnect delay honoured; lower values would spin on redial.
pub const MIN_RECONNECT_DELAY_MS: u64 = 100;

/// Top-level client configuration.
///
/// Loaded once at startup via [`DashboardConfig::from_env`].
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// WebSocket endpoint (e.g. `ws://192.168.1.2:8080/ws`).
    pub endpoint: String,

    /// Fixed delay between reconnection attempts, in milliseconds.
    pub reconnect_delay_ms: u64,

    /// Bound on a single dial (TCP connect plus handshake), in milliseconds.
    pub connect_timeout_ms: u64,

    /// Give up after this many consecutive failed dials (`None` = never).
    pub max_reconnect_attempts: Option<u32>,

    /// Device whose detail is requested every time the socket opens.
    pub device_id: Option<String>,

    /// Number of log entries kept in the dashboard.
    pub log_capacity: usize,

    /// Re-render the dashboard after every state change.
    pub render_on_update: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            reconnect_delay_ms: 3_000,
            connect_timeout_ms: 10_000,
            max_reconnect_attempts: None,
            device_id: None,
            log_capacity: 200,
            render_on_update: true,
        }
    }
}

impl DashboardConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidEndpoint`] if `DASHBOARD_WS_URL` is
    /// not a `ws://` or `wss://` URL.
    pub fn from_env() -> Result<Self, ClientError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let endpoint =
            std::env::var("DASHBOARD_WS_URL").unwrap_or_else(|_| defaults.endpoint.clone());
        validate_endpoint(&endpoint)?;

        let reconnect_delay_ms =
            parse_env("DASHBOARD_RECONNECT_DELAY_MS", defaults.reconnect_delay_ms);
        let connect_timeout_ms =
            parse_env("DASHBOARD_CONNECT_TIMEOUT_MS", defaults.connect_timeout_ms);
        let max_reconnect_attempts = std::env::var("DASHBOARD_MAX_RECONNECT_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|n: &u32| *n > 0);
        let device_id = std::env::var("DASHBOARD_DEVICE_ID")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let log_capacity = parse_env("DASHBOARD_LOG_CAPACITY", defaults.log_capacity);
        let render_on_update = parse_env_bool("DASHBOARD_RENDER_ON_UPDATE", true);

        Ok(Self {
            endpoint,
            reconnect_delay_ms,
            connect_timeout_ms,
            max_reconnect_attempts,
            device_id,
            log_capacity,
            render_on_update,
        })
    }

    /// Builds the reconnect policy described by this configuration.
    ///
    /// The delay is raised to [`MIN_RECONNECT_DELAY_MS`] and a zero
    /// connect timeout to the same floor.
    #[must_use]
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            delay: Duration::from_millis(self.reconnect_delay_ms.max(MIN_RECONNECT_DELAY_MS)),
            connect_timeout: Duration::from_millis(
                self.connect_timeout_ms.max(MIN_RECONNECT_DELAY_MS),
            ),
            max_attempts: self.max_reconnect_attempts,
        }
    }
}

/// Checks that `endpoint` uses a WebSocket scheme.
///
/// # Errors
///
/// Returns [`ClientError::InvalidEndpoint`] for any other scheme.
pub fn validate_endpoint(endpoint: &str) -> Result<(), ClientError> {
    let rest = endpoint
        .strip_prefix("ws://")
        .or_else(|| endpoint.strip_prefix("wss://"));
    match rest {
        Some(host) if !host.is_empty() => Ok(()),
        _ => Err(ClientError::InvalidEndpoint(endpoint.to_string())),
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Returns `default` when
/// unset or unrecognised.
fn parse_env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .and_then(|v| parse_bool(&v))
        .unwrap_or(default)
}

/// Accepts `true`/`1`/`yes`/`on` and `false`/`0`/`no`/`off`, case-insensitive.
fn parse_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if ["true", "1", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
    {
        Some(true)
    } else if ["false", "0", "no", "off"]
        .iter()
        .any(|f| value.eq_ignore_ascii_case(f))
    {
        Some(false)
    } else {
        None
    }
}
