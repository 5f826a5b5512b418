//! Client error types with stable numeric codes.
//!
//! [`ClientError`] is the central error type for the dashboard client.
//! Nothing in it is fatal to a running dashboard: connection failures are
//! retried, malformed payloads are logged and skipped, and user-facing
//! failures are surfaced through the [`crate::dashboard::Notifier`].

use tokio_tungstenite::tungstenite;

/// Client-side error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category        |
/// |-----------|-----------------|
/// | 1000–1999 | Validation      |
/// | 2000–2999 | Connection      |
/// | 3000–3999 | Wire / Internal |
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The socket is not open; the request was not queued.
    #[error("not connected to the dashboard server")]
    NotConnected,

    /// `add_device` was invoked with an empty pairing code.
    #[error("pairing code must not be empty")]
    EmptyPairingCode,

    /// Endpoint is not a `ws://` or `wss://` URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Console input could not be parsed into a command.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A payload could not be encoded or decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// WebSocket transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] Box<tungstenite::Error>),

    /// The WebSocket handshake did not finish in time.
    #[error("connect timed out after {timeout_ms} ms")]
    ConnectTimeout {
        /// Dial timeout that elapsed.
        timeout_ms: u64,
    },

    /// The reconnect policy gave up after too many failed dials.
    #[error("gave up after {attempts} failed connection attempts")]
    ReconnectExhausted {
        /// Consecutive failed dials before giving up.
        attempts: u32,
    },

    /// The outbound request channel was closed.
    #[error("outbound channel closed")]
    ChannelClosed,
}

impl ClientError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::EmptyPairingCode => 1001,
            Self::InvalidEndpoint(_) => 1002,
            Self::InvalidCommand(_) => 1003,
            Self::NotConnected => 2001,
            Self::Transport(_) => 2002,
            Self::ReconnectExhausted { .. } => 2003,
            Self::ConnectTimeout { .. } => 2004,
            Self::Decode(_) => 3001,
            Self::ChannelClosed => 3000,
        }
    }

    /// Returns `true` for failures the reconnect loop recovers from on its own.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NotConnected | Self::Transport(_) | Self::ConnectTimeout { .. }
        )
    }
}

impl From<tungstenite::Error> for ClientError {
    fn from(err: tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
