//! Reconnecting WebSocket client.
//!
//! [`ConnectionClient`] owns the single live socket, the dispatch table and
//! the reconnect loop. Other tasks talk to it through a cloneable
//! [`ClientHandle`], which refuses to queue requests while the socket is
//! not open.

use std::fmt;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use super::in_flight::InFlight;
use super::messages::Outbound;
use super::registry::{DispatchOutcome, HandlerRegistry};
use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Lifecycle of the client's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Dialing the endpoint.
    Connecting,
    /// Socket open; requests are accepted.
    Connected,
    /// Socket closed; waiting out the reconnect delay.
    Disconnected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// When and how often to redial after the socket closes.
///
/// The delay is constant: no backoff, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Wait between a close (or failed dial) and the next dial.
    pub delay: Duration,
    /// Longest a single dial may take, TCP connect and handshake included.
    pub connect_timeout: Duration,
    /// Consecutive failed dials tolerated before giving up (`None` = retry forever).
    pub max_attempts: Option<u32>,
}

/// Default bound on a single dial.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::fixed(Duration::from_secs(3))
    }
}

impl ReconnectPolicy {
    /// Retries forever at a constant `delay`.
    #[must_use]
    pub const fn fixed(delay: Duration) -> Self {
        Self {
            delay,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            max_attempts: None,
        }
    }

    /// Gives up after `attempts` consecutive failed dials.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Abandons a dial that has not completed after `timeout`.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Returns `true` once `failures` reaches the cap.
    #[must_use]
    pub fn is_exhausted(&self, failures: u32) -> bool {
        self.max_attempts.is_some_and(|max| failures >= max)
    }
}

/// Cloneable sender side of a [`ConnectionClient`].
#[derive(Debug, Clone)]
pub struct ClientHandle {
    requests: mpsc::UnboundedSender<Outbound>,
    state: watch::Receiver<ConnectionState>,
}

impl ClientHandle {
    /// Current connection state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Returns `true` while the socket is open.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Returns a receiver that observes every open and close.
    #[must_use]
    pub fn subscribe_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    /// Queues `request` for the open socket.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotConnected`] if the socket is not open
    /// (nothing is queued), or [`ClientError::ChannelClosed`] if the
    /// client has stopped.
    pub fn send(&self, request: Outbound) -> Result<(), ClientError> {
        if !self.is_connected() {
            tracing::debug!(
                kind = request.kind().as_str(),
                "dropping request while disconnected"
            );
            return Err(ClientError::NotConnected);
        }
        self.requests
            .send(request)
            .map_err(|_| ClientError::ChannelClosed)
    }
}

/// Owner of the WebSocket connection.
#[derive(Debug)]
pub struct ConnectionClient {
    endpoint: String,
    policy: ReconnectPolicy,
    registry: HandlerRegistry,
    initial_request: Option<Outbound>,
    state: watch::Sender<ConnectionState>,
    requests_tx: mpsc::UnboundedSender<Outbound>,
    requests_rx: mpsc::UnboundedReceiver<Outbound>,
}

impl ConnectionClient {
    /// Creates a client for `endpoint` that dispatches through `registry`.
    #[must_use]
    pub fn new(
        endpoint: impl Into<String>,
        policy: ReconnectPolicy,
        registry: HandlerRegistry,
    ) -> Self {
        if registry.is_empty() {
            tracing::warn!("no message handlers registered; inbound frames will be dropped");
        }
        let (state, _) = watch::channel(ConnectionState::Disconnected);
        let (requests_tx, requests_rx) = mpsc::unbounded_channel();
        Self {
            endpoint: endpoint.into(),
            policy,
            registry,
            initial_request: None,
            state,
            requests_tx,
            requests_rx,
        }
    }

    /// Sends `request` first thing on every successful open.
    #[must_use]
    pub fn with_initial_request(mut self, request: Outbound) -> Self {
        self.initial_request = Some(request);
        self
    }

    /// Returns a new handle for sending requests and watching state.
    #[must_use]
    pub fn handle(&self) -> ClientHandle {
        ClientHandle {
            requests: self.requests_tx.clone(),
            state: self.state.subscribe(),
        }
    }

    /// Runs the connect / pump / reconnect loop.
    ///
    /// Only returns when the reconnect policy is exhausted; otherwise it
    /// runs until its future is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ReconnectExhausted`] after
    /// `policy.max_attempts` consecutive failed dials.
    pub async fn run(mut self) -> Result<(), ClientError> {
        let mut failures: u32 = 0;
        let mut in_flight = InFlight::new();
        let delay_ms = u64::try_from(self.policy.delay.as_millis()).unwrap_or(u64::MAX);

        loop {
            self.state.send_replace(ConnectionState::Connecting);
            tracing::info!(
                endpoint = %self.endpoint,
                attempt = failures.saturating_add(1),
                "connecting"
            );

            match self.dial().await {
                Ok(stream) => {
                    failures = 0;
                    discard_stale(&mut self.requests_rx);
                    self.state.send_replace(ConnectionState::Connected);
                    tracing::info!(endpoint = %self.endpoint, "connected");

                    let result = run_session(
                        stream,
                        &mut self.registry,
                        &mut self.requests_rx,
                        &mut in_flight,
                        self.initial_request.as_ref(),
                    )
                    .await;
                    match result {
                        Ok(()) => tracing::info!("connection closed"),
                        Err(err) => tracing::warn!(error = %err, "connection lost"),
                    }
                    let unanswered = in_flight.count();
                    if unanswered > 0 {
                        tracing::debug!(
                            unanswered,
                            "forgetting requests sent on closed connection"
                        );
                    }
                    in_flight.clear();
                }
                Err(err) => {
                    failures = failures.saturating_add(1);
                    tracing::warn!(error = %err, attempt = failures, "connect failed");
                    if self.policy.is_exhausted(failures) {
                        self.state.send_replace(ConnectionState::Disconnected);
                        return Err(ClientError::ReconnectExhausted { attempts: failures });
                    }
                }
            }

            self.state.send_replace(ConnectionState::Disconnected);
            tracing::info!(delay_ms, "reconnecting after delay");
            tokio::time::sleep(self.policy.delay).await;
        }
    }

    /// Dials the endpoint once, bounded by the policy's connect timeout.
    async fn dial(&mut self) -> Result<WsStream, ClientError> {
        let limit = self.policy.connect_timeout;
        match tokio::time::timeout(limit, connect_async(self.endpoint.as_str())).await {
            Ok(Ok((stream, _response))) => Ok(stream),
            Ok(Err(err)) => Err(err.into()),
            Err(_elapsed) => Err(ClientError::ConnectTimeout {
                timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }
}

/// Drops requests queued in the window between a close and the state flip.
fn discard_stale(requests: &mut mpsc::UnboundedReceiver<Outbound>) {
    let mut dropped = 0usize;
    while requests.try_recv().is_ok() {
        dropped += 1;
    }
    if dropped > 0 {
        tracing::debug!(dropped, "discarded requests queued before reconnect");
    }
}

/// Pumps one open socket until it closes.
///
/// Inbound text frames are dispatched synchronously; a bad frame is logged
/// by the registry and never ends the session.
async fn run_session(
    stream: WsStream,
    registry: &mut HandlerRegistry,
    requests: &mut mpsc::UnboundedReceiver<Outbound>,
    in_flight: &mut InFlight,
    initial_request: Option<&Outbound>,
) -> Result<(), ClientError> {
    let (mut ws_tx, mut ws_rx) = stream.split();

    if let Some(request) = initial_request {
        in_flight.mark_sent(request.kind());
        tracing::debug!(kind = request.kind().as_str(), "sending initial request");
        ws_tx.send(Message::text(request.to_json()?)).await?;
    }

    loop {
        tokio::select! {
            frame = ws_rx.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let DispatchOutcome::Handled(kind) = registry.dispatch(text.as_str()) {
                        in_flight.on_reply(kind);
                    }
                }
                Some(Ok(Message::Binary(bytes))) => {
                    tracing::debug!(len = bytes.len(), "ignoring binary frame");
                }
                Some(Ok(Message::Close(frame))) => {
                    tracing::info!(?frame, "server closed connection");
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err.into()),
                None => return Ok(()),
            },
            request = requests.recv() => {
                let Some(request) = request else {
                    return Err(ClientError::ChannelClosed);
                };
                in_flight.mark_sent(request.kind());
                tracing::debug!(kind = request.kind().as_str(), "sending request");
                ws_tx.send(Message::text(request.to_json()?)).await?;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_retries_forever() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay, Duration::from_secs(3));
        assert!(!policy.is_exhausted(u32::MAX));
    }

    #[test]
    fn capped_policy_exhausts() {
        let policy = ReconnectPolicy::fixed(Duration::from_millis(10)).with_max_attempts(2);
        assert!(!policy.is_exhausted(1));
        assert!(policy.is_exhausted(2));
    }

    #[test]
    fn connect_timeout_defaults_and_overrides() {
        let policy = ReconnectPolicy::fixed(Duration::from_millis(50));
        assert_eq!(policy.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        let policy = policy.with_connect_timeout(Duration::from_millis(200));
        assert_eq!(policy.connect_timeout, Duration::from_millis(200));
    }

    #[test]
    fn handle_refuses_requests_before_connect() {
        let client = ConnectionClient::new(
            "ws://127.0.0.1:9/ws",
            ReconnectPolicy::default(),
            HandlerRegistry::new(),
        );
        let handle = client.handle();
        assert_eq!(handle.state(), ConnectionState::Disconnected);
        let Err(ClientError::NotConnected) = handle.send(Outbound::get_device_detail("1")) else {
            panic!("expected NotConnected");
        };
    }

    #[test]
    fn state_display() {
        assert_eq!(ConnectionState::Connected.to_string(), "Connected");
    }
}
