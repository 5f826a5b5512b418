//! WebSocket layer: wire messages, dispatch table, and the reconnecting
//! connection client.
//!
//! The dashboard server at `ws://<host>/ws` pushes `{type, data}`
//! envelopes; the client routes each to the handler registered for its
//! type and sends user requests back over the same socket.

pub mod client;
pub mod in_flight;
pub mod messages;
pub mod registry;

pub use client::{ClientHandle, ConnectionClient, ConnectionState, ReconnectPolicy};
pub use messages::{Envelope, Inbound, MessageKind, Outbound, OutboundKind};
pub use registry::{DispatchOutcome, Handler, HandlerRegistry};
