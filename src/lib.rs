//! # matter-dashboard
//!
//! Terminal client for a Matter device-management dashboard.
//!
//! The dashboard server owns the Matter controller and device
//! commissioning; this crate keeps one WebSocket connection to it,
//! projects the `{type, data}` messages it pushes onto an in-memory
//! dashboard, and sends user actions back over the same socket.
//!
//! ## Architecture
//!
//! ```text
//! Dashboard server (ws://<host>/ws)
//!     │
//!     ├── ConnectionClient (ws/)      reconnect loop, one live socket
//!     ├── HandlerRegistry (ws/)       type tag → handler
//!     │
//!     ├── Dashboard (dashboard/)      state, alerts, user actions
//!     ├── EventBus (domain/)          change notifications
//!     │
//!     └── view / console              text rendering, stdin commands
//! ```

pub mod config;
pub mod console;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod view;
pub mod ws;
