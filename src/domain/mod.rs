//! Domain layer: devices, Matter server state, logs, and the event system.
//!
//! These are the payload types the dashboard server pushes, plus the
//! event bus that tells the renderer which section of the dashboard
//! changed.

pub mod dashboard_event;
pub mod device;
pub mod device_id;
pub mod event_bus;
pub mod log_entry;
pub mod matter_server;

pub use dashboard_event::DashboardEvent;
pub use device::{Device, DeviceList, DeviceStatus};
pub use device_id::DeviceId;
pub use event_bus::{EventBus, RedrawReceiver};
pub use log_entry::{LogEntry, LogTime};
pub use matter_server::{InfoUpdate, MatterServerStatus, ServerInfo, StatusUpdate};
