//! WebSocket message types: envelope, inbound payloads, and requests.
//!
//! Every frame in either direction is a `{type, data}` JSON object. The
//! envelope keeps `data` untyped; [`Inbound::decode`] turns it into a typed
//! payload once the tag is known.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{
    Device, DeviceId, DeviceList, DeviceStatus, InfoUpdate, LogEntry, StatusUpdate,
};
use crate::error::ClientError;

/// Top-level WebSocket message envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type discriminator.
    #[serde(rename = "type")]
    pub kind: String,
    /// Variant-specific payload; `null` when absent.
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Parses a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if the frame is not a JSON object
    /// with a string `type`.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Discriminator for server → client messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Matter server connection state.
    MatterServerStatus,
    /// Matter server fabric info.
    MatterServerInfo,
    /// Full device list.
    DeviceList,
    /// Detail of a single device.
    DeviceDetail,
    /// Server log line.
    Log,
    /// Commissioning succeeded; carries the new device list.
    DeviceAdded,
    /// Commissioning failed.
    DeviceAddFailed,
    /// The Matter server rejected the commissioning request.
    CommissionError,
    /// Commissioning request forwarded to the Matter server.
    CommissionSent,
    /// Attribute or state event from a device.
    DeviceEvent,
    /// Generic server error.
    Error,
}

impl MessageKind {
    /// Every inbound kind, in wire order.
    pub const ALL: [Self; 11] = [
        Self::MatterServerStatus,
        Self::MatterServerInfo,
        Self::DeviceList,
        Self::DeviceDetail,
        Self::Log,
        Self::DeviceAdded,
        Self::DeviceAddFailed,
        Self::CommissionError,
        Self::CommissionSent,
        Self::DeviceEvent,
        Self::Error,
    ];

    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatterServerStatus => "matter_server_status",
            Self::MatterServerInfo => "matter_server_info",
            Self::DeviceList => "device_list",
            Self::DeviceDetail => "device_detail",
            Self::Log => "log",
            Self::DeviceAdded => "device_added",
            Self::DeviceAddFailed => "device_add_failed",
            Self::CommissionError => "commission_error",
            Self::CommissionSent => "commission_sent",
            Self::DeviceEvent => "device_event",
            Self::Error => "error",
        }
    }

    /// Looks up a wire tag. Returns `None` for tags outside the contract.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

/// Error payload shared by `device_add_failed`, `commission_error` and
/// `error`.
///
/// The server is inconsistent about the key (`error` vs `message`) and
/// sometimes sends a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Failure {
    /// Error text, when sent under `error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Error text, when sent under `message`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Failure {
    /// Decodes a failure from an object, a bare string, or `null`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] for any other shape.
    pub fn from_value(data: &Value) -> Result<Self, ClientError> {
        match data {
            Value::Null => Ok(Self::default()),
            Value::String(text) => Ok(Self {
                error: Some(text.clone()),
                message: None,
            }),
            other => Ok(Self::deserialize(other)?),
        }
    }

    /// The most specific reason available.
    #[must_use]
    pub fn reason(&self) -> &str {
        self.error
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or("unknown error")
    }
}

/// Typed server → client message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// `matter_server_status`.
    MatterServerStatus(StatusUpdate),
    /// `matter_server_info`.
    MatterServerInfo(InfoUpdate),
    /// `device_list`.
    DeviceList(DeviceList),
    /// `device_detail`.
    DeviceDetail(Device),
    /// `log`.
    Log(LogEntry),
    /// `device_added`.
    DeviceAdded(DeviceList),
    /// `device_add_failed`.
    DeviceAddFailed(Failure),
    /// `commission_error`.
    CommissionError(Failure),
    /// `commission_sent`; payload is informational only.
    CommissionSent(Value),
    /// `device_event`; payload is forwarded untouched.
    DeviceEvent(Value),
    /// `error`.
    Error(Failure),
}

impl Inbound {
    /// Decodes `data` according to `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if `data` does not have the shape
    /// `kind` requires.
    pub fn decode(kind: MessageKind, data: &Value) -> Result<Self, ClientError> {
        let message = match kind {
            MessageKind::MatterServerStatus => {
                Self::MatterServerStatus(StatusUpdate::deserialize(data)?)
            }
            MessageKind::MatterServerInfo => Self::MatterServerInfo(if data.is_null() {
                InfoUpdate::default()
            } else {
                InfoUpdate::deserialize(data)?
            }),
            MessageKind::DeviceList => Self::DeviceList(DeviceList::deserialize(data)?),
            MessageKind::DeviceDetail => Self::DeviceDetail(Device::deserialize(data)?),
            MessageKind::Log => Self::Log(LogEntry::deserialize(data)?),
            // The success itself is the message; a payload that is not a
            // device list decodes as an empty one.
            MessageKind::DeviceAdded => Self::DeviceAdded(if data.is_null() {
                DeviceList::new()
            } else {
                DeviceList::deserialize(data).unwrap_or_else(|err| {
                    tracing::warn!(error = %err, "device_added payload is not a device list");
                    DeviceList::new()
                })
            }),
            MessageKind::DeviceAddFailed => Self::DeviceAddFailed(Failure::from_value(data)?),
            MessageKind::CommissionError => Self::CommissionError(Failure::from_value(data)?),
            MessageKind::CommissionSent => Self::CommissionSent(data.clone()),
            MessageKind::DeviceEvent => Self::DeviceEvent(data.clone()),
            MessageKind::Error => Self::Error(Failure::from_value(data)?),
        };
        Ok(message)
    }

    /// Returns the kind this message was decoded as.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::MatterServerStatus(_) => MessageKind::MatterServerStatus,
            Self::MatterServerInfo(_) => MessageKind::MatterServerInfo,
            Self::DeviceList(_) => MessageKind::DeviceList,
            Self::DeviceDetail(_) => MessageKind::DeviceDetail,
            Self::Log(_) => MessageKind::Log,
            Self::DeviceAdded(_) => MessageKind::DeviceAdded,
            Self::DeviceAddFailed(_) => MessageKind::DeviceAddFailed,
            Self::CommissionError(_) => MessageKind::CommissionError,
            Self::CommissionSent(_) => MessageKind::CommissionSent,
            Self::DeviceEvent(_) => MessageKind::DeviceEvent,
            Self::Error(_) => MessageKind::Error,
        }
    }
}

/// Requests a client can send over WebSocket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Outbound {
    /// Ask for the detail of one device.
    GetDeviceDetail {
        /// Target device.
        id: DeviceId,
        /// Same id under the key older server builds read.
        device_id: DeviceId,
    },
    /// Switch a device on or off.
    UpdateDeviceStatus {
        /// Target device.
        id: DeviceId,
        /// Requested status.
        status: DeviceStatus,
    },
    /// Commission a new device with a pairing code.
    AddDevice {
        /// Pairing code.
        network_code: String,
        /// Same code under the key the server reads.
        code: String,
    },
}

impl Outbound {
    /// Builds a `get_device_detail` request.
    #[must_use]
    pub fn get_device_detail(id: impl Into<DeviceId>) -> Self {
        let id = id.into();
        Self::GetDeviceDetail {
            device_id: id.clone(),
            id,
        }
    }

    /// Builds an `update_device_status` request from a switch position.
    #[must_use]
    pub fn update_device_status(id: impl Into<DeviceId>, on: bool) -> Self {
        Self::UpdateDeviceStatus {
            id: id.into(),
            status: DeviceStatus::from_switch(on),
        }
    }

    /// Builds an `add_device` request.
    #[must_use]
    pub fn add_device(code: impl Into<String>) -> Self {
        let code = code.into();
        Self::AddDevice {
            network_code: code.clone(),
            code,
        }
    }

    /// Returns the request tag.
    #[must_use]
    pub const fn kind(&self) -> OutboundKind {
        match self {
            Self::GetDeviceDetail { .. } => OutboundKind::GetDeviceDetail,
            Self::UpdateDeviceStatus { .. } => OutboundKind::UpdateDeviceStatus,
            Self::AddDevice { .. } => OutboundKind::AddDevice,
        }
    }

    /// Serializes the request to a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Decode`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ClientError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Discriminator for client → server requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundKind {
    /// `get_device_detail`.
    GetDeviceDetail,
    /// `update_device_status`.
    UpdateDeviceStatus,
    /// `add_device`.
    AddDevice,
}

impl OutboundKind {
    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::GetDeviceDetail => "get_device_detail",
            Self::UpdateDeviceStatus => "update_device_status",
            Self::AddDevice => "add_device",
        }
    }

    /// Inbound kinds that answer this request. Empty for fire-and-forget.
    #[must_use]
    pub const fn replies(self) -> &'static [MessageKind] {
        match self {
            Self::GetDeviceDetail => &[MessageKind::DeviceDetail],
            Self::UpdateDeviceStatus => &[],
            Self::AddDevice => &[
                MessageKind::DeviceAdded,
                MessageKind::DeviceAddFailed,
                MessageKind::CommissionError,
                MessageKind::CommissionSent,
            ],
        }
    }
}
