//! User-initiated requests.
//!
//! Each action validates its input, then hands a typed request to the
//! connection. Nothing is queued while the socket is closed.

use super::Dashboard;
use crate::domain::DeviceId;
use crate::error::ClientError;
use crate::ws::client::ClientHandle;
use crate::ws::messages::Outbound;

/// Prompt shown when `add_device` is invoked without a pairing code.
pub const EMPTY_CODE_PROMPT: &str = "please enter a pairing code";

/// Commissions a new device with `code`.
///
/// The code is trimmed first; an empty code is rejected before anything
/// reaches the socket.
///
/// # Errors
///
/// Returns [`ClientError::EmptyPairingCode`] for an empty code, or the
/// [`ClientHandle::send`] error when the socket is not open. Both are also
/// alerted to the user.
pub fn add_device(
    dashboard: &Dashboard,
    handle: &ClientHandle,
    code: &str,
) -> Result<(), ClientError> {
    let code = code.trim();
    if code.is_empty() {
        dashboard.alert(EMPTY_CODE_PROMPT);
        return Err(ClientError::EmptyPairingCode);
    }
    tracing::info!("requesting commissioning");
    handle
        .send(Outbound::add_device(code))
        .inspect_err(|err| dashboard.alert(&format!("cannot add device: {err}")))
}

/// Switches device `id` on or off.
///
/// # Errors
///
/// Returns the [`ClientHandle::send`] error when the socket is not open.
pub fn toggle_device(handle: &ClientHandle, id: &DeviceId, on: bool) -> Result<(), ClientError> {
    tracing::info!(device_id = %id, on, "toggling device");
    handle.send(Outbound::update_device_status(id.clone(), on))
}

/// Binds the detail view to `id` and asks the server for its detail.
///
/// # Errors
///
/// Returns the [`ClientHandle::send`] error when the socket is not open;
/// the detail view stays bound to `id` either way.
pub fn request_device_detail(
    dashboard: &Dashboard,
    handle: &ClientHandle,
    id: &DeviceId,
) -> Result<(), ClientError> {
    dashboard.watch_device(Some(id.clone()));
    handle.send(Outbound::get_device_detail(id.clone()))
}
