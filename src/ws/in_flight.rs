//! Per-connection tracking of requests awaiting a reply.
//!
//! The wire has no correlation id: a reply is matched to its request by
//! message type alone. Two outstanding requests of the same kind therefore
//! have ambiguous replies; this tracker makes that visible in the logs
//! without blocking the second request.

use std::collections::HashSet;

use super::messages::{MessageKind, OutboundKind};

/// Set of request kinds sent on the current connection and not yet answered.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: HashSet<OutboundKind>,
}

impl InFlight {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request of `kind` is being sent.
    ///
    /// Returns `false` when a request of the same kind was already
    /// outstanding. Fire-and-forget kinds are never tracked.
    pub fn mark_sent(&mut self, kind: OutboundKind) -> bool {
        if kind.replies().is_empty() {
            return true;
        }
        if self.is_pending(kind) {
            tracing::warn!(
                kind = kind.as_str(),
                "request already in flight; replies cannot be told apart"
            );
            return false;
        }
        self.pending.insert(kind)
    }

    /// Clears the request answered by an inbound `reply`, if any.
    ///
    /// Returns the request kind that was cleared.
    pub fn on_reply(&mut self, reply: MessageKind) -> Option<OutboundKind> {
        let answered = self
            .pending
            .iter()
            .copied()
            .find(|kind| kind.replies().contains(&reply))?;
        self.pending.remove(&answered);
        Some(answered)
    }

    /// Forgets everything; replies never cross connections.
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Returns `true` if a request of `kind` awaits a reply.
    #[must_use]
    pub fn is_pending(&self, kind: OutboundKind) -> bool {
        self.pending.contains(&kind)
    }

    /// Returns the number of outstanding request kinds.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_nothing_pending() {
        let tracker = InFlight::new();
        assert_eq!(tracker.count(), 0);
        assert!(!tracker.is_pending(OutboundKind::AddDevice));
    }

    #[test]
    fn duplicate_request_is_flagged() {
        let mut tracker = InFlight::new();
        assert!(tracker.mark_sent(OutboundKind::GetDeviceDetail));
        assert!(!tracker.mark_sent(OutboundKind::GetDeviceDetail));
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn fire_and_forget_is_not_tracked() {
        let mut tracker = InFlight::new();
        assert!(tracker.mark_sent(OutboundKind::UpdateDeviceStatus));
        assert!(tracker.mark_sent(OutboundKind::UpdateDeviceStatus));
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn any_commissioning_reply_clears_add_device() {
        for reply in [
            MessageKind::DeviceAdded,
            MessageKind::DeviceAddFailed,
            MessageKind::CommissionError,
            MessageKind::CommissionSent,
        ] {
            let mut tracker = InFlight::new();
            tracker.mark_sent(OutboundKind::AddDevice);
            assert_eq!(tracker.on_reply(reply), Some(OutboundKind::AddDevice));
            assert!(!tracker.is_pending(OutboundKind::AddDevice));
        }
    }

    #[test]
    fn unrelated_reply_leaves_pending() {
        let mut tracker = InFlight::new();
        tracker.mark_sent(OutboundKind::GetDeviceDetail);
        assert_eq!(tracker.on_reply(MessageKind::DeviceList), None);
        assert!(tracker.is_pending(OutboundKind::GetDeviceDetail));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut tracker = InFlight::new();
        tracker.mark_sent(OutboundKind::GetDeviceDetail);
        tracker.mark_sent(OutboundKind::AddDevice);
        tracker.clear();
        assert_eq!(tracker.count(), 0);
    }
}
