//! Broadcast channel for dashboard events.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Dashboard
//! handlers publish a [`DashboardEvent`] after each state change. The
//! terminal renderer does not need every event, only to know that the view
//! is stale: [`EventBus::subscribe_redraws`] folds a burst of events into
//! one redraw and skips alerts, which the notifier already shows.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::DashboardEvent;

/// Broadcast bus for [`DashboardEvent`]s.
///
/// When the ring buffer is full, the oldest events are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DashboardEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity (at least 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of receivers that received the event.
    /// If there are no active receivers, the event is silently dropped.
    pub fn publish(&self, event: DashboardEvent) -> usize {
        let event_type = event.event_type_str();
        let receivers = self.sender.send(event).unwrap_or(0);
        tracing::trace!(event_type, receivers, "dashboard event published");
        receivers
    }

    /// Creates a new receiver that will receive all future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.sender.subscribe()
    }

    /// Creates a receiver that yields once per batch of view changes.
    #[must_use]
    pub fn subscribe_redraws(&self) -> RedrawReceiver {
        RedrawReceiver {
            rx: self.sender.subscribe(),
        }
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Receiver that coalesces view-changing events into redraw signals.
#[derive(Debug)]
pub struct RedrawReceiver {
    rx: broadcast::Receiver<DashboardEvent>,
}

impl RedrawReceiver {
    /// Waits until the view is stale, then drains whatever else is queued.
    ///
    /// A lagged receiver has lost events and always redraws. Returns
    /// `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<()> {
        loop {
            match self.rx.recv().await {
                Ok(event) if !event.changes_view() => {}
                Ok(_) | Err(RecvError::Lagged(_)) => break,
                Err(RecvError::Closed) => return None,
            }
        }
        loop {
            match self.rx.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        Some(())
    }
}
