//! Dispatch table from inbound message kind to handler.
//!
//! Built before the client starts and owned by it afterwards. Handlers
//! run synchronously on the connection task; they mutate dashboard state
//! only and never touch the connection.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use super::messages::{Envelope, MessageKind};

/// Side-effecting handler for one inbound message kind.
pub trait Handler: Send {
    /// Handles the envelope's `data`, exactly as received.
    fn handle(&mut self, data: &Value);
}

impl<F> Handler for F
where
    F: FnMut(&Value) + Send,
{
    fn handle(&mut self, data: &Value) {
        self(data);
    }
}

/// Result of dispatching one text frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The handler for this kind ran once.
    Handled(MessageKind),
    /// Tag outside the contract, or no handler registered for it.
    Unrecognized(String),
    /// The frame was not a valid envelope.
    Malformed,
}

/// Mapping from [`MessageKind`] to its [`Handler`].
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<MessageKind, Box<dyn Handler>>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&'static str> = self.handlers.keys().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("kinds", &kinds)
            .finish()
    }
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `kind`, replacing any previous one.
    pub fn register<H>(&mut self, kind: MessageKind, handler: H) -> &mut Self
    where
        H: Handler + 'static,
    {
        if self.handlers.insert(kind, Box::new(handler)).is_some() {
            tracing::debug!(kind = kind.as_str(), "replaced message handler");
        }
        self
    }

    /// Returns `true` if a handler is registered for `kind`.
    #[must_use]
    pub fn contains(&self, kind: MessageKind) -> bool {
        self.handlers.contains_key(&kind)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Parses a text frame and runs the matching handler.
    ///
    /// Malformed frames and unknown tags are logged and dropped.
    pub fn dispatch(&mut self, text: &str) -> DispatchOutcome {
        let envelope = match Envelope::parse(text) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(error = %err, len = text.len(), "dropping malformed frame");
                return DispatchOutcome::Malformed;
            }
        };
        self.dispatch_envelope(&envelope)
    }

    /// Runs the handler for an already parsed envelope.
    pub fn dispatch_envelope(&mut self, envelope: &Envelope) -> DispatchOutcome {
        let handler = MessageKind::from_tag(&envelope.kind)
            .and_then(|kind| self.handlers.get_mut(&kind).map(|h| (kind, h)));
        let Some((kind, handler)) = handler else {
            tracing::warn!(kind = %envelope.kind, "no handler for message type");
            return DispatchOutcome::Unrecognized(envelope.kind.clone());
        };
        tracing::debug!(kind = kind.as_str(), "dispatching message");
        handler.handle(&envelope.data);
        DispatchOutcome::Handled(kind)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use super::*;

    fn recording(kind: MessageKind) -> (HandlerRegistry, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut registry = HandlerRegistry::new();
        registry.register(kind, move |data: &Value| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(data.clone());
            }
        });
        (registry, seen)
    }

    fn seen(seen: &Arc<Mutex<Vec<Value>>>) -> Vec<Value> {
        seen.lock().map(|v| v.clone()).unwrap_or_default()
    }

    #[test]
    fn registered_kind_runs_once_with_data_unchanged() {
        let (mut registry, calls) = recording(MessageKind::DeviceList);
        let data = json!({
            "1": {"ID": "1", "name": "Lamp", "status": "online"},
            "n": [1, 2.5, null]
        });
        let frame = json!({"type": "device_list", "data": data}).to_string();

        let outcome = registry.dispatch(&frame);

        assert_eq!(outcome, DispatchOutcome::Handled(MessageKind::DeviceList));
        assert_eq!(seen(&calls), vec![data]);
    }

    #[test]
    fn unknown_tag_fires_nothing() {
        let (mut registry, calls) = recording(MessageKind::DeviceList);
        let outcome = registry.dispatch(r#"{"type":"command_response","data":{}}"#);
        assert_eq!(
            outcome,
            DispatchOutcome::Unrecognized("command_response".to_string())
        );
        assert!(seen(&calls).is_empty());
    }

    #[test]
    fn known_tag_without_handler_is_unrecognized() {
        let (mut registry, calls) = recording(MessageKind::DeviceList);
        let outcome = registry.dispatch(r#"{"type":"log","data":{"message":"x"}}"#);
        assert_eq!(outcome, DispatchOutcome::Unrecognized("log".to_string()));
        assert!(seen(&calls).is_empty());
    }

    #[test]
    fn malformed_frame_does_not_stop_later_dispatch() {
        let (mut registry, calls) = recording(MessageKind::Log);
        assert_eq!(registry.dispatch("{not json"), DispatchOutcome::Malformed);
        assert_eq!(registry.dispatch(r#"{"data":{}}"#), DispatchOutcome::Malformed);
        assert_eq!(
            registry.dispatch(r#"{"type":"log","data":{"message":"ok"}}"#),
            DispatchOutcome::Handled(MessageKind::Log)
        );
        assert_eq!(seen(&calls).len(), 1);
    }

    #[test]
    fn register_replaces_previous_handler() {
        let (mut registry, first) = recording(MessageKind::Error);
        let second = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&second);
        registry.register(MessageKind::Error, move |data: &Value| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(data.clone());
            }
        });

        registry.dispatch(r#"{"type":"error","data":"boom"}"#);

        assert!(seen(&first).is_empty());
        assert_eq!(seen(&second), vec![json!("boom")]);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(MessageKind::Error));
    }

    #[test]
    fn debug_lists_kinds() {
        let (registry, _) = recording(MessageKind::DeviceDetail);
        assert!(format!("{registry:?}").contains("device_detail"));
    }
}
