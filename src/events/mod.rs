// src/events/mod.rs

//! Host-side event plumbing.
//!
//! - [`Event`] is a named lifecycle occurrence with string data.
//! - [`EventContext`] is what a handler receives: the event, a cancellation
//!   token scoped to the event's lifetime, and the placeholder replacer.
//! - [`EventHandler`] is the handler seam; the exec dispatcher is one.
//! - [`registry`] maps handler type names to factories.
//! - [`pipeline`] dispatches an event to its handlers in order and stops on
//!   abort.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::errors::Result;
use crate::exec::replacer::{MapReplacer, Replacer};

pub mod pipeline;
pub mod registry;

pub use pipeline::{EmitSummary, EventPipeline};
pub use registry::{HandlerFactory, HandlerRegistry};

/// A lifecycle event emitted by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Sequential id, unique per pipeline.
    pub id: u64,
    pub name: String,
    /// Who emitted the event (e.g. `"cli"`).
    pub origin: String,
    pub data: BTreeMap<String, String>,
}

impl Event {
    /// Placeholders this event contributes to a replacer:
    /// `event.id`, `event.name`, `event.origin`, and `event.data.<key>`.
    pub fn placeholders(&self) -> MapReplacer {
        let mut repl = MapReplacer::new()
            .with("event.id", self.id.to_string())
            .with("event.name", self.name.clone())
            .with("event.origin", self.origin.clone());
        for (key, value) in &self.data {
            repl.set(format!("event.data.{key}"), value.clone());
        }
        repl
    }
}

/// Per-event execution context passed to every handler.
#[derive(Debug, Clone)]
pub struct EventContext {
    event: Event,
    cancel: CancellationToken,
    replacer: Arc<dyn Replacer>,
}

impl EventContext {
    pub fn new(event: Event, cancel: CancellationToken, replacer: Arc<dyn Replacer>) -> Self {
        Self {
            event,
            cancel,
            replacer,
        }
    }

    /// Context whose replacer knows only the event's own placeholders.
    pub fn for_event(event: Event, cancel: CancellationToken) -> Self {
        let replacer = Arc::new(event.placeholders());
        Self::new(event, cancel, replacer)
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Cancelled when the event is cancelled (e.g. host shutdown).
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn replacer(&self) -> &dyn Replacer {
        self.replacer.as_ref()
    }
}

/// Something that reacts to an event.
///
/// Returning [`crate::errors::EventExecError::Aborted`] tells the pipeline to
/// stop dispatching the event. Any other error is logged by the pipeline and
/// dispatch continues.
pub trait EventHandler: Send + Sync {
    fn handle<'a>(
        &'a self,
        ctx: &'a EventContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_placeholders_include_data() {
        let event = Event {
            id: 7,
            name: "cert_obtained".to_string(),
            origin: "tls".to_string(),
            data: [("domain".to_string(), "example.com".to_string())]
                .into_iter()
                .collect(),
        };

        let repl = event.placeholders();
        assert_eq!(
            repl.replace_all("{event.name} {event.id} {event.data.domain}", ""),
            "cert_obtained 7 example.com"
        );
    }
}
