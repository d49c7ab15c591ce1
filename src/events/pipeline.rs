// src/events/pipeline.rs

//! Sequential event dispatch with abort short-circuiting.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::config::ConfigFile;
use crate::errors::Result;
use crate::events::registry::HandlerRegistry;
use crate::events::{Event, EventContext, EventHandler};
use crate::exec::{FailureReporter, MapReplacer};

/// What happened while emitting one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Handlers subscribed to the event.
    pub subscribed: usize,
    /// Handlers that returned `Ok(())`.
    pub succeeded: usize,
    /// Handlers that returned a non-abort error (logged, not propagated).
    pub failed: usize,
}

struct Subscription {
    event: String,
    handler: Box<dyn EventHandler>,
}

/// Dispatches events to subscribed handlers, in registration order.
pub struct EventPipeline {
    subscriptions: Vec<Subscription>,
    origin: String,
    next_id: AtomicU64,
}

impl fmt::Debug for EventPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPipeline")
            .field(
                "events",
                &self.subscriptions.iter().map(|s| s.event.as_str()).collect::<Vec<_>>(),
            )
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl EventPipeline {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            subscriptions: Vec::new(),
            origin: origin.into(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Build every configured handler through `registry`.
    ///
    /// Fails on the first handler that cannot be built, so a bad handler
    /// config stops startup.
    pub fn from_config(
        origin: impl Into<String>,
        cfg: &ConfigFile,
        registry: &HandlerRegistry,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Self> {
        let mut pipeline = Self::new(origin);
        for handler_cfg in &cfg.handlers {
            let handler = registry.build(handler_cfg, Arc::clone(&reporter))?;
            pipeline.subscribe(handler_cfg.event.clone(), handler);
        }
        Ok(pipeline)
    }

    pub fn subscribe(&mut self, event: impl Into<String>, handler: Box<dyn EventHandler>) {
        self.subscriptions.push(Subscription {
            event: event.into(),
            handler,
        });
    }

    /// Number of handlers subscribed to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.subscriptions.iter().filter(|s| s.event == event).count()
    }

    /// Emit an event with no extra placeholders.
    pub async fn emit(
        &self,
        name: &str,
        data: BTreeMap<String, String>,
        cancel: CancellationToken,
    ) -> Result<EmitSummary> {
        self.emit_with(name, data, MapReplacer::new(), cancel).await
    }

    /// Emit an event.
    ///
    /// `extra` placeholders are merged over the event's own placeholders.
    /// Handlers run one at a time. An aborting handler stops dispatch and
    /// its error is returned; other handler errors are logged and dispatch
    /// continues.
    pub async fn emit_with(
        &self,
        name: &str,
        data: BTreeMap<String, String>,
        extra: MapReplacer,
        cancel: CancellationToken,
    ) -> Result<EmitSummary> {
        let event = Event {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: name.to_string(),
            origin: self.origin.clone(),
            data,
        };

        let mut replacer = event.placeholders();
        for (key, value) in extra.into_entries() {
            replacer.set(key, value);
        }

        let ctx = EventContext::new(event, cancel, Arc::new(replacer));
        let mut summary = EmitSummary::default();

        info!(event = %name, id = ctx.event().id, "emitting event");

        for sub in self.subscriptions.iter().filter(|s| s.event == name) {
            summary.subscribed += 1;

            match sub.handler.handle(&ctx).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) if e.is_aborted() => {
                    info!(event = %name, error = %e, "handler aborted event; skipping remaining handlers");
                    return Err(e);
                }
                Err(e) => {
                    summary.failed += 1;
                    error!(event = %name, error = %e, "event handler failed");
                }
            }
        }

        debug!(event = %name, ?summary, "event dispatch finished");
        Ok(summary)
    }
}
