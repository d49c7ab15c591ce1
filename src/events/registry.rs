// src/events/registry.rs

//! Explicit handler-type registration.
//!
//! The host registers each handler type it supports at startup, then builds
//! handlers from configuration through the registry. There is no global
//! state: a registry is a plain value owned by whoever composes the pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::HandlerConfig;
use crate::errors::{EventExecError, Result};
use crate::events::EventHandler;
use crate::exec::{EXEC_HANDLER_TYPE, FailureReporter, build_exec_handler};

/// Builds a handler from its configuration.
pub type HandlerFactory =
    fn(&HandlerConfig, Arc<dyn FailureReporter>) -> Result<Box<dyn EventHandler>>;

#[derive(Default)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `exec` handler type.
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(EXEC_HANDLER_TYPE.to_string(), build_exec_handler);
        registry
    }

    /// Register a handler type. Names must be unique.
    pub fn register(&mut self, name: impl Into<String>, factory: HandlerFactory) -> Result<()> {
        let name = name.into();
        if self.factories.contains_key(&name) {
            return Err(EventExecError::ConfigError(format!(
                "handler type '{name}' is already registered"
            )));
        }
        self.factories.insert(name, factory);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Build a handler for `cfg` using the factory registered for its type.
    pub fn build(
        &self,
        cfg: &HandlerConfig,
        reporter: Arc<dyn FailureReporter>,
    ) -> Result<Box<dyn EventHandler>> {
        let factory = self.factories.get(&cfg.handler_type).ok_or_else(|| {
            EventExecError::ConfigError(format!(
                "unknown handler type '{}' for event '{}'",
                cfg.handler_type, cfg.event
            ))
        })?;
        factory(cfg, reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{ExecSpec, TracingReporter};

    fn handler(handler_type: &str, spec: ExecSpec) -> HandlerConfig {
        HandlerConfig {
            event: "started".to_string(),
            handler_type: handler_type.to_string(),
            spec,
        }
    }

    fn spec() -> ExecSpec {
        ExecSpec {
            command: "true".to_string(),
            ..ExecSpec::default()
        }
    }

    #[test]
    fn builtin_registry_knows_exec() {
        let registry = HandlerRegistry::with_builtin_handlers();
        assert!(registry.contains("exec"));
        assert!(registry.build(&handler("exec", spec()), Arc::new(TracingReporter)).is_ok());
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = HandlerRegistry::with_builtin_handlers();
        let err = registry.register("exec", build_exec_handler).unwrap_err();
        assert!(err.to_string().contains("already registered"));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let registry = HandlerRegistry::new();
        let err = registry
            .build(&handler("webhook", spec()), Arc::new(TracingReporter))
            .err()
            .expect("unknown handler type must fail");
        assert!(err.to_string().contains("unknown handler type 'webhook'"));
    }

    #[test]
    fn background_abort_codes_fail_at_build_time() {
        let registry = HandlerRegistry::with_builtin_handlers();
        let mut bad = spec();
        bad.abort_codes.insert(1);

        let err = registry
            .build(&handler("exec", bad), Arc::new(TracingReporter))
            .err()
            .expect("abort codes without foreground must fail");
        assert!(err.to_string().contains("abort codes require foreground execution"));
    }
}
