// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the external command configured for a handler, using
//! `tokio::process::Command`, and turns the result into an event outcome.
//!
//! - [`spec`] holds the execution spec and its validation rules.
//! - [`dispatcher`] owns the run-and-classify logic (foreground/background,
//!   timeout, abort codes).
//! - [`replacer`] expands `{placeholders}` in arguments.
//! - [`reporter`] is the sink for background failures.

use std::sync::Arc;

pub mod dispatcher;
pub mod replacer;
pub mod reporter;
pub mod spec;

pub use dispatcher::Dispatcher;
pub use replacer::{MapReplacer, Replacer};
pub use reporter::{BackgroundFailure, FailureReporter, TracingReporter};
pub use spec::{DEFAULT_TIMEOUT, ExecSpec, ValidatedSpec};

use crate::config::HandlerConfig;
use crate::errors::{EventExecError, Result};
use crate::events::EventHandler;

/// Registry name of the exec handler type.
pub const EXEC_HANDLER_TYPE: &str = "exec";

/// Factory for the `exec` handler type.
///
/// Validates the execution spec (timeout default, foreground-only abort
/// codes), so an invalid handler fails at startup and is never invoked.
pub fn build_exec_handler(
    cfg: &HandlerConfig,
    reporter: Arc<dyn FailureReporter>,
) -> Result<Box<dyn EventHandler>> {
    let spec = ValidatedSpec::try_from(cfg.spec.clone()).map_err(|e| match e {
        EventExecError::ConfigError(msg) => EventExecError::ConfigError(format!(
            "exec handler for event '{}': {}",
            cfg.event, msg
        )),
        other => other,
    })?;

    Ok(Box::new(Dispatcher::new(spec, reporter)))
}
