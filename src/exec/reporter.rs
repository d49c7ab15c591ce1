// src/exec/reporter.rs

//! Side channel for background command failures.
//!
//! Background commands have nobody left to return an error to, so their
//! failures go to a [`FailureReporter`]. Production code uses
//! [`TracingReporter`]; tests can record reports instead.

use std::fmt::Debug;

use tracing::error;

use crate::errors::ProcessError;

/// A failed background command.
#[derive(Debug)]
pub struct BackgroundFailure {
    /// Name of the event that triggered the command.
    pub event: String,
    pub error: ProcessError,
}

/// Sink for background failures. Fire-and-forget: no acknowledgement, no retry.
pub trait FailureReporter: Send + Sync + Debug {
    fn report(&self, failure: BackgroundFailure);
}

/// Reports failures through `tracing` at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, failure: BackgroundFailure) {
        error!(
            event = %failure.event,
            command = %failure.error.command(),
            exit_code = ?failure.error.exit_code(),
            error = %failure.error,
            "background command failed"
        );
    }
}
