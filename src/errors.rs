// src/errors.rs

//! Crate-wide error types.
//!
//! [`EventExecError`] is what handlers and the pipeline return. The
//! [`EventExecError::Aborted`] variant is the abort signal: the pipeline checks
//! for it with [`EventExecError::is_aborted`] and stops dispatching.
//!
//! [`ProcessError`] describes why a single external command did not finish
//! cleanly. It is wrapped by `Aborted` or `Process` in foreground mode and
//! handed to the failure reporter in background mode.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Effective exit code for a process that was terminated by a signal,
/// including kills caused by a timeout or by event cancellation.
///
/// Put this value in `abort_codes` to make a timed-out command abort the event.
pub const KILLED_EXIT_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum EventExecError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Process(#[from] ProcessError),

    /// A foreground command exited with one of the configured abort codes.
    #[error("event aborted: command exited with code {exit_code}")]
    Aborted {
        exit_code: i32,
        /// `None` when the command exited cleanly (code 0 configured as an
        /// abort code).
        #[source]
        source: Option<ProcessError>,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl EventExecError {
    /// True if this error asks the event pipeline to abort the event.
    pub fn is_aborted(&self) -> bool {
        matches!(self, EventExecError::Aborted { .. })
    }

    /// The process error behind this error, if any.
    pub fn process_error(&self) -> Option<&ProcessError> {
        match self {
            EventExecError::Process(e) => Some(e),
            EventExecError::Aborted { source, .. } => source.as_ref(),
            _ => None,
        }
    }
}

/// Why an external command did not complete successfully.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("command '{command}' exited with code {code}")]
    Exited { command: String, code: i32 },

    #[error("command '{command}' was terminated by a signal")]
    Signaled { command: String },

    #[error("command '{command}' killed after exceeding timeout of {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("command '{command}' killed because the event was cancelled")]
    Cancelled { command: String },

    #[error("waiting for command '{command}': {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ProcessError {
    /// Effective exit code used for abort-code matching.
    ///
    /// `None` for failures where the process never produced a status
    /// (launch and wait errors); those are never matched against abort codes.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            ProcessError::Exited { code, .. } => Some(*code),
            ProcessError::Signaled { .. }
            | ProcessError::TimedOut { .. }
            | ProcessError::Cancelled { .. } => Some(KILLED_EXIT_CODE),
            ProcessError::Launch { .. } | ProcessError::Wait { .. } => None,
        }
    }

    pub fn command(&self) -> &str {
        match self {
            ProcessError::Launch { command, .. }
            | ProcessError::Exited { command, .. }
            | ProcessError::Signaled { command }
            | ProcessError::TimedOut { command, .. }
            | ProcessError::Cancelled { command }
            | ProcessError::Wait { command, .. } => command,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, EventExecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn launch_errors_have_no_exit_code() {
        let err = ProcessError::Launch {
            command: "missing".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn kills_map_to_sentinel_code() {
        let timed_out = ProcessError::TimedOut {
            command: "sleep".to_string(),
            timeout: Duration::from_millis(50),
        };
        let cancelled = ProcessError::Cancelled {
            command: "sleep".to_string(),
        };
        assert_eq!(timed_out.exit_code(), Some(KILLED_EXIT_CODE));
        assert_eq!(cancelled.exit_code(), Some(KILLED_EXIT_CODE));
    }

    #[test]
    fn aborted_preserves_underlying_error() {
        let err = EventExecError::Aborted {
            exit_code: 2,
            source: Some(ProcessError::Exited {
                command: "check".to_string(),
                code: 2,
            }),
        };

        assert!(err.is_aborted());
        let source = err.source().expect("aborted error must carry its cause");
        assert!(source.to_string().contains("exited with code 2"));
        assert_eq!(err.process_error().and_then(|e| e.exit_code()), Some(2));
    }

    #[test]
    fn plain_process_error_is_not_aborted() {
        let err = EventExecError::from(ProcessError::Exited {
            command: "check".to_string(),
            code: 2,
        });
        assert!(!err.is_aborted());
    }
}
