// src/exec/spec.rs

//! Execution spec and its validation.
//!
//! [`ExecSpec`] is the raw, resolved description of one command handler as
//! produced by the config layer. [`ValidatedSpec`] is what the dispatcher
//! runs; the only way to get one is `ValidatedSpec::try_from(spec)`, which
//! applies the timeout default and rejects abort codes on background
//! handlers.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::errors::{EventExecError, Result};

/// Timeout used when none (or a non-positive one) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw execution spec for a single command handler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecSpec {
    /// Program to run. Never placeholder-expanded.
    pub command: String,

    /// Argument templates, expanded one by one at dispatch time.
    pub args: Vec<String>,

    /// Working directory; empty means inherit the caller's.
    pub dir: String,

    /// `None` and `Some(ZERO)` both mean "use [`DEFAULT_TIMEOUT`]".
    pub timeout: Option<Duration>,

    /// Wait for the command and propagate its result to the event.
    pub foreground: bool,

    /// Exit codes that abort the triggering event. Foreground only.
    pub abort_codes: BTreeSet<i32>,
}

/// An [`ExecSpec`] that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSpec {
    command: String,
    args: Vec<String>,
    dir: String,
    timeout: Duration,
    foreground: bool,
    abort_codes: BTreeSet<i32>,
}

impl TryFrom<ExecSpec> for ValidatedSpec {
    type Error = EventExecError;

    fn try_from(spec: ExecSpec) -> std::result::Result<Self, Self::Error> {
        validate_spec(&spec)?;

        Ok(ValidatedSpec {
            timeout: effective_timeout(spec.timeout),
            command: spec.command,
            args: spec.args,
            dir: spec.dir,
            foreground: spec.foreground,
            abort_codes: spec.abort_codes,
        })
    }
}

fn validate_spec(spec: &ExecSpec) -> Result<()> {
    if !spec.abort_codes.is_empty() && !spec.foreground {
        return Err(EventExecError::ConfigError(
            "abort codes require foreground execution".to_string(),
        ));
    }
    Ok(())
}

/// Apply the default to an optional, possibly zero, timeout.
pub fn effective_timeout(timeout: Option<Duration>) -> Duration {
    match timeout {
        Some(t) if !t.is_zero() => t,
        _ => DEFAULT_TIMEOUT,
    }
}

impl ValidatedSpec {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn dir(&self) -> &str {
        &self.dir
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn foreground(&self) -> bool {
        self.foreground
    }

    pub fn abort_codes(&self) -> &BTreeSet<i32> {
        &self.abort_codes
    }

    pub fn is_abort_code(&self, code: i32) -> bool {
        self.abort_codes.contains(&code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(foreground: bool, codes: &[i32]) -> ExecSpec {
        ExecSpec {
            command: "true".to_string(),
            foreground,
            abort_codes: codes.iter().copied().collect(),
            ..ExecSpec::default()
        }
    }

    #[test]
    fn missing_timeout_uses_default() {
        let validated = ValidatedSpec::try_from(spec(false, &[])).unwrap();
        assert_eq!(validated.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn zero_timeout_uses_default() {
        let mut raw = spec(false, &[]);
        raw.timeout = Some(Duration::ZERO);
        let validated = ValidatedSpec::try_from(raw).unwrap();
        assert_eq!(validated.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn positive_timeout_is_kept() {
        let mut raw = spec(true, &[]);
        raw.timeout = Some(Duration::from_millis(50));
        let validated = ValidatedSpec::try_from(raw).unwrap();
        assert_eq!(validated.timeout(), Duration::from_millis(50));
    }

    #[test]
    fn abort_codes_without_foreground_are_rejected() {
        match ValidatedSpec::try_from(spec(false, &[2])) {
            Err(EventExecError::ConfigError(msg)) => {
                assert!(msg.contains("foreground"));
            }
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn abort_codes_with_foreground_are_accepted() {
        let validated = ValidatedSpec::try_from(spec(true, &[2, 3])).unwrap();
        assert!(validated.is_abort_code(2));
        assert!(!validated.is_abort_code(0));
    }
}
