// src/config/directive.rs

//! Short-form handler directive.
//!
//! ```text
//! exec <command> <args...>
//! ```
//!
//! Tokens are split with shell-style quoting, so `exec echo "a b"` passes a
//! single argument `a b`. The short form cannot express `dir`, `timeout`,
//! `foreground` or `abort_codes`: it always runs in the background with the
//! default timeout.

use crate::errors::{EventExecError, Result};
use crate::exec::ExecSpec;

/// Directive keyword.
pub const EXEC_DIRECTIVE: &str = "exec";

/// Parse a short-form directive line into an [`ExecSpec`].
pub fn parse_directive(line: &str) -> Result<ExecSpec> {
    let tokens = shell_words::split(line).map_err(|e| {
        EventExecError::ConfigError(format!("failed to parse directive '{line}': {e}"))
    })?;

    let mut tokens = tokens.into_iter();

    match tokens.next() {
        Some(keyword) if keyword == EXEC_DIRECTIVE => {}
        Some(other) => {
            return Err(EventExecError::ConfigError(format!(
                "unknown directive '{other}' (expected '{EXEC_DIRECTIVE}')"
            )));
        }
        None => {
            return Err(EventExecError::ConfigError(
                "empty directive".to_string(),
            ));
        }
    }

    let command = tokens.next().ok_or_else(|| {
        EventExecError::ConfigError(format!(
            "directive '{line}' is missing a command: expected '{EXEC_DIRECTIVE} <command> <args...>'"
        ))
    })?;

    Ok(ExecSpec {
        command,
        args: tokens.collect(),
        ..ExecSpec::default()
    })
}
