// src/config/duration.rs

use std::time::Duration;

use crate::errors::{EventExecError, Result};

/// Parse a duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
///
/// A leading `-` is accepted and yields `Duration::ZERO`: negative timeouts
/// are non-positive and fall back to the default later on. A bare `"0"` is
/// also accepted.
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(duration_error(s, "empty duration string"));
    }

    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, s),
    };

    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| duration_error(s, "duration missing unit suffix"))?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| duration_error(s, &format!("invalid number '{num_part}': {e}")))?;

    let duration = match unit_part.trim().to_lowercase().as_str() {
        "ms" => Duration::from_millis(value),
        "s" => Duration::from_secs(value),
        "m" => Duration::from_secs(value.saturating_mul(60)),
        "h" => Duration::from_secs(value.saturating_mul(60 * 60)),
        unit => {
            return Err(duration_error(
                s,
                &format!("unsupported unit '{unit}'; expected ms, s, m, or h"),
            ));
        }
    };

    if negative {
        Ok(Duration::ZERO)
    } else {
        Ok(duration)
    }
}

fn duration_error(input: &str, reason: &str) -> EventExecError {
    EventExecError::ConfigError(format!("invalid duration '{input}': {reason}"))
}
