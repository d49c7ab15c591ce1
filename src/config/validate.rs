// src/config/validate.rs

use crate::config::directive::parse_directive;
use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, HandlerConfig, RawConfigFile, RawHandlerConfig, DEFAULT_HANDLER_TYPE,
};
use crate::errors::{EventExecError, Result};
use crate::exec::ExecSpec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = EventExecError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_handlers(&raw)?;

        let handlers = raw
            .handler
            .into_iter()
            .enumerate()
            .map(|(idx, h)| resolve_handler(idx, h))
            .collect::<Result<Vec<_>>>()?;

        Ok(ConfigFile::new_unchecked(handlers))
    }
}

fn ensure_has_handlers(cfg: &RawConfigFile) -> Result<()> {
    if cfg.handler.is_empty() {
        return Err(EventExecError::ConfigError(
            "config must contain at least one [[handler]] section".to_string(),
        ));
    }
    Ok(())
}

/// Turn one raw `[[handler]]` into a [`HandlerConfig`].
///
/// Foreground/abort-code rules are not checked here; the handler factory
/// checks them when the pipeline is built.
fn resolve_handler(idx: usize, raw: RawHandlerConfig) -> Result<HandlerConfig> {
    let event = raw.event.trim().to_string();
    if event.is_empty() {
        return Err(handler_error(idx, "`event` must not be empty"));
    }

    let handler_type = raw
        .handler_type
        .clone()
        .unwrap_or_else(|| DEFAULT_HANDLER_TYPE.to_string());

    let spec = match raw.exec.clone() {
        Some(_) if raw.has_long_form_fields() => {
            return Err(handler_error(
                idx,
                "`exec` short form cannot be combined with command/args/dir/timeout/foreground/abort_codes",
            ));
        }
        Some(line) => {
            parse_directive(&line).map_err(|e| handler_error(idx, &e.to_string()))?
        }
        None => long_form_spec(idx, raw)?,
    };

    Ok(HandlerConfig {
        event,
        handler_type,
        spec,
    })
}

fn long_form_spec(idx: usize, raw: RawHandlerConfig) -> Result<ExecSpec> {
    let command = match raw.command {
        Some(c) if !c.trim().is_empty() => c,
        Some(_) => return Err(handler_error(idx, "`command` must not be empty")),
        None => return Err(handler_error(idx, "either `command` or `exec` is required")),
    };

    let timeout = raw
        .timeout
        .as_deref()
        .map(parse_duration)
        .transpose()
        .map_err(|e| handler_error(idx, &e.to_string()))?;

    Ok(ExecSpec {
        command,
        args: raw.args,
        dir: raw.dir.unwrap_or_default(),
        timeout,
        foreground: raw.foreground,
        abort_codes: raw.abort_codes.into_iter().collect(),
    })
}

fn handler_error(idx: usize, msg: &str) -> EventExecError {
    EventExecError::ConfigError(format!("handler #{}: {}", idx + 1, msg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn raw(handlers: Vec<RawHandlerConfig>) -> RawConfigFile {
        RawConfigFile { handler: handlers }
    }

    #[test]
    fn empty_config_is_rejected() {
        let err = ConfigFile::try_from(RawConfigFile::default()).unwrap_err();
        assert!(err.to_string().contains("at least one"));
    }

    #[test]
    fn long_form_is_resolved() {
        let cfg = ConfigFile::try_from(raw(vec![RawHandlerConfig {
            event: "started".to_string(),
            command: Some("echo".to_string()),
            args: vec!["{event.name}".to_string()],
            dir: Some("/tmp".to_string()),
            timeout: Some("2s".to_string()),
            foreground: true,
            abort_codes: vec![3, 2, 3],
            ..RawHandlerConfig::default()
        }]))
        .unwrap();

        let h = &cfg.handlers[0];
        assert_eq!(h.handler_type, "exec");
        assert_eq!(h.spec.command, "echo");
        assert_eq!(h.spec.dir, "/tmp");
        assert_eq!(h.spec.timeout, Some(Duration::from_secs(2)));
        assert_eq!(h.spec.abort_codes.iter().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn short_form_is_resolved() {
        let cfg = ConfigFile::try_from(raw(vec![RawHandlerConfig {
            event: "started".to_string(),
            exec: Some("exec foo bar baz".to_string()),
            ..RawHandlerConfig::default()
        }]))
        .unwrap();

        let spec = &cfg.handlers[0].spec;
        assert_eq!(spec.command, "foo");
        assert_eq!(spec.args, vec!["bar".to_string(), "baz".to_string()]);
        assert!(!spec.foreground);
    }

    #[test]
    fn mixing_forms_is_rejected() {
        let err = ConfigFile::try_from(raw(vec![RawHandlerConfig {
            event: "started".to_string(),
            exec: Some("exec foo".to_string()),
            foreground: true,
            ..RawHandlerConfig::default()
        }]))
        .unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn missing_command_is_rejected() {
        let err = ConfigFile::try_from(raw(vec![RawHandlerConfig {
            event: "started".to_string(),
            ..RawHandlerConfig::default()
        }]))
        .unwrap_err();
        assert!(err.to_string().contains("handler #1"));
        assert!(err.to_string().contains("`command` or `exec`"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = ConfigFile::try_from(raw(vec![RawHandlerConfig {
            event: "started".to_string(),
            command: Some("true".to_string()),
            timeout: Some("soon".to_string()),
            ..RawHandlerConfig::default()
        }]))
        .unwrap_err();
        assert!(err.to_string().contains("invalid duration"));
    }
}
