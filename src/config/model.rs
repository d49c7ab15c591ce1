// src/config/model.rs

use serde::Deserialize;

use crate::exec::ExecSpec;

/// Handler type used when `type` is omitted.
pub const DEFAULT_HANDLER_TYPE: &str = "exec";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [[handler]]
/// event = "cert_obtained"
/// command = "/usr/local/bin/reload"
/// args = ["{event.data.domain}"]
/// timeout = "5s"
/// foreground = true
/// abort_codes = [2]
///
/// [[handler]]
/// event = "started"
/// exec = "exec notify-send started"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    /// All `[[handler]]` entries, in file order.
    #[serde(default)]
    pub handler: Vec<RawHandlerConfig>,
}

/// One `[[handler]]` entry before validation.
///
/// Either the long form (`command` + friends) or the short form (`exec`) is
/// used, never both.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawHandlerConfig {
    /// Event name this handler subscribes to.
    pub event: String,

    /// Handler type; only `"exec"` is registered by default.
    #[serde(default, rename = "type")]
    pub handler_type: Option<String>,

    /// Short form: `exec <command> <args...>`.
    #[serde(default)]
    pub exec: Option<String>,

    #[serde(default)]
    pub command: Option<String>,

    /// Argument templates; placeholders are expanded per event.
    #[serde(default)]
    pub args: Vec<String>,

    #[serde(default)]
    pub dir: Option<String>,

    /// Duration string such as `"250ms"`, `"5s"`, `"1m"`.
    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub foreground: bool,

    #[serde(default)]
    pub abort_codes: Vec<i32>,
}

impl RawHandlerConfig {
    /// True if any long-form-only field is set.
    pub(crate) fn has_long_form_fields(&self) -> bool {
        self.command.is_some()
            || !self.args.is_empty()
            || self.dir.is_some()
            || self.timeout.is_some()
            || self.foreground
            || !self.abort_codes.is_empty()
    }
}

/// Validated configuration.
///
/// Built with `ConfigFile::try_from(raw)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub handlers: Vec<HandlerConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(handlers: Vec<HandlerConfig>) -> Self {
        Self { handlers }
    }

    /// Handlers subscribed to `event`, in configuration order.
    pub fn handlers_for<'a>(&'a self, event: &'a str) -> impl Iterator<Item = &'a HandlerConfig> + 'a {
        self.handlers.iter().filter(move |h| h.event == event)
    }
}

/// A resolved handler: which event, which handler type, and what to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub event: String,
    pub handler_type: String,
    pub spec: ExecSpec,
}
