#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use eventexec::config::{ConfigFile, RawConfigFile, RawHandlerConfig};
use eventexec::events::{Event, EventContext};
use eventexec::exec::{Dispatcher, ExecSpec, FailureReporter, MapReplacer, ValidatedSpec};
use tokio_util::sync::CancellationToken;

/// Builder for `ExecSpec` to simplify test setup.
pub struct ExecSpecBuilder {
    spec: ExecSpec,
}

impl ExecSpecBuilder {
    pub fn new(command: &str) -> Self {
        Self {
            spec: ExecSpec {
                command: command.to_string(),
                ..ExecSpec::default()
            },
        }
    }

    /// `sh -c <script>`, handy for exit codes and sleeps.
    pub fn shell(script: &str) -> Self {
        Self::new("sh").arg("-c").arg(script)
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.spec.args.push(arg.to_string());
        self
    }

    pub fn dir(mut self, dir: &str) -> Self {
        self.spec.dir = dir.to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.spec.timeout = Some(timeout);
        self
    }

    pub fn foreground(mut self, val: bool) -> Self {
        self.spec.foreground = val;
        self
    }

    pub fn abort_code(mut self, code: i32) -> Self {
        self.spec.abort_codes.insert(code);
        self
    }

    pub fn build(self) -> ExecSpec {
        self.spec
    }

    pub fn validated(self) -> ValidatedSpec {
        ValidatedSpec::try_from(self.spec).expect("Failed to validate spec from builder")
    }

    pub fn dispatcher(self, reporter: Arc<dyn FailureReporter>) -> Dispatcher {
        Dispatcher::new(self.validated(), reporter)
    }
}

/// Builder for `ConfigFile`.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    /// Long-form handler built from an `ExecSpec`.
    pub fn with_handler(mut self, event: &str, spec: ExecSpec) -> Self {
        self.config.handler.push(RawHandlerConfig {
            event: event.to_string(),
            command: Some(spec.command),
            args: spec.args,
            dir: (!spec.dir.is_empty()).then_some(spec.dir),
            timeout: spec.timeout.map(|t| format!("{}ms", t.as_millis())),
            foreground: spec.foreground,
            abort_codes: spec.abort_codes.into_iter().collect(),
            ..RawHandlerConfig::default()
        });
        self
    }

    /// Short-form `exec ...` handler.
    pub fn with_directive(mut self, event: &str, line: &str) -> Self {
        self.config.handler.push(RawHandlerConfig {
            event: event.to_string(),
            exec: Some(line.to_string()),
            ..RawHandlerConfig::default()
        });
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Event context for `name` with the given replacer and a fresh token.
pub fn event_context(name: &str, replacer: MapReplacer) -> (EventContext, CancellationToken) {
    let cancel = CancellationToken::new();
    let event = Event {
        id: 1,
        name: name.to_string(),
        origin: "test".to_string(),
        data: Default::default(),
    };
    let ctx = EventContext::new(event, cancel.clone(), Arc::new(replacer));
    (ctx, cancel)
}
