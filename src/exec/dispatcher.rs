// src/exec/dispatcher.rs

//! The command dispatcher: runs one configured command for one event.

use std::future::Future;
use std::pin::Pin;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::{EventExecError, ProcessError, Result};
use crate::events::{EventContext, EventHandler};
use crate::exec::replacer::Replacer;
use crate::exec::reporter::{BackgroundFailure, FailureReporter};
use crate::exec::spec::ValidatedSpec;

/// Runs a [`ValidatedSpec`] whenever its event fires.
///
/// - Foreground: waits for the command, kills it on timeout or event
///   cancellation, and returns its result (wrapped as `Aborted` when the exit
///   code is one of the abort codes).
/// - Background: starts the command in a detached Tokio task and returns
///   `Ok(())` straight away. Failures go to the [`FailureReporter`] once.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    spec: ValidatedSpec,
    reporter: Arc<dyn FailureReporter>,
}

impl Dispatcher {
    pub fn new(spec: ValidatedSpec, reporter: Arc<dyn FailureReporter>) -> Self {
        Self { spec, reporter }
    }

    pub fn spec(&self) -> &ValidatedSpec {
        &self.spec
    }

    pub async fn handle(&self, ctx: &EventContext) -> Result<()> {
        // The command itself is never expanded, so event data cannot pick
        // which binary runs.
        let args = expand_args(self.spec.args(), ctx.replacer());
        let cmd = build_command(&self.spec, &args, self.spec.foreground());
        let cancel = ctx.cancel_token().child_token();

        info!(
            event = %ctx.event().name,
            command = %self.spec.command(),
            ?args,
            foreground = self.spec.foreground(),
            timeout = ?self.spec.timeout(),
            "dispatching command"
        );

        if self.spec.foreground() {
            let result = run_process(cmd, self.spec.command(), self.spec.timeout(), &cancel).await;
            return self.classify(result);
        }

        let command = self.spec.command().to_string();
        let timeout = self.spec.timeout();
        let reporter = Arc::clone(&self.reporter);
        let event = ctx.event().name.clone();

        // Detached: the JoinHandle is dropped, nothing awaits or cancels this
        // task except the event's own cancellation token.
        drop(tokio::spawn(async move {
            match run_process(cmd, &command, timeout, &cancel).await {
                Ok(()) => debug!(%event, %command, "background command finished"),
                Err(error) => reporter.report(BackgroundFailure { event, error }),
            }
        }));

        Ok(())
    }

    /// Map a foreground process result onto the event outcome.
    fn classify(&self, result: std::result::Result<(), ProcessError>) -> Result<()> {
        let exit_code = match &result {
            Ok(()) => Some(0),
            Err(e) => e.exit_code(),
        };

        match exit_code {
            Some(code) if self.spec.is_abort_code(code) => {
                info!(
                    command = %self.spec.command(),
                    exit_code = code,
                    "command exit code matches abort code; aborting event"
                );
                Err(EventExecError::Aborted {
                    exit_code: code,
                    source: result.err(),
                })
            }
            _ => result.map_err(EventExecError::from),
        }
    }
}

impl EventHandler for Dispatcher {
    fn handle<'a>(
        &'a self,
        ctx: &'a EventContext,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(Dispatcher::handle(self, ctx))
    }
}

fn expand_args(args: &[String], replacer: &dyn Replacer) -> Vec<String> {
    args.iter().map(|arg| replacer.replace_all(arg, "")).collect()
}

fn build_command(spec: &ValidatedSpec, args: &[String], kill_on_drop: bool) -> Command {
    let mut cmd = Command::new(spec.command());
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(kill_on_drop);

    if !spec.dir().is_empty() {
        cmd.current_dir(spec.dir());
    }

    cmd
}

/// Spawn `cmd` and wait for it, killing it when `timeout` elapses or `cancel`
/// fires, whichever comes first.
async fn run_process(
    mut cmd: Command,
    command: &str,
    timeout: Duration,
    cancel: &CancellationToken,
) -> std::result::Result<(), ProcessError> {
    let mut child = cmd.spawn().map_err(|source| ProcessError::Launch {
        command: command.to_string(),
        source,
    })?;

    debug!(%command, pid = ?child.id(), "command started");

    tokio::select! {
        status = child.wait() => {
            let status = status.map_err(|source| ProcessError::Wait {
                command: command.to_string(),
                source,
            })?;
            status_to_result(command, status)
        }

        _ = tokio::time::sleep(timeout) => {
            warn!(%command, ?timeout, "command exceeded timeout; killing process");
            kill_child(&mut child, command).await;
            Err(ProcessError::TimedOut {
                command: command.to_string(),
                timeout,
            })
        }

        _ = cancel.cancelled() => {
            info!(%command, "event cancelled; killing process");
            kill_child(&mut child, command).await;
            Err(ProcessError::Cancelled {
                command: command.to_string(),
            })
        }
    }
}

async fn kill_child(child: &mut Child, command: &str) {
    if let Err(e) = child.kill().await {
        warn!(%command, error = %e, "failed to kill child process");
    }
}

fn status_to_result(command: &str, status: ExitStatus) -> std::result::Result<(), ProcessError> {
    debug!(%command, exit_code = ?status.code(), success = status.success(), "command exited");

    if status.success() {
        return Ok(());
    }

    match status.code() {
        Some(code) => Err(ProcessError::Exited {
            command: command.to_string(),
            code,
        }),
        None => Err(ProcessError::Signaled {
            command: command.to_string(),
        }),
    }
}
