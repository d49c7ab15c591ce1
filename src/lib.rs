// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod events;
pub mod exec;
pub mod logging;

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_and_validate, parse_duration};
use crate::events::{EmitSummary, EventPipeline, HandlerRegistry};
use crate::exec::TracingReporter;

/// Origin recorded on events emitted from the command line.
pub const CLI_ORIGIN: &str = "cli";

/// How a CLI run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// `--dry-run`: config validated, nothing executed.
    DryRun,
    /// Every handler ran; some may have failed (see the summary).
    Completed(EmitSummary),
    /// A foreground handler aborted the event.
    Aborted,
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - handler registration and pipeline construction
/// - Ctrl-C handling (cancels the event)
/// - event emission and optional lingering for background commands
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let cfg = load_and_validate(&args.config)?;

    let registry = HandlerRegistry::with_builtin_handlers();
    let pipeline =
        EventPipeline::from_config(CLI_ORIGIN, &cfg, &registry, Arc::new(TracingReporter))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(RunOutcome::DryRun);
    }

    let linger = args.linger.as_deref().map(parse_duration).transpose()?;

    // `required_unless_present = "dry_run"` guarantees this.
    let Some(event) = args.event.as_deref() else {
        anyhow::bail!("--event is required");
    };

    let cancel = CancellationToken::new();

    // Ctrl-C → cancel the event; running commands get killed.
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling event");
            cancel.cancel();
        });
    }

    if pipeline.handler_count(event) == 0 {
        info!(%event, "no handlers subscribed to event");
    }

    let data: BTreeMap<String, String> = args.data.into_iter().collect();
    let outcome = match pipeline.emit(event, data, cancel.clone()).await {
        Ok(summary) => RunOutcome::Completed(summary),
        Err(e) if e.is_aborted() => {
            info!(%event, error = %e, "event aborted");
            RunOutcome::Aborted
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(linger) = linger {
        debug!(?linger, "lingering for background commands");
        tokio::select! {
            _ = tokio::time::sleep(linger) => {}
            _ = cancel.cancelled() => {}
        }
    }

    Ok(outcome)
}

/// Simple dry-run output: print handlers and what they would run.
fn print_dry_run(cfg: &ConfigFile) {
    println!("eventexec dry-run");
    println!();

    println!("handlers ({}):", cfg.handlers.len());
    for h in &cfg.handlers {
        println!("  - on {} ({})", h.event, h.handler_type);
        println!("      command: {}", h.spec.command);
        if !h.spec.args.is_empty() {
            println!("      args: {:?}", h.spec.args);
        }
        if !h.spec.dir.is_empty() {
            println!("      dir: {}", h.spec.dir);
        }
        println!("      timeout: {:?}", exec::spec::effective_timeout(h.spec.timeout));
        println!("      foreground: {}", h.spec.foreground);
        if !h.spec.abort_codes.is_empty() {
            println!("      abort_codes: {:?}", h.spec.abort_codes);
        }
    }

    debug!("dry-run complete (no execution)");
}
