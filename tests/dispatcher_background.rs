// tests/dispatcher_background.rs
#![cfg(unix)]

mod common;
use crate::common::builders::{ExecSpecBuilder, event_context};
use crate::common::{RecordingReporter, init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use eventexec::exec::MapReplacer;

type TestResult = Result<(), Box<dyn Error>>;

/// How long to keep watching for duplicate reports after the first one.
const SETTLE: Duration = Duration::from_millis(300);

#[tokio::test]
async fn failing_command_returns_immediately_and_reports_once() -> TestResult {
    with_timeout(async {
        init_tracing();

        let reporter = RecordingReporter::new();
        let dispatcher = ExecSpecBuilder::shell("sleep 0.2; exit 3")
            .dispatcher(Arc::new(reporter.clone()));
        let (ctx, _cancel) = event_context("started", MapReplacer::new());

        let started = Instant::now();
        dispatcher.handle(&ctx).await?;
        assert!(
            started.elapsed() < Duration::from_millis(150),
            "background handle must not wait for the command"
        );
        assert_eq!(reporter.count(), 0, "nothing reported before the command exits");

        assert_eq!(reporter.wait_for(1, Duration::from_secs(3)).await, 1);
        tokio::time::sleep(SETTLE).await;
        assert_eq!(reporter.count(), 1, "exactly one report per failure");

        let (event, message, exit_code) = reporter.failures().remove(0);
        assert_eq!(event, "started");
        assert!(message.contains("exited with code 3"));
        assert_eq!(exit_code, Some(3));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn successful_command_reports_nothing() -> TestResult {
    with_timeout(async {
        init_tracing();

        let reporter = RecordingReporter::new();
        let dispatcher = ExecSpecBuilder::new("true").dispatcher(Arc::new(reporter.clone()));
        let (ctx, _cancel) = event_context("started", MapReplacer::new());

        dispatcher.handle(&ctx).await?;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(reporter.count(), 0);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn launch_failure_is_reported_not_returned() -> TestResult {
    with_timeout(async {
        init_tracing();

        let reporter = RecordingReporter::new();
        let dispatcher = ExecSpecBuilder::new("/definitely/not/a/real/binary")
            .dispatcher(Arc::new(reporter.clone()));
        let (ctx, _cancel) = event_context("started", MapReplacer::new());

        dispatcher.handle(&ctx).await?;

        assert_eq!(reporter.wait_for(1, Duration::from_secs(3)).await, 1);
        tokio::time::sleep(SETTLE).await;
        assert_eq!(reporter.count(), 1);

        let (_, message, exit_code) = reporter.failures().remove(0);
        assert!(message.contains("failed to launch"));
        assert_eq!(exit_code, None);
        Ok(())
    })
    .await
}

#[tokio::test]
async fn background_timeout_is_reported_once() -> TestResult {
    with_timeout(async {
        init_tracing();

        let reporter = RecordingReporter::new();
        let dispatcher = ExecSpecBuilder::new("sleep")
            .arg("5")
            .timeout(Duration::from_millis(50))
            .dispatcher(Arc::new(reporter.clone()));
        let (ctx, _cancel) = event_context("started", MapReplacer::new());

        dispatcher.handle(&ctx).await?;

        assert_eq!(reporter.wait_for(1, Duration::from_secs(2)).await, 1);
        tokio::time::sleep(SETTLE).await;
        assert_eq!(reporter.count(), 1);
        assert!(reporter.failures()[0].1.contains("timeout"));
        Ok(())
    })
    .await
}

#[tokio::test]
async fn background_command_still_sees_expanded_args() -> TestResult {
    with_timeout(async {
        init_tracing();

        let dir = tempfile::tempdir()?;
        let out = dir.path().join("out.txt");

        let reporter = RecordingReporter::new();
        let dispatcher = ExecSpecBuilder::shell(r#"printf %s "$1" > "$0""#)
            .arg(out.to_str().expect("utf-8 temp path"))
            .arg("{event.name}")
            .dispatcher(Arc::new(reporter.clone()));
        let (ctx, _cancel) = event_context("started", MapReplacer::new().with("event.name", "started"));

        dispatcher.handle(&ctx).await?;

        let deadline = Instant::now() + Duration::from_secs(3);
        while std::fs::read_to_string(&out).unwrap_or_default() != "started" {
            assert!(Instant::now() < deadline, "background command never wrote its output");
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        assert_eq!(reporter.count(), 0);
        Ok(())
    })
    .await
}
