use std::sync::{Arc, Mutex};
use std::time::Duration;

use eventexec::errors::ProcessError;
use eventexec::exec::{BackgroundFailure, FailureReporter};
use tokio::sync::Notify;

/// A failure reporter that:
/// - records every background failure it receives
/// - wakes anyone waiting in [`RecordingReporter::wait_for`].
#[derive(Debug, Default, Clone)]
pub struct RecordingReporter {
    failures: Arc<Mutex<Vec<(String, String, Option<i32>)>>>,
    notify: Arc<Notify>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.failures.lock().unwrap().len()
    }

    /// `(event, error message, exit code)` for every report so far.
    pub fn failures(&self) -> Vec<(String, String, Option<i32>)> {
        self.failures.lock().unwrap().clone()
    }

    /// Wait until at least `n` failures were reported, or `limit` elapses.
    /// Returns the count seen.
    pub async fn wait_for(&self, n: usize, limit: Duration) -> usize {
        let deadline = tokio::time::Instant::now() + limit;
        loop {
            let notified = self.notify.notified();
            let count = self.count();
            if count >= n {
                return count;
            }
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return self.count();
            }
        }
    }
}

impl FailureReporter for RecordingReporter {
    fn report(&self, failure: BackgroundFailure) {
        let BackgroundFailure { event, error } = failure;
        let exit_code = ProcessError::exit_code(&error);
        {
            let mut guard = self.failures.lock().unwrap();
            guard.push((event, error.to_string(), exit_code));
        }
        self.notify.notify_waiters();
    }
}
