#![allow(dead_code)]

pub use eventexec_test_utils::builders;
pub use eventexec_test_utils::recording_reporter::RecordingReporter;
pub use eventexec_test_utils::{init_tracing, with_timeout};
