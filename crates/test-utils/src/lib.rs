//! Shared helpers for procherd tests: a recording observer and task-detail
//! builders.

pub mod builders;
pub mod recording_observer;

pub use builders::TaskDetailBuilder;
pub use recording_observer::{ObservedEvent, RecordingObserver};

use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use procherd::manager::TaskManagerOptions;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a timeout generous enough for process spawn + watchdog.
#[allow(dead_code)]
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Manager options with a fast watchdog, so tests don't wait full seconds.
pub fn fast_manager_options() -> TaskManagerOptions {
    TaskManagerOptions {
        default_budget: Duration::from_secs(30),
        watchdog_period: Duration::from_millis(100),
        restart_pause: Duration::from_millis(50),
    }
}
