//! Fault interception paths that involve real panics.
//!
//! These live in their own binary: a panic anywhere in a process runs every
//! chained panic hook, which would race against tests asserting a
//! still-pending signal if they shared one.

use std::time::Duration;

use brook_shutdown::{FaultKind, ProcessShutdown, ShutdownReason};

#[tokio::test]
async fn panic_hook_reports_fault() {
    let shutdown = ProcessShutdown::new();
    shutdown.install();

    let result = std::panic::catch_unwind(|| panic!("boom"));
    assert!(result.is_err());

    let cancellation = shutdown.cancellation();
    assert!(cancellation.is_fired());
    assert_eq!(
        cancellation.reason(),
        Some(ShutdownReason::Fault(FaultKind::Panic))
    );
}

#[tokio::test]
async fn panicked_task_is_reported_as_panic_fault() {
    async fn doomed() -> Result<(), String> {
        panic!("worker blew up")
    }

    let shutdown = ProcessShutdown::new();
    shutdown.watch_task("worker", tokio::spawn(doomed()));

    let cancellation = shutdown.cancellation();
    tokio::time::timeout(Duration::from_secs(1), cancellation.fired())
        .await
        .expect("panicked task must fire the cancellation");
    assert_eq!(
        cancellation.reason(),
        Some(ShutdownReason::Fault(FaultKind::Panic))
    );
}
