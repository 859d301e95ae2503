//! Real signal delivery through an installed coordinator.
//!
//! Lives in its own binary with a single test: an OS signal is
//! process-global, so this cannot share a binary with anything else that
//! registers or asserts on signal state.

use std::time::Duration;

use brook_shutdown::{ProcessShutdown, ShutdownReason, TermSignal};

#[tokio::test]
async fn signal_raised_right_after_install_is_captured() {
    let shutdown = ProcessShutdown::new();
    shutdown.install();

    // No yield between install and delivery: the handler must already be
    // registered when install returns, or the default action kills the
    // process here and the graceful path never runs.
    unsafe {
        libc::raise(libc::SIGUSR2);
    }

    let cancellation = shutdown.cancellation();
    tokio::time::timeout(Duration::from_secs(5), cancellation.fired())
        .await
        .expect("installed listener must observe the raised signal");
    assert_eq!(
        cancellation.reason(),
        Some(ShutdownReason::Signal(TermSignal::Usr2))
    );
}
