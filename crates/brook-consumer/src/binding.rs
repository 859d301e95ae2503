//! Binds a consumer's lifecycle to the process-wide shutdown coordinator.

use std::sync::Arc;

use serde_json::json;
use tokio::task::JoinHandle;
use tracing::error;

use brook_shutdown::{ExitOutcome, ProcessShutdown, ShutdownControl};

use crate::consumer::BrokerConsumer;

/// Attach graceful shutdown handling to `consumer`.
///
/// Registers against [`ProcessShutdown::global`]: once the process-wide
/// cancellation fires (or immediately, if it already has), the consumer is
/// disconnected exactly once and the process terminates. Exit code 0 on a
/// clean disconnect, 1 on a failed one, signal-mirrored when the shutdown
/// was signal-initiated. A disconnect that panics counts as failed;
/// termination still happens.
///
/// Never blocks the caller. The returned handle is the binding task; in
/// production it never completes, because termination does not return.
pub fn attach<C>(consumer: Arc<C>) -> JoinHandle<()>
where
    C: BrokerConsumer + ?Sized + 'static,
{
    attach_with(consumer, ProcessShutdown::global().clone())
}

/// [`attach`] with the shutdown control injected, for tests and custom
/// wiring.
pub fn attach_with<C, P>(consumer: Arc<C>, control: P) -> JoinHandle<()>
where
    C: BrokerConsumer + ?Sized + 'static,
    P: ShutdownControl + 'static,
{
    let cancellation = control.cancellation();
    tokio::spawn(async move {
        cancellation.fired().await;
        // The disconnect phase runs in its own task: a collaborator that
        // panics must not skip termination.
        let outcome = match tokio::spawn(disconnect_and_log(consumer)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Disconnect routine panicked: {}", e);
                ExitOutcome::Faulted
            }
        };
        control.terminate(outcome);
    })
}

/// The disconnect phase: invoke the consumer's disconnect and log the
/// result through its logger. Runs exactly once per binding; the caller
/// terminates with the returned outcome, mapping a panicked join to
/// [`ExitOutcome::Faulted`], so termination always follows the observed
/// cancellation.
async fn disconnect_and_log<C>(consumer: Arc<C>) -> ExitOutcome
where
    C: BrokerConsumer + ?Sized,
{
    let logger = consumer.logger();
    match consumer.disconnect().await {
        Ok(()) => {
            logger.info("Successful consumer disconnection", json!({}));
            ExitOutcome::Disconnected
        }
        Err(error) => {
            logger.error(
                "Error when disconnecting consumer. Forcing an exit.",
                json!({ "error": format!("{error:#}") }),
            );
            ExitOutcome::Faulted
        }
    }
}
