//! Minimal daemon demonstrating graceful consumer shutdown.
//!
//! Run with `cargo run --example graceful`, then press Ctrl-C or send
//! SIGTERM/SIGHUP/SIGUSR2 to the printed pid. The consumer disconnects
//! first, then the process dies by the same signal.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, subscriber::set_global_default};
use tracing_subscriber::filter::EnvFilter;

use brook_consumer::{attach, BrokerConsumer, ConsumerLogger, TracingLogger};
use brook_shutdown::ProcessShutdown;

/// Stand-in for a real broker consumer: pretends to poll, takes a moment to
/// leave the group on disconnect.
struct DemoConsumer {
    logger: Arc<TracingLogger>,
}

#[async_trait]
impl BrokerConsumer for DemoConsumer {
    async fn disconnect(&self) -> anyhow::Result<()> {
        info!("Committing offsets and leaving the group...");
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(())
    }

    fn logger(&self) -> Arc<dyn ConsumerLogger> {
        self.logger.clone()
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();
    set_global_default(subscriber).expect("Failed to set subscriber");
}

/// A supervised worker; returning an error here would also initiate
/// shutdown.
async fn demo_worker() -> anyhow::Result<()> {
    loop {
        tokio::time::sleep(Duration::from_secs(5)).await;
        info!("Worker heartbeat");
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let shutdown = ProcessShutdown::global();
    info!("Demo consumer is launching, pid {}", std::process::id());

    let consumer = Arc::new(DemoConsumer {
        logger: Arc::new(TracingLogger),
    });
    let _binding = attach(consumer);

    shutdown.watch_task("demo worker", tokio::spawn(demo_worker()));

    // The consume loop: poll until shutdown is initiated.
    let cancellation = shutdown.cancellation();
    let mut poll = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            _ = poll.tick() => info!("Polling..."),
            _ = cancellation.fired() => break,
        }
    }

    // The binding disconnects and terminates; nothing left to do here.
    std::future::pending::<()>().await;
}
