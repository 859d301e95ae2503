//! What the shutdown binding requires from a broker consumer.

use std::sync::Arc;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde_json::Value;
use tracing::{error, info};

/// Minimum surface the shutdown binding needs from a running consumer.
///
/// The broker client itself (connect, subscribe, poll, commit) is out of
/// scope; implement this on whatever wraps it.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BrokerConsumer: Send + Sync {
    /// Disconnect from the broker, leaving the consumer group cleanly.
    async fn disconnect(&self) -> anyhow::Result<()>;

    /// The structured logger owned by this consumer.
    fn logger(&self) -> Arc<dyn ConsumerLogger>;
}

/// Structured logging sink exposed by a consumer.
///
/// `attrs` carries the event's structured payload, mirroring broker client
/// loggers that attach a free-form object to every entry.
#[cfg_attr(test, automock)]
pub trait ConsumerLogger: Send + Sync {
    /// Emit an informational event.
    fn info(&self, message: &str, attrs: Value);

    /// Emit an error event.
    fn error(&self, message: &str, attrs: Value);
}

/// [`ConsumerLogger`] that forwards to `tracing`, for consumers whose broker
/// library does not bring a logger of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ConsumerLogger for TracingLogger {
    fn info(&self, message: &str, attrs: Value) {
        info!(%attrs, "{}", message);
    }

    fn error(&self, message: &str, attrs: Value) {
        error!(%attrs, "{}", message);
    }
}
