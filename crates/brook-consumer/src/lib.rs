//! Graceful shutdown for broker consumers.
//!
//! [`attach`] wires a running consumer to the process-wide coordinator from
//! `brook-shutdown`: a termination signal or fatal runtime fault disconnects
//! the consumer exactly once, logs the result through the consumer's own
//! logger, and ends the process with a faithful exit status.

mod binding;
mod consumer;

pub use binding::{attach, attach_with};
pub use consumer::{BrokerConsumer, ConsumerLogger, TracingLogger};
