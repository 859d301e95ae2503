//! Process-lifecycle shutdown coordination.
//!
//! Converts OS termination signals and fatal runtime faults into a single
//! idempotent cancellation event that any number of components can observe,
//! then terminates the process with an exit status faithful to what stopped
//! it: a remembered termination signal is re-delivered so the OS reports
//! death-by-signal, everything else exits with a numeric code.

mod cancellation;
mod exit;
mod process;
mod reason;

pub use cancellation::CancellationSignal;
pub use exit::ExitOutcome;
pub use process::{ProcessShutdown, ShutdownControl};
pub use reason::{FaultKind, ShutdownReason, TermSignal};
