//! Why the process is shutting down.

use std::fmt;

use thiserror::Error;
use tokio::signal::unix::SignalKind;

/// Termination signals intercepted by the coordinator.
///
/// The set matches what process supervisors conventionally send to stop a
/// service: SIGTERM (default `kill`), SIGINT (Ctrl-C), plus SIGHUP and
/// SIGUSR2, which several restart managers use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermSignal {
    Term,
    Int,
    Hup,
    Usr2,
}

impl TermSignal {
    /// All intercepted signals, in registration order.
    pub const ALL: [TermSignal; 4] = [
        TermSignal::Term,
        TermSignal::Int,
        TermSignal::Hup,
        TermSignal::Usr2,
    ];

    /// Conventional name, e.g. `"SIGTERM"`.
    pub fn name(self) -> &'static str {
        match self {
            TermSignal::Term => "SIGTERM",
            TermSignal::Int => "SIGINT",
            TermSignal::Hup => "SIGHUP",
            TermSignal::Usr2 => "SIGUSR2",
        }
    }

    /// Raw signal number, used when the signal is re-delivered at exit.
    pub fn signo(self) -> i32 {
        match self {
            TermSignal::Term => libc::SIGTERM,
            TermSignal::Int => libc::SIGINT,
            TermSignal::Hup => libc::SIGHUP,
            TermSignal::Usr2 => libc::SIGUSR2,
        }
    }

    pub(crate) fn kind(self) -> SignalKind {
        match self {
            TermSignal::Term => SignalKind::terminate(),
            TermSignal::Int => SignalKind::interrupt(),
            TermSignal::Hup => SignalKind::hangup(),
            TermSignal::Usr2 => SignalKind::user_defined2(),
        }
    }
}

impl fmt::Display for TermSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fatal runtime error classes that initiate shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// An uncaught panic, observed through the process panic hook.
    Panic,
    /// A supervised background task that exited with an unhandled error.
    TaskFailure,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FaultKind::Panic => "panic",
            FaultKind::TaskFailure => "task failure",
        };
        f.write_str(s)
    }
}

/// Why the cancellation signal fired.
///
/// At most one reason is recorded per process; the first triggering event
/// wins and later events cannot replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ShutdownReason {
    /// The process was asked to stop via an OS termination signal.
    #[error("received {0}")]
    Signal(TermSignal),
    /// An unrecoverable programming error was detected at runtime.
    #[error("runtime fault: {0}")]
    Fault(FaultKind),
}
