//! Mapping from shutdown reason and outcome to the final process exit.

use tracing::info;

use crate::reason::{ShutdownReason, TermSignal};

/// Final outcome of the shutdown path.
///
/// Discriminants are the exit codes used when the shutdown was not
/// signal-initiated.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// The consumer disconnected cleanly.
    Disconnected = 0,
    /// The shutdown path itself failed, e.g. the disconnect errored.
    Faulted = 1,
}

impl ExitOutcome {
    /// Numeric exit code for this outcome.
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// How the process terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitAction {
    /// Re-deliver the remembered signal so the OS-visible exit status
    /// follows the 128+signo convention.
    Raise(TermSignal),
    /// Plain numeric exit.
    Exit(i32),
}

/// Decide the exit action from the recorded reason and the outcome.
///
/// Only a termination signal is mirrored. A runtime fault exits with the
/// outcome's numeric code, as does a termination never preceded by a firing
/// at all.
pub(crate) fn exit_action(reason: Option<ShutdownReason>, outcome: ExitOutcome) -> ExitAction {
    match reason {
        Some(ShutdownReason::Signal(sig)) => ExitAction::Raise(sig),
        Some(ShutdownReason::Fault(_)) | None => ExitAction::Exit(outcome.code()),
    }
}

/// Carry out the exit action. Does not return.
pub(crate) fn execute(action: ExitAction) -> ! {
    match action {
        ExitAction::Raise(sig) => {
            info!("Killing process {} with {}", std::process::id(), sig);
            // Restore the default disposition first: the tokio listener
            // leaves an OS handler installed that would swallow the
            // re-delivered signal.
            unsafe {
                libc::signal(sig.signo(), libc::SIG_DFL);
                libc::raise(sig.signo());
            }
            // Reached only if the signal is blocked; report the
            // conventional status for it anyway.
            std::process::exit(128 + sig.signo())
        }
        ExitAction::Exit(code) => {
            info!("Exiting process with code {}", code);
            std::process::exit(code)
        }
    }
}
