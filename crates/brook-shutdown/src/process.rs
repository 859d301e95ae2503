//! Process-wide shutdown coordination.

use std::fmt;
use std::sync::OnceLock;

use tokio::signal::unix::signal;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cancellation::CancellationSignal;
use crate::exit::{execute, exit_action, ExitOutcome};
use crate::reason::{FaultKind, ShutdownReason, TermSignal};

static GLOBAL: OnceLock<ProcessShutdown> = OnceLock::new();

/// Coordinates graceful shutdown for the whole process.
///
/// Owns the process-wide [`CancellationSignal`] and is the sanctioned way to
/// terminate once shutdown has run its course. Clones are handles over the
/// same underlying signal, so the coordinator can be handed to anything that
/// needs to observe or initiate shutdown.
#[derive(Debug, Clone, Default)]
pub struct ProcessShutdown {
    signal: CancellationSignal,
}

impl ProcessShutdown {
    /// Fresh coordinator with no handlers installed.
    ///
    /// Intended for tests and explicit wiring. Production code normally goes
    /// through [`ProcessShutdown::global`], which installs the handlers once
    /// for the whole process.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide coordinator, constructed and installed on first use.
    ///
    /// Must be called from within a tokio runtime: installation spawns the
    /// signal listener tasks.
    pub fn global() -> &'static ProcessShutdown {
        GLOBAL.get_or_init(|| {
            let shutdown = ProcessShutdown::new();
            shutdown.install();
            shutdown
        })
    }

    /// Install the interception handlers for this instance:
    ///
    /// * a one-time listener per termination signal (SIGTERM, SIGINT,
    ///   SIGHUP, SIGUSR2), each firing the cancellation at most once;
    /// * a persistent panic hook, chained in front of the previous hook,
    ///   that reports every panic as a [`FaultKind::Panic`].
    ///
    /// The OS handlers are registered before this returns; the spawned
    /// tasks only wait for deliveries, so a signal arriving right after
    /// `install` cannot take the default action. Registration failures are
    /// logged and tolerated. A panic on the main thread still unwinds after
    /// the hook has fired, so only panics inside spawned tasks are
    /// guaranteed to reach the graceful disconnect path before the process
    /// would otherwise die.
    pub fn install(&self) {
        for sig in TermSignal::ALL {
            match signal(sig.kind()) {
                Ok(mut stream) => {
                    let shutdown = self.clone();
                    tokio::spawn(async move {
                        if stream.recv().await.is_some() {
                            shutdown.signal_received(sig);
                        }
                    });
                }
                Err(e) => warn!("Failed to register {} handler: {}", sig, e),
            }
        }

        let shutdown = self.clone();
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            shutdown.report_fault(FaultKind::Panic, info);
            previous(info);
        }));
    }

    /// Observer handle for the cancellation signal.
    pub fn cancellation(&self) -> CancellationSignal {
        self.signal.clone()
    }

    /// Record receipt of a termination signal and fire the cancellation.
    ///
    /// Invoked by the installed listeners. Public so alternative signal
    /// sources and tests can drive the same path. Later calls still log the
    /// signal but cannot change the recorded reason.
    pub fn signal_received(&self, sig: TermSignal) {
        info!("Received {}, initiating shutdown...", sig);
        if !self.signal.fire(ShutdownReason::Signal(sig)) {
            debug!("Shutdown already initiated, keeping the first reason");
        }
    }

    /// Report a fatal runtime fault and fire the cancellation.
    ///
    /// Persistent intake for the uncaught-panic and failed-task classes:
    /// every call is logged, only the first affects the recorded reason.
    /// Callable from any thread, with or without a runtime.
    pub fn report_fault(&self, kind: FaultKind, detail: impl fmt::Display) {
        error!("Runtime fault ({}): {}", kind, detail);
        if !self.signal.fire(ShutdownReason::Fault(kind)) {
            debug!("Shutdown already initiated, keeping the first reason");
        }
    }

    /// Supervise a background task.
    ///
    /// An `Err` return is reported as a [`FaultKind::TaskFailure`] and a
    /// panicked task as a [`FaultKind::Panic`]; either fires the
    /// cancellation. A task that completes cleanly or is aborted does
    /// nothing.
    pub fn watch_task<E>(&self, name: impl Into<String>, handle: JoinHandle<Result<(), E>>)
    where
        E: fmt::Display + Send + 'static,
    {
        let shutdown = self.clone();
        let name = name.into();
        tokio::spawn(async move {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    shutdown
                        .report_fault(FaultKind::TaskFailure, format!("{name} exited: {err}"));
                }
                Err(join) if join.is_cancelled() => {}
                Err(join) => {
                    shutdown.report_fault(FaultKind::Panic, format!("{name} panicked: {join}"));
                }
            }
        });
    }

    /// Terminate the process.
    ///
    /// When the recorded reason is a termination signal, that signal is
    /// re-delivered to the current process so the OS-visible exit status
    /// follows the 128+signo convention. Otherwise the process exits with
    /// the outcome's numeric code.
    pub fn terminate(&self, outcome: ExitOutcome) -> ! {
        execute(exit_action(self.signal.reason(), outcome))
    }
}

/// The control surface a shutdown binding needs from the coordinator.
///
/// `terminate` returns `()` at the trait level so test doubles can record
/// the call; the production implementation does not return.
pub trait ShutdownControl: Send + Sync {
    /// Observer handle for the cancellation signal.
    fn cancellation(&self) -> CancellationSignal;

    /// Terminate the process with the given outcome.
    fn terminate(&self, outcome: ExitOutcome);
}

impl ShutdownControl for ProcessShutdown {
    fn cancellation(&self) -> CancellationSignal {
        ProcessShutdown::cancellation(self)
    }

    fn terminate(&self, outcome: ExitOutcome) {
        ProcessShutdown::terminate(self, outcome)
    }
}
