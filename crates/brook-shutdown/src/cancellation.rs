//! Single-fire cancellation primitive shared by everything that observes
//! shutdown.

use std::sync::{Arc, OnceLock};

use tokio_util::sync::CancellationToken;

use crate::reason::ShutdownReason;

/// A set-once broadcast signal carrying the shutdown reason.
///
/// Starts pending and moves to fired exactly once. Clones are observer
/// handles over the same underlying state, cheap and safe to query or wait
/// on from any thread. A wait started after the signal has fired completes
/// immediately, so late observers cannot miss the event.
#[derive(Debug, Clone, Default)]
pub struct CancellationSignal {
    token: CancellationToken,
    reason: Arc<OnceLock<ShutdownReason>>,
}

impl CancellationSignal {
    /// New signal in the pending state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal with `reason`.
    ///
    /// The first call records the reason and wakes all observers. Every
    /// later call is a no-op that leaves the recorded reason untouched.
    /// Returns `true` for the call that performed the transition.
    pub fn fire(&self, reason: ShutdownReason) -> bool {
        let first = self.reason.set(reason).is_ok();
        // Cancel only after the reason is stored, so an observer woken by
        // the token always sees a recorded reason.
        self.token.cancel();
        first
    }

    /// Whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// The recorded reason, if the signal has fired.
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.reason.get().copied()
    }

    /// Wait until the signal fires. Completes immediately if it already has.
    pub async fn fired(&self) {
        self.token.cancelled().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::reason::{FaultKind, TermSignal};

    #[test]
    fn starts_pending() {
        let signal = CancellationSignal::new();
        assert!(!signal.is_fired());
        assert!(signal.reason().is_none());
    }

    #[test]
    fn first_fire_wins() {
        let signal = CancellationSignal::new();
        assert!(signal.fire(ShutdownReason::Signal(TermSignal::Term)));
        assert!(!signal.fire(ShutdownReason::Signal(TermSignal::Int)));
        assert!(!signal.fire(ShutdownReason::Fault(FaultKind::Panic)));
        assert!(signal.is_fired());
        assert_eq!(
            signal.reason(),
            Some(ShutdownReason::Signal(TermSignal::Term))
        );
    }

    #[test]
    fn clones_share_state() {
        let signal = CancellationSignal::new();
        let observer = signal.clone();
        signal.fire(ShutdownReason::Fault(FaultKind::TaskFailure));
        assert!(observer.is_fired());
        assert_eq!(
            observer.reason(),
            Some(ShutdownReason::Fault(FaultKind::TaskFailure))
        );
    }

    #[tokio::test]
    async fn concurrent_fires_commit_exactly_once() {
        let signal = CancellationSignal::new();
        let mut attempts = Vec::new();
        for sig in TermSignal::ALL {
            let signal = signal.clone();
            attempts.push(tokio::spawn(async move {
                signal.fire(ShutdownReason::Signal(sig)).then_some(sig)
            }));
        }

        let mut winners = Vec::new();
        for attempt in attempts {
            if let Some(sig) = attempt.await.unwrap() {
                winners.push(sig);
            }
        }

        assert_eq!(winners.len(), 1);
        assert_eq!(signal.reason(), Some(ShutdownReason::Signal(winners[0])));
    }

    #[tokio::test]
    async fn wait_after_fire_completes_immediately() {
        let signal = CancellationSignal::new();
        signal.fire(ShutdownReason::Signal(TermSignal::Int));
        tokio::time::timeout(Duration::from_millis(100), signal.fired())
            .await
            .expect("already-fired signal must wake a late observer");
    }

    #[tokio::test]
    async fn all_observers_wake_on_fire() {
        let signal = CancellationSignal::new();
        let first = {
            let observer = signal.clone();
            tokio::spawn(async move { observer.fired().await })
        };
        let second = {
            let observer = signal.clone();
            tokio::spawn(async move { observer.fired().await })
        };

        // Let both observers park on the pending signal before firing.
        tokio::task::yield_now().await;
        signal.fire(ShutdownReason::Signal(TermSignal::Term));

        tokio::time::timeout(Duration::from_secs(1), async {
            first.await.unwrap();
            second.await.unwrap();
        })
        .await
        .expect("every observer must see the fire");
    }
}
