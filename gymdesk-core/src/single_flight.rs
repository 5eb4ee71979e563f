//! Single-flight execution: concurrent callers share one in-flight run.
//!
//! The first caller (the leader) runs the operation; everyone who arrives
//! while it is running waits for the leader's outcome instead of starting
//! their own. The in-flight slot is cleared when the leader finishes, fails
//! or is dropped, so a cancelled leader never wedges later callers.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use tokio::sync::watch;

/// The leader was dropped before it produced an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("the in-flight operation was abandoned")]
pub struct Abandoned;

type Slot<T> = Option<watch::Receiver<Option<T>>>;

enum Role<T> {
    Leader(watch::Sender<Option<T>>),
    Follower(watch::Receiver<Option<T>>),
}

pub struct SingleFlight<T> {
    in_flight: Mutex<Slot<T>>,
    flights: AtomicU64,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        SingleFlight {
            in_flight: Mutex::new(None),
            flights: AtomicU64::new(0),
        }
    }
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `op`, or join the run already in flight.
    ///
    /// `op` is only called when this caller becomes the leader.
    pub async fn run<F, Fut>(&self, op: F) -> Result<T, Abandoned>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let role = {
            let mut slot = self.slot();
            if let Some(rx) = slot.as_ref() {
                Role::Follower(rx.clone())
            } else {
                let (tx, rx) = watch::channel(None);
                *slot = Some(rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Follower(mut rx) => {
                let outcome = rx.wait_for(Option::is_some).await.map_err(|_| Abandoned)?;
                outcome.clone().ok_or(Abandoned)
            }
            Role::Leader(tx) => {
                self.flights.fetch_add(1, Ordering::SeqCst);
                let reset = ResetOnDrop { gate: self };

                let outcome = op().await;

                // Clear the slot before publishing; late arrivals start fresh.
                drop(reset);
                let _ = tx.send(Some(outcome.clone()));
                Ok(outcome)
            }
        }
    }

    /// Whether a run is currently in flight.
    pub fn is_in_flight(&self) -> bool {
        self.slot().is_some()
    }

    /// Number of times an operation was actually started.
    pub fn flights(&self) -> u64 {
        self.flights.load(Ordering::SeqCst)
    }

    fn slot(&self) -> MutexGuard<'_, Slot<T>> {
        // The slot holds no invariant a panic could break.
        self.in_flight.lock().unwrap_or_else(|p| p.into_inner())
    }
}

struct ResetOnDrop<'a, T: Clone> {
    gate: &'a SingleFlight<T>,
}

impl<T: Clone> Drop for ResetOnDrop<'_, T> {
    fn drop(&mut self) {
        *self.gate.slot() = None;
    }
}
