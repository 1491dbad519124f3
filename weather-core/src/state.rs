//! Single-slot "currently displayed weather" cell.
//!
//! One writer (the refresh pipeline) and any number of observers (the
//! presentation layer). Every write replaces the slot wholesale; there is no
//! history.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;
use tracing::debug;

use crate::model::WeatherSnapshot;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum WeatherState {
    /// Nothing has been loaded yet.
    #[default]
    Loading,
    Loaded(WeatherSnapshot),
    /// Only written when the service is told to surface errors.
    Failed(String),
}

impl WeatherState {
    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        match self {
            WeatherState::Loaded(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

/// How to resolve overlapping refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdatePolicy {
    /// Whichever response completes last is kept, regardless of issue order.
    #[default]
    LastWriteWins,
    /// Responses to requests issued before the newest one are dropped.
    LatestRequestWins,
}

/// Issue number of one refresh, handed out by [`WeatherCell::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct WeatherCell {
    tx: watch::Sender<WeatherState>,
    issued: AtomicU64,
    policy: UpdatePolicy,
}

impl Default for WeatherCell {
    fn default() -> Self {
        Self::new(UpdatePolicy::default())
    }
}

impl WeatherCell {
    pub fn new(policy: UpdatePolicy) -> Self {
        let (tx, _) = watch::channel(WeatherState::default());
        Self { tx, issued: AtomicU64::new(0), policy }
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Store a snapshot. Returns `false` if the write was dropped as stale.
    pub fn publish(&self, ticket: Ticket, snapshot: WeatherSnapshot) -> bool {
        self.write(ticket, WeatherState::Loaded(snapshot))
    }

    /// Store a failure reason. Returns `false` if the write was dropped as stale.
    pub fn fail(&self, ticket: Ticket, reason: impl Into<String>) -> bool {
        self.write(ticket, WeatherState::Failed(reason.into()))
    }

    pub fn current(&self) -> WeatherState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WeatherState> {
        self.tx.subscribe()
    }

    fn write(&self, ticket: Ticket, state: WeatherState) -> bool {
        let written = self.tx.send_if_modified(|slot| {
            if self.is_stale(ticket) {
                return false;
            }
            *slot = state;
            true
        });

        if !written {
            debug!(?ticket, "Dropping response from superseded request");
        }
        written
    }

    fn is_stale(&self, ticket: Ticket) -> bool {
        match self.policy {
            UpdatePolicy::LastWriteWins => false,
            UpdatePolicy::LatestRequestWins => ticket.0 < self.issued.load(Ordering::SeqCst),
        }
    }
}
