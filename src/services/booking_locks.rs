use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::matches::CandidateMatch;

/// In-process locks keyed by court and team id.
///
/// A booking holds the lock of every resource it occupies for the whole
/// fetch -> check -> insert sequence. Two bookings that can clash share a
/// court or a team, so they run one after the other.
#[derive(Debug, Default)]
pub struct BookingLocks {
    locks: Mutex<HashMap<Uuid, Arc<AsyncMutex<()>>>>,
}

/// Held until the booking is persisted or rejected
#[derive(Debug)]
pub struct BookingGuard {
    _guards: Vec<OwnedMutexGuard<()>>,
}

impl BookingLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn handles(&self, keys: &BTreeSet<Uuid>) -> Vec<Arc<AsyncMutex<()>>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // Entries only referenced by the map are idle
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        keys.iter()
            .map(|key| locks.entry(*key).or_default().clone())
            .collect()
    }

    /// Locks are taken in ascending id order so overlapping key sets cannot deadlock
    pub async fn acquire(&self, keys: impl IntoIterator<Item = Uuid>) -> BookingGuard {
        let keys: BTreeSet<Uuid> = keys.into_iter().collect();
        let mut guards = Vec::with_capacity(keys.len());
        for lock in self.handles(&keys) {
            guards.push(lock.lock_owned().await);
        }
        BookingGuard { _guards: guards }
    }

    pub async fn acquire_for(&self, candidate: &CandidateMatch) -> BookingGuard {
        let keys = candidate
            .court_id
            .into_iter()
            .chain([candidate.team1_id, candidate.team2_id]);
        self.acquire(keys).await
    }

    pub fn tracked_keys(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
