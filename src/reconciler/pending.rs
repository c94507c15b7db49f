use tracing::{debug, warn};

use super::{Flagged, Keyed, OptimisticList, Refusal};
use crate::api::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The backend accepted the change, `active` is the final flag value.
    Confirmed { active: bool },
    /// The backend rejected the change. `restored` is false when the item
    /// had already left the collection and there was nothing to restore.
    RolledBack { error: ApiError, restored: bool },
    Refused(Refusal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Confirmed,
    RolledBack(ApiError),
    Refused(Refusal),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed,
    /// The write failed, the collection was not touched.
    WriteFailed(ApiError),
    /// The write went through but the collection could not be re-fetched,
    /// the previous collection is still displayed.
    RefreshFailed(ApiError),
    Refused(Refusal),
}

/// A toggle that has been applied locally and awaits the remote verdict.
///
/// Dropping it without settling keeps the optimistic value and frees the
/// item for further mutations.
pub struct PendingToggle<T: Flagged + Clone> {
    list: OptimisticList<T>,
    generation: u64,
    key: T::Key,
    previous: bool,
    settled: bool,
}

impl<T: Flagged + Clone> PendingToggle<T> {
    pub(super) fn new(
        list: OptimisticList<T>,
        generation: u64,
        key: T::Key,
        previous: bool,
    ) -> Self {
        Self {
            list,
            generation,
            key,
            previous,
            settled: false,
        }
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    /// Flag value before the toggle.
    pub fn previous(&self) -> bool {
        self.previous
    }

    pub fn settle(mut self, result: Result<(), ApiError>) -> ToggleOutcome {
        self.settled = true;
        let outcome = match result {
            Ok(()) => ToggleOutcome::Confirmed {
                active: !self.previous,
            },
            Err(error) => {
                let restored = self
                    .list
                    .restore_flag(self.generation, &self.key, self.previous);
                warn!(
                    "[{}] toggle of {:?} failed ({}), restored={}",
                    self.list.name(),
                    self.key,
                    error,
                    restored
                );
                ToggleOutcome::RolledBack { error, restored }
            }
        };
        self.list.release(&self.key, self.generation);
        outcome
    }
}

impl<T: Flagged + Clone> Drop for PendingToggle<T> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(
                "[{}] toggle of {:?} abandoned",
                self.list.name(),
                self.key
            );
            self.list.release(&self.key, self.generation);
        }
    }
}

/// A removal that has been applied locally and awaits the remote verdict.
///
/// Dropping it without settling keeps the item removed.
pub struct PendingRemoval<T: Keyed + Clone> {
    list: OptimisticList<T>,
    generation: u64,
    key: T::Key,
    item: T,
    index: usize,
    anchor: Option<T::Key>,
    settled: bool,
}

impl<T: Keyed + Clone> PendingRemoval<T> {
    pub(super) fn new(
        list: OptimisticList<T>,
        generation: u64,
        item: T,
        index: usize,
        anchor: Option<T::Key>,
    ) -> Self {
        Self {
            list,
            generation,
            key: item.key(),
            item,
            index,
            anchor,
            settled: false,
        }
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    /// The item as it was right before it was removed.
    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn settle(mut self, result: Result<(), ApiError>) -> RemoveOutcome {
        self.settled = true;
        let outcome = match result {
            Ok(()) => RemoveOutcome::Confirmed,
            Err(error) => {
                let reinserted = self.list.reinsert(
                    self.generation,
                    self.item.clone(),
                    self.index,
                    self.anchor.as_ref(),
                );
                warn!(
                    "[{}] removal of {:?} failed ({}), reinserted={}",
                    self.list.name(),
                    self.key,
                    error,
                    reinserted
                );
                RemoveOutcome::RolledBack(error)
            }
        };
        self.list.release(&self.key, self.generation);
        outcome
    }
}

impl<T: Keyed + Clone> Drop for PendingRemoval<T> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(
                "[{}] removal of {:?} abandoned",
                self.list.name(),
                self.key
            );
            self.list.release(&self.key, self.generation);
        }
    }
}

impl<T: Flagged + Clone> std::fmt::Debug for PendingToggle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingToggle")
            .field("list", &self.list.name())
            .field("generation", &self.generation)
            .field("key", &self.key)
            .field("previous", &self.previous)
            .field("settled", &self.settled)
            .finish()
    }
}

impl<T: Keyed + Clone> std::fmt::Debug for PendingRemoval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRemoval")
            .field("list", &self.list.name())
            .field("generation", &self.generation)
            .field("key", &self.key)
            .field("index", &self.index)
            .field("anchor", &self.anchor)
            .field("settled", &self.settled)
            .finish_non_exhaustive()
    }
}
