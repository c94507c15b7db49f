//! Optimistic list reconciliation.
//!
//! An [`OptimisticList`] owns one ordered collection shown to the user and
//! applies user mutations to it before the backend confirms them. Every
//! mutation remembers the id of the item it touched and the value it
//! replaced, so a failed remote call restores exactly that item no matter
//! what happened to the rest of the collection in the meantime.
//!
//! Three mutation shapes are supported:
//! - toggle: flip a boolean flag, undo the flip on failure;
//! - remove: drop the item, put it back on failure;
//! - write-then-refresh: no local patch at all, the collection is
//!   re-fetched only after the remote write succeeded.
//!
//! Remote failures never escape: they are logged and reported back as an
//! outcome value.

mod pending;

pub use pending::{PendingRemoval, PendingToggle, RefreshOutcome, RemoveOutcome, ToggleOutcome};

use crate::api::ApiError;
use std::collections::HashSet;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Items that can be addressed by a stable id.
pub trait Keyed {
    type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;

    fn key(&self) -> Self::Key;
}

/// Items carrying a boolean flag a user can toggle.
pub trait Flagged: Keyed {
    fn flag(&self) -> bool;

    fn set_flag(&mut self, value: bool);
}

/// Whether the collection reflects a successful fetch.
///
/// A failed fetch leaves the collection empty, `Failed` is what tells it
/// apart from a backend that really returned nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Failed(ApiError),
}

/// Why a mutation was not started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// No item with the requested id is in the collection.
    NotFound,
    /// A remote call for the same id has not resolved yet.
    Busy,
}

struct Inner<T: Keyed> {
    items: Vec<T>,
    load_state: LoadState,
    in_flight: HashSet<T::Key>,
    // Bumped by `clear`, mutations started before it must not write back.
    generation: u64,
}

/// Shared handle to one optimistically updated collection.
///
/// Cloning is cheap and every clone sees the same collection. The lock is
/// never held across an await point.
pub struct OptimisticList<T: Keyed> {
    name: &'static str,
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T: Keyed> Clone for OptimisticList<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            inner: self.inner.clone(),
        }
    }
}

impl<T: Keyed + Clone> OptimisticList<T> {
    /// `name` only shows up in logs.
    pub fn new(name: &'static str) -> Self {
        Self::with_items(name, Vec::new())
    }

    pub fn with_items(name: &'static str, items: Vec<T>) -> Self {
        let load_state = if items.is_empty() {
            LoadState::Idle
        } else {
            LoadState::Loaded
        };
        Self {
            name,
            inner: Arc::new(Mutex::new(Inner {
                items,
                load_state,
                in_flight: HashSet::new(),
                generation: 0,
            })),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Locks the collection only if it has not been cleared since
    /// `generation` was taken.
    fn lock_generation(&self, generation: u64) -> Option<MutexGuard<'_, Inner<T>>> {
        let inner = self.lock();
        if inner.generation == generation {
            Some(inner)
        } else {
            debug!("[{}] collection cleared, stale result dropped", self.name);
            None
        }
    }

    /// Snapshot of the displayed collection.
    pub fn items(&self) -> Vec<T> {
        self.lock().items.clone()
    }

    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.lock().items.iter().find(|i| &i.key() == key).cloned()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.lock().items.iter().any(|i| &i.key() == key)
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    pub fn load_state(&self) -> LoadState {
        self.lock().load_state.clone()
    }

    pub fn is_in_flight(&self, key: &T::Key) -> bool {
        self.lock().in_flight.contains(key)
    }

    /// Replaces the whole collection with fresh server data.
    pub fn replace_all(&self, items: Vec<T>) {
        let mut inner = self.lock();
        inner.items = items;
        inner.load_state = LoadState::Loaded;
    }

    /// Drops everything, e.g. when the user who owned the data signed out.
    /// Loads and mutations still in flight no longer touch the collection
    /// when they resolve.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.items.clear();
        inner.in_flight.clear();
        inner.load_state = LoadState::Idle;
        inner.generation += 1;
    }

    /// Fetches the collection. On failure the displayed collection becomes
    /// empty and the error is kept in [`LoadState::Failed`].
    pub async fn load<F, Fut>(&self, fetch: F) -> LoadState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let generation = {
            let mut inner = self.lock();
            inner.load_state = LoadState::Loading;
            inner.generation
        };

        let result = fetch().await;
        let Some(mut inner) = self.lock_generation(generation) else {
            return LoadState::Idle;
        };
        match result {
            Ok(items) => {
                debug!("[{}] loaded {} items", self.name, items.len());
                inner.items = items;
                inner.load_state = LoadState::Loaded;
                LoadState::Loaded
            }
            Err(err) => {
                warn!("[{}] failed to load: {}", self.name, err);
                inner.items.clear();
                inner.load_state = LoadState::Failed(err.clone());
                LoadState::Failed(err)
            }
        }
    }

    /// Removes the item right away and hands back what is needed to put it
    /// back if the remote call fails.
    pub fn begin_remove(&self, key: &T::Key) -> Result<PendingRemoval<T>, Refusal> {
        let mut inner = self.lock();
        if inner.in_flight.contains(key) {
            debug!("[{}] {:?} busy, removal refused", self.name, key);
            return Err(Refusal::Busy);
        }
        let index = inner
            .items
            .iter()
            .position(|i| &i.key() == key)
            .ok_or(Refusal::NotFound)?;

        let anchor = index
            .checked_sub(1)
            .map(|prev| inner.items[prev].key());
        let item = inner.items.remove(index);
        inner.in_flight.insert(key.clone());
        debug!("[{}] optimistically removed {:?}", self.name, key);

        Ok(PendingRemoval::new(
            self.clone(),
            inner.generation,
            item,
            index,
            anchor,
        ))
    }

    /// Removes the item, then runs the remote call and undoes the removal
    /// if the call fails.
    pub async fn remove<F, Fut>(&self, key: &T::Key, remote: F) -> RemoveOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let pending = match self.begin_remove(key) {
            Ok(pending) => pending,
            Err(refusal) => return RemoveOutcome::Refused(refusal),
        };
        let result = remote().await;
        pending.settle(result)
    }

    /// Non-optimistic mutation: the collection is untouched until `write`
    /// succeeds, and is then replaced wholesale by `refetch`.
    pub async fn write_then_refresh<W, WFut, R, RFut>(
        &self,
        key: &T::Key,
        write: W,
        refetch: R,
    ) -> RefreshOutcome
    where
        W: FnOnce() -> WFut,
        WFut: Future<Output = Result<(), ApiError>>,
        R: FnOnce() -> RFut,
        RFut: Future<Output = Result<Vec<T>, ApiError>>,
    {
        let generation = {
            let mut inner = self.lock();
            if !inner.in_flight.insert(key.clone()) {
                debug!("[{}] {:?} busy, write refused", self.name, key);
                return RefreshOutcome::Refused(Refusal::Busy);
            }
            inner.generation
        };

        let outcome = match write().await {
            Err(err) => {
                warn!("[{}] write for {:?} failed: {}", self.name, key, err);
                RefreshOutcome::WriteFailed(err)
            }
            Ok(()) => match refetch().await {
                Ok(items) => {
                    if let Some(mut inner) = self.lock_generation(generation) {
                        inner.items = items;
                        inner.load_state = LoadState::Loaded;
                    }
                    RefreshOutcome::Refreshed
                }
                Err(err) => {
                    warn!(
                        "[{}] write for {:?} succeeded but refresh failed: {}",
                        self.name, key, err
                    );
                    RefreshOutcome::RefreshFailed(err)
                }
            },
        };

        self.release(key, generation);
        outcome
    }

    fn release(&self, key: &T::Key, generation: u64) {
        if let Some(mut inner) = self.lock_generation(generation) {
            inner.in_flight.remove(key);
        }
    }

    /// Puts a removed item back: right after its former predecessor when
    /// that one is still around, otherwise at its old index clamped to the
    /// current length. Returns false if an item with the same id showed up
    /// in the meantime or the collection was cleared.
    fn reinsert(&self, generation: u64, item: T, index: usize, anchor: Option<&T::Key>) -> bool {
        let Some(mut inner) = self.lock_generation(generation) else {
            return false;
        };
        let key = item.key();
        if inner.items.iter().any(|i| i.key() == key) {
            return false;
        }
        let position = match anchor {
            None => 0,
            Some(anchor) => match inner.items.iter().position(|i| &i.key() == anchor) {
                Some(p) => p + 1,
                None => index.min(inner.items.len()),
            },
        };
        inner.items.insert(position, item);
        true
    }
}

impl<T: Flagged + Clone> OptimisticList<T> {
    /// Flips the item's flag right away and hands back what is needed to
    /// restore it if the remote call fails.
    pub fn begin_toggle(&self, key: &T::Key) -> Result<PendingToggle<T>, Refusal> {
        let mut inner = self.lock();
        if inner.in_flight.contains(key) {
            debug!("[{}] {:?} busy, toggle refused", self.name, key);
            return Err(Refusal::Busy);
        }
        let item = inner
            .items
            .iter_mut()
            .find(|i| &i.key() == key)
            .ok_or(Refusal::NotFound)?;

        let previous = item.flag();
        item.set_flag(!previous);
        inner.in_flight.insert(key.clone());
        debug!(
            "[{}] optimistically toggled {:?}: {} -> {}",
            self.name, key, previous, !previous
        );

        Ok(PendingToggle::new(
            self.clone(),
            inner.generation,
            key.clone(),
            previous,
        ))
    }

    /// Toggles the flag, then runs `remote` with the value the flag had
    /// *before* the toggle (false means "activate", true "deactivate").
    pub async fn toggle<F, Fut>(&self, key: &T::Key, remote: F) -> ToggleOutcome
    where
        F: FnOnce(bool) -> Fut,
        Fut: Future<Output = Result<(), ApiError>>,
    {
        let pending = match self.begin_toggle(key) {
            Ok(pending) => pending,
            Err(refusal) => return ToggleOutcome::Refused(refusal),
        };
        let result = remote(pending.previous()).await;
        pending.settle(result)
    }

    /// Sets the flag of the item with `key`, wherever it currently sits.
    fn restore_flag(&self, generation: u64, key: &T::Key, value: bool) -> bool {
        let Some(mut inner) = self.lock_generation(generation) else {
            return false;
        };
        let Some(item) = inner.items.iter_mut().find(|i| &i.key() == key) else {
            return false;
        };
        item.set_flag(value);
        true
    }
}
