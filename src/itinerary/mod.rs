//! The itinerary store: saved destinations, persisted write-through.
//!
//! One [`ItineraryStore`] is created per session, after the persisted value
//! has been loaded and before any page reads it. Pages receive it as an
//! `Arc<ItineraryStore>` and mutate it only through [`ItineraryStore::add`],
//! [`ItineraryStore::remove`] and [`ItineraryStore::clear`]. Every effective
//! mutation serializes the whole itinerary to the key-value store before
//! subscribers are told about it.
//!
//! Separate processes sharing a root are not coordinated: the last write wins.

pub mod persist;
pub mod types;

use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::error::Result;
use crate::storage::KeyValueStore;

pub use persist::{DefaultReason, LoadOutcome};
pub use types::{Itinerary, SavedDestination};

type Listener = Arc<dyn Fn(&Itinerary) + Send + Sync>;

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Listener)>,
}

/// Read the itinerary persisted under `key`, or an empty one.
///
/// Missing, unreadable and malformed values all yield the empty itinerary;
/// the reason is logged here and never surfaced to the caller.
pub fn load_itinerary(storage: &dyn KeyValueStore, key: &str) -> Itinerary {
    match persist::read_itinerary(storage, key) {
        LoadOutcome::Loaded(itinerary) => {
            tracing::debug!(key, entries = itinerary.len(), "loaded itinerary");
            itinerary
        }
        LoadOutcome::Defaulted(DefaultReason::Missing) => {
            tracing::debug!(key, "no saved itinerary, starting empty");
            Itinerary::new()
        }
        LoadOutcome::Defaulted(reason) => {
            tracing::warn!(key, "{reason}; starting with an empty itinerary");
            Itinerary::new()
        }
    }
}

/// Single source of truth for saved destinations.
pub struct ItineraryStore {
    storage: Box<dyn KeyValueStore>,
    key: String,
    state: Mutex<Itinerary>,
    listeners: Arc<Mutex<Listeners>>,
    last_write_error: Mutex<Option<String>>,
}

impl ItineraryStore {
    /// Load the persisted itinerary and build the store around it.
    pub fn initialize(storage: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        let key = key.into();
        let itinerary = load_itinerary(&storage, &key);
        Self {
            storage: Box::new(storage),
            key,
            state: Mutex::new(itinerary),
            listeners: Arc::new(Mutex::new(Listeners::default())),
            last_write_error: Mutex::new(None),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Snapshot of the current itinerary.
    pub fn current_itinerary(&self) -> Itinerary {
        self.state.lock().clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.state.lock().contains(id)
    }

    pub fn len(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Append `item` unless its id is already saved.
    ///
    /// A duplicate add is a silent no-op; the first saved entry is kept.
    /// An `Err` means only that persisting failed: the in-memory itinerary
    /// already holds the item and subscribers have been notified.
    pub fn add(&self, item: SavedDestination) -> Result<()> {
        let id = item.id.clone();
        self.mutate("add", &id, move |itinerary| itinerary.insert(item))
    }

    /// Remove the entry with `id`, if present.
    pub fn remove(&self, id: &str) -> Result<()> {
        self.mutate("remove", id, |itinerary| itinerary.remove(id))
    }

    /// Remove every entry.
    ///
    /// Always writes the empty itinerary and notifies, even when nothing
    /// was loaded, so a stored value that could not be read is replaced.
    pub fn clear(&self) -> Result<()> {
        self.mutate("clear", "*", |itinerary| {
            itinerary.clear();
            true
        })
    }

    /// Message of the most recent failed write, cleared by the next successful one.
    pub fn last_write_error(&self) -> Option<String> {
        self.last_write_error.lock().clone()
    }

    /// Register a listener called with the new itinerary after each change.
    ///
    /// Listeners run synchronously on the mutating thread, after the write,
    /// and may read the store. The listener is removed when the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Itinerary) + Send + Sync + 'static,
    {
        let mut listeners = self.listeners.lock();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    fn mutate<F>(&self, operation: &'static str, id: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Itinerary) -> bool,
    {
        // The state lock is held across the write so writes land in the
        // same order as the mutations that produced them.
        let (snapshot, written) = {
            let mut state = self.state.lock();
            if !apply(&mut state) {
                tracing::debug!(operation, id, "itinerary unchanged");
                return Ok(());
            }
            let snapshot = state.clone();
            let written = persist::encode(&snapshot)
                .and_then(|text| self.storage.write_text(&self.key, &text));
            (snapshot, written)
        };

        match &written {
            Ok(()) => {
                *self.last_write_error.lock() = None;
                tracing::debug!(operation, id, entries = snapshot.len(), "itinerary saved");
            }
            Err(e) => {
                tracing::warn!(operation, id, "failed to persist itinerary: {e}");
                *self.last_write_error.lock() = Some(e.to_string());
            }
        }

        self.notify(&snapshot);
        written
    }

    fn notify(&self, snapshot: &Itinerary) {
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }
}

impl std::fmt::Debug for ItineraryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItineraryStore")
            .field("key", &self.key)
            .field("itinerary", &*self.state.lock())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Handle for a registered listener; dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Mutex<Listeners>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.lock().entries.retain(|(id, _)| *id != self.id);
        }
    }
}
