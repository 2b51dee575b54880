#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Collection system that records every diagnosis decoded across rounds.
//!
//! The system watches world events for [`Event::GroupFound`], adds newly seen
//! diagnoses to a persistent collection, and announces each addition with
//! [`Event::DiagnosisUnlocked`]. Storage failures are logged and never stop
//! play; the in-memory collection stays authoritative for the session. A
//! store that cannot be read at startup is never written to afterwards.

mod store;

use gene_link_core::{Diagnosis, Event};

pub use store::{JsonFileStore, MemoryStore, StoreError, UnlockStore, DEFAULT_STORE_KEY};

/// Ordered, name-unique set of decoded diagnoses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnlockedCollection {
    entries: Vec<Diagnosis>,
}

impl UnlockedCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from stored entries, keeping the first entry per name.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = Diagnosis>) -> Self {
        let mut collection = Self::new();
        for diagnosis in entries {
            if !collection.insert(diagnosis) {
                log::debug!("dropping duplicate stored unlock");
            }
        }
        collection
    }

    /// Appends the diagnosis unless one with the same name is already present.
    ///
    /// Returns `true` when the collection grew.
    pub fn insert(&mut self, diagnosis: Diagnosis) -> bool {
        if self.contains(diagnosis.name()) {
            return false;
        }
        self.entries.push(diagnosis);
        true
    }

    /// Reports whether a diagnosis with the provided name has been unlocked.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name() == name)
    }

    /// Iterates the unlocked diagnoses in unlock order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnosis> {
        self.entries.iter()
    }

    /// Unlocked diagnoses in unlock order.
    #[must_use]
    pub fn as_slice(&self) -> &[Diagnosis] {
        &self.entries
    }

    /// Number of unlocked diagnoses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether nothing has been unlocked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Pure system maintaining the unlocked collection on top of a store.
#[derive(Debug)]
pub struct Unlocks<S> {
    collection: UnlockedCollection,
    store: S,
    persist: bool,
}

impl<S: UnlockStore> Unlocks<S> {
    /// Loads the collection from the store.
    ///
    /// When the store cannot be read the system starts empty and keeps the
    /// collection in memory only, leaving the unreadable contents untouched.
    #[must_use]
    pub fn load(store: S) -> Self {
        let (collection, persist) = match store.load() {
            Ok(entries) => (UnlockedCollection::from_entries(entries), true),
            Err(error) => {
                log::warn!("unlocked collection unavailable, continuing in memory only: {error}");
                (UnlockedCollection::new(), false)
            }
        };
        log::debug!("loaded {} unlocked diagnoses", collection.len());
        Self {
            collection,
            store,
            persist,
        }
    }

    /// Reports whether additions are written back to the store.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persist
    }

    /// Current unlocked collection.
    #[must_use]
    pub fn collection(&self) -> &UnlockedCollection {
        &self.collection
    }

    /// Backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consumes world events and emits [`Event::DiagnosisUnlocked`] for new entries.
    ///
    /// The full collection is written back once per call when anything was added
    /// and the store was readable at startup.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        let mut grew = false;

        for event in events {
            let Event::GroupFound { diagnosis, .. } = event else {
                continue;
            };
            if !self.collection.insert(diagnosis.clone()) {
                continue;
            }
            log::info!("unlocked {}", diagnosis.name());
            grew = true;
            out.push(Event::DiagnosisUnlocked {
                name: diagnosis.name().to_owned(),
            });
        }

        if grew && self.persist {
            if let Err(error) = self.store.save(self.collection.as_slice()) {
                log::warn!("failed to persist unlocked collection: {error}");
            }
        }
    }
}
