//! Key-addressed cache port and a reference in-memory implementation.
//!
//! The engine never refetches on its own: optimistic patches always call
//! `mutate` with `revalidate = false` so the just-written value is not
//! immediately clobbered by a refetch. `revalidate = true` only marks the
//! slot stale for an external fetch layer.

pub mod key;

use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::model::{ScopePreference, SharedView};
use crate::reconcile::CachedItems;

/// Everything this engine stores under a cache key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CacheEntry {
    Preference(ScopePreference),
    SharedView(SharedView),
    Items(CachedItems),
}

/// Generic key-addressed cache.
///
/// `mutate` applies a functional update against the latest cached value —
/// callers must merge, never replace unconditionally, except for the
/// wholesale-replace operations designed that way (rehydrate, promote).
/// An updater returning `None` leaves an absent slot absent.
pub trait ViewCache: Send + Sync {
    fn read(&self, key: &str) -> Option<CacheEntry>;
    fn mutate(
        &self,
        key: &str,
        updater: &dyn Fn(Option<CacheEntry>) -> Option<CacheEntry>,
        revalidate: bool,
    );
}

struct Slot {
    entry: CacheEntry,
    stale: bool,
}

/// In-memory `ViewCache` keyed by string, suitable for tests and for hosts
/// without their own cache layer.
#[derive(Default)]
pub struct InMemoryCache {
    slots: Mutex<HashMap<String, Slot>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache::default()
    }

    /// Seed a slot, e.g. with freshly fetched remote data
    pub fn insert(&self, key: impl Into<String>, entry: CacheEntry) {
        self.slots
            .lock()
            .unwrap()
            .insert(key.into(), Slot { entry, stale: false });
    }

    /// Whether the slot has been marked for revalidation
    pub fn is_stale(&self, key: &str) -> bool {
        self.slots
            .lock()
            .unwrap()
            .get(key)
            .is_some_and(|slot| slot.stale)
    }
}

impl ViewCache for InMemoryCache {
    fn read(&self, key: &str) -> Option<CacheEntry> {
        self.slots
            .lock()
            .unwrap()
            .get(key)
            .map(|slot| slot.entry.clone())
    }

    fn mutate(
        &self,
        key: &str,
        updater: &dyn Fn(Option<CacheEntry>) -> Option<CacheEntry>,
        revalidate: bool,
    ) {
        let mut slots = self.slots.lock().unwrap();
        let prior = slots.get(key).map(|slot| slot.entry.clone());
        match updater(prior) {
            Some(entry) => {
                slots.insert(
                    key.to_string(),
                    Slot {
                        entry,
                        stale: revalidate,
                    },
                );
            }
            None => {
                if revalidate {
                    if let Some(slot) = slots.get_mut(key) {
                        slot.stale = true;
                    }
                }
            }
        }
    }
}
