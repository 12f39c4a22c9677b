//! boardview — client-resident view state for grouped, filterable
//! work-item collections.
//!
//! The engine owns three concerns for one collection scope:
//!
//! * the on-screen [`ViewConfig`](model::ViewConfig) and its state machine
//!   ([`store`]), synchronized best-effort with a remote preference or
//!   shared-view record ([`sync`]);
//! * a race-free algorithm for folding partial item updates into the cached
//!   collection, flat or grouped ([`reconcile::apply_update`]);
//! * deterministic cache-key canonicalization so the read and write paths
//!   always address the same slot ([`cache::key::canonicalize`]).
//!
//! Rendering, routing, transport and authentication live outside the crate;
//! they talk to it through the [`cache::ViewCache`],
//! [`sync::PreferenceClient`] and [`sync::SharedViewClient`] ports.

pub mod cache;
pub mod model;
pub mod reconcile;
pub mod store;
pub mod sync;

pub use cache::key::{canonicalize, ItemQueryParams};
pub use cache::{CacheEntry, InMemoryCache, ViewCache};
pub use model::{
    FilterPatch, FilterSet, GroupBy, ItemTypeFilter, ItemUpdate, OrderBy, PreferencePatch, Scope,
    ScopePreference, SharedView, SharedViewPatch, ViewConfig, ViewConfigPatch, ViewMode, WorkItem,
};
pub use reconcile::{apply_update, CachedItems};
pub use store::{reduce, NoSettings, SettingsPort, ViewAction, ViewStore};
pub use sync::{PreferenceClient, SharedViewClient, SyncError, Synchronizer};
