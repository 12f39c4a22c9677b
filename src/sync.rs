//! Best-effort persistence of view configuration.
//!
//! Every operation patches the relevant cache entry synchronously from the
//! freshest in-memory state, then fires the remote write on a background
//! task. Nothing blocks the caller and nothing rolls back on failure; a
//! failed write is logged and local state stays ahead of the server until
//! the next rehydrate. Writes are last-write-wins — there is no
//! compare-and-swap on the remote records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::{key, CacheEntry, ViewCache};
use crate::model::{
    PreferencePatch, Scope, ScopePreference, SharedViewPatch, ViewConfig, ViewConfigPatch,
};

/// Error type for remote persistence
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("preference write rejected: {0}")]
    Preference(String),
    #[error("shared view write rejected: {0}")]
    SharedView(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Remote preference endpoint: PATCH semantics on the per-(user, project)
/// record carrying `view_props` / `default_props`.
#[async_trait]
pub trait PreferenceClient: Send + Sync {
    async fn patch_preference(&self, scope: &Scope, patch: PreferencePatch)
    -> Result<(), SyncError>;
}

/// Remote shared-view endpoint: PATCH semantics on the record carrying
/// `query_data`.
#[async_trait]
pub trait SharedViewClient: Send + Sync {
    async fn patch_view(
        &self,
        scope: &Scope,
        view_id: &str,
        patch: SharedViewPatch,
    ) -> Result<(), SyncError>;
}

/// Fire-and-forget persistence for a view configuration scope.
///
/// Must be used from within a tokio runtime; remote writes are spawned.
#[derive(Clone)]
pub struct Synchronizer {
    preferences: Arc<dyn PreferenceClient>,
    views: Arc<dyn SharedViewClient>,
    cache: Arc<dyn ViewCache>,
}

impl Synchronizer {
    pub fn new(
        preferences: Arc<dyn PreferenceClient>,
        views: Arc<dyn SharedViewClient>,
        cache: Arc<dyn ViewCache>,
    ) -> Self {
        Synchronizer {
            preferences,
            views,
            cache,
        }
    }

    pub fn cache(&self) -> &Arc<dyn ViewCache> {
        &self.cache
    }

    /// Persist the full configuration as the scope's last-used view
    pub fn save_default_view(&self, scope: &Scope, state: &ViewConfig) {
        let props = ViewConfigPatch::from_config(state);
        self.patch_cached_view_props(scope, &props);
        self.spawn_preference_write(
            scope.clone(),
            PreferencePatch {
                view_props: Some(props),
                default_props: None,
            },
        );
    }

    /// Persist only the filters, into the personal preference record —
    /// used when no shared view is active
    pub fn save_filter_overlay(&self, scope: &Scope, state: &ViewConfig) {
        self.patch_cached_view_props(scope, &ViewConfigPatch::from_config(state));
        self.spawn_preference_write(
            scope.clone(),
            PreferencePatch {
                view_props: Some(ViewConfigPatch {
                    filters: Some(state.filters.clone()),
                    ..Default::default()
                }),
                default_props: None,
            },
        );
    }

    /// Persist the filters into the active shared view's `query_data`, so
    /// collaborative views are edited in place
    pub fn save_shared_view_filters(&self, view_id: &str, scope: &Scope, state: &ViewConfig) {
        self.patch_cached_shared_view(view_id, state);
        let client = Arc::clone(&self.views);
        let scope = scope.clone();
        let view_id = view_id.to_string();
        let patch = SharedViewPatch {
            query_data: state.filters.clone(),
        };
        tokio::spawn(async move {
            match client.patch_view(&scope, &view_id, patch).await {
                Ok(()) => debug!(view_id = %view_id, "shared view filters saved"),
                Err(e) => warn!(view_id = %view_id, "shared view write failed: {e}"),
            }
        });
    }

    /// Write the configuration as both the last-used and the default view.
    /// The cached preference entry is replaced wholesale (both props change
    /// together) and marked for revalidation once the write lands.
    pub fn promote_to_default(&self, scope: &Scope, state: &ViewConfig) {
        let props = ViewConfigPatch::from_config(state);
        let replacement = ScopePreference {
            view_props: props.clone(),
            default_props: props.clone(),
        };
        let cache_key = key::user_project_view(&scope.project_id);
        self.cache.mutate(
            &cache_key,
            &move |_| Some(CacheEntry::Preference(replacement.clone())),
            false,
        );

        let client = Arc::clone(&self.preferences);
        let cache = Arc::clone(&self.cache);
        let scope = scope.clone();
        let patch = PreferencePatch {
            view_props: Some(props.clone()),
            default_props: Some(props),
        };
        tokio::spawn(async move {
            match client.patch_preference(&scope, patch).await {
                Ok(()) => {
                    debug!(project_id = %scope.project_id, "default view promoted");
                    cache.mutate(&key::user_project_view(&scope.project_id), &|prior| prior, true);
                }
                Err(e) => {
                    warn!(project_id = %scope.project_id, "default view promotion failed: {e}")
                }
            }
        });
    }

    /// Optimistically fold the freshest state into the cached preference
    /// record. An entry that was never fetched stays absent.
    pub(crate) fn patch_cached_view_props(&self, scope: &Scope, props: &ViewConfigPatch) {
        let props = props.clone();
        self.cache.mutate(
            &key::user_project_view(&scope.project_id),
            &move |prior| match prior {
                Some(CacheEntry::Preference(mut pref)) => {
                    pref.view_props = props.clone();
                    Some(CacheEntry::Preference(pref))
                }
                other => other,
            },
            false,
        );
    }

    /// Optimistically fold the freshest filters into the cached shared view
    pub(crate) fn patch_cached_shared_view(&self, view_id: &str, state: &ViewConfig) {
        let filters = state.filters.clone();
        self.cache.mutate(
            &key::view_details(view_id),
            &move |prior| match prior {
                Some(CacheEntry::SharedView(mut view)) => {
                    view.query_data = filters.clone();
                    Some(CacheEntry::SharedView(view))
                }
                other => other,
            },
            false,
        );
    }

    fn spawn_preference_write(&self, scope: Scope, patch: PreferencePatch) {
        let client = Arc::clone(&self.preferences);
        tokio::spawn(async move {
            match client.patch_preference(&scope, patch).await {
                Ok(()) => debug!(project_id = %scope.project_id, "view preference saved"),
                Err(e) => warn!(project_id = %scope.project_id, "preference write failed: {e}"),
            }
        });
    }
}
