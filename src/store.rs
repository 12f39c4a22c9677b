//! View configuration state machine.
//!
//! `reduce` is a pure total function over named actions; `ViewStore` wraps
//! it with the dispatch surface consumers use. Transitions are synchronous
//! and immediate — the sequence of states observed by the UI exactly
//! matches dispatch order, while remote writes complete in any order.

use std::sync::Arc;

use crate::model::{
    FilterPatch, GroupBy, OrderBy, Scope, ScopePreference, SharedView, ViewConfig,
    ViewConfigPatch, ViewMode,
};
use crate::sync::Synchronizer;

/// Local durable settings read on rehydrate. Injected so the store stays a
/// pure function of its inputs under test.
pub trait SettingsPort: Send + Sync {
    fn sidebar_collapsed(&self) -> bool;
}

/// Settings port for hosts with no durable local settings
pub struct NoSettings;

impl SettingsPort for NoSettings {
    fn sidebar_collapsed(&self) -> bool {
        false
    }
}

/// Named state transitions. Single-field payloads carry `Option` so a
/// missing value falls back to the compiled default for that field.
#[derive(Debug, Clone)]
pub enum ViewAction {
    /// Full replacement: payload overlaid on compiled defaults
    Rehydrate(ViewConfigPatch),
    /// Kanban forces grouping by state in the same transition
    SetViewMode(ViewMode),
    SetGroupBy(Option<GroupBy>),
    SetOrderBy(Option<OrderBy>),
    SetShowEmptyGroups(Option<bool>),
    SetFilters(FilterPatch),
    /// Full replacement, not a merge: fields absent from the payload revert
    /// to compiled defaults rather than retaining their prior value
    ResetToDefault(ViewConfigPatch),
}

/// Compute the next configuration. Total — no action can fail.
pub fn reduce(state: &ViewConfig, action: &ViewAction) -> ViewConfig {
    match action {
        ViewAction::Rehydrate(payload) | ViewAction::ResetToDefault(payload) => {
            let mut next = payload.apply_over(&ViewConfig::default());
            // local-only flag, not part of the remote payload
            next.sidebar_collapsed = state.sidebar_collapsed;
            next
        }
        ViewAction::SetViewMode(mode) => {
            let mut next = state.clone();
            next.view_mode = *mode;
            if *mode == ViewMode::Kanban {
                next.group_by = Some(GroupBy::State);
            }
            next
        }
        ViewAction::SetGroupBy(property) => {
            let mut next = state.clone();
            next.group_by = *property;
            next
        }
        ViewAction::SetOrderBy(property) => {
            let mut next = state.clone();
            next.order_by = property.unwrap_or_default();
            next
        }
        ViewAction::SetShowEmptyGroups(show) => {
            let mut next = state.clone();
            next.show_empty_groups = show.unwrap_or(true);
            next
        }
        ViewAction::SetFilters(patch) => {
            let mut next = state.clone();
            patch.merge_into(&mut next.filters);
            next
        }
    }
}

/// Holds the live configuration for one (workspace, project[, shared view])
/// scope and persists every mutation best-effort.
///
/// Order inside every persisting mutator: local state first, optimistic
/// cache patch second, remote write last — rapid sequential edits always
/// see a monotonically advancing local picture.
pub struct ViewStore {
    scope: Scope,
    state: ViewConfig,
    default_props: ViewConfigPatch,
    settings: Arc<dyn SettingsPort>,
    sync: Synchronizer,
}

impl ViewStore {
    /// Create a store with compiled defaults; call `rehydrate` once remote
    /// preference data arrives.
    pub fn new(scope: Scope, settings: Arc<dyn SettingsPort>, sync: Synchronizer) -> Self {
        ViewStore {
            scope,
            state: ViewConfig::default(),
            default_props: ViewConfigPatch::default(),
            settings,
            sync,
        }
    }

    // --- read accessors ---

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn config(&self) -> &ViewConfig {
        &self.state
    }

    pub fn view_mode(&self) -> ViewMode {
        self.state.view_mode
    }

    pub fn group_by(&self) -> Option<GroupBy> {
        self.state.group_by
    }

    pub fn order_by(&self) -> OrderBy {
        self.state.order_by
    }

    pub fn show_empty_groups(&self) -> bool {
        self.state.show_empty_groups
    }

    pub fn filters(&self) -> &crate::model::FilterSet {
        &self.state.filters
    }

    // --- mutators ---

    /// Replace state with remote data: `view_props` as the base, filters
    /// overlaid by the shared view's `query_data` when one is active. The
    /// sidebar flag is re-read from the settings port.
    pub fn rehydrate(&mut self, preference: &ScopePreference, shared_view: Option<&SharedView>) {
        let mut payload = preference.view_props.clone();
        if let Some(view) = shared_view {
            let base = payload.filters.take().unwrap_or_default();
            payload.filters = Some(base.overlaid(&view.query_data));
        }
        self.state = reduce(&self.state, &ViewAction::Rehydrate(payload));
        self.state.sidebar_collapsed = self.settings.sidebar_collapsed();
        self.default_props = preference.default_props.clone();
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.state = reduce(&self.state, &ViewAction::SetViewMode(mode));
        self.sync.save_default_view(&self.scope, &self.state);
    }

    pub fn set_group_by(&mut self, property: Option<GroupBy>) {
        self.state = reduce(&self.state, &ViewAction::SetGroupBy(property));
        self.sync.save_default_view(&self.scope, &self.state);
    }

    pub fn set_order_by(&mut self, property: OrderBy) {
        self.state = reduce(&self.state, &ViewAction::SetOrderBy(Some(property)));
        self.sync.save_default_view(&self.scope, &self.state);
    }

    pub fn set_show_empty_groups(&mut self, show: bool) {
        self.state = reduce(&self.state, &ViewAction::SetShowEmptyGroups(Some(show)));
        self.sync.save_default_view(&self.scope, &self.state);
    }

    /// Merge a filter patch. When a shared view is active the filters are
    /// persisted to its record instead of the personal preference. With
    /// `persist = false` only the local state and cache entries advance.
    pub fn set_filters(&mut self, patch: FilterPatch, persist: bool) {
        self.state = reduce(&self.state, &ViewAction::SetFilters(patch));
        let props = ViewConfigPatch::from_config(&self.state);
        match self.scope.view_id.clone() {
            Some(view_id) => {
                self.sync.patch_cached_view_props(&self.scope, &props);
                if persist {
                    self.sync
                        .save_shared_view_filters(&view_id, &self.scope, &self.state);
                } else {
                    self.sync.patch_cached_shared_view(&view_id, &self.state);
                }
            }
            None => {
                if persist {
                    self.sync.save_filter_overlay(&self.scope, &self.state);
                } else {
                    self.sync.patch_cached_view_props(&self.scope, &props);
                }
            }
        }
    }

    /// Restore the scope's default configuration (full replacement) and
    /// persist it as the last-used view.
    pub fn reset_to_default(&mut self) {
        let payload = self.default_props.clone();
        self.state = reduce(&self.state, &ViewAction::ResetToDefault(payload));
        self.sync.save_default_view(&self.scope, &self.state);
    }

    /// Make the current configuration the scope's default as well
    pub fn promote_to_default(&self) {
        self.sync.promote_to_default(&self.scope, &self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FilterSet, ItemTypeFilter};
    use pretty_assertions::assert_eq;

    #[test]
    fn kanban_forces_state_grouping_in_one_transition() {
        let state = ViewConfig {
            group_by: Some(GroupBy::Priority),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::SetViewMode(ViewMode::Kanban));
        // no observable intermediate: one reduce yields both fields
        assert_eq!(next.view_mode, ViewMode::Kanban);
        assert_eq!(next.group_by, Some(GroupBy::State));
    }

    #[test]
    fn non_kanban_mode_leaves_grouping_alone() {
        let state = ViewConfig {
            group_by: Some(GroupBy::Priority),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::SetViewMode(ViewMode::Calendar));
        assert_eq!(next.group_by, Some(GroupBy::Priority));
    }

    #[test]
    fn missing_payloads_fall_back_to_compiled_defaults() {
        let state = ViewConfig {
            group_by: Some(GroupBy::Labels),
            order_by: OrderBy::Priority,
            show_empty_groups: false,
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::SetGroupBy(None));
        assert_eq!(next.group_by, None);
        let next = reduce(&next, &ViewAction::SetOrderBy(None));
        assert_eq!(next.order_by, OrderBy::CreatedAtDesc);
        let next = reduce(&next, &ViewAction::SetShowEmptyGroups(None));
        assert!(next.show_empty_groups);
    }

    #[test]
    fn set_filters_coerces_empty_to_null() {
        let state = ViewConfig {
            filters: FilterSet {
                labels: Some(vec!["bug".into()]),
                ..Default::default()
            },
            ..Default::default()
        };
        let patch = FilterPatch {
            labels: Some(vec![]),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::SetFilters(patch));
        assert_eq!(next.filters.labels, None);
    }

    #[test]
    fn set_filters_merges_only_present_keys() {
        let state = ViewConfig {
            filters: FilterSet {
                state: Some(vec!["todo".into()]),
                item_type: Some(ItemTypeFilter::Active),
                ..Default::default()
            },
            ..Default::default()
        };
        let patch = FilterPatch {
            priority: Some(vec!["high".into()]),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::SetFilters(patch));
        assert_eq!(next.filters.state, Some(vec!["todo".to_string()]));
        assert_eq!(next.filters.priority, Some(vec!["high".to_string()]));
        assert_eq!(next.filters.item_type, Some(ItemTypeFilter::Active));
    }

    #[test]
    fn reset_is_a_full_replacement() {
        let state = ViewConfig {
            view_mode: ViewMode::Kanban,
            group_by: Some(GroupBy::State),
            filters: FilterSet {
                priority: Some(vec!["high".into()]),
                ..Default::default()
            },
            ..Default::default()
        };
        // default_props with empty filters: the priority filter must vanish
        let payload = ViewConfigPatch {
            filters: Some(FilterSet::default()),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::ResetToDefault(payload));
        assert_eq!(next.filters.priority, None);
        assert_eq!(next.view_mode, ViewMode::List);
        assert_eq!(next.group_by, None);
    }

    #[test]
    fn rehydrate_overlays_payload_on_defaults() {
        let state = ViewConfig {
            order_by: OrderBy::Priority,
            ..Default::default()
        };
        let payload = ViewConfigPatch {
            view_mode: Some(ViewMode::Spreadsheet),
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::Rehydrate(payload));
        assert_eq!(next.view_mode, ViewMode::Spreadsheet);
        // absent fields come from compiled defaults, not the prior state
        assert_eq!(next.order_by, OrderBy::CreatedAtDesc);
    }

    #[test]
    fn reduce_preserves_local_sidebar_flag() {
        let state = ViewConfig {
            sidebar_collapsed: true,
            ..Default::default()
        };
        let next = reduce(&state, &ViewAction::Rehydrate(ViewConfigPatch::default()));
        assert!(next.sidebar_collapsed);
    }
}
