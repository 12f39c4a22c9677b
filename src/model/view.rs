use serde::{Deserialize, Serialize};

/// How the collection is rendered on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    List,
    Kanban,
    Calendar,
    Spreadsheet,
    Gantt,
}

/// Entity field used to bucket the collection into named groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    State,
    Priority,
    Labels,
    CreatedBy,
}

impl GroupBy {
    /// Wire name of the grouping field (matches the serde rename)
    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::State => "state",
            GroupBy::Priority => "priority",
            GroupBy::Labels => "labels",
            GroupBy::CreatedBy => "created_by",
        }
    }
}

/// Sort order for the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OrderBy {
    /// Newest first
    #[default]
    #[serde(rename = "-created_at")]
    CreatedAtDesc,
    #[serde(rename = "updated_at")]
    UpdatedAt,
    #[serde(rename = "priority")]
    Priority,
}

impl OrderBy {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderBy::CreatedAtDesc => "-created_at",
            OrderBy::UpdatedAt => "updated_at",
            OrderBy::Priority => "priority",
        }
    }
}

/// Scalar `type` filter: show everything, only active, or only backlog items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemTypeFilter {
    Active,
    Backlog,
}

impl ItemTypeFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            ItemTypeFilter::Active => "active",
            ItemTypeFilter::Backlog => "backlog",
        }
    }
}

/// Active filter dimensions for the collection.
///
/// Invariant: a list dimension is never `Some(vec![])` — an empty selection
/// normalizes to `None`, so "unset" and "cleared" are stored identically.
/// This keeps cache keys stable (see `cache::key`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default)]
    pub state: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Option<Vec<String>>,
    #[serde(default)]
    pub assignees: Option<Vec<String>>,
    #[serde(default)]
    pub created_by: Option<Vec<String>>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
    #[serde(default, rename = "type")]
    pub item_type: Option<ItemTypeFilter>,
}

impl FilterSet {
    /// Overlay `top`'s set dimensions on this set, normalizing the result.
    /// Used on rehydrate when a shared view supplies `query_data` over the
    /// personal `view_props` filters.
    pub fn overlaid(&self, top: &FilterSet) -> FilterSet {
        let mut next = FilterSet {
            state: top.state.clone().or_else(|| self.state.clone()),
            priority: top.priority.clone().or_else(|| self.priority.clone()),
            assignees: top.assignees.clone().or_else(|| self.assignees.clone()),
            created_by: top.created_by.clone().or_else(|| self.created_by.clone()),
            labels: top.labels.clone().or_else(|| self.labels.clone()),
            item_type: top.item_type.or(self.item_type),
        };
        next.normalize();
        next
    }

    /// Coerce empty list dimensions to `None`
    pub fn normalize(&mut self) {
        for dim in [
            &mut self.state,
            &mut self.priority,
            &mut self.assignees,
            &mut self.created_by,
            &mut self.labels,
        ] {
            if dim.as_ref().is_some_and(|v| v.is_empty()) {
                *dim = None;
            }
        }
    }
}

/// Partial update for `FilterSet`: a field left `None` is untouched.
///
/// Because empty normalizes to null, passing `Some(vec![])` for a list
/// dimension clears it. The scalar `item_type` uses a nested option so the
/// caller can still clear it explicitly.
#[derive(Debug, Clone, Default)]
pub struct FilterPatch {
    pub state: Option<Vec<String>>,
    pub priority: Option<Vec<String>>,
    pub assignees: Option<Vec<String>>,
    pub created_by: Option<Vec<String>>,
    pub labels: Option<Vec<String>>,
    pub item_type: Option<Option<ItemTypeFilter>>,
}

impl FilterPatch {
    /// Merge the dimensions present in this patch into `filters`,
    /// normalizing empty lists to `None` as they land.
    pub fn merge_into(&self, filters: &mut FilterSet) {
        if let Some(v) = &self.state {
            filters.state = non_empty(v);
        }
        if let Some(v) = &self.priority {
            filters.priority = non_empty(v);
        }
        if let Some(v) = &self.assignees {
            filters.assignees = non_empty(v);
        }
        if let Some(v) = &self.created_by {
            filters.created_by = non_empty(v);
        }
        if let Some(v) = &self.labels {
            filters.labels = non_empty(v);
        }
        if let Some(t) = self.item_type {
            filters.item_type = t;
        }
    }
}

fn non_empty(v: &[String]) -> Option<Vec<String>> {
    if v.is_empty() { None } else { Some(v.to_vec()) }
}

/// The full on-screen configuration for one collection scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default)]
    pub group_by: Option<GroupBy>,
    #[serde(default)]
    pub order_by: OrderBy,
    #[serde(default = "default_true")]
    pub show_empty_groups: bool,
    #[serde(default)]
    pub filters: FilterSet,
    /// Restored from the settings port on rehydrate; never persisted remotely
    #[serde(skip)]
    pub sidebar_collapsed: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            view_mode: ViewMode::List,
            group_by: None,
            order_by: OrderBy::CreatedAtDesc,
            show_empty_groups: true,
            filters: FilterSet::default(),
            sidebar_collapsed: false,
        }
    }
}

/// Partial `ViewConfig` — the wire shape of `view_props` / `default_props`.
///
/// Applied as an overlay over the compiled defaults, never over the current
/// state: rehydrate and reset are full replacements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<ViewMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderBy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_empty_groups: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<FilterSet>,
}

impl ViewConfigPatch {
    /// Overlay this patch on `base`, yielding a full config.
    /// Filters are normalized on the way in (remote data may carry `[]`).
    pub fn apply_over(&self, base: &ViewConfig) -> ViewConfig {
        let mut filters = self.filters.clone().unwrap_or_else(|| base.filters.clone());
        filters.normalize();
        ViewConfig {
            view_mode: self.view_mode.unwrap_or(base.view_mode),
            group_by: self.group_by.or(base.group_by),
            order_by: self.order_by.unwrap_or(base.order_by),
            show_empty_groups: self.show_empty_groups.unwrap_or(base.show_empty_groups),
            filters,
            sidebar_collapsed: base.sidebar_collapsed,
        }
    }

    /// Snapshot a full config as a patch (every field present) — the payload
    /// shape written back to `view_props`.
    pub fn from_config(config: &ViewConfig) -> Self {
        ViewConfigPatch {
            view_mode: Some(config.view_mode),
            group_by: config.group_by,
            order_by: Some(config.order_by),
            show_empty_groups: Some(config.show_empty_groups),
            filters: Some(config.filters.clone()),
        }
    }
}

fn default_true() -> bool {
    true
}
