//! Canonical cache keys.
//!
//! The read path (fetching a collection for a filter set) and the write path
//! (optimistically reapplying an update) must resolve to the same cache
//! slot. `canonicalize` guarantees that two parameter bags that are
//! set-equal per dimension produce an identical key regardless of the
//! original token order.

use crate::model::ViewConfig;

/// Raw request parameters for an item-collection fetch. List dimensions are
/// comma-joined token strings as they appear on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemQueryParams {
    pub state: Option<String>,
    pub priority: Option<String>,
    pub assignees: Option<String>,
    pub created_by: Option<String>,
    pub labels: Option<String>,
    pub item_type: Option<String>,
    pub group_by: Option<String>,
    pub order_by: Option<String>,
}

impl ItemQueryParams {
    /// Derive the request parameters for the current view configuration
    pub fn from_config(config: &ViewConfig) -> Self {
        let join = |dim: &Option<Vec<String>>| dim.as_ref().map(|v| v.join(","));
        ItemQueryParams {
            state: join(&config.filters.state),
            priority: join(&config.filters.priority),
            assignees: join(&config.filters.assignees),
            created_by: join(&config.filters.created_by),
            labels: join(&config.filters.labels),
            item_type: config.filters.item_type.map(|t| t.as_str().to_string()),
            group_by: config.group_by.map(|g| g.as_str().to_string()),
            order_by: Some(config.order_by.as_str().to_string()),
        }
    }
}

/// Deterministic key fragment for a parameter bag.
///
/// List dimensions are split on comma, sorted ascending, and joined with
/// `_`; an absent dimension contributes an empty fragment, so "unset" and
/// "cleared" collide (required, given the empty-normalizes-to-null filter
/// invariant). Scalars are uppercased, `NULL` when absent. Field order is
/// fixed: state, priority, assignees, created_by, type, group_by, order_by,
/// labels.
pub fn canonicalize(params: &ItemQueryParams) -> String {
    let state = sorted_tokens(params.state.as_deref());
    let priority = sorted_tokens(params.priority.as_deref());
    let assignees = sorted_tokens(params.assignees.as_deref());
    let created_by = sorted_tokens(params.created_by.as_deref());
    let labels = sorted_tokens(params.labels.as_deref());
    let item_type = scalar(params.item_type.as_deref());
    let group_by = scalar(params.group_by.as_deref());
    let order_by = scalar(params.order_by.as_deref());

    format!("{state}_{priority}_{assignees}_{created_by}_{item_type}_{group_by}_{order_by}_{labels}")
}

fn sorted_tokens(dim: Option<&str>) -> String {
    let mut tokens: Vec<&str> = dim.map(|s| s.split(',').collect()).unwrap_or_default();
    tokens.sort_unstable();
    tokens.join("_")
}

fn scalar(value: Option<&str>) -> String {
    match value {
        Some(v) => v.to_uppercase(),
        None => "NULL".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Named cache keys — the slots this engine reads and patches
// ---------------------------------------------------------------------------

/// Per-(user, project) preference record
pub fn user_project_view(project_id: &str) -> String {
    format!("USER_PROJECT_VIEW_{}", project_id.to_uppercase())
}

/// Shared-view record
pub fn view_details(view_id: &str) -> String {
    format!("VIEW_DETAILS_{}", view_id.to_uppercase())
}

/// Item collection for a project under a given parameter bag
pub fn project_items_with_params(project_id: &str, params: Option<&ItemQueryParams>) -> String {
    match params {
        None => format!("PROJECT_ITEMS_LIST_WITH_PARAMS_{}", project_id.to_uppercase()),
        Some(params) => format!(
            "PROJECT_ITEMS_LIST_WITH_PARAMS_{}_{}",
            project_id.to_uppercase(),
            canonicalize(params)
        ),
    }
}
