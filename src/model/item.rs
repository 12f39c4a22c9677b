use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A work item as cached for display.
///
/// `assignees` is the field the UI renders; `assignees_list` is the raw id
/// list echoed by edit forms. The reconciler keeps the two coherent when it
/// folds a partial update into the cache (see `reconcile::apply_update`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub assignees: Vec<String>,
    #[serde(default)]
    pub assignees_list: Vec<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial field update for a work item — every field optional, absent
/// fields leave the cached value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignees_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl WorkItem {
    /// Clone this item with `update` overlaid.
    ///
    /// The rendered `assignees` field is recomputed from the update's
    /// `assignees_list` when present, otherwise from the prior item's
    /// `assignees_list` (not its `assignees`).
    pub fn merged(&self, update: &ItemUpdate) -> WorkItem {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = name.clone();
        }
        if let Some(state) = &update.state {
            next.state = Some(state.clone());
        }
        if let Some(priority) = &update.priority {
            next.priority = Some(priority.clone());
        }
        if let Some(labels) = &update.labels {
            next.labels = labels.clone();
        }
        if let Some(created_by) = &update.created_by {
            next.created_by = Some(created_by.clone());
        }
        if let Some(updated_at) = update.updated_at {
            next.updated_at = Some(updated_at);
        }
        match &update.assignees_list {
            Some(list) => {
                next.assignees = list.clone();
                next.assignees_list = list.clone();
            }
            None => next.assignees = self.assignees_list.clone(),
        }
        next
    }
}
