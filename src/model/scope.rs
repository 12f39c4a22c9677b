use serde::{Deserialize, Serialize};

use crate::model::view::{FilterSet, ViewConfigPatch};

/// Identifies which preference/view records a configuration belongs to.
/// Supplied externally (routing); `view_id` is set while a shared view is
/// active, which redirects filter persistence to that view's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub workspace_slug: String,
    pub project_id: String,
    pub view_id: Option<String>,
}

impl Scope {
    pub fn new(workspace_slug: impl Into<String>, project_id: impl Into<String>) -> Self {
        Scope {
            workspace_slug: workspace_slug.into(),
            project_id: project_id.into(),
            view_id: None,
        }
    }

    pub fn with_view(mut self, view_id: impl Into<String>) -> Self {
        self.view_id = Some(view_id.into());
        self
    }
}

/// Per-(user, project) record owned by the remote preference service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopePreference {
    #[serde(default)]
    pub view_props: ViewConfigPatch,
    #[serde(default)]
    pub default_props: ViewConfigPatch,
}

/// A named, shareable filter configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedView {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub query_data: FilterSet,
}

/// PATCH body for the preference endpoint; absent fields are not written
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_props: Option<ViewConfigPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_props: Option<ViewConfigPatch>,
}

/// PATCH body for the shared-view endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharedViewPatch {
    pub query_data: FilterSet,
}
