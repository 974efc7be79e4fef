//! Tab data model shared by the reducers.
//!
//! A [`Tab`] is the host's record of one open page. Field names follow the
//! host's camelCase wire shape so recorded sessions deserialize directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Host-assigned tab identifier, unique among currently open tabs.
pub type TabId = i64;

/// Host-assigned window identifier.
pub type WindowId = i64;

/// One browser tab as reported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Absent only while the host is still creating the tab.
    #[serde(default)]
    pub id: Option<TabId>,
    pub window_id: WindowId,
    /// Position within the owning window.
    pub index: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub fav_icon_url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub highlighted: bool,
    #[serde(default)]
    pub discarded: bool,
    #[serde(default)]
    pub incognito: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Any other host fields, carried through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Tab {
    /// Creates a tab with the given identity and position and empty content.
    pub fn new(id: TabId, window_id: WindowId, index: usize) -> Self {
        Self {
            id: Some(id),
            window_id,
            index,
            title: String::new(),
            url: String::new(),
            fav_icon_url: String::new(),
            active: false,
            pinned: false,
            selected: false,
            highlighted: false,
            discarded: false,
            incognito: false,
            status: None,
            extra: BTreeMap::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// True if this tab carries the given id.
    pub fn has_id(&self, tab_id: TabId) -> bool {
        self.id == Some(tab_id)
    }
}

/// Payload of a same-window move: indices are positions within `window_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveInfo {
    pub window_id: WindowId,
    pub from_index: usize,
    pub to_index: usize,
}

/// Where a tab was when the host detached it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetachInfo {
    pub old_window_id: WindowId,
    pub old_position: usize,
}

/// Where the host re-attached a detached tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachInfo {
    pub new_window_id: WindowId,
    pub new_position: usize,
}
