//! Actions accepted by the state reducer.

use serde::{Deserialize, Serialize};

use crate::model::{AttachInfo, DetachInfo, MoveInfo, Tab, TabId, WindowId};
use crate::selection::SelectedNodePath;

/// One discrete input to [`crate::reduce_tabliner_state`].
///
/// Host lifecycle events, startup query results and user selection
/// commands all arrive through this single type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum TablinerAction {
    /// Replaces the whole tab collection.
    BulkLoadTabs { tabs: Vec<Tab> },
    TabRemoved { tab_id: TabId },
    TabMoved { tab_id: TabId, move_info: MoveInfo },
    TabCreated { tab: Tab },
    TabUpdated { tab: Tab },
    TabActivated { tab_id: TabId, window_id: WindowId },
    TabDetached { tab_id: TabId, detach_info: DetachInfo },
    TabAttached { tab_id: TabId, attach_info: AttachInfo },
    /// The id of the tab hosting this UI.
    OwnIdentityResolved { tab_id: TabId },
    /// `None` when no browser window has focus.
    WindowFocused { window_id: Option<WindowId> },
    TabFocused { tab_id: TabId },
    SetSelection { path: Option<SelectedNodePath> },
    MoveSelectionUp,
    MoveSelectionDown,
}

impl TablinerAction {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::BulkLoadTabs { .. } => "bulk_load_tabs",
            Self::TabRemoved { .. } => "tab_removed",
            Self::TabMoved { .. } => "tab_moved",
            Self::TabCreated { .. } => "tab_created",
            Self::TabUpdated { .. } => "tab_updated",
            Self::TabActivated { .. } => "tab_activated",
            Self::TabDetached { .. } => "tab_detached",
            Self::TabAttached { .. } => "tab_attached",
            Self::OwnIdentityResolved { .. } => "own_identity_resolved",
            Self::WindowFocused { .. } => "window_focused",
            Self::TabFocused { .. } => "tab_focused",
            Self::SetSelection { .. } => "set_selection",
            Self::MoveSelectionUp => "move_selection_up",
            Self::MoveSelectionDown => "move_selection_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_shape() {
        let action = TablinerAction::TabMoved {
            tab_id: 4,
            move_info: MoveInfo {
                window_id: 2,
                from_index: 1,
                to_index: 0,
            },
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "TAB_MOVED");
        assert_eq!(json["tabId"], 4);
        assert_eq!(json["moveInfo"]["fromIndex"], 1);

        let parsed: TablinerAction = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, action);
    }

    #[test]
    fn test_selection_action_parses_path() {
        let action: TablinerAction =
            serde_json::from_str(r#"{"type": "SET_SELECTION", "path": [0, 1]}"#).unwrap();
        assert_eq!(
            action,
            TablinerAction::SetSelection {
                path: Some(SelectedNodePath::tab(0, 1))
            }
        );

        let action: TablinerAction =
            serde_json::from_str(r#"{"type": "MOVE_SELECTION_UP"}"#).unwrap();
        assert_eq!(action, TablinerAction::MoveSelectionUp);
    }
}
