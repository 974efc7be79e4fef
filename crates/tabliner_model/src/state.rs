//! Aggregate state and the top-level reducer.

use serde::Serialize;

use crate::action::TablinerAction;
use crate::error::ReduceResult;
use crate::grouping::{GroupedTabs, find_tab_path, group_tabs_by_window, tab_at_path};
use crate::model::{Tab, TabId, WindowId};
use crate::selection::{SelectedNodePath, reduce_selected_node_path};
use crate::tabs::{TabCollection, reduce_tabs};

/// Everything the UI renders from.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TablinerState {
    /// `None` until the initial tab query has been loaded.
    pub chrome_tabs: Option<Vec<Tab>>,
    pub detached_tabs: Vec<Tab>,
    /// The tab this UI itself lives in.
    pub own_tab_id: Option<TabId>,
    pub focused_window_id: Option<WindowId>,
    pub focused_tab_id: Option<TabId>,
    pub selected_node_path: Option<SelectedNodePath>,
}

impl TablinerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-window projection of the current tabs.
    pub fn grouped_tabs(&self) -> Option<GroupedTabs<'_>> {
        self.chrome_tabs.as_deref().map(group_tabs_by_window)
    }

    pub fn find_tab(&self, tab_id: TabId) -> Option<&Tab> {
        self.chrome_tabs
            .as_deref()?
            .iter()
            .find(|tab| tab.has_id(tab_id))
    }

    /// The tab under the cursor, if the cursor is on a tab.
    pub fn selected_tab(&self) -> Option<&Tab> {
        let path = self.selected_node_path?;
        let grouped = self.grouped_tabs()?;
        tab_at_path(&grouped, path)
    }

    /// The window under the cursor, whether a header or one of its tabs is selected.
    pub fn selected_window_id(&self) -> Option<WindowId> {
        let path = self.selected_node_path?;
        let grouped = self.grouped_tabs()?;
        grouped.get(path.window_index()).map(|group| group.window_id)
    }

    /// Returns the state after `action`, leaving `self` untouched.
    pub fn reduce(&self, action: &TablinerAction) -> ReduceResult<Self> {
        reduce_tabliner_state(self, action)
    }

    /// Applies `action` in place. On error `self` keeps its previous value.
    pub fn apply(&mut self, action: &TablinerAction) -> ReduceResult<()> {
        *self = reduce_tabliner_state(self, action)?;
        Ok(())
    }
}

/// The single transition function of the model.
///
/// Runs the tab collection reducer, regroups, moves or repairs the
/// selection, then updates the scalar focus fields. When the UI's own tab
/// gains focus from some other tab, the selection jumps to that other tab
/// so the user can go straight back to it.
pub fn reduce_tabliner_state(
    state: &TablinerState,
    action: &TablinerAction,
) -> ReduceResult<TablinerState> {
    let TabCollection {
        chrome_tabs,
        detached_tabs,
    } = reduce_tabs(state.chrome_tabs.as_deref(), &state.detached_tabs, action)?;

    let grouped = chrome_tabs.as_deref().map(group_tabs_by_window);

    let mut selected_node_path = grouped
        .as_ref()
        .and_then(|grouped| reduce_selected_node_path(grouped, state.selected_node_path, action));

    let mut own_tab_id = state.own_tab_id;
    let mut focused_window_id = state.focused_window_id;
    let mut focused_tab_id = state.focused_tab_id;

    match action {
        TablinerAction::OwnIdentityResolved { tab_id } => own_tab_id = Some(*tab_id),
        TablinerAction::WindowFocused { window_id } => focused_window_id = *window_id,
        TablinerAction::TabFocused { tab_id } => {
            let previous_focused_tab_id = focused_tab_id;
            focused_tab_id = Some(*tab_id);

            // Leave the selection alone if our tab already had focus.
            if own_tab_id == Some(*tab_id) && previous_focused_tab_id != own_tab_id {
                let previous_path = grouped
                    .as_ref()
                    .zip(previous_focused_tab_id)
                    .and_then(|(grouped, previous)| find_tab_path(grouped, previous));
                if let Some(path) = previous_path {
                    selected_node_path = Some(path);
                }
            }
        }
        _ => {}
    }
    drop(grouped);

    Ok(TablinerState {
        chrome_tabs,
        detached_tabs,
        own_tab_id,
        focused_window_id,
        focused_tab_id,
        selected_node_path,
    })
}
