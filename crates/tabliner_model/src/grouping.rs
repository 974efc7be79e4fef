//! Per-window projection of the flat tab collection.
//!
//! The grouping is never stored. It borrows from the collection and is
//! recomputed whenever a reduction or a render needs it.

use std::collections::HashMap;

use crate::model::{Tab, TabId, WindowId};
use crate::selection::SelectedNodePath;

/// One window's tabs, in collection order.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowGroup<'a> {
    pub window_id: WindowId,
    pub window_tabs: Vec<&'a Tab>,
}

/// Tabs grouped by window, windows ordered by first appearance.
pub type GroupedTabs<'a> = Vec<WindowGroup<'a>>;

/// Partitions `tabs` by window, keeping each tab's relative order.
pub fn group_tabs_by_window(tabs: &[Tab]) -> GroupedTabs<'_> {
    let mut groups: GroupedTabs<'_> = Vec::new();
    let mut slot_by_window: HashMap<WindowId, usize> = HashMap::new();

    for tab in tabs {
        let slot = *slot_by_window.entry(tab.window_id).or_insert_with(|| {
            groups.push(WindowGroup {
                window_id: tab.window_id,
                window_tabs: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].window_tabs.push(tab);
    }

    groups
}

/// Concatenates the groups back into a flat list.
pub fn flatten_groups(grouped: &[WindowGroup<'_>]) -> Vec<Tab> {
    grouped
        .iter()
        .flat_map(|group| group.window_tabs.iter().map(|tab| (*tab).clone()))
        .collect()
}

/// Finds the node path of the tab with `tab_id`.
pub fn find_tab_path(grouped: &[WindowGroup<'_>], tab_id: TabId) -> Option<SelectedNodePath> {
    grouped
        .iter()
        .enumerate()
        .find_map(|(window_index, group)| {
            group
                .window_tabs
                .iter()
                .position(|tab| tab.has_id(tab_id))
                .map(|tab_index| SelectedNodePath::Tab {
                    window_index,
                    tab_index,
                })
        })
}

/// Finds the position of `window_id` in the grouping.
pub fn find_window_index(grouped: &[WindowGroup<'_>], window_id: WindowId) -> Option<usize> {
    grouped.iter().position(|group| group.window_id == window_id)
}

/// Returns the tab a path points at, or `None` for window paths and
/// paths outside the grouping.
pub fn tab_at_path<'a>(grouped: &[WindowGroup<'a>], path: SelectedNodePath) -> Option<&'a Tab> {
    match path {
        SelectedNodePath::Window { .. } => None,
        SelectedNodePath::Tab {
            window_index,
            tab_index,
        } => grouped
            .get(window_index)
            .and_then(|group| group.window_tabs.get(tab_index))
            .copied(),
    }
}
