//! Plain-text rendering of the window/tab tree.

use std::fmt::Write;

use tabliner_model::{SelectedNodePath, TablinerState};

const SELECTED: &str = "> ";
const UNSELECTED: &str = "  ";

/// Renders one line per window header and tab, marking the selection,
/// the focused window, active tabs and the UI's own tab.
pub fn render_tree(state: &TablinerState) -> String {
    let Some(grouped) = state.grouped_tabs() else {
        return "(tabs not loaded)\n".to_string();
    };
    if grouped.is_empty() {
        return "(no windows)\n".to_string();
    }

    let marker = |path: SelectedNodePath| {
        if state.selected_node_path == Some(path) {
            SELECTED
        } else {
            UNSELECTED
        }
    };

    let mut out = String::new();
    for (window_index, group) in grouped.iter().enumerate() {
        let focused = if state.focused_window_id == Some(group.window_id) {
            " (focused)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}window {}{focused}",
            marker(SelectedNodePath::window(window_index)),
            group.window_id
        );

        for (tab_index, tab) in group.window_tabs.iter().enumerate() {
            let title = if tab.title.is_empty() {
                tab.url.as_str()
            } else {
                tab.title.as_str()
            };
            let mut flags = String::new();
            if tab.active {
                flags.push_str(" [active]");
            }
            if tab.pinned {
                flags.push_str(" [pinned]");
            }
            if tab.id.is_some() && tab.id == state.own_tab_id {
                flags.push_str(" [this tab]");
            }
            let _ = writeln!(
                out,
                "{}  {}: {title}{flags}",
                marker(SelectedNodePath::tab(window_index, tab_index)),
                tab.index
            );
        }
    }
    out
}
