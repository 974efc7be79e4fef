//! Selection cursor over the window/tab grouping.
//!
//! Paths are totally ordered: a window header precedes its own tabs, which
//! precede the next window header (`[0] < [0,0] < [0,1] < [1] < [1,0]`).
//! Up/down step through that order. Any action that is not a selection
//! action may have changed the shape of the grouping, so the path is
//! re-clamped into bounds instead.

use serde::{Deserialize, Serialize};

use crate::action::TablinerAction;
use crate::error::ReduceError;
use crate::grouping::WindowGroup;

/// Symbolic address of the selected node in the grouping.
///
/// Serialized as `[windowIndex]` or `[windowIndex, tabIndex]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub enum SelectedNodePath {
    /// A window header is selected.
    Window { window_index: usize },
    /// A tab inside a window is selected.
    Tab {
        window_index: usize,
        tab_index: usize,
    },
}

impl SelectedNodePath {
    pub fn window(window_index: usize) -> Self {
        Self::Window { window_index }
    }

    pub fn tab(window_index: usize, tab_index: usize) -> Self {
        Self::Tab {
            window_index,
            tab_index,
        }
    }

    pub fn window_index(&self) -> usize {
        match *self {
            Self::Window { window_index } | Self::Tab { window_index, .. } => window_index,
        }
    }

    pub fn tab_index(&self) -> Option<usize> {
        match *self {
            Self::Window { .. } => None,
            Self::Tab { tab_index, .. } => Some(tab_index),
        }
    }
}

impl TryFrom<Vec<usize>> for SelectedNodePath {
    type Error = ReduceError;

    fn try_from(path: Vec<usize>) -> Result<Self, Self::Error> {
        match path.as_slice() {
            [window_index] => Ok(Self::window(*window_index)),
            [window_index, tab_index] => Ok(Self::tab(*window_index, *tab_index)),
            other => Err(ReduceError::MalformedNodePath(other.len())),
        }
    }
}

impl From<SelectedNodePath> for Vec<usize> {
    fn from(path: SelectedNodePath) -> Self {
        match path {
            SelectedNodePath::Window { window_index } => vec![window_index],
            SelectedNodePath::Tab {
                window_index,
                tab_index,
            } => vec![window_index, tab_index],
        }
    }
}

fn last_tab_index(grouped: &[WindowGroup<'_>], window_index: usize) -> usize {
    grouped[window_index].window_tabs.len().saturating_sub(1)
}

/// Clamps `path` onto the nearest node that exists in `grouped`.
///
/// Returns `None` only when there are no windows left at all.
pub fn keep_selection_within_bounds(
    grouped: &[WindowGroup<'_>],
    path: SelectedNodePath,
) -> Option<SelectedNodePath> {
    let last_window = grouped.len().checked_sub(1)?;

    let clamped = match path {
        SelectedNodePath::Window { window_index } => {
            SelectedNodePath::window(window_index.min(last_window))
        }
        SelectedNodePath::Tab {
            window_index,
            tab_index,
        } => {
            if window_index > last_window {
                SelectedNodePath::tab(last_window, last_tab_index(grouped, last_window))
            } else {
                SelectedNodePath::tab(
                    window_index,
                    tab_index.min(last_tab_index(grouped, window_index)),
                )
            }
        }
    };
    Some(clamped)
}

fn step_up(grouped: &[WindowGroup<'_>], path: SelectedNodePath) -> SelectedNodePath {
    match path {
        SelectedNodePath::Window { window_index: 0 } => path,
        SelectedNodePath::Window { window_index } => {
            SelectedNodePath::tab(window_index - 1, last_tab_index(grouped, window_index - 1))
        }
        SelectedNodePath::Tab {
            window_index,
            tab_index: 0,
        } => SelectedNodePath::window(window_index),
        SelectedNodePath::Tab {
            window_index,
            tab_index,
        } => SelectedNodePath::tab(window_index, tab_index - 1),
    }
}

fn step_down(grouped: &[WindowGroup<'_>], path: SelectedNodePath) -> SelectedNodePath {
    match path {
        SelectedNodePath::Window { window_index } => SelectedNodePath::tab(window_index, 0),
        SelectedNodePath::Tab {
            window_index,
            tab_index,
        } => {
            if tab_index < last_tab_index(grouped, window_index) {
                SelectedNodePath::tab(window_index, tab_index + 1)
            } else if window_index + 1 < grouped.len() {
                SelectedNodePath::window(window_index + 1)
            } else {
                path
            }
        }
    }
}

/// Applies `action` to the selection.
///
/// Moving up or down without a selection is a no-op: arrow keys never
/// conjure a selection out of nothing.
pub fn reduce_selected_node_path(
    grouped: &[WindowGroup<'_>],
    selected_node_path: Option<SelectedNodePath>,
    action: &TablinerAction,
) -> Option<SelectedNodePath> {
    match action {
        TablinerAction::SetSelection { path } => *path,
        TablinerAction::MoveSelectionUp => selected_node_path
            .and_then(|path| keep_selection_within_bounds(grouped, path))
            .map(|path| step_up(grouped, path)),
        TablinerAction::MoveSelectionDown => selected_node_path
            .and_then(|path| keep_selection_within_bounds(grouped, path))
            .map(|path| step_down(grouped, path)),
        _ => selected_node_path.and_then(|path| keep_selection_within_bounds(grouped, path)),
    }
}
