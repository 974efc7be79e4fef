//! Reducer core for the tab outline.
//!
//! Mirrors the browser's tabs and windows as one flat, per-window ordered
//! collection, groups it into a window/tab tree on demand and tracks a
//! keyboard selection over that tree. Every input is a [`TablinerAction`]
//! and every transition goes through [`reduce_tabliner_state`], which is a
//! pure function: a failed reduction returns an error and leaves the
//! previous state as it was.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut state = TablinerState::new();
//! state.apply(&TablinerAction::BulkLoadTabs { tabs })?;
//! state.apply(&TablinerAction::SetSelection { path: Some(SelectedNodePath::window(0)) })?;
//! state.apply(&TablinerAction::MoveSelectionDown)?;
//!
//! if let Some(tab) = state.selected_tab() {
//!     // Activate it through the host
//! }
//! ```

pub mod action;
pub mod error;
pub mod grouping;
pub mod model;
pub mod selection;
pub mod state;
pub mod tabs;

#[cfg(test)]
mod fixtures;

pub use action::TablinerAction;
pub use error::{ReduceError, ReduceResult};
pub use grouping::{
    GroupedTabs, WindowGroup, find_tab_path, find_window_index, flatten_groups,
    group_tabs_by_window, tab_at_path,
};
pub use model::{AttachInfo, DetachInfo, MoveInfo, Tab, TabId, WindowId};
pub use selection::{SelectedNodePath, keep_selection_within_bounds, reduce_selected_node_path};
pub use state::{TablinerState, reduce_tabliner_state};
pub use tabs::{TabCollection, insert_tab, reduce_tabs, reindex_tabs, verify_tab_order};
