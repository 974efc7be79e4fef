use thiserror::Error;

use crate::model::{TabId, WindowId};

/// Invariant violations raised by the reducers.
///
/// Every variant means the host's event stream and the model have diverged.
/// The state that produced the error is unchanged; the caller is expected to
/// recover by dispatching a fresh bulk load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReduceError {
    #[error("tab {tab_id} was moved but no tab sits at index {from_index} of window {window_id}")]
    MovedTabNotFound {
        tab_id: TabId,
        window_id: WindowId,
        from_index: usize,
    },

    #[error("tab {tab_id} was moved but index {to_index} is outside window {window_id}")]
    MoveTargetOutOfRange {
        tab_id: TabId,
        window_id: WindowId,
        to_index: usize,
    },

    #[error("tab {0} was detached but it could not be found")]
    DetachedTabNotFound(TabId),

    #[error("tab {tab_id} was detached from window {reported} but it belongs to window {actual}")]
    DetachWindowMismatch {
        tab_id: TabId,
        reported: WindowId,
        actual: WindowId,
    },

    #[error("tab {tab_id} was detached from position {reported} but it sits at {actual}")]
    DetachPositionMismatch {
        tab_id: TabId,
        reported: usize,
        actual: usize,
    },

    #[error("tab {tab_id} was updated in window {reported} but it belongs to window {actual}")]
    UpdateWindowMismatch {
        tab_id: TabId,
        reported: WindowId,
        actual: WindowId,
    },

    #[error("tab {0} was attached but it is not in the list of detached tabs")]
    AttachedTabNotDetached(TabId),

    #[error("expected tab in new window {window_id} to have index 0, got {index}")]
    NonZeroIndexInEmptyWindow { window_id: WindowId, index: usize },

    #[error("tab list out of order at position {position}: {reason}")]
    TabsOutOfOrder { position: usize, reason: String },

    #[error("expected either a tab or window to be selected, got a path of length {0}")]
    MalformedNodePath(usize),
}

pub type ReduceResult<T> = Result<T, ReduceError>;
