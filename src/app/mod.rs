//! Host-facing side of tabliner.
//!
//! The reducer core lives in `tabliner_model`. This module connects it to a
//! browser host: it folds host events into the state, turns user commands
//! into host commands and renders the tree.

mod handlers;
mod host;
mod replay;
mod store;
mod tree;

pub use replay::{ReplaySession, play};
pub use tree::render_tree;
