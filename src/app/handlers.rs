//! User command handlers.
//!
//! Handlers translate a user intent into host commands. They never touch
//! the tab collection directly; the host's resulting events do. A handler
//! returns `Ok(false)` when it declines because the request does not match
//! the current state.

use serde::{Deserialize, Serialize};

use tabliner_model::{SelectedNodePath, TabId, TablinerAction, WindowId, find_window_index};

use super::host::{END_OF_WINDOW, Host, HostCommand};
use super::store::Tabliner;

/// Something the user asked for from the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum UserCommand {
    Select {
        path: Option<SelectedNodePath>,
    },
    SelectUp,
    SelectDown,
    CloseTab {
        tab_id: TabId,
    },
    MoveTab {
        window_id: WindowId,
        tab_id: TabId,
        index: i64,
    },
    GoToTab {
        tab_id: TabId,
    },
    CreateTabAfter {
        tab_id: TabId,
    },
    MergeWindows {
        source_window_id: WindowId,
        destination_window_id: WindowId,
    },
    CloseSelected,
    GoToSelected,
    CreateAfterSelected,
    /// Moves the selected tab by `offset` positions within its window.
    MoveSelected {
        offset: i64,
    },
}

impl<H: Host> Tabliner<H> {
    pub fn run_command(&mut self, command: UserCommand) -> anyhow::Result<bool> {
        match command {
            UserCommand::Select { path } => {
                Ok(self.dispatch(TablinerAction::SetSelection { path }))
            }
            UserCommand::SelectUp => Ok(self.dispatch(TablinerAction::MoveSelectionUp)),
            UserCommand::SelectDown => Ok(self.dispatch(TablinerAction::MoveSelectionDown)),
            UserCommand::CloseTab { tab_id } => self.close_tab(tab_id),
            UserCommand::MoveTab {
                window_id,
                tab_id,
                index,
            } => self.move_tab(window_id, tab_id, index),
            UserCommand::GoToTab { tab_id } => self.go_to_tab(tab_id),
            UserCommand::CreateTabAfter { tab_id } => self.create_tab_after(tab_id),
            UserCommand::MergeWindows {
                source_window_id,
                destination_window_id,
            } => self.merge_windows(source_window_id, destination_window_id),
            UserCommand::CloseSelected => match self.selected_tab_id() {
                Some(tab_id) => self.close_tab(tab_id),
                None => Ok(decline("close", "no tab selected")),
            },
            UserCommand::GoToSelected => match self.selected_tab_id() {
                Some(tab_id) => self.go_to_tab(tab_id),
                None => Ok(decline("go to", "no tab selected")),
            },
            UserCommand::CreateAfterSelected => match self.selected_tab_id() {
                Some(tab_id) => self.create_tab_after(tab_id),
                None => Ok(decline("create after", "no tab selected")),
            },
            UserCommand::MoveSelected { offset } => {
                let Some(tab) = self.state().selected_tab() else {
                    return Ok(decline("move", "no tab selected"));
                };
                let (window_id, tab_id) = (tab.window_id, tab.id);
                let index = offset.saturating_add(tab.index as i64);
                match tab_id {
                    Some(tab_id) => self.move_tab(window_id, tab_id, index),
                    None => Ok(decline("move", "selected tab has no id")),
                }
            }
        }
    }

    fn selected_tab_id(&self) -> Option<TabId> {
        self.state().selected_tab().and_then(|tab| tab.id)
    }

    pub fn close_tab(&mut self, tab_id: TabId) -> anyhow::Result<bool> {
        if self.state().find_tab(tab_id).is_none() {
            return Ok(decline("close", "tab not found"));
        }
        self.command(HostCommand::RemoveTab { tab_id })?;
        Ok(true)
    }

    /// Moves `tab_id` to `new_index` inside `window_id`, clamped to the
    /// window's current tab range.
    pub fn move_tab(
        &mut self,
        window_id: WindowId,
        tab_id: TabId,
        new_index: i64,
    ) -> anyhow::Result<bool> {
        let Some(grouped) = self.state().grouped_tabs() else {
            return Ok(decline("move", "tabs not loaded"));
        };
        let Some(window_index) = find_window_index(&grouped, window_id) else {
            return Ok(decline("move", "window not found"));
        };
        let last_index = grouped[window_index].window_tabs.len() as i64 - 1;
        let index = new_index.clamp(0, last_index);
        drop(grouped);

        self.command(HostCommand::MoveTabs {
            tab_ids: vec![tab_id],
            window_id,
            index,
        })?;
        Ok(true)
    }

    /// Activates `tab_id` and brings its window to the front.
    pub fn go_to_tab(&mut self, tab_id: TabId) -> anyhow::Result<bool> {
        let Some(window_id) = self.state().find_tab(tab_id).map(|tab| tab.window_id) else {
            return Ok(decline("go to", "tab not found"));
        };
        self.command(HostCommand::ActivateTab { tab_id })?;
        self.command(HostCommand::FocusWindow { window_id })?;
        Ok(true)
    }

    /// Opens a new tab right after `tab_id` in the same window.
    pub fn create_tab_after(&mut self, tab_id: TabId) -> anyhow::Result<bool> {
        let Some((window_id, index)) = self
            .state()
            .find_tab(tab_id)
            .map(|tab| (tab.window_id, tab.index + 1))
        else {
            return Ok(decline("create after", "tab not found"));
        };
        self.command(HostCommand::CreateTab { window_id, index })?;
        if self.settings().focus_window_after_create {
            self.command(HostCommand::FocusWindow { window_id })?;
        }
        Ok(true)
    }

    /// Moves every tab of `source_window_id` to the end of
    /// `destination_window_id` in one host command.
    pub fn merge_windows(
        &mut self,
        source_window_id: WindowId,
        destination_window_id: WindowId,
    ) -> anyhow::Result<bool> {
        if source_window_id == destination_window_id {
            return Ok(decline("merge", "source and destination are the same window"));
        }
        let Some(tabs) = self.state().chrome_tabs.as_deref() else {
            return Ok(decline("merge", "tabs not loaded"));
        };
        let tab_ids: Option<Vec<TabId>> = tabs
            .iter()
            .filter(|tab| tab.window_id == source_window_id)
            .map(|tab| tab.id)
            .collect();
        let Some(tab_ids) = tab_ids else {
            return Ok(decline("merge", "source window has tabs without ids"));
        };
        if tab_ids.is_empty() {
            return Ok(decline("merge", "source window has no tabs"));
        }

        self.command(HostCommand::MoveTabs {
            tab_ids,
            window_id: destination_window_id,
            index: END_OF_WINDOW,
        })?;
        Ok(true)
    }
}

fn decline(handler: &str, reason: &str) -> bool {
    log::debug!("{handler} declined: {reason}");
    false
}
