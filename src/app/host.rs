//! Browser host boundary.
//!
//! The [`Host`] trait is the only way the store talks to the browser. Host
//! lifecycle events arrive as [`HostEvent`]s on an unbounded channel and are
//! turned into reducer actions by [`actions_for_event`]. Host commands are
//! fire-and-forget; their effects come back as events.

use anyhow::bail;
use futures::channel::mpsc::UnboundedSender;
use serde::{Deserialize, Serialize};

use tabliner_model::{
    AttachInfo, DetachInfo, MoveInfo, Tab, TabId, TablinerAction, TablinerState, WindowId,
};

/// Index value that tells the host to append at the end of a window.
pub const END_OF_WINDOW: i64 = -1;

/// A browser window as returned by the window query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostWindow {
    pub id: WindowId,
    #[serde(default)]
    pub focused: bool,
}

/// Lifecycle notifications emitted by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum HostEvent {
    TabCreated { tab: Tab },
    TabRemoved { tab_id: TabId },
    TabUpdated { tab: Tab },
    TabMoved { tab_id: TabId, move_info: MoveInfo },
    TabActivated { tab_id: TabId, window_id: WindowId },
    TabDetached { tab_id: TabId, detach_info: DetachInfo },
    TabAttached { tab_id: TabId, attach_info: AttachInfo },
    /// `None` when focus left every browser window.
    WindowFocusChanged { window_id: Option<WindowId> },
}

/// Commands the store and handlers issue to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum HostCommand {
    RemoveTab {
        tab_id: TabId,
    },
    /// `index` is a position in the destination window, or [`END_OF_WINDOW`].
    MoveTabs {
        tab_ids: Vec<TabId>,
        window_id: WindowId,
        index: i64,
    },
    CreateTab {
        window_id: WindowId,
        index: usize,
    },
    ActivateTab {
        tab_id: TabId,
    },
    FocusWindow {
        window_id: WindowId,
    },
}

/// Capabilities the browser host provides.
pub trait Host {
    /// Every open tab, grouped by window and ordered by index.
    fn query_tabs(&self) -> anyhow::Result<Vec<Tab>>;

    fn query_windows(&self) -> anyhow::Result<Vec<HostWindow>>;

    /// The tab hosting this UI, if the host can tell.
    fn own_tab_id(&self) -> anyhow::Result<Option<TabId>>;

    /// Starts forwarding lifecycle events to `sender` until the returned
    /// guard is dropped.
    fn subscribe(&self, sender: UnboundedSender<HostEvent>) -> anyhow::Result<Subscription>;

    fn execute(&self, command: HostCommand) -> anyhow::Result<()>;
}

/// Keeps a host listener registered while alive.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Picks the focused window out of a window query.
pub fn focused_window_id(windows: &[HostWindow]) -> anyhow::Result<Option<WindowId>> {
    let mut focused = windows.iter().filter(|window| window.focused);
    let first = focused.next();
    if focused.next().is_some() {
        bail!("expected at most 1 window to be focused");
    }
    Ok(first.map(|window| window.id))
}

/// Translates a host event into the actions it implies for `state`.
///
/// Focus of individual tabs is derived here: activating a tab in the
/// focused window focuses that tab, and focusing a window focuses its
/// active tab.
pub fn actions_for_event(state: &TablinerState, event: HostEvent) -> Vec<TablinerAction> {
    match event {
        HostEvent::TabCreated { tab } => vec![TablinerAction::TabCreated { tab }],
        HostEvent::TabRemoved { tab_id } => vec![TablinerAction::TabRemoved { tab_id }],
        HostEvent::TabUpdated { tab } => vec![TablinerAction::TabUpdated { tab }],
        HostEvent::TabMoved { tab_id, move_info } => {
            vec![TablinerAction::TabMoved { tab_id, move_info }]
        }
        HostEvent::TabDetached {
            tab_id,
            detach_info,
        } => vec![TablinerAction::TabDetached {
            tab_id,
            detach_info,
        }],
        HostEvent::TabAttached {
            tab_id,
            attach_info,
        } => vec![TablinerAction::TabAttached {
            tab_id,
            attach_info,
        }],
        HostEvent::TabActivated { tab_id, window_id } => {
            let mut actions = vec![TablinerAction::TabActivated { tab_id, window_id }];
            if state.chrome_tabs.is_some() && state.focused_window_id == Some(window_id) {
                actions.push(TablinerAction::TabFocused { tab_id });
            }
            actions
        }
        HostEvent::WindowFocusChanged { window_id } => {
            let mut actions = vec![TablinerAction::WindowFocused { window_id }];
            let active_tab_id = window_id.and_then(|window_id| {
                state
                    .chrome_tabs
                    .as_deref()?
                    .iter()
                    .find(|tab| tab.window_id == window_id && tab.active)
                    .and_then(|tab| tab.id)
            });
            if let Some(tab_id) = active_tab_id {
                actions.push(TablinerAction::TabFocused { tab_id });
            }
            actions
        }
    }
}
