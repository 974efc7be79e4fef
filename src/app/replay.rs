//! Recorded host sessions.
//!
//! A session file holds what the host reported at startup plus an ordered
//! list of steps: host events, user commands and changes to what a fresh
//! tab query would return. [`ReplayHost`] plays the host side and records
//! every command it receives.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, bail};
use futures::channel::mpsc::UnboundedSender;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use tabliner_model::{Tab, TabId, TablinerState};

use super::handlers::UserCommand;
use super::host::{Host, HostCommand, HostEvent, HostWindow, Subscription};
use super::store::Tabliner;
use crate::settings::AppSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaySession {
    /// Result of the initial tab query.
    pub tabs: Vec<Tab>,
    #[serde(default)]
    pub windows: Vec<HostWindow>,
    #[serde(default)]
    pub own_tab_id: Option<TabId>,
    #[serde(default)]
    pub steps: Vec<ReplayStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReplayStep {
    Event(HostEvent),
    Command(UserCommand),
    /// Replaces what the host returns to later tab queries.
    Snapshot(Vec<Tab>),
}

impl ReplaySession {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse session {}", path.display()))
    }
}

type Listener = Arc<Mutex<Option<UnboundedSender<HostEvent>>>>;

/// Host backed by a recorded session.
pub struct ReplayHost {
    tabs: Mutex<Vec<Tab>>,
    windows: Vec<HostWindow>,
    own_tab_id: Option<TabId>,
    listener: Listener,
    commands: Mutex<Vec<HostCommand>>,
}

impl ReplayHost {
    pub fn new(session: &ReplaySession) -> Self {
        Self {
            tabs: Mutex::new(session.tabs.clone()),
            windows: session.windows.clone(),
            own_tab_id: session.own_tab_id,
            listener: Arc::new(Mutex::new(None)),
            commands: Mutex::new(Vec::new()),
        }
    }

    /// Sends `event` to the subscribed listener.
    pub fn emit(&self, event: HostEvent) -> anyhow::Result<()> {
        let listener = self.listener.lock();
        let Some(sender) = listener.as_ref() else {
            bail!("no listener subscribed");
        };
        sender
            .unbounded_send(event)
            .context("listener dropped its receiver")
    }

    /// Closes the event stream, as a host shutting down would.
    pub fn close(&self) {
        if let Some(sender) = self.listener.lock().take() {
            sender.close_channel();
        }
    }

    #[cfg(test)]
    pub fn is_subscribed(&self) -> bool {
        self.listener.lock().is_some()
    }

    pub fn set_tabs(&self, tabs: Vec<Tab>) {
        *self.tabs.lock() = tabs;
    }

    /// Every command received so far, oldest first.
    pub fn commands(&self) -> Vec<HostCommand> {
        self.commands.lock().clone()
    }
}

impl Host for ReplayHost {
    fn query_tabs(&self) -> anyhow::Result<Vec<Tab>> {
        Ok(self.tabs.lock().clone())
    }

    fn query_windows(&self) -> anyhow::Result<Vec<HostWindow>> {
        Ok(self.windows.clone())
    }

    fn own_tab_id(&self) -> anyhow::Result<Option<TabId>> {
        Ok(self.own_tab_id)
    }

    fn subscribe(&self, sender: UnboundedSender<HostEvent>) -> anyhow::Result<Subscription> {
        let mut listener = self.listener.lock();
        if listener.is_some() {
            bail!("a listener is already subscribed");
        }
        *listener = Some(sender);

        let listener = self.listener.clone();
        Ok(Subscription::new(move || {
            listener.lock().take();
        }))
    }

    fn execute(&self, command: HostCommand) -> anyhow::Result<()> {
        self.commands.lock().push(command);
        Ok(())
    }
}

/// Plays `session` through a fresh store.
///
/// `on_step` sees the state after every step, with the step's position.
pub fn play(
    session: ReplaySession,
    settings: AppSettings,
    mut on_step: impl FnMut(usize, &TablinerState),
) -> anyhow::Result<Tabliner<ReplayHost>> {
    let mut store = Tabliner::new(ReplayHost::new(&session), settings);
    store.start()?;

    smol::block_on(async {
        for (position, step) in session.steps.into_iter().enumerate() {
            match step {
                ReplayStep::Event(event) => {
                    store.host().emit(event)?;
                    if !store.next_event().await {
                        bail!("event stream closed at step {position}");
                    }
                }
                ReplayStep::Command(command) => {
                    store
                        .run_command(command)
                        .with_context(|| format!("command failed at step {position}"))?;
                }
                ReplayStep::Snapshot(tabs) => store.host().set_tabs(tabs),
            }
            on_step(position, store.state());
        }

        store.host().close();
        store.run().await;
        anyhow::Ok(())
    })?;

    store.stop();
    Ok(store)
}
