//! Single-writer store that owns the state and folds host events into it.

use anyhow::Context;
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, unbounded};

use tabliner_model::{TablinerAction, TablinerState, verify_tab_order};

use super::host::{Host, HostCommand, HostEvent, Subscription, actions_for_event, focused_window_id};
use crate::settings::AppSettings;

/// Owns the [`TablinerState`] and the host connection.
///
/// Every state change goes through [`Tabliner::dispatch`]. A reducer error
/// means the model no longer matches the host: the last good state is kept
/// and, when enabled, a fresh tab query replaces the collection.
pub struct Tabliner<H: Host> {
    host: H,
    settings: AppSettings,
    state: TablinerState,
    events: Option<UnboundedReceiver<HostEvent>>,
    subscription: Option<Subscription>,
    divergences: usize,
}

impl<H: Host> Tabliner<H> {
    pub fn new(host: H, settings: AppSettings) -> Self {
        Self {
            host,
            settings,
            state: TablinerState::new(),
            events: None,
            subscription: None,
            divergences: 0,
        }
    }

    pub fn state(&self) -> &TablinerState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    /// Number of reducer errors seen so far.
    pub fn divergence_count(&self) -> usize {
        self.divergences
    }

    /// Subscribes to host events, then loads tabs, window focus and the
    /// UI's own tab id.
    ///
    /// The subscription comes first so no event is lost between the query
    /// and the listener registration.
    pub fn start(&mut self) -> anyhow::Result<()> {
        let (sender, receiver) = unbounded();
        self.subscription = Some(
            self.host
                .subscribe(sender)
                .context("failed to subscribe to host events")?,
        );
        self.events = Some(receiver);

        let tabs = self.host.query_tabs().context("failed to query tabs")?;
        if self.settings.verify_initial_order {
            verify_tab_order(&tabs).context("initial tab query is out of order")?;
        }
        log::info!("loaded {} tabs", tabs.len());
        self.dispatch(TablinerAction::BulkLoadTabs { tabs });

        let windows = self
            .host
            .query_windows()
            .context("failed to query windows")?;
        let window_id = focused_window_id(&windows)?;
        self.dispatch(TablinerAction::WindowFocused { window_id });

        match self.host.own_tab_id().context("failed to resolve own tab")? {
            Some(tab_id) => {
                self.dispatch(TablinerAction::OwnIdentityResolved { tab_id });
            }
            None => log::debug!("host did not report our own tab id"),
        }
        Ok(())
    }

    /// Unregisters the host listener. Events already queued are dropped.
    pub fn stop(&mut self) {
        self.subscription.take();
        self.events.take();
    }

    /// Applies `action`, returning whether the state accepted it.
    pub fn dispatch(&mut self, action: TablinerAction) -> bool {
        match self.state.reduce(&action) {
            Ok(next) => {
                log::trace!("applied {}", action.name());
                self.state = next;
                true
            }
            Err(err) => {
                self.divergences += 1;
                log::error!("model diverged from host on {}: {err}", action.name());
                if self.settings.reload_on_divergence {
                    self.reload();
                }
                false
            }
        }
    }

    /// Replaces the tab collection with a fresh host query.
    pub fn reload(&mut self) {
        match self.host.query_tabs() {
            Ok(tabs) => {
                log::info!("reloading {} tabs from host", tabs.len());
                let action = TablinerAction::BulkLoadTabs { tabs };
                if let Ok(next) = self.state.reduce(&action) {
                    self.state = next;
                }
            }
            Err(err) => log::error!("failed to reload tabs: {err:#}"),
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        log::debug!("host event {event:?}");
        for action in actions_for_event(&self.state, event) {
            self.dispatch(action);
        }
    }

    /// Waits for the next host event and folds it into the state.
    ///
    /// Returns `false` once the event channel is closed or was never opened.
    pub async fn next_event(&mut self) -> bool {
        let Some(events) = self.events.as_mut() else {
            return false;
        };
        match events.next().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Folds host events until the host closes the channel.
    pub async fn run(&mut self) {
        while self.next_event().await {}
        log::info!("host event stream closed");
    }

    pub(super) fn command(&self, command: HostCommand) -> anyhow::Result<()> {
        log::info!("host command {command:?}");
        self.host
            .execute(command)
            .context("host rejected command")
    }
}
