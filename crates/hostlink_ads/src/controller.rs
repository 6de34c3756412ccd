//! # Rewarded Ad Lifecycle Controller
//!
//! Drives one [`AdSlot`] from requests (engine side) and [`AdEvent`]s
//! (SDK side). Every mutation happens inside a task on the UI executor;
//! SDK callbacks arriving on other threads go through [`AdEventSink`],
//! which re-marshals them first.
//!
//! Policies:
//! - Requests that are not legal in the current phase are dropped, never
//!   queued.
//! - A terminal showing event always reports the reward flag once, then
//!   reloads immediately.
//! - A failed load is retried up to `max_load_retries` consecutive times.

use std::sync::{Arc, Weak};

use hostlink_core::{AdConfig, EngineSignalPort, UiHandle};
use hostlink_shared::AdStateCode;
use parking_lot::Mutex;

use crate::backend::{AdBackend, AdEvent, LoadRequest};
use crate::slot::{AdPhase, AdSlot, Transition};

/// Where the SDK reports results for one load or showing.
///
/// Safe to call from any thread. Events for an operation that is no longer
/// current are discarded by the controller.
#[derive(Clone)]
pub struct AdEventSink {
    ticket: u64,
    ui: UiHandle,
    controller: Weak<AdLifecycleController>,
}

impl std::fmt::Debug for AdEventSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdEventSink")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

impl AdEventSink {
    /// Ticket of the operation this sink belongs to.
    #[must_use]
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Hands `event` to the controller on the UI thread.
    pub fn deliver(&self, event: AdEvent) {
        let controller = self.controller.clone();
        let ticket = self.ticket;
        let submitted = self.ui.submit(move || {
            if let Some(controller) = controller.upgrade() {
                controller.apply_event(ticket, event);
            }
        });
        if let Err(e) = submitted {
            tracing::warn!("ad event for ticket {} dropped: {}", ticket, e);
        }
    }
}

/// Counters kept by the controller.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AdStats {
    /// Loads handed to the backend.
    pub loads_started: u64,
    /// Loads the backend reported as failed.
    pub loads_failed: u64,
    /// Loads issued by the retry policy.
    pub load_retries: u64,
    /// Showings handed to the backend.
    pub shows_started: u64,
    /// Showings that reached a terminal event.
    pub shows_completed: u64,
    /// Showings that ended with the reward earned.
    pub rewards_granted: u64,
    /// Load/show requests dropped as illegal in the current phase.
    pub requests_dropped: u64,
    /// Backend events ignored for carrying an old ticket.
    pub stale_events: u64,
}

#[derive(Debug, Default)]
struct ControllerState {
    slot: AdSlot,
    reward_earned: bool,
    /// Ticket of the current backend operation.
    ticket: u64,
    consecutive_failures: u32,
    stats: AdStats,
}

impl ControllerState {
    fn next_ticket(&mut self) -> u64 {
        self.ticket += 1;
        self.ticket
    }
}

/// Owner of the rewarded ad slot.
pub struct AdLifecycleController {
    ui: UiHandle,
    backend: Arc<dyn AdBackend>,
    engine: Arc<dyn EngineSignalPort>,
    config: AdConfig,
    state: Mutex<ControllerState>,
}

impl std::fmt::Debug for AdLifecycleController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdLifecycleController")
            .field("phase", &self.phase())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl AdLifecycleController {
    /// Creates a controller with an idle slot.
    #[must_use]
    pub fn new(
        ui: UiHandle,
        backend: Arc<dyn AdBackend>,
        engine: Arc<dyn EngineSignalPort>,
        config: AdConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            ui,
            backend,
            engine,
            config,
            state: Mutex::new(ControllerState::default()),
        })
    }

    /// Asks for an ad to be loaded. Callable from any thread.
    ///
    /// Resets the failure retry budget if the load actually starts; a
    /// request dropped because the slot is busy leaves the budget alone.
    pub fn request_load(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.marshal("load", move || this.load_now(true));
    }

    /// Asks for the loaded ad to be shown. Callable from any thread.
    pub fn request_show(self: &Arc<Self>) {
        let this = Arc::clone(self);
        self.marshal("show", move || this.show_now());
    }

    /// Current slot phase.
    #[must_use]
    pub fn phase(&self) -> AdPhase {
        self.state.lock().slot.phase()
    }

    /// True while an ad is loaded or on screen.
    #[must_use]
    pub fn has_handle(&self) -> bool {
        self.state.lock().slot.handle().is_some()
    }

    /// True if the current showing earned its reward so far.
    #[must_use]
    pub fn reward_pending(&self) -> bool {
        self.state.lock().reward_earned
    }

    /// Snapshot of the counters.
    #[must_use]
    pub fn stats(&self) -> AdStats {
        self.state.lock().stats
    }

    /// Checks the slot invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.state.lock().slot.is_consistent()
    }

    fn marshal<F>(&self, what: &str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.ui.submit(task) {
            tracing::warn!("ad {} request not delivered: {}", what, e);
        }
    }

    fn sink(self: &Arc<Self>, ticket: u64) -> AdEventSink {
        AdEventSink {
            ticket,
            ui: self.ui.clone(),
            controller: Arc::downgrade(self),
        }
    }

    /// Starts a load if the slot allows it. UI thread only.
    ///
    /// `fresh` loads start a new retry budget; retries spend the current one.
    fn load_now(self: &Arc<Self>, fresh: bool) {
        let ticket = {
            let mut state = self.state.lock();
            match state.slot.begin_load() {
                Ok(transition) => {
                    log_transition(transition);
                    if fresh {
                        state.consecutive_failures = 0;
                    }
                    state.stats.loads_started += 1;
                    state.next_ticket()
                }
                Err(e) => {
                    state.stats.requests_dropped += 1;
                    tracing::debug!("ad load request ignored: {}", e);
                    return;
                }
            }
        };

        self.engine.notify_ad_state(AdStateCode::Loading);
        let request = LoadRequest {
            unit_id: self.config.unit_id.clone(),
            child_directed: self.config.child_directed,
        };
        self.backend.load(request, self.sink(ticket));
    }

    /// Starts a showing if an ad is ready. UI thread only.
    fn show_now(self: &Arc<Self>) {
        let (handle, ticket) = {
            let mut state = self.state.lock();
            match state.slot.begin_show() {
                Ok(handle) => {
                    log_transition(Transition {
                        from: AdPhase::Ready,
                        to: AdPhase::Showing,
                    });
                    state.reward_earned = false;
                    state.stats.shows_started += 1;
                    (handle, state.next_ticket())
                }
                Err(e) => {
                    state.stats.requests_dropped += 1;
                    tracing::debug!("ad show request ignored: {}", e);
                    return;
                }
            }
        };

        self.backend.show(handle, self.sink(ticket));
    }

    /// Applies one backend event. UI thread only.
    fn apply_event(self: &Arc<Self>, ticket: u64, event: AdEvent) {
        let mut state = self.state.lock();
        if ticket != state.ticket {
            state.stats.stale_events += 1;
            tracing::debug!(
                "ignoring stale ad event (ticket {}, current {})",
                ticket,
                state.ticket
            );
            return;
        }

        match event {
            AdEvent::Loaded(handle) => match state.slot.complete_load(handle) {
                Ok(transition) => {
                    log_transition(transition);
                    state.consecutive_failures = 0;
                    drop(state);
                    self.engine.notify_ad_state(AdStateCode::Ready);
                }
                Err(e) => tracing::warn!("unexpected load result: {}", e),
            },

            AdEvent::LoadFailed { reason } => match state.slot.fail_load() {
                Ok(transition) => {
                    log_transition(transition);
                    tracing::warn!("rewarded ad failed to load: {}", reason);
                    state.stats.loads_failed += 1;
                    state.consecutive_failures += 1;
                    let retry = state.consecutive_failures <= self.config.max_load_retries;
                    if retry {
                        state.stats.load_retries += 1;
                    }
                    drop(state);

                    self.engine.notify_ad_state(AdStateCode::Failed);
                    if retry {
                        self.load_now(false);
                    }
                }
                Err(e) => tracing::warn!("unexpected load failure: {}", e),
            },

            AdEvent::Shown => tracing::debug!("rewarded ad on screen"),

            AdEvent::RewardEarned { amount, kind } => {
                if state.slot.phase() == AdPhase::Showing {
                    tracing::debug!("reward earned: {} {}", amount, kind);
                    state.reward_earned = true;
                } else {
                    tracing::warn!("reward outside a showing ignored");
                }
            }

            AdEvent::Dismissed | AdEvent::ShowFailed { .. } => {
                if let AdEvent::ShowFailed { reason } = &event {
                    tracing::warn!("rewarded ad failed to show: {}", reason);
                }
                match state.slot.finish_show() {
                    Ok(_) => {
                        log_transition(Transition {
                            from: AdPhase::Showing,
                            to: AdPhase::Idle,
                        });
                        let earned = std::mem::take(&mut state.reward_earned);
                        state.stats.shows_completed += 1;
                        if earned {
                            state.stats.rewards_granted += 1;
                        }
                        drop(state);

                        self.engine.notify_ad_reward(earned);
                        self.load_now(true);
                    }
                    Err(e) => tracing::warn!("unexpected end of showing: {}", e),
                }
            }
        }
    }
}

fn log_transition(transition: Transition) {
    tracing::info!("ad slot {} -> {}", transition.from, transition.to);
}
