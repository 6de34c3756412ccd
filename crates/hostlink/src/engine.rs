//! # Engine Inbox
//!
//! The engine-side end of [`ChannelEnginePort`](hostlink_core::ChannelEnginePort).
//! The engine thread calls [`EngineInbox::pump`] once per frame; signals are
//! folded into an [`EngineView`] and dispatched to the engine's reward action
//! and pinch listeners.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError};
use hostlink_shared::{AdStateCode, EngineSignal};

/// What the engine knows about the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EngineView {
    /// Last reported ad slot state.
    pub ad_state: AdStateCode,
    /// The splash finished; the engine may start.
    pub video_finished: bool,
    /// The user confirmed exit.
    pub destroy_requested: bool,
    /// Span delta of the most recent pinch event.
    pub last_pinch_delta: Option<f32>,
    /// Showings that ended with the reward earned.
    pub rewards_earned: u32,
    /// Showings that ended without it.
    pub rewards_missed: u32,
    /// Signals processed so far.
    pub signals: u64,
}

impl EngineView {
    /// True once the engine is allowed past its startup gate.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.video_finished && !self.destroy_requested
    }
}

/// Id of a pinch subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type RewardAction = Box<dyn FnMut(bool) + Send>;
type PinchListener = Box<dyn FnMut(f32) + Send>;

/// Receives host signals on the engine thread.
pub struct EngineInbox {
    receiver: Receiver<EngineSignal>,
    view: EngineView,
    reward_action: Option<RewardAction>,
    pinch_listeners: Vec<(ListenerId, PinchListener)>,
    next_listener: u64,
}

impl std::fmt::Debug for EngineInbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineInbox")
            .field("view", &self.view)
            .field("pinch_listeners", &self.pinch_listeners.len())
            .finish_non_exhaustive()
    }
}

impl EngineInbox {
    /// Wraps the receiving half of an engine port.
    #[must_use]
    pub fn new(receiver: Receiver<EngineSignal>) -> Self {
        Self {
            receiver,
            view: EngineView::default(),
            reward_action: None,
            pinch_listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// Processes every signal already queued. Returns how many.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(signal) = self.receiver.try_recv() {
            self.apply(signal);
            processed += 1;
        }
        processed
    }

    /// Waits up to `timeout` for one signal and processes it.
    pub fn wait_for(&mut self, timeout: Duration) -> Option<EngineSignal> {
        match self.receiver.recv_timeout(timeout) {
            Ok(signal) => {
                self.apply(signal);
                Some(signal)
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Current view.
    #[must_use]
    pub fn view(&self) -> &EngineView {
        &self.view
    }

    /// Installs the action run with the outcome of every rewarded showing.
    pub fn set_reward_action<F>(&mut self, action: F)
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.reward_action = Some(Box::new(action));
    }

    /// Removes the reward action.
    pub fn clear_reward_action(&mut self) {
        self.reward_action = None;
    }

    /// Subscribes to pinch span deltas.
    pub fn subscribe_pinch<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(f32) + Send + 'static,
    {
        self.next_listener += 1;
        let id = ListenerId(self.next_listener);
        self.pinch_listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a pinch subscription. Returns false if it was unknown.
    pub fn unsubscribe_pinch(&mut self, id: ListenerId) -> bool {
        let before = self.pinch_listeners.len();
        self.pinch_listeners.retain(|(listener, _)| *listener != id);
        self.pinch_listeners.len() != before
    }

    fn apply(&mut self, signal: EngineSignal) {
        self.view.signals += 1;
        match signal {
            EngineSignal::VideoFinished => self.view.video_finished = true,
            EngineSignal::DestroyRequested => {
                tracing::info!("engine received destroy request");
                self.view.destroy_requested = true;
            }
            EngineSignal::AdState(state) => self.view.ad_state = state,
            EngineSignal::AdReward(earned) => {
                if earned {
                    self.view.rewards_earned += 1;
                } else {
                    self.view.rewards_missed += 1;
                }
                match self.reward_action.as_mut() {
                    Some(action) => action(earned),
                    None => tracing::debug!("no reward action installed"),
                }
            }
            EngineSignal::PinchScale(delta) => {
                self.view.last_pinch_delta = Some(delta);
                for (_, listener) in &mut self.pinch_listeners {
                    listener(delta);
                }
            }
        }
    }
}
