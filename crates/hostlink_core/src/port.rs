//! Outbound notification surface into the engine.
//!
//! Fire-and-forget: no return values, no acknowledgement, no back-pressure.
//! Implementations must never block the caller. Ordering is only guaranteed
//! per calling thread.

use crossbeam_channel::{unbounded, Receiver, Sender};
use hostlink_shared::{AdStateCode, EngineSignal};

/// One-way calls from the host into the engine.
pub trait EngineSignalPort: Send + Sync {
    /// The splash video finished playing.
    fn notify_video_finished(&self);

    /// The user confirmed exiting the application.
    fn request_destroy(&self);

    /// The rewarded ad slot changed state.
    fn notify_ad_state(&self, state: AdStateCode);

    /// A rewarded ad presentation ended.
    fn notify_ad_reward(&self, earned: bool);

    /// A pinch gesture moved by `delta` pixels of span.
    fn notify_pinch_scale(&self, delta: f32);
}

/// Engine port backed by an unbounded channel.
///
/// The receiving half is drained on the engine thread (see the `hostlink`
/// crate's engine inbox).
#[derive(Clone, Debug)]
pub struct ChannelEnginePort {
    sender: Sender<EngineSignal>,
}

impl ChannelEnginePort {
    /// Creates a port and the receiver the engine drains.
    #[must_use]
    pub fn channel() -> (Self, Receiver<EngineSignal>) {
        let (sender, receiver) = unbounded();
        (Self { sender }, receiver)
    }

    fn send(&self, signal: EngineSignal) {
        if self.sender.send(signal).is_err() {
            tracing::debug!("engine gone; dropping {} signal", signal.name());
        }
    }
}

impl EngineSignalPort for ChannelEnginePort {
    fn notify_video_finished(&self) {
        self.send(EngineSignal::VideoFinished);
    }

    fn request_destroy(&self) {
        self.send(EngineSignal::DestroyRequested);
    }

    fn notify_ad_state(&self, state: AdStateCode) {
        self.send(EngineSignal::AdState(state));
    }

    fn notify_ad_reward(&self, earned: bool) {
        self.send(EngineSignal::AdReward(earned));
    }

    fn notify_pinch_scale(&self, delta: f32) {
        self.send(EngineSignal::PinchScale(delta));
    }
}
