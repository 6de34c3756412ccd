//! Inbound/outbound port to the advertising SDK.
//!
//! The SDK's listener zoo (load callback, full-screen callback, reward
//! listener) collapses into one [`AdEvent`] enum delivered through an
//! [`AdEventSink`]. The controller never sees SDK types.

use crate::controller::AdEventSink;

/// Opaque reference to a loaded ad instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AdHandle(u64);

impl AdHandle {
    /// Wraps a backend-specific id.
    #[inline]
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Backend-specific id.
    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Parameters of one load.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadRequest {
    /// Ad unit to load from.
    pub unit_id: String,
    /// Tag the request for child-directed treatment.
    pub child_directed: bool,
}

/// Everything the SDK can report back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdEvent {
    /// A load finished; the ad can be shown.
    Loaded(AdHandle),
    /// A load failed.
    LoadFailed {
        /// SDK error text.
        reason: String,
    },
    /// The ad took over the screen.
    Shown,
    /// The user earned the reward. Fires at most once per showing, before
    /// the terminal event.
    RewardEarned {
        /// Reward amount configured in the SDK console.
        amount: i32,
        /// Reward type configured in the SDK console.
        kind: String,
    },
    /// The user closed the ad. Terminal.
    Dismissed,
    /// The ad could not be displayed. Terminal.
    ShowFailed {
        /// SDK error text.
        reason: String,
    },
}

impl AdEvent {
    /// True for events that end a showing.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Dismissed | Self::ShowFailed { .. })
    }
}

/// The advertising SDK as seen by the controller.
///
/// Both calls are made on the UI thread and must return promptly; results
/// come back later through `events`, from any thread.
pub trait AdBackend: Send + Sync {
    /// Starts loading one rewarded ad.
    fn load(&self, request: LoadRequest, events: AdEventSink);

    /// Presents a previously loaded ad.
    fn show(&self, handle: AdHandle, events: AdEventSink);
}
