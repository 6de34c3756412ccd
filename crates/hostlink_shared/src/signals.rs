//! Signals sent from the host into the engine.
//!
//! The engine boundary is one-way: the host notifies, the engine never
//! answers. Each variant maps 1:1 onto an engine entry point.

use serde::{Deserialize, Serialize};

/// Ad slot state as reported to the engine.
///
/// The numeric codes are part of the engine boundary and must not change.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdStateCode {
    /// No ad requested yet (or the slot is resting idle).
    #[default]
    None = 0,
    /// A load is in flight.
    Loading = 1,
    /// An ad is loaded and can be shown.
    Ready = 2,
    /// The last load failed.
    Failed = 3,
}

impl AdStateCode {
    /// Returns the wire code.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a wire code. Unknown codes yield `None`.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::None),
            1 => Some(Self::Loading),
            2 => Some(Self::Ready),
            3 => Some(Self::Failed),
            _ => None,
        }
    }

    /// Short lowercase name for logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for AdStateCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single notification crossing into the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum EngineSignal {
    /// The splash video finished; engine startup may proceed.
    VideoFinished,
    /// The user confirmed exiting the application.
    DestroyRequested,
    /// The rewarded ad slot changed state.
    AdState(AdStateCode),
    /// A rewarded ad presentation ended; `true` if the reward was earned.
    AdReward(bool),
    /// Raw pinch span delta in pixels.
    PinchScale(f32),
}

impl EngineSignal {
    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VideoFinished => "video_finished",
            Self::DestroyRequested => "destroy_requested",
            Self::AdState(_) => "ad_state",
            Self::AdReward(_) => "ad_reward",
            Self::PinchScale(_) => "pinch_scale",
        }
    }
}
