//! # Ad Slot State Machine
//!
//! ```text
//!            begin_load              complete_load
//!   ┌──────┐ ─────────> ┌─────────┐ ─────────────> ┌───────┐
//!   │ Idle │            │ Loading │                │ Ready │
//!   └──────┘ <───────── └─────────┘                └───┬───┘
//!      ^     fail_load       (via Failed)              │ begin_show
//!      │                                               v
//!      │                   finish_show            ┌─────────┐
//!      └───────────────────────────────────────── │ Showing │
//!                                                 └─────────┘
//! ```
//!
//! `Failed` is never a resting phase: `fail_load` reports it and leaves the
//! slot in `Idle`, so the next load is always legal.
//!
//! Invariant: a handle is held iff the phase is `Ready` or `Showing`.

use hostlink_shared::AdStateCode;
use thiserror::Error;

use crate::backend::AdHandle;

/// Phase of a rewarded ad slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AdPhase {
    /// Nothing loaded, nothing in flight.
    #[default]
    Idle,
    /// A load is in flight.
    Loading,
    /// An ad is loaded.
    Ready,
    /// The ad is on screen.
    Showing,
    /// A load just failed. Transient.
    Failed,
}

impl AdPhase {
    /// Code reported to the engine on entering this phase, if any.
    #[must_use]
    pub const fn engine_code(self) -> Option<AdStateCode> {
        match self {
            Self::Loading => Some(AdStateCode::Loading),
            Self::Ready => Some(AdStateCode::Ready),
            Self::Failed => Some(AdStateCode::Failed),
            Self::Idle | Self::Showing => None,
        }
    }

    /// True for phases in which the slot holds an ad.
    #[must_use]
    pub const fn holds_handle(self) -> bool {
        matches!(self, Self::Ready | Self::Showing)
    }
}

impl std::fmt::Display for AdPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Loading => "LOADING",
            Self::Ready => "READY",
            Self::Showing => "SHOWING",
            Self::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// A transition that was refused.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionError {
    /// The operation is not legal from the current phase.
    #[error("cannot {action} while {phase}")]
    IllegalPhase {
        /// The refused operation.
        action: &'static str,
        /// Phase at the time.
        phase: AdPhase,
    },

    /// A load was requested while an ad is still held.
    #[error("cannot load while holding ad {0:?}")]
    HandleHeld(AdHandle),
}

/// A transition that happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Phase before.
    pub from: AdPhase,
    /// Phase entered.
    pub to: AdPhase,
}

/// One rewarded ad placement.
#[derive(Clone, Debug, Default)]
pub struct AdSlot {
    phase: AdPhase,
    handle: Option<AdHandle>,
}

impl AdSlot {
    /// Creates an idle, empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> AdPhase {
        self.phase
    }

    /// Loaded ad, if any.
    #[inline]
    #[must_use]
    pub fn handle(&self) -> Option<AdHandle> {
        self.handle
    }

    /// Checks the handle/phase invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.handle.is_some() == self.phase.holds_handle() && self.phase != AdPhase::Failed
    }

    /// Idle → Loading.
    ///
    /// # Errors
    ///
    /// Refused while an ad is held or a load is in flight.
    pub fn begin_load(&mut self) -> Result<Transition, TransitionError> {
        if let Some(handle) = self.handle {
            return Err(TransitionError::HandleHeld(handle));
        }
        self.expect(AdPhase::Idle, "load")?;
        Ok(self.enter(AdPhase::Loading))
    }

    /// Loading → Ready, storing `handle`.
    ///
    /// # Errors
    ///
    /// Refused unless a load is in flight.
    pub fn complete_load(&mut self, handle: AdHandle) -> Result<Transition, TransitionError> {
        self.expect(AdPhase::Loading, "complete a load")?;
        self.handle = Some(handle);
        Ok(self.enter(AdPhase::Ready))
    }

    /// Loading → Failed → Idle. Returns the Loading → Failed transition.
    ///
    /// # Errors
    ///
    /// Refused unless a load is in flight.
    pub fn fail_load(&mut self) -> Result<Transition, TransitionError> {
        self.expect(AdPhase::Loading, "fail a load")?;
        self.handle = None;
        let failed = Transition {
            from: self.phase,
            to: AdPhase::Failed,
        };
        self.phase = AdPhase::Idle;
        Ok(failed)
    }

    /// Ready → Showing. Returns the ad to present.
    ///
    /// # Errors
    ///
    /// Refused unless an ad is ready.
    pub fn begin_show(&mut self) -> Result<AdHandle, TransitionError> {
        self.expect(AdPhase::Ready, "show")?;
        let handle = self.handle.ok_or(TransitionError::IllegalPhase {
            action: "show",
            phase: self.phase,
        })?;
        self.enter(AdPhase::Showing);
        Ok(handle)
    }

    /// Showing → Idle, consuming the ad.
    ///
    /// # Errors
    ///
    /// Refused unless an ad is on screen.
    pub fn finish_show(&mut self) -> Result<AdHandle, TransitionError> {
        self.expect(AdPhase::Showing, "finish a showing")?;
        let handle = self.handle.take().ok_or(TransitionError::IllegalPhase {
            action: "finish a showing",
            phase: self.phase,
        })?;
        self.enter(AdPhase::Idle);
        Ok(handle)
    }

    fn expect(&self, phase: AdPhase, action: &'static str) -> Result<(), TransitionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TransitionError::IllegalPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn enter(&mut self, to: AdPhase) -> Transition {
        let from = self.phase;
        self.phase = to;
        Transition { from, to }
    }
}
