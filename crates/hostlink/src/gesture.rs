//! # Pinch Gesture Bridge
//!
//! Keeps a running, clamped scale factor across gesture sessions and
//! forwards the raw span movement of every event to the engine.
//!
//! The two values are deliberately decoupled: the engine receives the
//! unclamped span delta (gesture velocity) and applies its own limits,
//! while the factor kept here stays within bounds for display.

use std::sync::Arc;

use hostlink_core::{EngineSignalPort, GestureConfig};
use parking_lot::Mutex;

/// Running pinch scale factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleState {
    factor: f32,
    min: f32,
    max: f32,
}

impl ScaleState {
    /// Creates a state at `config.initial_scale`, clamped into the bounds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            factor: config.initial_scale.clamp(config.min_scale, config.max_scale),
            min: config.min_scale,
            max: config.max_scale,
        }
    }

    /// Current factor.
    #[inline]
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// Multiplies the factor by `scale_delta` and clamps it.
    ///
    /// Non-finite or non-positive deltas leave the factor untouched.
    pub fn apply(&mut self, scale_delta: f32) -> f32 {
        if scale_delta.is_finite() && scale_delta > 0.0 {
            self.factor = (self.factor * scale_delta).clamp(self.min, self.max);
        }
        self.factor
    }
}

impl Default for ScaleState {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

/// Converts scale events into engine pinch signals.
pub struct GestureBridge {
    state: Mutex<ScaleState>,
    engine: Arc<dyn EngineSignalPort>,
}

impl std::fmt::Debug for GestureBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureBridge")
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl GestureBridge {
    /// Creates a bridge starting at the configured factor.
    #[must_use]
    pub fn new(config: GestureConfig, engine: Arc<dyn EngineSignalPort>) -> Self {
        Self {
            state: Mutex::new(ScaleState::new(config)),
            engine,
        }
    }

    /// Handles one scale event from the platform recognizer.
    ///
    /// Returns the updated factor.
    pub fn on_scale_event(&self, current_span: f32, previous_span: f32, scale_delta: f32) -> f32 {
        let factor = self.state.lock().apply(scale_delta);

        let span_delta = current_span - previous_span;
        if span_delta.is_finite() {
            tracing::trace!("pinch span {:+.2}, factor {:.3}", span_delta, factor);
            self.engine.notify_pinch_scale(span_delta);
        } else {
            tracing::debug!("non-finite pinch span dropped");
        }
        factor
    }

    /// Current factor.
    #[must_use]
    pub fn factor(&self) -> f32 {
        self.state.lock().factor()
    }
}
