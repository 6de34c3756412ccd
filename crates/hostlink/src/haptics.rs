//! Device vibration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hostlink_core::HapticsConfig;
use hostlink_shared::{MAX_AMPLITUDE, PLATFORM_DEFAULT_AMPLITUDE};

/// Vibration strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Amplitude {
    /// Let the platform pick.
    PlatformDefault,
    /// Explicit strength, 1..=255.
    Level(u8),
}

impl Amplitude {
    /// Interprets the engine's raw amplitude.
    ///
    /// `-1` selects the platform default; anything else is clamped into
    /// `1..=255`.
    #[must_use]
    pub fn from_raw(raw: i32) -> Self {
        if raw == PLATFORM_DEFAULT_AMPLITUDE {
            return Self::PlatformDefault;
        }
        let level = raw.clamp(1, i32::from(MAX_AMPLITUDE));
        // Clamped into u8 range above.
        Self::Level(u8::try_from(level).unwrap_or(MAX_AMPLITUDE))
    }
}

/// The device's vibration motor.
pub trait Vibrator: Send + Sync {
    /// Vibrates once.
    fn vibrate(&self, duration: Duration, amplitude: Amplitude);
}

/// Vibration entry point with a master switch.
pub struct Haptics {
    vibrator: Arc<dyn Vibrator>,
    default_duration_ms: u32,
    enabled: AtomicBool,
}

impl std::fmt::Debug for Haptics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Haptics")
            .field("enabled", &self.is_enabled())
            .field("default_duration_ms", &self.default_duration_ms)
            .finish_non_exhaustive()
    }
}

impl Haptics {
    /// Creates the entry point.
    #[must_use]
    pub fn new(vibrator: Arc<dyn Vibrator>, config: HapticsConfig) -> Self {
        Self {
            vibrator,
            default_duration_ms: config.default_duration_ms,
            enabled: AtomicBool::new(config.enabled),
        }
    }

    /// Vibrates for `duration_ms` (0 picks the configured default).
    ///
    /// Returns false if haptics are switched off.
    pub fn vibrate(&self, duration_ms: u32, amplitude: i32) -> bool {
        if !self.is_enabled() {
            tracing::trace!("vibration suppressed");
            return false;
        }

        let ms = if duration_ms == 0 {
            self.default_duration_ms
        } else {
            duration_ms
        };
        self.vibrator
            .vibrate(Duration::from_millis(u64::from(ms)), Amplitude::from_raw(amplitude));
        true
    }

    /// Turns haptics on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }

    /// True while haptics are on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }
}
