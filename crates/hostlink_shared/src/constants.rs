//! # Bridge Constants
//!
//! Policy values baked into the bridge. Every one of them can be overridden
//! through `BridgeConfig`; these are the defaults.

// =============================================================================
// GESTURES
// =============================================================================

/// Lower bound of the running pinch scale factor.
pub const SCALE_FACTOR_MIN: f32 = 0.01;

/// Upper bound of the running pinch scale factor.
pub const SCALE_FACTOR_MAX: f32 = 100.0;

/// Scale factor at process start.
pub const INITIAL_SCALE_FACTOR: f32 = 1.0;

// =============================================================================
// HAPTICS
// =============================================================================

/// One-shot vibration length used when the engine does not pick one.
pub const DEFAULT_VIBRATION_MS: u32 = 200;

/// Amplitude value meaning "let the platform decide".
pub const PLATFORM_DEFAULT_AMPLITUDE: i32 = -1;

/// Strongest explicit amplitude.
pub const MAX_AMPLITUDE: u8 = 255;

// =============================================================================
// DIALOG TEXT
// =============================================================================

/// Title of the modal shown by `show_blocking_message`.
pub const PROMPT_TITLE: &str = "Notice";

/// Label of the single button closing a blocking message.
pub const DISMISS_LABEL: &str = "Close";

/// Title of the exit confirmation dialog.
pub const EXIT_TITLE: &str = "Exit Application?";

/// Body of the exit confirmation dialog.
pub const EXIT_MESSAGE: &str = "Click yes to exit!";

/// Accept label of the exit confirmation dialog.
pub const EXIT_ACCEPT_LABEL: &str = "Yes";

/// Decline label of the exit confirmation dialog.
pub const EXIT_DECLINE_LABEL: &str = "No";

// =============================================================================
// ADS
// =============================================================================

/// Consecutive load failures retried automatically before the slot rests in Idle.
pub const DEFAULT_MAX_LOAD_RETRIES: u32 = 3;

// =============================================================================
// EXECUTOR
// =============================================================================

/// How often a dedicated UI thread re-checks its shutdown flag (ms).
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 10;

/// Name given to a dedicated UI thread.
pub const DEFAULT_UI_THREAD_NAME: &str = "hostlink-ui";
