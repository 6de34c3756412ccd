//! # Hostlink Shared
//!
//! Vocabulary shared by the host side and the engine side of the bridge.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on:
//! - threading or channel crates
//! - collaborator traits (dialogs, ads, video)
//!
//! If you need behavior, put it in `hostlink_core` or above.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod signals;

pub use constants::{
    DEFAULT_VIBRATION_MS, INITIAL_SCALE_FACTOR, MAX_AMPLITUDE, PLATFORM_DEFAULT_AMPLITUDE,
    SCALE_FACTOR_MAX, SCALE_FACTOR_MIN,
};
pub use signals::{AdStateCode, EngineSignal};
