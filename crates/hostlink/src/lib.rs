//! # Hostlink
//!
//! The coordination layer between a single-threaded host UI loop and a
//! background engine thread.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`splash`] | One-shot gate holding engine startup until the splash ends |
//! | [`gesture`] | Pinch events → clamped factor + raw span delta |
//! | [`haptics`] | Vibration with amplitude mapping and a master switch |
//! | [`lifecycle`] | Pause/resume/focus/back → bridge actions |
//! | [`engine`] | Engine-side signal inbox |
//! | [`host`] | [`HostBridge`], the composition of all of the above |
//!
//! Prompts, the UI executor and the engine port live in `hostlink_core`;
//! the rewarded ad lifecycle lives in `hostlink_ads`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
pub mod gesture;
pub mod haptics;
pub mod host;
pub mod lifecycle;
pub mod splash;

pub use engine::{EngineInbox, EngineView, ListenerId};
pub use gesture::{GestureBridge, ScaleState};
pub use haptics::{Amplitude, Haptics, Vibrator};
pub use host::{HostBridge, HostServices};
pub use lifecycle::{actions_for, LifecycleAction, LifecycleEvent};
pub use splash::{ChromeHost, SplashGate, SplashPlayer};
