//! # Hostlink Ads
//!
//! Rewarded ad slot lifecycle for the host/engine bridge.
//!
//! - [`backend`]: the port to the advertising SDK and its event vocabulary
//! - [`slot`]: the pure slot state machine
//! - [`controller`]: request handling, event marshalling, auto-reload
//!
//! ```text
//!   engine ──request_load/show──> [UI executor] ──> AdSlot ──> AdBackend
//!                                       ^                          │
//!   EngineSignalPort <── state/reward ──┴──── AdEventSink <────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod controller;
pub mod slot;

pub use backend::{AdBackend, AdEvent, AdHandle, LoadRequest};
pub use controller::{AdEventSink, AdLifecycleController, AdStats};
pub use slot::{AdPhase, AdSlot, Transition, TransitionError};
