//! # Hostlink Core
//!
//! Threading primitives for the host/engine bridge:
//! - a single-threaded UI executor with a thread-safe submission handle
//! - a one-shot latch and the blocking modal prompt built on top of it
//! - the fire-and-forget engine signal port
//!
//! ## Architecture Rules
//!
//! 1. **UI state lives on the UI executor** - other threads submit tasks
//! 2. **Only prompts block** - and only non-UI callers
//! 3. **Fail open** - a caller blocked on a prompt always has a path back
//!
//! ## Example
//!
//! ```rust,ignore
//! use hostlink_core::{BlockingPrompt, UiThread, BridgeConfig};
//!
//! let config = BridgeConfig::default();
//! let ui = UiThread::spawn(&config.executor)?;
//! let prompt = BlockingPrompt::new(ui.handle(), dialogs, config.prompt.clone());
//!
//! // From the engine thread:
//! prompt.show("Progress saved");
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod executor;
pub mod latch;
pub mod port;
pub mod prompt;

pub use config::{
    AdConfig, BridgeConfig, ExecutorConfig, ExitConfig, GestureConfig, HapticsConfig,
    PromptConfig,
};
pub use error::{BridgeError, BridgeResult};
pub use executor::{UiExecutor, UiHandle, UiTask, UiThread};
pub use latch::{Latch, WaitOutcome};
pub use port::{ChannelEnginePort, EngineSignalPort};
pub use prompt::{
    BlockingPrompt, ConfirmReply, ConfirmRequest, DialogHost, DismissAction, PromptOutcome,
    PromptRequest,
};
