//! # Blocking Prompt
//!
//! Lets a non-UI thread put a modal dialog on screen and sleep until the user
//! closes it.
//!
//! ```text
//!  Engine thread                      UI thread
//!  ─────────────                      ─────────
//!  show("saved")
//!    ├─ latch = closed
//!    ├─ submit(present dialog) ──────> DialogHost::show_message(req, dismiss)
//!    └─ latch.wait() ...                 ... user taps "Close"
//!                                      dismiss.dismiss() ── latch.release()
//!    <─────────────────────────────────────────────────────┘
//!  returns Dismissed
//! ```
//!
//! ## Fail-open rules
//!
//! The caller must never be stranded:
//! - submission refused → return `NotShown` without waiting
//! - dismissal action dropped unused → latch released
//! - wait interrupted → treated as dismissed
//! - optional deadline → treated as dismissed
//!
//! Calling `show` on the UI thread would deadlock. It is refused and logged.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::PromptConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::executor::UiHandle;
use crate::latch::{Latch, WaitOutcome};

/// A one-button modal dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptRequest {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Label of the only button.
    pub dismiss_label: String,
}

/// A two-button yes/no modal dialog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmRequest {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Label of the affirmative button.
    pub accept_label: String,
    /// Label of the negative button.
    pub decline_label: String,
}

/// The single dismissal action of a [`PromptRequest`].
///
/// Consumed on use, so it fires at most once. Dropping it unused releases the
/// waiting caller as well.
pub struct DismissAction {
    latch: Option<Arc<Latch>>,
}

impl DismissAction {
    /// Wraps a latch.
    #[must_use]
    pub fn new(latch: Arc<Latch>) -> Self {
        Self { latch: Some(latch) }
    }

    /// Closes the dialog from the caller's point of view.
    pub fn dismiss(mut self) {
        if let Some(latch) = self.latch.take() {
            latch.release();
        }
    }
}

impl Drop for DismissAction {
    fn drop(&mut self) {
        if let Some(latch) = self.latch.take() {
            if latch.release() {
                tracing::warn!("dialog went away without dismissal; releasing waiter");
            }
        }
    }
}

impl std::fmt::Debug for DismissAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DismissAction")
            .field("armed", &self.latch.is_some())
            .finish()
    }
}

/// The answer channel of a [`ConfirmRequest`].
///
/// Consumed on use. Dropping it unanswered counts as a decline.
pub struct ConfirmReply {
    callback: Option<Box<dyn FnOnce(bool) + Send>>,
}

impl ConfirmReply {
    /// Wraps the function receiving the answer.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(bool) + Send + 'static,
    {
        Self {
            callback: Some(Box::new(callback)),
        }
    }

    /// The user picked the affirmative button.
    pub fn accept(self) {
        self.answer(true);
    }

    /// The user picked the negative button.
    pub fn decline(self) {
        self.answer(false);
    }

    /// Delivers an answer.
    pub fn answer(mut self, accepted: bool) {
        if let Some(callback) = self.callback.take() {
            callback(accepted);
        }
    }
}

impl Drop for ConfirmReply {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            tracing::debug!("confirmation dialog closed unanswered; treating as decline");
            callback(false);
        }
    }
}

impl std::fmt::Debug for ConfirmReply {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmReply")
            .field("armed", &self.callback.is_some())
            .finish()
    }
}

/// Renders modal dialogs. Always invoked on the UI thread.
///
/// Implementations must keep the dialog non-cancelable: only the supplied
/// action may close it.
pub trait DialogHost: Send + Sync {
    /// Presents a one-button dialog.
    fn show_message(&self, request: PromptRequest, dismiss: DismissAction);

    /// Presents a yes/no dialog.
    fn show_confirm(&self, request: ConfirmRequest, reply: ConfirmReply);
}

/// How a blocking prompt resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The dismissal action fired.
    Dismissed,
    /// The wait was interrupted; treated as dismissed.
    Interrupted,
    /// The configured deadline passed; treated as dismissed.
    TimedOut,
    /// The dialog never reached the screen; the caller did not wait.
    NotShown,
}

impl From<WaitOutcome> for PromptOutcome {
    fn from(outcome: WaitOutcome) -> Self {
        match outcome {
            WaitOutcome::Released => Self::Dismissed,
            WaitOutcome::Interrupted => Self::Interrupted,
            WaitOutcome::TimedOut => Self::TimedOut,
        }
    }
}

/// Blocking modal dialogs for non-UI threads.
pub struct BlockingPrompt {
    ui: UiHandle,
    dialogs: Arc<dyn DialogHost>,
    config: PromptConfig,
    /// Latches of callers currently blocked in `show` or `confirm`.
    in_flight: Mutex<Vec<Arc<Latch>>>,
}

impl BlockingPrompt {
    /// Creates a prompt presenting through `dialogs` on the executor behind `ui`.
    pub fn new(ui: UiHandle, dialogs: Arc<dyn DialogHost>, config: PromptConfig) -> Self {
        Self {
            ui,
            dialogs,
            config,
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Shows `message` and blocks until the user dismisses it.
    ///
    /// Must not be called from the UI thread. Refusals are logged and
    /// reported as [`PromptOutcome::NotShown`]; see [`Self::try_show`].
    pub fn show(&self, message: impl Into<String>) -> PromptOutcome {
        self.try_show(message).unwrap_or_else(|e| {
            tracing::warn!("blocking message not shown: {}", e);
            PromptOutcome::NotShown
        })
    }

    /// Like [`Self::show`], but reports why a dialog was never presented.
    ///
    /// # Errors
    ///
    /// Returns `CalledFromUiThread` when called on the UI thread and
    /// `UiUnavailable` if the executor refused the task. The caller did not
    /// wait in either case.
    pub fn try_show(&self, message: impl Into<String>) -> BridgeResult<PromptOutcome> {
        self.refuse_on_ui_thread("show_blocking_message")?;

        let latch = self.track(Arc::new(Latch::new()));
        let request = PromptRequest {
            title: self.config.title.clone(),
            message: message.into(),
            dismiss_label: self.config.dismiss_label.clone(),
        };
        let dismiss = DismissAction::new(Arc::clone(&latch));
        let dialogs = Arc::clone(&self.dialogs);

        if let Err(e) = self.ui.submit(move || dialogs.show_message(request, dismiss)) {
            self.untrack(&latch);
            return Err(e);
        }

        let outcome = PromptOutcome::from(self.wait(&latch));
        self.untrack(&latch);

        if outcome != PromptOutcome::Dismissed {
            tracing::warn!("blocking message resolved without dismissal: {:?}", outcome);
        }
        Ok(outcome)
    }

    /// Shows a yes/no dialog and blocks for the answer.
    ///
    /// Anything other than an explicit accept (decline, interrupt, deadline,
    /// refusal) yields `false`. Must not be called from the UI thread.
    pub fn confirm(&self, request: ConfirmRequest) -> bool {
        self.try_confirm(request).unwrap_or_else(|e| {
            tracing::warn!("confirmation not shown: {}", e);
            false
        })
    }

    /// Like [`Self::confirm`], but reports why a dialog was never presented.
    ///
    /// # Errors
    ///
    /// Returns `CalledFromUiThread` when called on the UI thread and
    /// `UiUnavailable` if the executor refused the task.
    pub fn try_confirm(&self, request: ConfirmRequest) -> BridgeResult<bool> {
        self.refuse_on_ui_thread("blocking_confirm")?;

        let latch = self.track(Arc::new(Latch::new()));
        let accepted = Arc::new(AtomicBool::new(false));

        let answer_latch = Arc::clone(&latch);
        let answer = Arc::clone(&accepted);
        let reply = ConfirmReply::new(move |yes| {
            answer.store(yes, Ordering::Release);
            answer_latch.release();
        });
        let dialogs = Arc::clone(&self.dialogs);

        if let Err(e) = self.ui.submit(move || dialogs.show_confirm(request, reply)) {
            self.untrack(&latch);
            return Err(e);
        }

        let outcome = self.wait(&latch);
        self.untrack(&latch);

        Ok(outcome == WaitOutcome::Released && accepted.load(Ordering::Acquire))
    }

    /// Presents a yes/no dialog without blocking; `on_answer` runs with the
    /// choice. Intended for callers already on the UI thread.
    ///
    /// # Errors
    ///
    /// Returns `UiUnavailable` if the executor refused the task; `on_answer`
    /// then runs with `false`.
    pub fn confirm_async<F>(&self, request: ConfirmRequest, on_answer: F) -> BridgeResult<()>
    where
        F: FnOnce(bool) + Send + 'static,
    {
        let reply = ConfirmReply::new(on_answer);
        let dialogs = Arc::clone(&self.dialogs);
        self.ui.submit(move || dialogs.show_confirm(request, reply))
    }

    /// Wakes every blocked caller. Returns how many were waiting.
    pub fn interrupt_pending(&self) -> usize {
        let in_flight = self.in_flight.lock();
        for latch in in_flight.iter() {
            latch.interrupt();
        }
        in_flight.len()
    }

    /// Number of callers currently blocked.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    fn refuse_on_ui_thread(&self, operation: &'static str) -> BridgeResult<()> {
        if self.ui.is_ui_thread() {
            tracing::error!("{} called on the UI thread; refusing to deadlock", operation);
            return Err(BridgeError::CalledFromUiThread { operation });
        }
        Ok(())
    }

    fn wait(&self, latch: &Latch) -> WaitOutcome {
        match self.config.wait_timeout() {
            Some(timeout) => latch.wait_timeout(timeout),
            None => latch.wait(),
        }
    }

    fn track(&self, latch: Arc<Latch>) -> Arc<Latch> {
        self.in_flight.lock().push(Arc::clone(&latch));
        latch
    }

    fn untrack(&self, latch: &Arc<Latch>) {
        self.in_flight.lock().retain(|l| !Arc::ptr_eq(l, latch));
    }
}
