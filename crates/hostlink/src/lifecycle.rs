//! Host lifecycle events and what the bridge does about them.

/// Lifecycle callbacks from the host environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The app went to the background.
    Paused,
    /// The app came back to the foreground.
    Resumed,
    /// The window gained (`true`) or lost focus.
    FocusChanged(bool),
    /// The user pressed back.
    BackNavigation,
}

/// Work the bridge performs in reaction to a lifecycle event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Play the splash again from the start.
    RestartSplash,
    /// Reassert fullscreen chrome.
    ReassertChrome,
    /// Ask the user whether to exit.
    ConfirmExit,
}

/// Maps `event` to the actions to run, in order.
#[must_use]
pub fn actions_for(event: LifecycleEvent, splash_pending: bool) -> Vec<LifecycleAction> {
    match event {
        LifecycleEvent::Paused | LifecycleEvent::FocusChanged(false) => Vec::new(),
        LifecycleEvent::Resumed if splash_pending => {
            vec![LifecycleAction::RestartSplash, LifecycleAction::ReassertChrome]
        }
        LifecycleEvent::Resumed | LifecycleEvent::FocusChanged(true) => {
            vec![LifecycleAction::ReassertChrome]
        }
        LifecycleEvent::BackNavigation => vec![LifecycleAction::ConfirmExit],
    }
}
