//! # Host Bridge
//!
//! Wires the components to their collaborators and exposes the entry points
//! the engine and the host environment call.
//!
//! ```text
//!   engine thread                     UI executor                  engine
//!   ─────────────                     ───────────                  ──────
//!   show_blocking_message ──blocks──> DialogHost ──dismiss──┐
//!        <──────────────────────────── latch <──────────────┘
//!   request_ad_load/show ───────────> AdLifecycleController ──> EngineSignalPort
//!   host: lifecycle, splash, pinch ─> SplashGate / GestureBridge ──┘
//! ```

use std::sync::Arc;

use hostlink_ads::{AdBackend, AdLifecycleController};
use hostlink_core::{
    BlockingPrompt, BridgeConfig, BridgeResult, ConfirmRequest, DialogHost, EngineSignalPort,
    ExitConfig, PromptOutcome, UiHandle,
};

use crate::gesture::GestureBridge;
use crate::haptics::{Haptics, Vibrator};
use crate::lifecycle::{actions_for, LifecycleAction, LifecycleEvent};
use crate::splash::{ChromeHost, SplashGate, SplashPlayer};

/// Host-side services the bridge drives.
#[derive(Clone)]
pub struct HostServices {
    /// Renders modal dialogs.
    pub dialogs: Arc<dyn DialogHost>,
    /// The advertising SDK.
    pub ads: Arc<dyn AdBackend>,
    /// The splash video player.
    pub splash: Arc<dyn SplashPlayer>,
    /// Window chrome.
    pub chrome: Arc<dyn ChromeHost>,
    /// The vibration motor.
    pub vibrator: Arc<dyn Vibrator>,
}

/// The bridge between one host window and one engine.
pub struct HostBridge {
    ui: UiHandle,
    engine: Arc<dyn EngineSignalPort>,
    chrome: Arc<dyn ChromeHost>,
    prompt: BlockingPrompt,
    exit: ExitConfig,
    ads: Arc<AdLifecycleController>,
    splash: Arc<SplashGate>,
    gesture: GestureBridge,
    haptics: Haptics,
    load_ad_on_start: bool,
}

impl std::fmt::Debug for HostBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostBridge")
            .field("ads", &self.ads)
            .field("splash", &self.splash)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl HostBridge {
    /// Builds the bridge.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation.
    pub fn new(
        ui: UiHandle,
        engine: Arc<dyn EngineSignalPort>,
        services: HostServices,
        config: &BridgeConfig,
    ) -> BridgeResult<Self> {
        config.validate()?;

        let prompt = BlockingPrompt::new(ui.clone(), services.dialogs, config.prompt.clone());
        let ads = AdLifecycleController::new(
            ui.clone(),
            services.ads,
            Arc::clone(&engine),
            config.ads.clone(),
        );
        let splash = Arc::new(SplashGate::new(
            services.splash,
            Arc::clone(&services.chrome),
            Arc::clone(&engine),
        ));
        let gesture = GestureBridge::new(config.gesture, Arc::clone(&engine));
        let haptics = Haptics::new(services.vibrator, config.haptics);

        Ok(Self {
            ui,
            engine,
            chrome: services.chrome,
            prompt,
            exit: config.exit.clone(),
            ads,
            splash,
            gesture,
            haptics,
            load_ad_on_start: config.ads.load_on_start,
        })
    }

    /// Presents the splash and, if configured, starts the first ad load.
    ///
    /// # Errors
    ///
    /// Returns `UiUnavailable` if the UI executor is gone.
    pub fn start(&self) -> BridgeResult<()> {
        let splash = Arc::clone(&self.splash);
        self.ui.submit(move || splash.present())?;
        if self.load_ad_on_start {
            self.ads.request_load();
        }
        tracing::info!("host bridge started");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Engine → host
    // ------------------------------------------------------------------

    /// Shows `text` in a modal dialog and blocks until it is dismissed,
    /// then restores fullscreen chrome. Not for the UI thread.
    pub fn show_blocking_message(&self, text: impl Into<String>) -> PromptOutcome {
        let outcome = self.prompt.show(text);
        if outcome != PromptOutcome::NotShown {
            self.restore_chrome();
        }
        outcome
    }

    /// Asks for a rewarded ad to be loaded.
    pub fn request_ad_load(&self) {
        self.ads.request_load();
    }

    /// Asks for the loaded rewarded ad to be shown.
    pub fn request_ad_show(&self) {
        self.ads.request_show();
    }

    /// Vibrates the device. See [`Haptics::vibrate`].
    pub fn vibrate(&self, duration_ms: u32, amplitude: i32) -> bool {
        self.haptics.vibrate(duration_ms, amplitude)
    }

    // ------------------------------------------------------------------
    // Host → bridge
    // ------------------------------------------------------------------

    /// The splash video finished. Callable from the player's thread.
    pub fn on_splash_complete(&self) {
        let splash = Arc::clone(&self.splash);
        if let Err(e) = self.ui.submit(move || {
            splash.on_playback_complete();
        }) {
            tracing::warn!("splash completion not delivered: {}", e);
        }
    }

    /// A pinch scale event. Returns the running factor.
    pub fn on_scale_event(&self, current_span: f32, previous_span: f32, scale_delta: f32) -> f32 {
        self.gesture
            .on_scale_event(current_span, previous_span, scale_delta)
    }

    /// A lifecycle callback from the host.
    pub fn on_lifecycle(&self, event: LifecycleEvent) {
        tracing::debug!("lifecycle: {:?}", event);
        for action in actions_for(event, self.splash.is_pending()) {
            match action {
                LifecycleAction::RestartSplash => {
                    let splash = Arc::clone(&self.splash);
                    self.submit_or_warn("splash restart", move || {
                        splash.on_resume();
                    });
                }
                LifecycleAction::ReassertChrome => self.restore_chrome(),
                LifecycleAction::ConfirmExit => self.confirm_exit(),
            }
        }
    }

    /// Wakes every caller blocked in a prompt. Returns how many.
    pub fn shutdown(&self) -> usize {
        let woken = self.prompt.interrupt_pending();
        if woken > 0 {
            tracing::warn!("shutdown interrupted {} blocked prompt(s)", woken);
        }
        woken
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The ad controller.
    #[must_use]
    pub fn ads(&self) -> &Arc<AdLifecycleController> {
        &self.ads
    }

    /// The splash gate.
    #[must_use]
    pub fn splash(&self) -> &SplashGate {
        &self.splash
    }

    /// The running pinch factor.
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.gesture.factor()
    }

    /// The haptics switch.
    #[must_use]
    pub fn haptics(&self) -> &Haptics {
        &self.haptics
    }

    /// The blocking prompt.
    #[must_use]
    pub fn prompt(&self) -> &BlockingPrompt {
        &self.prompt
    }

    fn confirm_exit(&self) {
        let request = ConfirmRequest {
            title: self.exit.title.clone(),
            message: self.exit.message.clone(),
            accept_label: self.exit.accept_label.clone(),
            decline_label: self.exit.decline_label.clone(),
        };
        let engine = Arc::clone(&self.engine);
        let asked = self.prompt.confirm_async(request, move |exit| {
            if exit {
                tracing::info!("user confirmed exit");
                engine.request_destroy();
            }
        });
        if let Err(e) = asked {
            tracing::warn!("exit confirmation not shown: {}", e);
        }
    }

    fn restore_chrome(&self) {
        let chrome = Arc::clone(&self.chrome);
        self.submit_or_warn("chrome restore", move || chrome.reassert_fullscreen());
    }

    fn submit_or_warn<F>(&self, what: &str, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Err(e) = self.ui.submit(task) {
            tracing::warn!("{} not delivered: {}", what, e);
        }
    }
}
