//! End-to-end flows through `HostBridge` with recording collaborators.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use hostlink::{
    Amplitude, ChromeHost, EngineInbox, HostBridge, HostServices, LifecycleEvent, SplashPlayer,
    Vibrator,
};
use hostlink_ads::{AdBackend, AdEvent, AdEventSink, AdHandle, AdPhase, LoadRequest};
use hostlink_core::{
    BridgeConfig, BridgeError, ChannelEnginePort, ConfirmReply, ConfirmRequest, DialogHost,
    DismissAction, PromptOutcome, PromptRequest, UiExecutor, UiThread,
};
use hostlink_shared::{AdStateCode, EngineSignal};
use parking_lot::Mutex;

#[derive(Default)]
struct Device {
    held: Mutex<Vec<DismissAction>>,
    auto_dismiss: AtomicBool,
    accept_exit: AtomicBool,
    messages: Mutex<Vec<String>>,
    confirms: AtomicUsize,
    loads: Mutex<Vec<AdEventSink>>,
    shows: Mutex<Vec<AdEventSink>>,
    plays: AtomicUsize,
    fullscreen: AtomicUsize,
    removals: AtomicUsize,
    vibrations: Mutex<Vec<(Duration, Amplitude)>>,
}

impl DialogHost for Device {
    fn show_message(&self, request: PromptRequest, dismiss: DismissAction) {
        self.messages.lock().push(request.message);
        if self.auto_dismiss.load(Ordering::SeqCst) {
            dismiss.dismiss();
        } else {
            self.held.lock().push(dismiss);
        }
    }

    fn show_confirm(&self, request: ConfirmRequest, reply: ConfirmReply) {
        assert_eq!(request.title, "Exit Application?");
        self.confirms.fetch_add(1, Ordering::SeqCst);
        reply.answer(self.accept_exit.load(Ordering::SeqCst));
    }
}

impl AdBackend for Device {
    fn load(&self, _request: LoadRequest, events: AdEventSink) {
        self.loads.lock().push(events);
    }

    fn show(&self, _handle: AdHandle, events: AdEventSink) {
        self.shows.lock().push(events);
    }
}

impl SplashPlayer for Device {
    fn play_from_start(&self) {
        self.plays.fetch_add(1, Ordering::SeqCst);
    }
}

impl ChromeHost for Device {
    fn reassert_fullscreen(&self) {
        self.fullscreen.fetch_add(1, Ordering::SeqCst);
    }

    fn remove_splash(&self) {
        self.removals.fetch_add(1, Ordering::SeqCst);
    }
}

impl Vibrator for Device {
    fn vibrate(&self, duration: Duration, amplitude: Amplitude) {
        self.vibrations.lock().push((duration, amplitude));
    }
}

fn services(device: &Arc<Device>) -> HostServices {
    HostServices {
        dialogs: device.clone(),
        ads: device.clone(),
        splash: device.clone(),
        chrome: device.clone(),
        vibrator: device.clone(),
    }
}

/// Bridge on a manually pumped executor.
struct Pumped {
    ui: UiExecutor,
    device: Arc<Device>,
    bridge: HostBridge,
    signals: Receiver<EngineSignal>,
}

impl Pumped {
    fn new(config: &BridgeConfig) -> Self {
        let ui = UiExecutor::new();
        let device = Arc::new(Device::default());
        let (port, signals) = ChannelEnginePort::channel();
        let bridge = HostBridge::new(ui.handle(), Arc::new(port), services(&device), config)
            .expect("valid config");
        Self {
            ui,
            device,
            bridge,
            signals,
        }
    }

    fn pump(&self) {
        self.ui.run_pending();
    }

    fn drain(&self) -> Vec<EngineSignal> {
        self.signals.try_iter().collect()
    }
}

fn wait_for(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(2));
    }
}

#[test]
fn blocking_message_waits_for_dismissal_then_restores_chrome() {
    let ui = UiThread::spawn(&Default::default()).unwrap();
    let device = Arc::new(Device::default());
    let (port, _signals) = ChannelEnginePort::channel();
    let bridge = Arc::new(
        HostBridge::new(ui.handle(), Arc::new(port), services(&device), &BridgeConfig::default())
            .unwrap(),
    );

    let engine = {
        let bridge = Arc::clone(&bridge);
        thread::spawn(move || bridge.show_blocking_message("Progress saved"))
    };

    wait_for("dialog", || device.held.lock().len() == 1);
    assert!(!engine.is_finished());
    assert_eq!(device.fullscreen.load(Ordering::SeqCst), 0);

    let dismiss = device.held.lock().pop().unwrap();
    dismiss.dismiss();

    assert_eq!(engine.join().unwrap(), PromptOutcome::Dismissed);
    assert_eq!(*device.messages.lock(), vec!["Progress saved".to_string()]);
    wait_for("chrome restore", || {
        device.fullscreen.load(Ordering::SeqCst) == 1
    });
}

#[test]
fn blocking_message_returns_when_ui_is_gone() {
    let ui = UiThread::spawn(&Default::default()).unwrap();
    let device = Arc::new(Device::default());
    let (port, _signals) = ChannelEnginePort::channel();
    let bridge =
        HostBridge::new(ui.handle(), Arc::new(port), services(&device), &BridgeConfig::default())
            .unwrap();

    ui.shutdown();

    assert_eq!(bridge.show_blocking_message("never shown"), PromptOutcome::NotShown);
    assert!(device.messages.lock().is_empty());
}

#[test]
fn auto_dismissed_message_returns_immediately() {
    let ui = UiThread::spawn(&Default::default()).unwrap();
    let device = Arc::new(Device::default());
    device.auto_dismiss.store(true, Ordering::SeqCst);
    let (port, _signals) = ChannelEnginePort::channel();
    let bridge =
        HostBridge::new(ui.handle(), Arc::new(port), services(&device), &BridgeConfig::default())
            .unwrap();

    assert_eq!(bridge.show_blocking_message("quick"), PromptOutcome::Dismissed);
    assert!(device.held.lock().is_empty());
    wait_for("chrome restore", || {
        device.fullscreen.load(Ordering::SeqCst) == 1
    });
}

#[test]
fn blocking_message_on_the_ui_thread_is_refused() {
    let rig = Pumped::new(&BridgeConfig::default());
    rig.device.auto_dismiss.store(true, Ordering::SeqCst);
    rig.pump();

    assert_eq!(
        rig.bridge.show_blocking_message("would deadlock"),
        PromptOutcome::NotShown
    );
    assert_eq!(
        rig.bridge.prompt().try_show("would deadlock"),
        Err(BridgeError::CalledFromUiThread {
            operation: "show_blocking_message"
        })
    );
    rig.pump();
    assert!(rig.device.messages.lock().is_empty());
    assert_eq!(rig.device.fullscreen.load(Ordering::SeqCst), 0);
}

#[test]
fn shutdown_releases_a_prompt_nobody_dismisses() {
    let ui = UiThread::spawn(&Default::default()).unwrap();
    let device = Arc::new(Device::default());
    let (port, _signals) = ChannelEnginePort::channel();
    let bridge = Arc::new(
        HostBridge::new(ui.handle(), Arc::new(port), services(&device), &BridgeConfig::default())
            .unwrap(),
    );

    let engine = {
        let bridge = Arc::clone(&bridge);
        thread::spawn(move || bridge.show_blocking_message("stuck"))
    };
    wait_for("dialog", || device.held.lock().len() == 1);

    assert_eq!(bridge.shutdown(), 1);
    assert_eq!(engine.join().unwrap(), PromptOutcome::Interrupted);
    assert_eq!(bridge.prompt().in_flight(), 0);
}

#[test]
fn rewarded_ad_round_trip_reaches_engine() {
    let rig = Pumped::new(&BridgeConfig::default());

    rig.bridge.request_ad_load();
    rig.bridge.request_ad_load();
    rig.pump();
    assert_eq!(rig.device.loads.lock().len(), 1);

    rig.device.loads.lock()[0].deliver(AdEvent::Loaded(AdHandle::new(1)));
    rig.pump();

    rig.bridge.request_ad_show();
    rig.pump();
    let show = rig.device.shows.lock()[0].clone();
    show.deliver(AdEvent::Shown);
    show.deliver(AdEvent::RewardEarned {
        amount: 5,
        kind: "gems".to_string(),
    });
    show.deliver(AdEvent::Dismissed);
    rig.pump();

    assert_eq!(
        rig.drain(),
        vec![
            EngineSignal::AdState(AdStateCode::Loading),
            EngineSignal::AdState(AdStateCode::Ready),
            EngineSignal::AdReward(true),
            EngineSignal::AdState(AdStateCode::Loading),
        ]
    );
    assert_eq!(rig.bridge.ads().phase(), AdPhase::Loading);
    assert_eq!(rig.device.loads.lock().len(), 2);
}

#[test]
fn engine_inbox_runs_reward_action() {
    let ui = UiExecutor::new();
    let device = Arc::new(Device::default());
    let (port, receiver) = ChannelEnginePort::channel();
    let mut inbox = EngineInbox::new(receiver);
    let bridge =
        HostBridge::new(ui.handle(), Arc::new(port), services(&device), &BridgeConfig::default())
            .unwrap();

    let rewards = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&rewards);
    inbox.set_reward_action(move |earned| seen.lock().push(earned));

    bridge.request_ad_load();
    ui.run_pending();
    device.loads.lock()[0].deliver(AdEvent::Loaded(AdHandle::new(1)));
    ui.run_pending();
    bridge.request_ad_show();
    ui.run_pending();
    device.shows.lock()[0].deliver(AdEvent::ShowFailed {
        reason: "not ready".to_string(),
    });
    ui.run_pending();

    inbox.pump();
    assert_eq!(*rewards.lock(), vec![false]);
    assert_eq!(inbox.view().ad_state, AdStateCode::Loading);
}

#[test]
fn splash_completion_is_marshalled_and_notifies_once() {
    let rig = Pumped::new(&BridgeConfig::default());
    rig.bridge.start().unwrap();
    rig.pump();
    assert_eq!(rig.device.plays.load(Ordering::SeqCst), 1);

    rig.bridge.on_lifecycle(LifecycleEvent::Resumed);
    rig.pump();
    assert_eq!(rig.device.plays.load(Ordering::SeqCst), 2);

    rig.bridge.on_splash_complete();
    assert!(rig.bridge.splash().is_pending(), "applied on the UI thread");
    rig.bridge.on_splash_complete();
    rig.pump();

    assert!(!rig.bridge.splash().is_pending());
    assert_eq!(rig.drain(), vec![EngineSignal::VideoFinished]);
    assert_eq!(rig.device.removals.load(Ordering::SeqCst), 1);

    rig.bridge.on_lifecycle(LifecycleEvent::Resumed);
    rig.pump();
    assert_eq!(rig.device.plays.load(Ordering::SeqCst), 2);
}

#[test]
fn back_navigation_asks_before_destroying() {
    let rig = Pumped::new(&BridgeConfig::default());

    rig.bridge.on_lifecycle(LifecycleEvent::BackNavigation);
    rig.pump();
    assert!(rig.drain().is_empty());

    rig.device.accept_exit.store(true, Ordering::SeqCst);
    rig.bridge.on_lifecycle(LifecycleEvent::BackNavigation);
    rig.pump();
    assert_eq!(rig.drain(), vec![EngineSignal::DestroyRequested]);
    assert_eq!(rig.device.confirms.load(Ordering::SeqCst), 2);
}

#[test]
fn focus_gain_reasserts_chrome() {
    let rig = Pumped::new(&BridgeConfig::default());
    rig.bridge.on_lifecycle(LifecycleEvent::FocusChanged(false));
    rig.bridge.on_lifecycle(LifecycleEvent::FocusChanged(true));
    rig.pump();
    assert_eq!(rig.device.fullscreen.load(Ordering::SeqCst), 1);
}

#[test]
fn pinch_and_vibration_entry_points() {
    let rig = Pumped::new(&BridgeConfig::default());

    assert_eq!(rig.bridge.on_scale_event(300.0, 150.0, 2.0), 2.0);
    assert_eq!(rig.bridge.on_scale_event(500.0, 300.0, 2.0), 4.0);
    assert_eq!(rig.bridge.on_scale_event(250.0, 500.0, 0.5), 2.0);
    assert_eq!(
        rig.drain(),
        vec![
            EngineSignal::PinchScale(150.0),
            EngineSignal::PinchScale(200.0),
            EngineSignal::PinchScale(-250.0),
        ]
    );

    assert!(rig.bridge.vibrate(0, -1));
    rig.bridge.haptics().set_enabled(false);
    assert!(!rig.bridge.vibrate(100, 128));
    assert_eq!(
        *rig.device.vibrations.lock(),
        vec![(Duration::from_millis(200), Amplitude::PlatformDefault)]
    );
}

#[test]
fn load_on_start_issues_first_load() {
    let config = BridgeConfig::from_toml_str(
        r#"
        [ads]
        unit_id = "rewarded-main"
        load_on_start = true
        "#,
    )
    .unwrap();
    let rig = Pumped::new(&config);

    rig.bridge.start().unwrap();
    rig.pump();

    assert_eq!(rig.device.loads.lock().len(), 1);
    assert_eq!(rig.drain(), vec![EngineSignal::AdState(AdStateCode::Loading)]);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = BridgeConfig::default();
    config.gesture.min_scale = 5.0;

    let ui = UiExecutor::new();
    let device = Arc::new(Device::default());
    let (port, _signals) = ChannelEnginePort::channel();
    let result = HostBridge::new(ui.handle(), Arc::new(port), services(&device), &config);

    assert!(matches!(result, Err(BridgeError::InvalidConfig(_))));
}
