//! # Hostlink Session Simulation
//!
//! Runs one complete host/engine session in-process with stub
//! collaborators:
//! - splash playback and completion
//! - a rewarded ad load, showing and reward
//! - pinch events, vibration, a blocking message
//! - back navigation → exit confirmation → destroy request
//!
//! Usage: `hostlink_sim [config.toml]`. Log level via `RUST_LOG`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use hostlink::{
    Amplitude, ChromeHost, EngineInbox, EngineView, HostBridge, HostServices, LifecycleEvent,
    SplashPlayer, Vibrator,
};
use hostlink_ads::{AdBackend, AdEvent, AdEventSink, AdHandle, LoadRequest};
use hostlink_core::{
    BridgeConfig, BridgeResult, ChannelEnginePort, ConfirmReply, ConfirmRequest, DialogHost,
    DismissAction, PromptRequest, UiThread,
};
use hostlink_shared::AdStateCode;

const STEP_TIMEOUT: Duration = Duration::from_secs(5);

/// Dismisses every message and accepts every confirmation after a short pause.
struct AutoDialogs;

impl DialogHost for AutoDialogs {
    fn show_message(&self, request: PromptRequest, dismiss: DismissAction) {
        println!("  [dialog] {}: {} [{}]", request.title, request.message, request.dismiss_label);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            dismiss.dismiss();
        });
    }

    fn show_confirm(&self, request: ConfirmRequest, reply: ConfirmReply) {
        println!(
            "  [dialog] {}: {} [{}] [{}]",
            request.title, request.message, request.accept_label, request.decline_label
        );
        reply.accept();
    }
}

/// Fills every load and earns the reward on every showing, from SDK threads.
#[derive(Default)]
struct ScriptedAds {
    next_id: AtomicU64,
}

impl AdBackend for ScriptedAds {
    fn load(&self, request: LoadRequest, events: AdEventSink) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        println!("  [ads] loading from unit '{}'", request.unit_id);
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            events.deliver(AdEvent::Loaded(AdHandle::new(id)));
        });
    }

    fn show(&self, handle: AdHandle, events: AdEventSink) {
        println!("  [ads] showing ad #{}", handle.id());
        thread::spawn(move || {
            events.deliver(AdEvent::Shown);
            thread::sleep(Duration::from_millis(30));
            events.deliver(AdEvent::RewardEarned {
                amount: 10,
                kind: "coins".to_string(),
            });
            events.deliver(AdEvent::Dismissed);
        });
    }
}

struct ConsoleDevice;

impl SplashPlayer for ConsoleDevice {
    fn play_from_start(&self) {
        println!("  [splash] playing from the start");
    }
}

impl ChromeHost for ConsoleDevice {
    fn reassert_fullscreen(&self) {
        println!("  [chrome] fullscreen");
    }

    fn remove_splash(&self) {
        println!("  [chrome] splash removed");
    }
}

impl Vibrator for ConsoleDevice {
    fn vibrate(&self, duration: Duration, amplitude: Amplitude) {
        println!("  [haptics] {:?} at {:?}", duration, amplitude);
    }
}

/// Pumps the inbox until `done` holds or the step times out.
fn wait_until(inbox: &mut EngineInbox, done: impl Fn(&EngineView) -> bool) -> bool {
    let deadline = Instant::now() + STEP_TIMEOUT;
    while !done(inbox.view()) {
        if Instant::now() >= deadline {
            return false;
        }
        inbox.wait_for(Duration::from_millis(20));
    }
    true
}

fn step(name: &str, ok: bool) {
    println!("{} {}", if ok { "[ OK ]" } else { "[FAIL]" }, name);
}

fn main() -> BridgeResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::default(),
    };

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                 HOSTLINK - SESSION SIMULATION                    ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let ui = UiThread::spawn(&config.executor)?;
    let (port, receiver) = ChannelEnginePort::channel();
    let mut inbox = EngineInbox::new(receiver);

    let device = Arc::new(ConsoleDevice);
    let services = HostServices {
        dialogs: Arc::new(AutoDialogs),
        ads: Arc::new(ScriptedAds::default()),
        splash: device.clone(),
        chrome: device.clone(),
        vibrator: device,
    };
    let bridge = HostBridge::new(ui.handle(), Arc::new(port), services, &config)?;

    inbox.set_reward_action(|earned| println!("  [engine] reward earned: {}", earned));
    inbox.subscribe_pinch(|delta| println!("  [engine] pinch {:+.1}", delta));

    // Splash: interrupted once, then completes.
    bridge.start()?;
    bridge.on_lifecycle(LifecycleEvent::Paused);
    bridge.on_lifecycle(LifecycleEvent::Resumed);
    bridge.on_splash_complete();
    bridge.on_splash_complete();
    step("splash gate opened", wait_until(&mut inbox, EngineView::can_start));

    // Rewarded ad round trip.
    bridge.request_ad_load();
    step(
        "rewarded ad ready",
        wait_until(&mut inbox, |v| v.ad_state == AdStateCode::Ready),
    );
    bridge.request_ad_show();
    step(
        "reward delivered",
        wait_until(&mut inbox, |v| v.rewards_earned == 1),
    );
    step(
        "slot reloaded",
        wait_until(&mut inbox, |_| bridge.ads().stats().loads_started == 2),
    );

    // Input and feedback.
    for (current, previous, delta) in [(300.0, 150.0, 2.0), (500.0, 300.0, 2.0), (250.0, 500.0, 0.5)] {
        bridge.on_scale_event(current, previous, delta);
    }
    bridge.vibrate(0, -1);
    inbox.pump();
    step("pinch factor back at 2.0", (bridge.scale_factor() - 2.0).abs() < f32::EPSILON);

    let outcome = bridge.show_blocking_message("Progress saved");
    step(&format!("blocking message returned ({:?})", outcome), true);

    // Exit.
    bridge.on_lifecycle(LifecycleEvent::BackNavigation);
    step(
        "destroy requested",
        wait_until(&mut inbox, |v| v.destroy_requested),
    );

    bridge.shutdown();
    ui.shutdown();

    let view = inbox.view();
    let stats = bridge.ads().stats();
    println!();
    println!("┌─ ENGINE VIEW ────────────────────────────────────────────────────┐");
    println!("│ Ad state:           {}", view.ad_state);
    println!("│ Rewards earned:     {}", view.rewards_earned);
    println!("│ Rewards missed:     {}", view.rewards_missed);
    println!("│ Last pinch delta:   {:?}", view.last_pinch_delta);
    println!("│ Signals:            {}", view.signals);
    println!("│ Loads started:      {}", stats.loads_started);
    println!("│ Shows completed:    {}", stats.shows_completed);
    println!("└──────────────────────────────────────────────────────────────────┘");

    Ok(())
}
