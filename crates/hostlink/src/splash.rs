//! # Splash Gate
//!
//! Holds back the engine's "video finished" notification until the splash
//! video reports completion. The presentation is at-least-once: an
//! interrupted splash restarts from the beginning on resume, it never
//! resumes mid-stream.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hostlink_core::EngineSignalPort;

/// Plays the splash video. Called on the UI thread.
pub trait SplashPlayer: Send + Sync {
    /// Starts playback from the first frame.
    fn play_from_start(&self);
}

/// Window chrome owned by the host. Called on the UI thread.
pub trait ChromeHost: Send + Sync {
    /// Reasserts fullscreen with transparent system bars.
    fn reassert_fullscreen(&self);

    /// Removes the splash view so the engine surface becomes visible.
    fn remove_splash(&self);
}

/// One-shot barrier between the splash video and engine startup.
pub struct SplashGate {
    pending: AtomicBool,
    player: Arc<dyn SplashPlayer>,
    chrome: Arc<dyn ChromeHost>,
    engine: Arc<dyn EngineSignalPort>,
}

impl std::fmt::Debug for SplashGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplashGate")
            .field("pending", &self.is_pending())
            .finish_non_exhaustive()
    }
}

impl SplashGate {
    /// Creates a gate that is still pending.
    #[must_use]
    pub fn new(
        player: Arc<dyn SplashPlayer>,
        chrome: Arc<dyn ChromeHost>,
        engine: Arc<dyn EngineSignalPort>,
    ) -> Self {
        Self {
            pending: AtomicBool::new(true),
            player,
            chrome,
            engine,
        }
    }

    /// True until playback first completes.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Initial presentation: fullscreen chrome plus playback.
    pub fn present(&self) {
        self.chrome.reassert_fullscreen();
        if self.is_pending() {
            self.player.play_from_start();
        }
    }

    /// Playback reached the end. Only the first call has any effect.
    ///
    /// Returns true if this call opened the gate.
    pub fn on_playback_complete(&self) -> bool {
        if self
            .pending
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("splash already complete; ignoring repeat");
            return false;
        }

        self.chrome.remove_splash();
        self.engine.notify_video_finished();
        tracing::info!("splash complete; engine notified");
        true
    }

    /// The host became active again. Restarts the splash if it never
    /// finished; returns true if it did.
    pub fn on_resume(&self) -> bool {
        if !self.is_pending() {
            return false;
        }
        tracing::debug!("splash interrupted; restarting from the beginning");
        self.player.play_from_start();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostlink_core::ChannelEnginePort;
    use hostlink_shared::EngineSignal;
    use std::sync::atomic::AtomicUsize;

    #[derive(Default)]
    struct Recorder {
        plays: AtomicUsize,
        fullscreen: AtomicUsize,
        removals: AtomicUsize,
    }

    impl SplashPlayer for Recorder {
        fn play_from_start(&self) {
            self.plays.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl ChromeHost for Recorder {
        fn reassert_fullscreen(&self) {
            self.fullscreen.fetch_add(1, Ordering::SeqCst);
        }

        fn remove_splash(&self) {
            self.removals.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn gate() -> (SplashGate, Arc<Recorder>, crossbeam_channel::Receiver<EngineSignal>) {
        let recorder = Arc::new(Recorder::default());
        let (port, rx) = ChannelEnginePort::channel();
        let gate = SplashGate::new(recorder.clone(), recorder.clone(), Arc::new(port));
        (gate, recorder, rx)
    }

    #[test]
    fn test_repeated_completion_notifies_once() {
        let (gate, recorder, rx) = gate();
        assert!(gate.is_pending());

        assert!(gate.on_playback_complete());
        for _ in 0..4 {
            assert!(!gate.on_playback_complete());
        }

        assert!(!gate.is_pending());
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![EngineSignal::VideoFinished]);
        assert_eq!(recorder.removals.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resume_restarts_only_while_pending() {
        let (gate, recorder, _rx) = gate();
        gate.present();
        assert_eq!(recorder.plays.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.fullscreen.load(Ordering::SeqCst), 1);

        assert!(gate.on_resume());
        assert_eq!(recorder.plays.load(Ordering::SeqCst), 2);

        gate.on_playback_complete();
        assert!(!gate.on_resume());
        gate.present();
        assert_eq!(recorder.plays.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_completion_notifies_once() {
        let (gate, _recorder, rx) = gate();
        let gate = Arc::new(gate);

        let threads: Vec<_> = (0..8)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || gate.on_playback_complete())
            })
            .collect();
        let openers = threads
            .into_iter()
            .map(|t| t.join().unwrap())
            .filter(|opened| *opened)
            .count();

        assert_eq!(openers, 1);
        assert_eq!(rx.try_iter().count(), 1);
    }
}
