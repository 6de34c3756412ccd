//! One-shot binary latch.
//!
//! A waiter blocks until the latch is released, interrupted, or an optional
//! deadline passes. Release is idempotent: the first call opens the latch,
//! later calls only bump a counter.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// How a wait on a [`Latch`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The latch was released.
    Released,
    /// The wait was interrupted before any release.
    Interrupted,
    /// The deadline passed before any release.
    TimedOut,
}

#[derive(Debug, Default)]
struct LatchState {
    released: bool,
    interrupted: bool,
    release_calls: u32,
}

/// Single-use binary latch.
#[derive(Debug, Default)]
pub struct Latch {
    state: Mutex<LatchState>,
    condvar: Condvar,
}

impl Latch {
    /// Creates a closed latch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the latch and wakes every waiter.
    ///
    /// Returns true for the call that actually opened it.
    pub fn release(&self) -> bool {
        let mut state = self.state.lock();
        state.release_calls = state.release_calls.saturating_add(1);
        if state.released {
            return false;
        }
        state.released = true;
        drop(state);
        self.condvar.notify_all();
        true
    }

    /// Wakes waiters without releasing. They return `Interrupted`.
    ///
    /// Has no effect once the latch is released.
    pub fn interrupt(&self) {
        let mut state = self.state.lock();
        if state.released {
            return;
        }
        state.interrupted = true;
        drop(state);
        self.condvar.notify_all();
    }

    /// Returns true once released.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    /// Number of `release` calls, including redundant ones.
    #[must_use]
    pub fn release_calls(&self) -> u32 {
        self.state.lock().release_calls
    }

    /// Blocks until released or interrupted.
    pub fn wait(&self) -> WaitOutcome {
        let mut state = self.state.lock();
        loop {
            if state.released {
                return WaitOutcome::Released;
            }
            if state.interrupted {
                return WaitOutcome::Interrupted;
            }
            self.condvar.wait(&mut state);
        }
    }

    /// Blocks until released, interrupted, or `timeout` elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        loop {
            if state.released {
                return WaitOutcome::Released;
            }
            if state.interrupted {
                return WaitOutcome::Interrupted;
            }
            if self.condvar.wait_until(&mut state, deadline).timed_out() {
                return if state.released {
                    WaitOutcome::Released
                } else if state.interrupted {
                    WaitOutcome::Interrupted
                } else {
                    WaitOutcome::TimedOut
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_release_before_wait() {
        let latch = Latch::new();
        assert!(latch.release());
        assert_eq!(latch.wait(), WaitOutcome::Released);
    }

    #[test]
    fn test_second_release_is_benign() {
        let latch = Latch::new();
        assert!(latch.release());
        assert!(!latch.release());
        assert!(latch.is_released());
        assert_eq!(latch.release_calls(), 2);
        assert_eq!(latch.wait(), WaitOutcome::Released);
    }

    #[test]
    fn test_release_from_other_thread_wakes_waiter() {
        let latch = Arc::new(Latch::new());
        let remote = Arc::clone(&latch);

        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.release();
        });

        assert_eq!(latch.wait(), WaitOutcome::Released);
        releaser.join().unwrap();
    }

    #[test]
    fn test_interrupt_wakes_waiter() {
        let latch = Arc::new(Latch::new());
        let remote = Arc::clone(&latch);

        let waiter = thread::spawn(move || remote.wait());
        thread::sleep(Duration::from_millis(20));
        latch.interrupt();

        assert_eq!(waiter.join().unwrap(), WaitOutcome::Interrupted);
        assert!(!latch.is_released());
    }

    #[test]
    fn test_interrupt_after_release_is_ignored() {
        let latch = Latch::new();
        latch.release();
        latch.interrupt();
        assert_eq!(latch.wait(), WaitOutcome::Released);
    }

    #[test]
    fn test_wait_timeout_expires() {
        let latch = Latch::new();
        let start = Instant::now();
        assert_eq!(latch.wait_timeout(Duration::from_millis(30)), WaitOutcome::TimedOut);
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_timeout_sees_release() {
        let latch = Arc::new(Latch::new());
        let remote = Arc::clone(&latch);
        let releaser = thread::spawn(move || {
            thread::sleep(Duration::from_millis(10));
            remote.release();
        });

        assert_eq!(latch.wait_timeout(Duration::from_secs(5)), WaitOutcome::Released);
        releaser.join().unwrap();
    }
}
