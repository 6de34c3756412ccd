//! # UI Executor
//!
//! The single-threaded context that owns every piece of visual and ad-slot
//! state. Other threads never touch that state; they submit tasks.
//!
//! ## Architecture
//!
//! ```text
//!   Engine thread ──┐
//!   Ad SDK thread ──┼──> [UiHandle::submit] ──> [Unbounded Channel] ──> UI thread
//!   Video thread  ──┘        (any thread)          (FIFO per sender)     (runs tasks)
//! ```
//!
//! The executor can be driven two ways:
//! - **Embedded**: the host's own event loop calls [`UiExecutor::run_pending`]
//!   once per iteration.
//! - **Dedicated**: [`UiThread::spawn`] runs the loop on its own thread until
//!   dropped.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

use crate::config::ExecutorConfig;
use crate::error::{BridgeError, BridgeResult};

/// A unit of work executed on the UI thread.
pub type UiTask = Box<dyn FnOnce() + Send + 'static>;

/// State shared between the executor and all of its handles.
#[derive(Debug)]
struct ExecutorShared {
    /// Thread currently driving the executor.
    owner: Mutex<Option<ThreadId>>,
    /// Cleared once the executor stops taking work.
    accepting: AtomicBool,
    /// Tasks run so far.
    executed: AtomicU64,
}

/// Thread-safe submission side of the UI executor.
///
/// Cheap to clone; hand one to every component that needs to reach the UI
/// thread.
#[derive(Clone)]
pub struct UiHandle {
    sender: Sender<UiTask>,
    shared: Arc<ExecutorShared>,
}

impl std::fmt::Debug for UiHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiHandle")
            .field("accepting", &self.is_accepting())
            .field("queued", &self.sender.len())
            .finish()
    }
}

impl UiHandle {
    /// Queues `task` to run on the UI thread.
    ///
    /// Never blocks. Tasks from one submitting thread run in submission order.
    ///
    /// # Errors
    ///
    /// Returns `UiUnavailable` if the executor was closed or dropped.
    pub fn submit<F>(&self, task: F) -> BridgeResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.shared.accepting.load(Ordering::Acquire) {
            return Err(BridgeError::UiUnavailable);
        }
        self.sender
            .send(Box::new(task))
            .map_err(|_| BridgeError::UiUnavailable)
    }

    /// Returns true when called from the thread driving the executor.
    #[must_use]
    pub fn is_ui_thread(&self) -> bool {
        *self.shared.owner.lock() == Some(thread::current().id())
    }

    /// Returns true while the executor takes new tasks.
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.shared.accepting.load(Ordering::Acquire)
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.sender.len()
    }
}

/// Receiving side of the UI executor.
pub struct UiExecutor {
    receiver: Receiver<UiTask>,
    handle: UiHandle,
}

impl Default for UiExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl UiExecutor {
    /// Creates an executor that accepts tasks immediately.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        let shared = Arc::new(ExecutorShared {
            owner: Mutex::new(None),
            accepting: AtomicBool::new(true),
            executed: AtomicU64::new(0),
        });

        Self {
            receiver,
            handle: UiHandle { sender, shared },
        }
    }

    /// Returns a submission handle.
    #[must_use]
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Declares the calling thread as the UI thread.
    ///
    /// `run_pending` does this implicitly; call it up front when UI-thread
    /// checks must hold before the first pump.
    pub fn bind_current_thread(&self) {
        *self.handle.shared.owner.lock() = Some(thread::current().id());
    }

    /// Runs every queued task, including tasks queued by those tasks.
    ///
    /// Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        self.bind_current_thread();

        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            self.execute(task);
            ran += 1;
        }

        if ran > 0 {
            tracing::trace!("UI executor ran {} task(s)", ran);
        }
        ran
    }

    /// Stops accepting new tasks. Already queued tasks can still be run.
    pub fn close(&self) {
        self.handle.shared.accepting.store(false, Ordering::Release);
    }

    /// Total tasks run by this executor.
    #[must_use]
    pub fn executed(&self) -> u64 {
        self.handle.shared.executed.load(Ordering::Relaxed)
    }

    fn execute(&self, task: UiTask) {
        if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
            tracing::error!("UI task panicked; executor keeps running");
        }
        self.handle.shared.executed.fetch_add(1, Ordering::Relaxed);
    }

    /// Dedicated thread main loop.
    fn run_loop(&self, shutdown: &AtomicBool, poll_interval: Duration) {
        self.bind_current_thread();

        while !shutdown.load(Ordering::Acquire) {
            match self.receiver.recv_timeout(poll_interval) {
                Ok(task) => self.execute(task),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        self.close();

        let discarded = self.receiver.try_iter().count();
        if discarded > 0 {
            tracing::warn!("UI thread stopped with {} task(s) discarded", discarded);
        }
    }
}

impl Drop for UiExecutor {
    fn drop(&mut self) {
        self.close();
    }
}

/// A UI executor running on its own thread.
///
/// Dropping it stops the thread; queued tasks that never ran are dropped.
pub struct UiThread {
    handle: UiHandle,
    shutdown: Arc<AtomicBool>,
    join: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Starts a dedicated UI thread.
    ///
    /// # Errors
    ///
    /// Returns `ThreadSpawn` if the OS refuses the thread.
    pub fn spawn(config: &ExecutorConfig) -> BridgeResult<Self> {
        let executor = UiExecutor::new();
        let handle = executor.handle();
        let shutdown = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&shutdown);
        let poll_interval = config.poll_interval();

        let join = thread::Builder::new()
            .name(config.thread_name.clone())
            .spawn(move || executor.run_loop(&flag, poll_interval))
            .map_err(|e| BridgeError::ThreadSpawn(e.to_string()))?;

        tracing::debug!("UI thread '{}' started", config.thread_name);

        Ok(Self {
            handle,
            shutdown,
            join: Some(join),
        })
    }

    /// Returns a submission handle.
    #[must_use]
    pub fn handle(&self) -> UiHandle {
        self.handle.clone()
    }

    /// Stops the thread and waits for it to exit.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            if join.join().is_err() {
                tracing::error!("UI thread exited by panic");
            }
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.stop();
    }
}
