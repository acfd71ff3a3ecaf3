//! Cooperative abort signalling
//!
//! One process-wide flag, set once by an external input (a physical button),
//! polled by every control loop each cycle. The core never clears it: an
//! aborted run ends the program's maneuvering, it does not resume.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::hardware::AbortInput;

/// Shared abort flag
///
/// Cloning yields another handle to the same flag. Transitions false→true
/// only; loops observe the change within one of their cycle periods.
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    flag: Arc<AtomicBool>,
}

impl AbortToken {
    /// Create a new, unset token
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether an abort has been requested
    #[inline]
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Request an abort
    pub fn set(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

/// Background task polling an [`AbortInput`] and setting an [`AbortToken`]
///
/// Runs for the process lifetime in normal use; [`join`](Self::join) exists
/// so tests can shut it down cleanly.
pub struct AbortWatch {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl AbortWatch {
    /// Spawn the watcher thread
    ///
    /// Polls `input` every `poll_period` and sets `token` the first time the
    /// input reports pressed, then keeps running (the flag is already
    /// latched; repeated stores are harmless).
    pub fn spawn<I>(input: I, token: AbortToken, poll_period: Duration) -> Self
    where
        I: AbortInput + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();

        let thread = thread::spawn(move || {
            while running_clone.load(Ordering::Relaxed) {
                if input.is_pressed() {
                    tracing::warn!("abort input pressed, latching abort token");
                    token.set();
                }
                thread::sleep(poll_period);
            }
        });

        Self {
            running,
            thread: Some(thread),
        }
    }

    /// Check if the watcher thread is still running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Stop the watcher and wait for its thread to finish
    pub fn join(mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AbortWatch {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}
