//! Cooperative cancellation.
//!
//! A [`ShutdownNotifier`] is a cheap, clonable handle to shared state. Any
//! clone may request a shutdown; the algorithm polls it at its check points
//! (once per waitlist pop, once per successor) and unwinds with
//! [`CpaError::Interrupted`]. Time limits are layered on top by requesting a
//! shutdown from a watchdog.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use log::debug;

use crate::error::{CpaError, Result};

struct ShutdownState {
    requested: AtomicBool,
    reason: RwLock<Option<String>>,
}

#[derive(Clone)]
pub struct ShutdownNotifier {
    state: Arc<ShutdownState>,
}

impl ShutdownNotifier {
    pub fn new() -> Self {
        Self {
            state: Arc::new(ShutdownState {
                requested: AtomicBool::new(false),
                reason: RwLock::new(None),
            }),
        }
    }

    /// Request a shutdown.
    ///
    /// Returns true if this call triggered it (first requester wins; later
    /// reasons are dropped).
    pub fn request_shutdown(&self, reason: &str) -> bool {
        // Hold the reason lock across the flag flip: whoever sees the flag also sees the reason.
        let mut slot = match self.state.reason.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if self
            .state
            .requested
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }
        *slot = Some(reason.to_string());
        debug!("Shutdown requested: {}", reason);
        true
    }

    pub fn should_shutdown(&self) -> bool {
        self.state.requested.load(Ordering::SeqCst)
    }

    /// The reason given by the first requester, if any.
    pub fn reason(&self) -> Option<String> {
        match self.state.reason.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Check point: fails with [`CpaError::Interrupted`] once a shutdown was requested.
    pub fn shutdown_if_necessary(&self) -> Result<()> {
        if self.should_shutdown() {
            Err(CpaError::Interrupted)
        } else {
            Ok(())
        }
    }
}

impl Default for ShutdownNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ShutdownNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownNotifier")
            .field("requested", &self.should_shutdown())
            .field("reason", &self.reason())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request() {
        let notifier = ShutdownNotifier::new();
        assert!(!notifier.should_shutdown());
        assert_eq!(notifier.shutdown_if_necessary(), Ok(()));

        let other = notifier.clone();
        assert!(other.request_shutdown("time limit"));
        assert!(notifier.should_shutdown());
        assert_eq!(notifier.shutdown_if_necessary(), Err(CpaError::Interrupted));
        assert_eq!(notifier.reason().as_deref(), Some("time limit"));
    }

    #[test]
    fn test_first_requester_wins() {
        let notifier = ShutdownNotifier::new();
        assert!(notifier.request_shutdown("first"));
        assert!(!notifier.request_shutdown("second"));
        assert_eq!(notifier.reason().as_deref(), Some("first"));
    }

    #[test]
    fn test_across_threads() {
        let notifier = ShutdownNotifier::new();
        let remote = notifier.clone();
        std::thread::spawn(move || remote.request_shutdown("watchdog"))
            .join()
            .unwrap();
        assert!(notifier.should_shutdown());
    }
}
