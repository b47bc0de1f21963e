//! Cooperative cancellation for long-running solves.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{PostmanError, PostmanResult};

/// A cloneable stop handle checked by the solver between units of work.
///
/// Setting the flag from any clone (for example from a signal handler or
/// another thread) makes the next check fail with
/// [`PostmanError::Cancelled`]. An optional deadline has the same effect
/// once it passes.
///
/// # Examples
///
/// ```
/// use u_postman::Interrupt;
///
/// let interrupt = Interrupt::new();
/// let handle = interrupt.clone();
/// assert!(interrupt.check().is_ok());
///
/// handle.cancel();
/// assert!(interrupt.is_cancelled());
/// assert!(interrupt.check().is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    stop_flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl Interrupt {
    /// Creates a handle that is not cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy sharing the same flag that also expires after `limit`.
    pub fn with_time_limit(&self, limit: Duration) -> Self {
        Self {
            stop_flag: Arc::clone(&self.stop_flag),
            deadline: Instant::now().checked_add(limit),
        }
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Returns `true` once cancelled or past the deadline.
    pub fn is_cancelled(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Fails with [`PostmanError::Cancelled`] if [`is_cancelled`](Self::is_cancelled).
    pub fn check(&self) -> PostmanResult<()> {
        if self.is_cancelled() {
            Err(PostmanError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_interrupt_continues() {
        let i = Interrupt::new();
        assert!(!i.is_cancelled());
        assert_eq!(i.check(), Ok(()));
    }

    #[test]
    fn test_cancel_visible_through_clones() {
        let i = Interrupt::new();
        let timed = i.with_time_limit(Duration::from_secs(3600));
        i.clone().cancel();
        assert!(i.is_cancelled());
        assert!(timed.is_cancelled());
        assert_eq!(timed.check(), Err(PostmanError::Cancelled));
    }

    #[test]
    fn test_expired_deadline() {
        let i = Interrupt::new().with_time_limit(Duration::ZERO);
        assert!(i.is_cancelled());
    }

    #[test]
    fn test_cancel_from_other_thread() {
        let i = Interrupt::new();
        let handle = i.clone();
        std::thread::spawn(move || handle.cancel()).join().unwrap();
        assert!(i.is_cancelled());
    }
}
