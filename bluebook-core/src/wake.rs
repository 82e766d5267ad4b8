//! Scheduled semaphore wake
//!
//! The interpreter may ask to be signalled once a tick has passed. Only one
//! request is outstanding; a new one replaces it.

use crate::traits::Semaphore;

/// Pending wake request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct WakeRequest {
    semaphore: Semaphore,
    tick_ms: u32,
}

/// At most one timed semaphore signal
#[derive(Debug, Clone, Default)]
pub struct ScheduledWake {
    pending: Option<WakeRequest>,
}

impl ScheduledWake {
    /// Create with nothing scheduled
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Replace the pending request
    ///
    /// Passing `None` cancels whatever is pending.
    pub fn schedule(&mut self, semaphore: Option<Semaphore>, tick_ms: u32) {
        self.pending = semaphore.map(|semaphore| WakeRequest { semaphore, tick_ms });
    }

    /// Take the semaphore if its tick has passed
    pub fn poll(&mut self, now_ms: u32) -> Option<Semaphore> {
        match self.pending {
            Some(request) if now_ms > request.tick_ms => {
                self.pending = None;
                Some(request.semaphore)
            }
            _ => None,
        }
    }

    /// Whether a request is outstanding
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Target tick of the outstanding request
    pub fn deadline(&self) -> Option<u32> {
        self.pending.map(|request| request.tick_ms)
    }
}
