//! Shared state for hosts that run the interpreter on another context
//!
//! The frame loop owns its state outright. When input arrives from an
//! interrupt or the interpreter runs elsewhere, wrap the queue, damage
//! tracker and wake in [`Shared`] so each access is serialized by a
//! blocking mutex.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use bluebook_display::DamageTracker;

use crate::queue::InputQueue;
use crate::wake::ScheduledWake;

/// Value guarded by a blocking mutex
pub struct Shared<M: RawMutex, T> {
    inner: Mutex<M, RefCell<T>>,
}

impl<M: RawMutex, T> Shared<M, T> {
    /// Wrap `value`
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access to the value
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

/// Input queue shared between producer and consumer contexts
pub type SharedInputQueue<M> = Shared<M, InputQueue>;

/// Damage tracker shared with the interpreter context
pub type SharedDamage<M> = Shared<M, DamageTracker>;

/// Scheduled wake shared with the interpreter context
pub type SharedWake<M> = Shared<M, ScheduledWake>;
