//! Host platform bundle

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;
use crate::keyboard::{CookedKeyboard, KeyboardSource, RawKeyboard};
use crate::mouse::Mouse;

/// All host devices the frame loop uses
pub trait Platform: Clock {
    /// Raw keyboard type
    type RawKeyboard: RawKeyboard;
    /// Cooked keyboard type
    type CookedKeyboard: CookedKeyboard;
    /// Mouse type
    type Mouse: Mouse;

    /// Keyboard attached to the host
    fn keyboard(&mut self) -> &mut KeyboardSource<Self::RawKeyboard, Self::CookedKeyboard>;

    /// Mouse attached to the host
    fn mouse(&mut self) -> &mut Self::Mouse;

    /// Block for `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

/// Platform assembled from individual devices
#[derive(Debug)]
pub struct Host<C, R, K, M, D> {
    /// Time source
    pub clock: C,
    /// Keyboard (raw or cooked)
    pub keyboard: KeyboardSource<R, K>,
    /// Pointer device
    pub mouse: M,
    /// Blocking delay used for frame throttling
    pub delay: D,
}

impl<C, R, K, M, D> Host<C, R, K, M, D> {
    /// Bundle host devices
    pub fn new(clock: C, keyboard: KeyboardSource<R, K>, mouse: M, delay: D) -> Self {
        Self {
            clock,
            keyboard,
            mouse,
            delay,
        }
    }
}

impl<C: Clock, R, K, M, D> Clock for Host<C, R, K, M, D> {
    fn ticks_ms(&self) -> u32 {
        self.clock.ticks_ms()
    }

    fn unix_time_secs(&self) -> u32 {
        self.clock.unix_time_secs()
    }
}

impl<C, R, K, M, D> Platform for Host<C, R, K, M, D>
where
    C: Clock,
    R: RawKeyboard,
    K: CookedKeyboard,
    M: Mouse,
    D: DelayNs,
{
    type RawKeyboard = R;
    type CookedKeyboard = K;
    type Mouse = M;

    fn keyboard(&mut self) -> &mut KeyboardSource<R, K> {
        &mut self.keyboard
    }

    fn mouse(&mut self) -> &mut M {
        &mut self.mouse
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
