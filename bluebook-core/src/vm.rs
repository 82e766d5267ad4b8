//! Bridge state shared with the interpreter
//!
//! [`VmState`] holds everything the interpreter can observe or change
//! through host services. During a step the interpreter receives a
//! [`VmContext`], which pairs that state with the host clock.

use bluebook_display::{BitmapSize, CursorGlyph, DamageTracker, DirtyRect};
use bluebook_hal::Clock;
use bluebook_protocol::absolute_time;

use crate::config::WakePolicy;
use crate::error::{fatal, ContractViolation};
use crate::queue::InputQueue;
use crate::traits::Semaphore;
use crate::wake::ScheduledWake;

/// Clamp a point to the bitmap
pub fn clamp_to_display(x: i32, y: i32, size: BitmapSize) -> (u16, u16) {
    let clamp = |value: i32, extent: u16| value.clamp(0, i32::from(extent.saturating_sub(1))) as u16;
    (clamp(x, size.width), clamp(y, size.height))
}

/// State the interpreter reaches through host services
#[derive(Debug)]
pub struct VmState {
    queue: InputQueue,
    wake: ScheduledWake,
    damage: DamageTracker,
    /// Display bitmap size; empty until the interpreter sets it
    display: BitmapSize,
    /// Pointer position in bitmap coordinates
    pointer: (u16, u16),
    /// Cursor glyph installed since the last render
    cursor_image: Option<CursorGlyph>,
    /// Pointer move requested by the interpreter
    cursor_request: Option<(u16, u16)>,
    /// Wake that was already due when scheduled
    due_wake: Option<Semaphore>,
    quit: bool,
}

impl Default for VmState {
    fn default() -> Self {
        Self::new(WakePolicy::default())
    }
}

impl VmState {
    /// Create state for an interpreter that has not set up its display yet
    pub const fn new(policy: WakePolicy) -> Self {
        Self {
            queue: InputQueue::new(policy),
            wake: ScheduledWake::new(),
            damage: DamageTracker::new(),
            display: BitmapSize::new(0, 0),
            pointer: (0, 0),
            cursor_image: None,
            cursor_request: None,
            due_wake: None,
            quit: false,
        }
    }

    pub fn queue(&self) -> &InputQueue {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut InputQueue {
        &mut self.queue
    }

    pub fn wake(&self) -> &ScheduledWake {
        &self.wake
    }

    pub fn wake_mut(&mut self) -> &mut ScheduledWake {
        &mut self.wake
    }

    pub fn damage(&self) -> &DamageTracker {
        &self.damage
    }

    pub fn damage_mut(&mut self) -> &mut DamageTracker {
        &mut self.damage
    }

    /// Display bitmap size
    pub fn display_size(&self) -> BitmapSize {
        self.display
    }

    /// Pointer position in bitmap coordinates
    pub fn pointer(&self) -> (u16, u16) {
        self.pointer
    }

    /// Record the pointer position observed by the frame loop
    pub fn set_pointer(&mut self, position: (u16, u16)) {
        self.pointer = position;
    }

    /// Cursor glyph installed since the last call
    pub fn take_cursor_image(&mut self) -> Option<CursorGlyph> {
        self.cursor_image.take()
    }

    /// Pointer move requested since the last call
    pub fn take_cursor_request(&mut self) -> Option<(u16, u16)> {
        self.cursor_request.take()
    }

    /// Whether the interpreter asked to stop
    pub fn quit_signalled(&self) -> bool {
        self.quit
    }
}

/// Host services available to the interpreter during a step
pub struct VmContext<'a> {
    state: &'a mut VmState,
    clock: &'a dyn Clock,
}

impl<'a> VmContext<'a> {
    /// Lend `state` and `clock` to the interpreter
    pub fn new(state: &'a mut VmState, clock: &'a dyn Clock) -> Self {
        Self { state, clock }
    }

    /// Next queued input word
    pub fn next_input_word(&mut self) -> Option<u16> {
        self.state.queue.pop()
    }

    /// Register the semaphore signalled for new input
    pub fn set_input_semaphore(&mut self, semaphore: Option<Semaphore>) {
        self.state.queue.set_semaphore(semaphore);
    }

    /// Signal `semaphore` once the millisecond clock passes `tick_ms`
    ///
    /// Replaces any pending request; `None` cancels it. If the tick has
    /// already passed, the signal is delivered as soon as the current step
    /// returns.
    pub fn signal_at(&mut self, semaphore: Option<Semaphore>, tick_ms: u32) {
        self.state.wake.schedule(semaphore, tick_ms);
        self.state.due_wake = self.state.wake.poll(self.clock.ticks_ms());
    }

    /// Wake that fell due while scheduling
    pub(crate) fn take_due_wake(&mut self) -> Option<Semaphore> {
        self.state.due_wake.take()
    }

    /// Millisecond clock
    pub fn millisecond_clock(&self) -> u32 {
        self.clock.ticks_ms()
    }

    /// Seconds since 1901-01-01
    pub fn seconds_clock(&self) -> u32 {
        absolute_time(self.clock.unix_time_secs())
    }

    /// Set the display bitmap size
    ///
    /// A new size redraws the whole display on the next render.
    pub fn set_display_size(&mut self, width: u16, height: u16) {
        let size = BitmapSize::new(width, height);
        if size == self.state.display {
            return;
        }
        self.state.display = size;
        self.state.pointer = clamp_to_display(
            i32::from(self.state.pointer.0),
            i32::from(self.state.pointer.1),
            size,
        );
        self.state.damage.mark_all(size);
    }

    /// Display bitmap size
    pub fn display_size(&self) -> BitmapSize {
        self.state.display
    }

    /// Report a changed display region
    ///
    /// Stops the bridge if the region is not inside the display.
    pub fn display_changed(&mut self, x: i32, y: i32, width: i32, height: i32) {
        if let Err(violation) = self.try_display_changed(x, y, width, height) {
            fatal(violation);
        }
    }

    /// Report a changed display region, returning violations to the caller
    pub fn try_display_changed(
        &mut self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Result<(), ContractViolation> {
        if x < 0 || y < 0 || width < 0 || height < 0 {
            return Err(ContractViolation::NegativeDamage);
        }
        let narrow = |value: i32| u16::try_from(value).unwrap_or(u16::MAX);
        let rect = DirtyRect::new(narrow(x), narrow(y), narrow(width), narrow(height));
        self.state.damage.report(rect, self.state.display)?;
        Ok(())
    }

    /// Install a new cursor glyph
    pub fn set_cursor_image(&mut self, glyph: &CursorGlyph) {
        self.state.cursor_image = Some(*glyph);
    }

    /// Move the pointer (bitmap coordinates, clamped to the display)
    pub fn set_cursor_location(&mut self, x: i32, y: i32) {
        let position = clamp_to_display(x, y, self.state.display);
        self.state.pointer = position;
        self.state.cursor_request = Some(position);
    }

    /// Pointer position in bitmap coordinates
    pub fn cursor_location(&self) -> (u16, u16) {
        self.state.pointer
    }

    /// Ask the frame loop to stop
    pub fn signal_quit(&mut self) {
        self.state.quit = true;
    }

    /// Whether stopping was requested
    pub fn quit_signalled(&self) -> bool {
        self.state.quit
    }
}
