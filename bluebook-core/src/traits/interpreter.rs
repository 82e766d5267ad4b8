//! Interpreter interface

use bluebook_display::DisplayBitmap;

use crate::vm::VmContext;

/// Object pointer of an interpreter semaphore
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Semaphore(pub u32);

/// Object pointer of the interpreter's display bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitmapHandle(pub u32);

/// The hosted bytecode interpreter
///
/// The bridge drives the interpreter one step at a time and lends it a
/// [`VmContext`] for host services during the step.
pub trait Interpreter {
    /// Signal `semaphore` from outside the interpreter
    fn asynchronous_signal(&mut self, semaphore: Semaphore);

    /// Current display bitmap, if it matches `width` x `height`
    fn display_bits(&mut self, width: u16, height: u16) -> Option<BitmapHandle>;

    /// Word `index` of the display bitmap `bitmap`
    fn fetch_display_word(&self, index: usize, bitmap: BitmapHandle) -> u16;

    /// Execute one step
    fn cycle(&mut self, vm: &mut VmContext<'_>);

    /// Give the interpreter a chance to react to low memory
    fn check_low_memory_conditions(&mut self) {}
}

/// The interpreter's display bitmap, seen as a [`DisplayBitmap`]
pub struct PeerBitmap<'a, I: ?Sized> {
    interpreter: &'a I,
    handle: BitmapHandle,
}

impl<'a, I: Interpreter + ?Sized> PeerBitmap<'a, I> {
    /// Wrap `handle` of `interpreter`
    pub fn new(interpreter: &'a I, handle: BitmapHandle) -> Self {
        Self {
            interpreter,
            handle,
        }
    }
}

impl<I: Interpreter + ?Sized> DisplayBitmap for PeerBitmap<'_, I> {
    fn word(&self, index: usize) -> u16 {
        self.interpreter.fetch_display_word(index, self.handle)
    }
}
