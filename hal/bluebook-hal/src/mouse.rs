//! Pointer device abstraction

/// Left (select) button bit
pub const BUTTON_LEFT: u8 = 0x01;
/// Middle (frame) button bit
pub const BUTTON_MIDDLE: u8 = 0x02;
/// Right (menu) button bit
pub const BUTTON_RIGHT: u8 = 0x04;

/// Snapshot of the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MouseState {
    /// Absolute x in screen pixels
    pub x: i32,
    /// Absolute y in screen pixels
    pub y: i32,
    /// Pressed buttons bitmask
    pub buttons: u8,
}

/// Mouse device
pub trait Mouse {
    /// Poll the device and return the current state
    fn state(&mut self) -> MouseState;

    /// Move the pointer to an absolute screen position
    fn set_position(&mut self, x: i32, y: i32);

    /// Refresh a hardware cursor, if the device has one
    fn update_cursor(&mut self) {}
}
