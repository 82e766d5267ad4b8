//! Keyboard sources
//!
//! A host provides keys in one of two forms, chosen once when the bridge is
//! built:
//! - raw: USB HID usage codes plus the modifier byte, decoded by the bridge
//! - cooked: byte sequences already translated by the host keymap

use heapless::Vec;

/// Maximum keys reported in one poll (USB boot protocol limit)
pub const MAX_KEYS_PER_REPORT: usize = 6;

/// Maximum length of a cooked key sequence
pub const MAX_SEQUENCE_LEN: usize = 6;

/// Keys pressed since the previous poll
pub type KeyReport = Vec<RawKey, MAX_KEYS_PER_REPORT>;

/// One cooked key sequence (e.g. `b"a"`, `b"\x1b[A"`)
pub type KeySequence = Vec<u8, MAX_SEQUENCE_LEN>;

/// A raw key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawKey {
    /// USB HID usage code
    pub scan_code: u8,
    /// USB HID modifier byte held at the time of the press
    pub modifiers: u8,
}

impl RawKey {
    /// Create a raw key press
    pub const fn new(scan_code: u8, modifiers: u8) -> Self {
        Self {
            scan_code,
            modifiers,
        }
    }

    /// Unpack the `modifiers << 8 | scan_code` form used by USB stacks
    pub const fn from_packed(packed: u16) -> Self {
        Self {
            scan_code: (packed & 0xFF) as u8,
            modifiers: (packed >> 8) as u8,
        }
    }
}

/// Keyboard reporting raw key presses
pub trait RawKeyboard {
    /// Return the keys pressed since the previous poll
    fn poll_keys(&mut self) -> KeyReport;
}

/// Keyboard reporting keymap-translated sequences
pub trait CookedKeyboard {
    /// Return the next pending key sequence, if any
    fn poll_sequence(&mut self) -> Option<KeySequence>;
}

/// Which form of key input the host delivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyboardMode {
    /// Scan codes decoded by the bridge
    Raw,
    /// Sequences decoded by the host
    Cooked,
}

/// The keyboard attached to a host
#[derive(Debug)]
pub enum KeyboardSource<R, C> {
    /// Raw scan-code keyboard
    Raw(R),
    /// Cooked sequence keyboard
    Cooked(C),
}

impl<R, C> KeyboardSource<R, C> {
    /// Input form of this source
    pub fn mode(&self) -> KeyboardMode {
        match self {
            Self::Raw(_) => KeyboardMode::Raw,
            Self::Cooked(_) => KeyboardMode::Cooked,
        }
    }
}

/// Placeholder for the unused arm of [`KeyboardSource`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeyboard;

impl RawKeyboard for NoKeyboard {
    fn poll_keys(&mut self) -> KeyReport {
        Vec::new()
    }
}

impl CookedKeyboard for NoKeyboard {
    fn poll_sequence(&mut self) -> Option<KeySequence> {
        None
    }
}
