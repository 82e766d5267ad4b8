//! Cooked key sequence assembly
//!
//! Hosts with their own keymap deliver characters as short byte sequences.
//! Control characters and `ESC`-prefixed characters are turned back into a
//! printable byte plus modifier flags.

/// Control was held
pub const FLAG_CONTROL: u8 = 0x01;

/// Meta (Alt) was held
pub const FLAG_META: u8 = 0x02;

const ESC: u8 = 0x1B;

/// A resolved character with its modifier flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CookedKey {
    pub byte: u8,
    /// [`FLAG_CONTROL`] | [`FLAG_META`]
    pub flags: u8,
}

impl CookedKey {
    pub const fn new(byte: u8, flags: u8) -> Self {
        Self { byte, flags }
    }
}

/// Reduce a key sequence to a single cooked key
///
/// Returns `None` for empty sequences and for multi-byte escape sequences
/// (cursor and function keys).
pub fn assemble(sequence: &[u8]) -> Option<CookedKey> {
    match *sequence {
        // Backspace, tab, line feed and return are keys in their own right
        [byte @ (0x08 | 0x09 | 0x0A | 0x0D)] => Some(CookedKey::new(byte, 0)),
        [byte @ 0x01..=0x1A] => Some(CookedKey::new(b'a' + byte - 1, FLAG_CONTROL)),
        [byte] => Some(CookedKey::new(byte, 0)),
        [ESC, byte] if byte != ESC && byte != b'[' => Some(CookedKey::new(byte, FLAG_META)),
        _ => None,
    }
}
