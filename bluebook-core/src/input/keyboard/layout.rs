//! Scan code to ASCII tables
//!
//! Tables are indexed by USB HID usage code (base) or by the unshifted ASCII
//! value (shift). A zero entry means the key has no character.

/// Number of entries in each table
pub const TABLE_LEN: usize = 128;

/// A keyboard layout
#[derive(Debug)]
pub struct Layout {
    /// Layout name, as used in configuration
    pub name: &'static str,
    /// Usage code to unshifted ASCII
    pub base: [u8; TABLE_LEN],
    /// Unshifted ASCII to shifted ASCII
    pub shift: [u8; TABLE_LEN],
    /// Characters reachable with Alt, if the layout has any
    pub alt: Option<fn(u8) -> Option<u8>>,
}

impl Layout {
    /// Unshifted character for a usage code
    pub fn base(&self, scan_code: u8) -> u8 {
        self.base.get(scan_code as usize).copied().unwrap_or(0)
    }

    /// Shifted character for a usage code
    pub fn shifted(&self, scan_code: u8) -> u8 {
        self.shift
            .get(self.base(scan_code) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Alt character for a usage code
    pub fn alternate(&self, scan_code: u8) -> Option<u8> {
        self.alt.and_then(|alt| alt(self.base(scan_code)))
    }
}

/// US layout
pub static US: Layout = Layout {
    name: "us",
    base: [
        0, 0, 0, 0, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l',
        b'm', b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', b'1', b'2',
        b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', 13, 27, 8, 10, 32, b'-', b'=', b'[',
        b']', b'\\', b'~', b';', b'\'', b'`', b',', b'.', b'/', 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
        0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    ],
    shift: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
        16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
        32, b'!', b'"', b'#', b'$', b'%', b'&', b'\'', b'(', b')', b'*', b'+', b'<', b'_', b'>', b'?',
        b')', b'!', b'@', b'#', b'$', b'%', b'^', b'&', b'*', b'(', b':', b':', b'<', b'+', b'>', b'?',
        b'@', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
        b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b'{', b'|', b'}', b'^', b'_',
        b'~', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
        b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b'{', b'|', b'}', b'~', 127,
    ],
    alt: None,
};

/// German layout (Raspberry Pi 400 keyboard)
///
/// Umlauts map to their base letter; non-ASCII legends are replaced by the
/// other character printed on the same key.
pub static GERMAN: Layout = Layout {
    name: "german",
    base: [
        0, 0, 0, 0, b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l',
        b'm', b'n', b'o', b'p', b'q', b'r', b's', b't', b'u', b'v', b'w', b'x', b'z', b'y', b'1', b'2',
        b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', 13, 27, 8, 10, 32, b'?', b'`', b'u',
        b'+', b'#', b'~', b'o', b'a', b'^', b',', b'.', b'-', b'A', b'B', b'C', b'D', b'E', b'F', b'G',
        b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O', b'P', b'Q', b'R', b'S', 127, b'U', b'V', b'W',
        b'X', b'Y', b'Z', b'a', b'b', b'c', b'd', b'e', b'f', b'g', b'h', b'i', b'j', b'k', b'l', b'm',
        b'n', b'o', b'p', b'q', b'<', b's', b't', b'u', b'v', b'w', b'x', b'y', b'z', b'0', b'1', b'2',
        b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'!', b'"', b'@', b'$', b'%', b'&', b'/', b'(', b')',
    ],
    shift: [
        0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,
        16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27, 28, 29, 30, 31,
        32, b'!', b'"', b'\'', b'$', b'%', b'&', b'\'', b'(', b')', b'*', b'*', b';', b'_', b':', b'/',
        b'=', b'!', b'"', b'@', b'$', b'%', b'&', b'/', b'(', b')', b':', b';', b'>', b'=', b'>', b'?',
        b'@', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
        b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b'[', b'\\', b']', b'^', b'_',
        b'`', b'A', b'B', b'C', b'D', b'E', b'F', b'G', b'H', b'I', b'J', b'K', b'L', b'M', b'N', b'O',
        b'P', b'Q', b'R', b'S', b'T', b'U', b'V', b'W', b'X', b'Y', b'Z', b'{', b'|', b'}', b'~', 127,
    ],
    alt: Some(german_alt),
};

/// Characters printed on the right of German keycaps
fn german_alt(base: u8) -> Option<u8> {
    match base {
        b'7' => Some(b'{'),
        b'8' => Some(b'['),
        b'9' => Some(b']'),
        b'0' => Some(b'}'),
        b'?' => Some(b'\\'),
        b'q' => Some(b'@'),
        b'+' => Some(b'~'),
        b'<' => Some(b'|'),
        _ => None,
    }
}
