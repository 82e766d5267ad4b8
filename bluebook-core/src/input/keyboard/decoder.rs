//! Key press to event word translation

use bluebook_hal::RawKey;
use bluebook_protocol::{EventType, EventWord, CAPS_LOCK_KEY_CODE, CONTROL_KEY_CODE, META_KEY_CODE};

use super::cooked::{CookedKey, FLAG_CONTROL, FLAG_META};
use super::layout::Layout;
use crate::error::IgnoreReason;
use crate::input::modifiers::{ModifierState, Modifiers};
use crate::input::{Decoded, EventWords};

/// USB HID usage code of the caps-lock key
pub const KEY_CAPS_LOCK: u8 = 0x39;

/// Largest usage code resolved through the layout tables
const MAX_DECODED_CODE: u8 = 127;

/// Translates key presses into down/up word sequences
#[derive(Debug, Clone)]
pub struct KeyboardDecoder {
    layout: &'static Layout,
    state: ModifierState,
    /// Forward codes above 127 instead of dropping them
    undecoded_passthrough: bool,
}

impl KeyboardDecoder {
    /// Create a decoder for `layout`
    pub fn new(layout: &'static Layout) -> Self {
        Self {
            layout,
            state: ModifierState::default(),
            undecoded_passthrough: false,
        }
    }

    /// Forward usage codes above 127 as undecoded keys
    pub fn with_undecoded_passthrough(mut self, enabled: bool) -> Self {
        self.undecoded_passthrough = enabled;
        self
    }

    /// Layout in use
    pub fn layout(&self) -> &'static Layout {
        self.layout
    }

    /// Modifier and caps-lock state
    pub fn state(&self) -> ModifierState {
        self.state
    }

    /// Decode a raw key press
    ///
    /// Every emitted sequence belongs under a single timestamp frame.
    pub fn decode_raw(&mut self, key: RawKey) -> Decoded {
        let modifiers = Modifiers::from_bits_retain(key.modifiers);
        self.state.held = modifiers;
        let code = key.scan_code;

        if code == KEY_CAPS_LOCK {
            self.state.caps_lock = !self.state.caps_lock;
            return self.undecoded(CAPS_LOCK_KEY_CODE);
        }

        if code > MAX_DECODED_CODE {
            if self.undecoded_passthrough {
                return self.undecoded(u16::from(code));
            }
            return Decoded::Ignored(IgnoreReason::NotAscii(code));
        }

        if modifiers.meta() {
            return Decoded::Ignored(IgnoreReason::MetaCombination);
        }

        let layout = self.layout;
        let character = if modifiers.alt() && layout.alt.is_some() {
            match layout.alternate(code) {
                Some(character) => character,
                None => return Decoded::Ignored(IgnoreReason::UnmappedAlt(code)),
            }
        } else if modifiers.control() {
            let character = layout.base(code);
            if character.is_ascii_lowercase() {
                return Decoded::Emit(bracketed(u16::from(character), true, false));
            }
            character
        } else if modifiers.shift() {
            layout.shifted(code)
        } else {
            layout.base(code)
        };

        if character == 0 {
            return Decoded::Ignored(IgnoreReason::Unmapped(code));
        }
        Decoded::Emit(bracketed(u16::from(character), false, false))
    }

    /// Decode a cooked key
    ///
    /// The payload pair is nested inside control and meta brackets.
    pub fn decode_cooked(&mut self, key: CookedKey) -> Decoded {
        if key.byte == 0 {
            return Decoded::Ignored(IgnoreReason::NullCharacter);
        }
        if key.flags > (FLAG_CONTROL | FLAG_META) {
            return Decoded::Ignored(IgnoreReason::InvalidFlags(key.flags));
        }

        let control = key.flags & FLAG_CONTROL != 0;
        let meta = key.flags & FLAG_META != 0;
        let mut held = Modifiers::empty();
        held.set(Modifiers::LEFT_CONTROL, control);
        held.set(Modifiers::LEFT_META, meta);
        self.state.held = held;

        Decoded::Emit(bracketed(u16::from(key.byte), control, meta))
    }

    /// Single word whose direction follows the caps-lock latch
    fn undecoded(&self, code: u16) -> Decoded {
        let event_type = if self.state.caps_lock {
            EventType::Down
        } else {
            EventType::Up
        };
        let mut words = EventWords::new();
        let _ = words.push(EventWord::new(event_type, code));
        Decoded::Emit(words)
    }
}

/// `code` down/up, wrapped in optional control and meta brackets
fn bracketed(code: u16, control: bool, meta: bool) -> EventWords {
    let mut words = EventWords::new();
    if control {
        let _ = words.push(EventWord::down(CONTROL_KEY_CODE));
    }
    if meta {
        let _ = words.push(EventWord::down(META_KEY_CODE));
    }
    let _ = words.push(EventWord::down(code));
    let _ = words.push(EventWord::up(code));
    if meta {
        let _ = words.push(EventWord::up(META_KEY_CODE));
    }
    if control {
        let _ = words.push(EventWord::up(CONTROL_KEY_CODE));
    }
    words
}
