//! Pointer translation

use bluebook_hal::{BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
use bluebook_protocol::EventWord;
use heapless::Vec;

use crate::input::modifiers::Modifiers;

/// Select button ("red"), left
pub const RED_BUTTON: u16 = 130;
/// Menu button ("yellow"), right
pub const YELLOW_BUTTON: u16 = 129;
/// Frame button ("blue"), middle
pub const BLUE_BUTTON: u16 = 128;

/// Physical button bits in report order
const BUTTON_BITS: [u8; 3] = [BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT];

/// Interpreter key code for a single physical button bit
pub fn button_code(button: u8) -> Option<u16> {
    match button {
        BUTTON_LEFT => Some(RED_BUTTON),
        BUTTON_MIDDLE => Some(BLUE_BUTTON),
        BUTTON_RIGHT => Some(YELLOW_BUTTON),
        _ => None,
    }
}

fn slot(button: u8) -> Option<usize> {
    BUTTON_BITS.iter().position(|&bit| bit == button)
}

/// A button press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonEvent {
    /// Interpreter key code
    pub code: u16,
    /// Pressed (true) or released (false)
    pub down: bool,
    /// Modifiers held when the button went down
    pub modifiers: Modifiers,
}

impl ButtonEvent {
    /// Event word for this transition
    pub fn word(&self) -> EventWord {
        if self.down {
            EventWord::down(self.code)
        } else {
            EventWord::up(self.code)
        }
    }
}

/// Tracks buttons and position between polls
#[derive(Debug, Clone, Default)]
pub struct MouseTranslator {
    /// Button bitmask of the previous poll
    buttons: u8,
    /// Modifiers captured at press time, per button
    pressed_with: [Modifiers; 3],
    /// Last reported position, `None` until the first poll
    position: Option<(u16, u16)>,
}

impl MouseTranslator {
    /// Create a translator with no buttons down
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate a transition of one button
    ///
    /// `button` must be exactly one of the physical button bits; anything
    /// else yields `None`. Modifiers are sampled on press and replayed on
    /// release.
    pub fn button(&mut self, button: u8, down: bool, modifiers: Modifiers) -> Option<ButtonEvent> {
        let code = button_code(button)?;
        let slot = slot(button)?;

        let modifiers = if down {
            self.pressed_with[slot] = modifiers;
            modifiers
        } else {
            core::mem::take(&mut self.pressed_with[slot])
        };

        Some(ButtonEvent {
            code,
            down,
            modifiers,
        })
    }

    /// Compare a new button bitmask with the previous poll
    ///
    /// Every changed button is reported, lowest bit first.
    pub fn buttons(&mut self, buttons: u8, modifiers: Modifiers) -> Vec<ButtonEvent, 3> {
        let changed = self.buttons ^ buttons;
        self.buttons = buttons;

        let mut events = Vec::new();
        for bit in BUTTON_BITS {
            if changed & bit == 0 {
                continue;
            }
            if let Some(event) = self.button(bit, buttons & bit != 0, modifiers) {
                let _ = events.push(event);
            }
        }
        events
    }

    /// Coordinate words for a new position
    ///
    /// The first call only records the position; later calls report a move
    /// as an x word and a y word, each needing its own timestamp.
    pub fn motion(&mut self, x: u16, y: u16) -> Option<[EventWord; 2]> {
        let previous = self.position.replace((x, y))?;
        if previous == (x, y) {
            return None;
        }
        Some([EventWord::coordinate(x), EventWord::coordinate(y)])
    }

    /// Button bitmask of the previous poll
    pub fn pressed(&self) -> u8 {
        self.buttons
    }

    /// Last position seen
    pub fn position(&self) -> Option<(u16, u16)> {
        self.position
    }
}
