//! Tagged 16-bit event words.
//!
//! Word format:
//! - TYPE (bits 15..12): event type
//! - PARAMETER (bits 11..0): type-specific value

/// Number of bits carried by the parameter field
pub const PARAMETER_BITS: u32 = 12;

/// Largest value representable in the parameter field
pub const MAX_PARAMETER: u16 = (1 << PARAMETER_BITS) - 1;

/// Key code used for the synthetic control modifier bracket
pub const CONTROL_KEY_CODE: u16 = 138;

/// Key code used for the synthetic meta modifier bracket
pub const META_KEY_CODE: u16 = 136;

/// Key code reported for the caps-lock key
pub const CAPS_LOCK_KEY_CODE: u16 = 139;

/// Event types understood by the interpreter's input process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum EventType {
    /// Milliseconds since the previous event (fits in the parameter)
    Delay = 0,
    /// Pointer coordinate; x and y are sent as two consecutive words
    Coordinate = 1,
    /// Key or button pressed
    Down = 3,
    /// Key or button released
    Up = 4,
    /// Absolute time marker, followed by two raw words (high, low)
    AbsoluteTime = 5,
}

impl EventType {
    /// Convert the 4-bit type field to an event type
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Delay),
            1 => Some(Self::Coordinate),
            3 => Some(Self::Down),
            4 => Some(Self::Up),
            5 => Some(Self::AbsoluteTime),
            _ => None,
        }
    }

    /// Get the 4-bit type field
    pub fn bits(self) -> u8 {
        self as u8
    }
}

/// A single type-tagged event word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EventWord(u16);

impl EventWord {
    /// Pack an event type and parameter
    ///
    /// Parameters wider than 12 bits are truncated.
    pub const fn new(event_type: EventType, parameter: u16) -> Self {
        Self(((event_type as u16) << PARAMETER_BITS) | (parameter & MAX_PARAMETER))
    }

    /// Key or button down
    pub const fn down(code: u16) -> Self {
        Self::new(EventType::Down, code)
    }

    /// Key or button up
    pub const fn up(code: u16) -> Self {
        Self::new(EventType::Up, code)
    }

    /// Pointer coordinate
    pub const fn coordinate(value: u16) -> Self {
        Self::new(EventType::Coordinate, value)
    }

    /// Wrap a raw word as received from the queue
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Raw 16-bit value
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Raw 4-bit type field
    pub const fn type_bits(self) -> u8 {
        (self.0 >> PARAMETER_BITS) as u8
    }

    /// Decoded event type, if known
    pub fn event_type(self) -> Option<EventType> {
        EventType::from_bits(self.type_bits())
    }

    /// 12-bit parameter field
    pub const fn parameter(self) -> u16 {
        self.0 & MAX_PARAMETER
    }
}

impl From<EventWord> for u16 {
    fn from(word: EventWord) -> Self {
        word.raw()
    }
}
