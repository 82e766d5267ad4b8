//! Event stream decoding.
//!
//! The consumer side of the queue: turns raw words back into timestamp
//! frames and typed events. Absolute frames span three words, so the
//! decoder keeps a small amount of state between calls.

use crate::word::{EventType, EventWord};

/// Errors reported while decoding an event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Word carries a type the protocol does not define
    UnknownType(u8),
    /// Stream ended inside an absolute timestamp frame
    Truncated,
}

impl core::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownType(bits) => write!(f, "unknown event type {}", bits),
            Self::Truncated => write!(f, "truncated absolute timestamp"),
        }
    }
}

/// A decoded stream element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StreamItem {
    /// Milliseconds since the previous event
    Delay(u16),
    /// Seconds since 1901-01-01
    AbsoluteTime(u32),
    /// Pointer coordinate
    Coordinate(u16),
    /// Key or button pressed
    Down(u16),
    /// Key or button released
    Up(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecodeState {
    /// Expecting a type-tagged word
    Tagged,
    /// Got absolute marker, waiting for high half
    AwaitingHigh,
    /// Got high half, waiting for low half
    AwaitingLow(u16),
}

/// State machine for decoding queue words
#[derive(Debug, Clone)]
pub struct StreamDecoder {
    state: DecodeState,
}

impl Default for StreamDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamDecoder {
    /// Create a new decoder
    pub const fn new() -> Self {
        Self {
            state: DecodeState::Tagged,
        }
    }

    /// Reset the decoder state
    pub fn reset(&mut self) {
        self.state = DecodeState::Tagged;
    }

    /// Whether the decoder is inside an absolute timestamp frame
    pub fn is_mid_frame(&self) -> bool {
        self.state != DecodeState::Tagged
    }

    /// Feed a single word to the decoder
    ///
    /// Returns `Ok(Some(item))` when an element is complete, `Ok(None)` when
    /// more words are needed, or `Err` on an undefined event type.
    pub fn feed(&mut self, raw: u16) -> Result<Option<StreamItem>, DecodeError> {
        match self.state {
            DecodeState::AwaitingHigh => {
                self.state = DecodeState::AwaitingLow(raw);
                Ok(None)
            }
            DecodeState::AwaitingLow(high) => {
                self.state = DecodeState::Tagged;
                let time = (u32::from(high) << 16) | u32::from(raw);
                Ok(Some(StreamItem::AbsoluteTime(time)))
            }
            DecodeState::Tagged => {
                let word = EventWord::from_raw(raw);
                let Some(event_type) = word.event_type() else {
                    return Err(DecodeError::UnknownType(word.type_bits()));
                };
                let parameter = word.parameter();
                let item = match event_type {
                    EventType::Delay => StreamItem::Delay(parameter),
                    EventType::Coordinate => StreamItem::Coordinate(parameter),
                    EventType::Down => StreamItem::Down(parameter),
                    EventType::Up => StreamItem::Up(parameter),
                    EventType::AbsoluteTime => {
                        self.state = DecodeState::AwaitingHigh;
                        return Ok(None);
                    }
                };
                Ok(Some(item))
            }
        }
    }

    /// Decode a complete slice of words, calling `sink` for every element
    ///
    /// Fails if the slice ends inside an absolute frame.
    pub fn decode_all<F>(&mut self, words: &[u16], mut sink: F) -> Result<(), DecodeError>
    where
        F: FnMut(StreamItem),
    {
        for &raw in words {
            if let Some(item) = self.feed(raw)? {
                sink(item);
            }
        }
        if self.is_mid_frame() {
            self.reset();
            return Err(DecodeError::Truncated);
        }
        Ok(())
    }
}
