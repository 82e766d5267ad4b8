//! Timestamp framing.
//!
//! Every logical input event is preceded by exactly one timestamp frame:
//!
//! ```text
//! short:    ┌──────────────────┐
//!           │ 0 │ delta (ms)   │                  delta <= 4095
//!           └──────────────────┘
//! absolute: ┌──────────────────┬────────────┬────────────┐
//!           │ 5 │ 0            │ time >> 16 │ time & ffff│
//!           └──────────────────┴────────────┴────────────┘
//! ```
//!
//! Absolute time is counted in seconds since 1901-01-01.

use heapless::Vec;

use crate::word::{EventType, EventWord, MAX_PARAMETER};

/// Seconds between 1901-01-01 and 1970-01-01
pub const EPOCH_OFFSET_SECS: u32 = 2_177_452_800;

/// Longest delay that fits in a short frame
pub const MAX_DELAY_MS: u32 = MAX_PARAMETER as u32;

/// Maximum number of words in a timestamp frame
pub const MAX_TIMESTAMP_WORDS: usize = 3;

/// Convert Unix seconds to interpreter epoch seconds (wrapping)
pub const fn absolute_time(unix_secs: u32) -> u32 {
    unix_secs.wrapping_add(EPOCH_OFFSET_SECS)
}

/// A single timestamp frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimestampFrame {
    /// Milliseconds since the previous event
    Delay(u16),
    /// Seconds since 1901-01-01
    Absolute(u32),
}

impl TimestampFrame {
    /// Number of queue words this frame occupies
    pub fn len(&self) -> usize {
        match self {
            Self::Delay(_) => 1,
            Self::Absolute(_) => MAX_TIMESTAMP_WORDS,
        }
    }

    /// Frames are never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Encode the frame as queue words
    pub fn words(&self) -> Vec<u16, MAX_TIMESTAMP_WORDS> {
        let mut words = Vec::new();
        match *self {
            Self::Delay(ms) => {
                let _ = words.push(EventWord::new(EventType::Delay, ms).raw());
            }
            Self::Absolute(time) => {
                let _ = words.push(EventWord::new(EventType::AbsoluteTime, 0).raw());
                let _ = words.push((time >> 16) as u16);
                let _ = words.push((time & 0xFFFF) as u16);
            }
        }
        words
    }
}

/// Stateful encoder producing the timestamp frame for each event
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimestampEncoder {
    /// Tick of the last committed event (ms)
    last_event_tick: u32,
    /// Number of committed events
    event_count: u32,
}

impl Default for TimestampEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampEncoder {
    /// Create an encoder that has not seen any event yet
    pub const fn new() -> Self {
        Self {
            last_event_tick: 0,
            event_count: 0,
        }
    }

    /// Compute the frame for an event at `now_ms` without committing it
    ///
    /// # Arguments
    /// - `now_ms`: Monotonic millisecond tick
    /// - `unix_secs`: Wall-clock time, used only for absolute frames
    pub fn frame_for(&self, now_ms: u32, unix_secs: u32) -> TimestampFrame {
        if self.event_count == 0 {
            return TimestampFrame::Delay(0);
        }

        let delta = now_ms.wrapping_sub(self.last_event_tick);
        if delta <= MAX_DELAY_MS {
            TimestampFrame::Delay(delta as u16)
        } else {
            TimestampFrame::Absolute(absolute_time(unix_secs))
        }
    }

    /// Record that an event at `now_ms` was queued
    pub fn commit(&mut self, now_ms: u32) {
        self.last_event_tick = now_ms;
        self.event_count = self.event_count.saturating_add(1);
    }

    /// Compute and commit the frame for an event at `now_ms`
    pub fn encode(&mut self, now_ms: u32, unix_secs: u32) -> TimestampFrame {
        let frame = self.frame_for(now_ms, unix_secs);
        self.commit(now_ms);
        frame
    }

    /// Number of events committed so far
    pub fn event_count(&self) -> u32 {
        self.event_count
    }

    /// Tick of the last committed event
    pub fn last_event_tick(&self) -> u32 {
        self.last_event_tick
    }
}
