//! Interpreter event word protocol
//!
//! This crate defines the word stream that the Bluebook host bridge feeds to
//! the interpreter's input process. The stream is a FIFO of 16-bit words:
//!
//! ```text
//! ┌───────────┬──────────────┬───────────┬─────────────┐
//! │ TIMESTAMP │ EVENT WORD   │ TIMESTAMP │ EVENT WORDS │ ...
//! │ 1 or 3 W  │ 1 W          │ 1 or 3 W  │ 1..n W      │
//! └───────────┴──────────────┴───────────┴─────────────┘
//! ```
//!
//! Each tagged word packs a 4-bit type and a 12-bit parameter. Every logical
//! event (a key stroke, one coordinate, a button transition) is preceded by
//! exactly one timestamp frame.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod decode;
pub mod timestamp;
pub mod word;

pub use decode::{DecodeError, StreamDecoder, StreamItem};
pub use timestamp::{
    absolute_time, TimestampEncoder, TimestampFrame, EPOCH_OFFSET_SECS, MAX_DELAY_MS,
    MAX_TIMESTAMP_WORDS,
};
pub use word::{
    EventType, EventWord, CAPS_LOCK_KEY_CODE, CONTROL_KEY_CODE, MAX_PARAMETER, META_KEY_CODE,
};
