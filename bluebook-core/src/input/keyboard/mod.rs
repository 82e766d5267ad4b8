//! Keyboard decoding
//!
//! Raw usage codes are resolved through a [`Layout`]; cooked sequences are
//! first reduced to a byte plus control/meta flags by [`assemble`].

pub mod cooked;
pub mod decoder;
pub mod layout;

pub use cooked::{assemble, CookedKey, FLAG_CONTROL, FLAG_META};
pub use decoder::{KeyboardDecoder, KEY_CAPS_LOCK};
pub use layout::{Layout, GERMAN, US};
