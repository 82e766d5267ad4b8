//! Input translation
//!
//! Decoders are pure state machines: they turn device reports into event
//! words and leave queueing and timestamping to the caller.

pub mod keyboard;
pub mod modifiers;
pub mod mouse;

use bluebook_protocol::EventWord;
use heapless::Vec;

use crate::error::IgnoreReason;

pub use keyboard::{KeyboardDecoder, Layout};
pub use modifiers::{ModifierState, Modifiers};
pub use mouse::{ButtonEvent, MouseTranslator};

/// Most words one logical event can carry (control and meta brackets)
pub const MAX_EVENT_WORDS: usize = 6;

/// Words sharing one timestamp frame
pub type EventWords = Vec<EventWord, MAX_EVENT_WORDS>;

/// Result of decoding one device report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Words to queue under a single timestamp
    Emit(EventWords),
    /// Nothing to queue
    Ignored(IgnoreReason),
}
