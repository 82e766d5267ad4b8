//! Bluebook Hardware Abstraction Layer
//!
//! This crate defines the host devices the bridge polls each frame. Board
//! support code implements these traits; the bridge only sees the traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  bluebook-core (frame loop)             │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  bluebook-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┼───────────┐
//!         ▼           ▼           ▼
//!   ┌──────────┐ ┌──────────┐ ┌──────────┐
//!   │  clock   │ │ keyboard │ │  mouse   │
//!   └──────────┘ └──────────┘ └──────────┘
//! ```
//!
//! # Traits
//!
//! - [`clock::Clock`] - Millisecond ticks and wall-clock seconds
//! - [`keyboard::RawKeyboard`], [`keyboard::CookedKeyboard`] - Key sources
//! - [`mouse::Mouse`] - Pointer position and buttons
//! - [`platform::Platform`] - Everything the frame loop needs

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod keyboard;
pub mod mouse;
pub mod platform;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use embedded_hal::delay::DelayNs;
pub use keyboard::{
    CookedKeyboard, KeyReport, KeySequence, KeyboardMode, KeyboardSource, NoKeyboard, RawKey,
    RawKeyboard, MAX_KEYS_PER_REPORT, MAX_SEQUENCE_LEN,
};
pub use mouse::{Mouse, MouseState, BUTTON_LEFT, BUTTON_MIDDLE, BUTTON_RIGHT};
pub use platform::{Host, Platform};
