//! Display mirroring for the Bluebook bridge
//!
//! This crate provides:
//! - `DamageTracker` accumulating the regions the interpreter changed
//! - `DisplayBitmap` trait for reading the interpreter's packed 1-bpp bitmap
//! - `Blitter` copying damaged word columns onto an embedded-graphics target
//! - `CursorOverlay` drawing the pointer without a back buffer
//! - `centered_origin` placing the bitmap on a larger screen
//!
//! # Architecture
//!
//! ```text
//!  interpreter ──damage──▶ DamageTracker
//!       │                        │ take_and_clear()
//!       │ words                  ▼
//!       └──────────────────▶ Blitter ──pixels──▶ DrawTarget
//!                                ▲
//!                  CursorOverlay ┘ restore + stamp
//! ```
//!
//! The bitmap is row-major 16-pixel words; bit 15 of a word is its leftmost
//! pixel. Only whole words are fetched, so every blit is widened outward to
//! 16-pixel boundaries.

#![no_std]
#![deny(unsafe_code)]

pub mod bitmap;
pub mod blitter;
pub mod cursor;
pub mod damage;
pub mod placement;

// Re-export key types
pub use bitmap::{BitmapSize, DisplayBitmap, WORD_BITS};
pub use blitter::{word_span, Blitter, Palette};
pub use cursor::{CursorGlyph, CursorOverlay, CURSOR_SIZE, DEFAULT_CURSOR};
pub use damage::{DamageError, DamageTracker, DirtyRect};
pub use placement::centered_origin;
