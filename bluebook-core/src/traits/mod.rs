//! Interpreter-facing traits
//!
//! These traits define the interface between the bridge and the bytecode
//! interpreter it hosts.

pub mod interpreter;

pub use interpreter::{BitmapHandle, Interpreter, PeerBitmap, Semaphore};
