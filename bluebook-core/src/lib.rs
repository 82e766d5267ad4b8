//! Host bridge for a Smalltalk-80 style bytecode interpreter
//!
//! The bridge sits between host devices and the interpreter:
//!
//! ```text
//!  keyboard ─┐                      ┌──────────────┐
//!            ├─▶ input ─▶ queue ───▶│              │
//!  mouse ────┘   decode    │ signal │ interpreter  │
//!                          ▼        │              │
//!  clock ─────▶ wake ───▶ semaphore │              │
//!                                   └──────┬───────┘
//!  screen ◀── blitter ◀── damage ◀─────────┘
//! ```
//!
//! - Input decoding (raw scan codes, cooked sequences, mouse)
//! - The timestamped input queue and its semaphore
//! - Scheduled semaphore wake
//! - Frame loop with damage-driven rendering
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bridge;
pub mod config;
pub mod error;
pub mod input;
pub mod queue;
pub mod sync;
pub mod traits;
pub mod vm;
pub mod wake;

pub use bridge::{Bridge, FrameOutcome};
pub use config::{BridgeConfig, ConfigError};
pub use error::{ContractViolation, IgnoreReason};
pub use queue::{InputQueue, Pushed, INPUT_QUEUE_CAPACITY};
pub use traits::{BitmapHandle, Interpreter, Semaphore};
pub use vm::{VmContext, VmState};
pub use wake::ScheduledWake;
