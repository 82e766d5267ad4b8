//! Error and outcome types
//!
//! Two kinds of failure exist. A [`ContractViolation`] means the bridge or
//! the interpreter broke an interface rule; the bridge cannot continue and
//! stops through [`fatal`]. An [`IgnoreReason`] describes device input that
//! simply produces no event.

use bluebook_display::{BitmapSize, DamageError, DirtyRect};

/// Interface rule broken by the bridge or the interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ContractViolation {
    /// Input was queued before the interpreter registered its input semaphore
    NoInputSemaphore,
    /// Damage reported outside the display bitmap
    DamageOutOfBounds {
        rect: DirtyRect,
        bounds: BitmapSize,
    },
    /// Damage reported with negative coordinates or extent
    NegativeDamage,
}

impl From<DamageError> for ContractViolation {
    fn from(error: DamageError) -> Self {
        match error {
            DamageError::OutOfBounds { rect, bounds } => Self::DamageOutOfBounds { rect, bounds },
        }
    }
}

impl core::fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoInputSemaphore => write!(f, "input queued without an input semaphore"),
            Self::DamageOutOfBounds { rect, bounds } => write!(
                f,
                "{}",
                DamageError::OutOfBounds {
                    rect: *rect,
                    bounds: *bounds,
                }
            ),
            Self::NegativeDamage => write!(f, "damage with negative coordinates"),
        }
    }
}

/// Why a device report produced no event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IgnoreReason {
    /// Usage code above the ASCII tables
    NotAscii(u8),
    /// Meta (logo) key held
    MetaCombination,
    /// Alt combination with no alternate character
    UnmappedAlt(u8),
    /// Table entry is empty
    Unmapped(u8),
    /// Cooked key without a character
    NullCharacter,
    /// Cooked flags outside control/meta
    InvalidFlags(u8),
    /// Cooked sequence that is not a single key
    UnsupportedSequence,
}

/// Stop the bridge after a contract violation
pub fn fatal(violation: ContractViolation) -> ! {
    #[cfg(feature = "defmt")]
    defmt::error!("contract violation: {}", violation);

    panic!("contract violation: {}", violation)
}
