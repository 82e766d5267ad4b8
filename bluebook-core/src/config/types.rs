//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use bluebook_hal::KeyboardMode;

use crate::input::keyboard::{Layout, GERMAN, US};

/// Interpreter steps per frame
pub const DEFAULT_CYCLES_PER_FRAME: u16 = 1800;
pub const MIN_CYCLES_PER_FRAME: u16 = 100;
pub const MAX_CYCLES_PER_FRAME: u16 = 20000;

/// Upper bound for the no-vsync frame delay (ms)
pub const MAX_NOVSYNC_DELAY_MS: u16 = 1000;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Input is not valid TOML or does not match the schema
    Syntax,
    /// Value outside its allowed range
    OutOfRange(&'static str),
    /// Keyboard mode does not match the host keyboard
    KeyboardMismatch,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Syntax => write!(f, "invalid configuration syntax"),
            Self::OutOfRange(key) => write!(f, "{} out of range", key),
            Self::KeyboardMismatch => write!(f, "keyboard mode does not match host keyboard"),
        }
    }
}

/// When the input semaphore is signalled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum WakePolicy {
    /// Once per queued word
    #[default]
    EveryWord,
    /// Once when the queue goes from empty to non-empty
    OnNonEmpty,
}

/// Key-to-character table selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyboardLayout {
    #[default]
    Us,
    German,
}

impl KeyboardLayout {
    /// Tables for this layout
    pub fn table(self) -> &'static Layout {
        match self {
            Self::Us => &US,
            Self::German => &GERMAN,
        }
    }
}

/// Keyboard input form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KeyboardInput {
    /// Usage codes decoded by the bridge
    #[default]
    Raw,
    /// Sequences decoded by the host keymap
    Cooked,
}

impl From<KeyboardInput> for KeyboardMode {
    fn from(input: KeyboardInput) -> Self {
        match input {
            KeyboardInput::Raw => KeyboardMode::Raw,
            KeyboardInput::Cooked => KeyboardMode::Cooked,
        }
    }
}

/// Keyboard settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct KeyboardConfig {
    /// Expected input form
    pub mode: KeyboardInput,
    /// Character tables
    pub layout: KeyboardLayout,
    /// Forward usage codes above 127 instead of dropping them
    pub undecoded_passthrough: bool,
}

/// Screen colors as `0xRRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Set bitmap bits
    pub foreground: u32,
    /// Clear bitmap bits
    pub background: u32,
    /// Cursor glyph
    pub cursor_color: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            foreground: 0x000000,
            background: 0xFFFFFF,
            cursor_color: 0x000000,
        }
    }
}

/// Input queue settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InputConfig {
    /// Input semaphore signalling
    pub wake_policy: WakePolicy,
}

/// Bridge configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeConfig {
    /// Interpreter steps per frame
    pub cycles_per_frame: u16,
    /// Delay after each frame when vsync is off (ms)
    pub novsync_delay_ms: u16,
    /// Frames are paced by the display
    pub vsync: bool,
    pub keyboard: KeyboardConfig,
    pub display: DisplayConfig,
    pub input: InputConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            cycles_per_frame: DEFAULT_CYCLES_PER_FRAME,
            novsync_delay_ms: 0,
            vsync: false,
            keyboard: KeyboardConfig::default(),
            display: DisplayConfig::default(),
            input: InputConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_CYCLES_PER_FRAME..=MAX_CYCLES_PER_FRAME).contains(&self.cycles_per_frame) {
            return Err(ConfigError::OutOfRange("cycles_per_frame"));
        }
        if self.novsync_delay_ms > MAX_NOVSYNC_DELAY_MS {
            return Err(ConfigError::OutOfRange("novsync_delay_ms"));
        }
        for (key, color) in [
            ("display.foreground", self.display.foreground),
            ("display.background", self.display.background),
            ("display.cursor_color", self.display.cursor_color),
        ] {
            if color > 0xFF_FFFF {
                return Err(ConfigError::OutOfRange(key));
            }
        }
        Ok(())
    }

    /// Frame delay to apply, if any
    pub fn frame_delay_ms(&self) -> Option<u32> {
        (!self.vsync && self.novsync_delay_ms > 0).then_some(u32::from(self.novsync_delay_ms))
    }
}
