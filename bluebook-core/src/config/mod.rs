//! Configuration types
//!
//! Bridge settings, loadable from TOML when the `toml` feature is enabled.

#[cfg(feature = "toml")]
pub mod toml;
pub mod types;

#[cfg(feature = "toml")]
pub use self::toml::parse_config;
pub use types::*;
