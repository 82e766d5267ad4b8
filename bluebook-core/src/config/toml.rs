//! TOML loading for bridge configuration
//!
//! Missing keys keep their defaults. Values are range-checked after
//! parsing.

use super::types::{BridgeConfig, ConfigError};

/// Parse and validate a TOML configuration
pub fn parse_config(input: &str) -> Result<BridgeConfig, ConfigError> {
    let config: BridgeConfig = ::toml::from_str(input).map_err(|_error| {
        #[cfg(feature = "defmt")]
        defmt::warn!("config parse failed: {}", defmt::Display2Format(&_error));
        ConfigError::Syntax
    })?;
    config.validate()?;
    Ok(config)
}
