//! Configuration for dictionary construction
//!
//! The [`Config`] trait gives every configuration type the same surface:
//! validation, initialization from environment variables, presets, and JSON
//! persistence.
//!
//! ```rust
//! use dictzip::config::{Config, DictionaryConfig};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Reads DICTZIP_DICT_SIZE and friends, falling back to defaults
//! let config = DictionaryConfig::from_env()?;
//! assert!(config.validate().is_ok());
//!
//! let small = DictionaryConfig::memory_preset();
//! assert!(small.validate().is_ok());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use std::env;
use std::fmt;
use std::path::Path;

pub mod dictionary;

pub use dictionary::{DictionaryConfig, DictionaryConfigBuilder};

/// Default prefix for environment variables
pub const ENV_PREFIX: &str = "DICTZIP_";

/// Common configuration trait providing validation, environment initialization,
/// and preset management functionality.
pub trait Config: Clone + fmt::Debug {
    /// Validate the configuration for correctness and consistency.
    fn validate(&self) -> Result<()>;

    /// Initialize configuration from environment variables.
    ///
    /// Variables use the format `DICTZIP_{COMPONENT}_{FIELD}`, for example
    /// `DICTZIP_DICT_SIZE=32768`. Unset or unparsable variables keep their
    /// default values.
    fn from_env() -> Result<Self>
    where
        Self: Default,
    {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Initialize configuration from environment variables with a custom prefix.
    fn from_env_with_prefix(prefix: &str) -> Result<Self>
    where
        Self: Default;

    /// Preset favouring speed over dictionary quality.
    fn performance_preset() -> Self;

    /// Preset favouring a small memory footprint.
    fn memory_preset() -> Self;

    /// Preset with short, predictable build times.
    fn realtime_preset() -> Self;

    /// Balanced preset; the default configuration.
    fn balanced_preset() -> Self
    where
        Self: Default,
    {
        Self::default()
    }

    /// Save configuration to a file as pretty-printed JSON.
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()>;

    /// Load and validate configuration from a JSON file.
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self>;
}

/// Parse an environment variable, falling back to `default` when it is unset
/// or does not parse.
pub fn parse_env_var<T>(var_name: &str, default: T) -> T
where
    T: std::str::FromStr + Clone,
{
    env::var(var_name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Parse a boolean environment variable.
///
/// Accepts "true", "1", "yes", "on" (case-insensitive) as true,
/// everything else as false.
pub fn parse_env_bool(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .map(|s| {
            let s = s.to_lowercase();
            matches!(s.as_str(), "true" | "1" | "yes" | "on")
        })
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_var_fallback() {
        let value: usize = parse_env_var("DICTZIP_TEST_SURELY_UNSET_VAR", 42);
        assert_eq!(value, 42);
    }

    #[test]
    fn test_parse_env_var_set() {
        env::set_var("DICTZIP_TEST_PARSE_NUMBER", "1234");
        let value: usize = parse_env_var("DICTZIP_TEST_PARSE_NUMBER", 0);
        assert_eq!(value, 1234);

        env::set_var("DICTZIP_TEST_PARSE_NUMBER", "not a number");
        let value: usize = parse_env_var("DICTZIP_TEST_PARSE_NUMBER", 7);
        assert_eq!(value, 7);
        env::remove_var("DICTZIP_TEST_PARSE_NUMBER");
    }

    #[test]
    fn test_parse_env_bool() {
        for (raw, expected) in [("true", true), ("YES", true), ("1", true), ("On", true), ("off", false), ("0", false)] {
            env::set_var("DICTZIP_TEST_PARSE_BOOL", raw);
            assert_eq!(parse_env_bool("DICTZIP_TEST_PARSE_BOOL", !expected), expected, "{}", raw);
        }
        env::remove_var("DICTZIP_TEST_PARSE_BOOL");
        assert!(parse_env_bool("DICTZIP_TEST_PARSE_BOOL", true));
    }
}
