//! Registry configuration

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::error::{ConvertError, Result};

/// Configuration for a [`Registry`](crate::Registry).
///
/// Loadable from TOML or the environment; every field has a default.
///
/// ```toml
/// max_chain_length = 8
/// memoize_lookups = true
///
/// [builtins]
/// numeric_upcasts = true
/// null_defaults = true
/// string_parsing = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Longest chain, in direct converters, path building may create
    pub max_chain_length: usize,

    /// Store converters found through supertypes under the requested key
    pub memoize_lookups: bool,

    /// Built-in converters installed at construction
    pub builtins: BuiltinSet,
}

/// Which built-in converter groups a registry starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuiltinSet {
    /// Every numeric primitive (and `Wrapping<T>`) to `Number`
    pub numeric_upcasts: bool,

    /// `Void` to `false`, `'\0'` and numeric zero
    pub null_defaults: bool,

    /// `String` to numerics, `bool` and `char` via `FromStr`
    pub string_parsing: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_chain_length: 16,
            memoize_lookups: true,
            builtins: BuiltinSet::default(),
        }
    }
}

impl Default for BuiltinSet {
    fn default() -> Self {
        Self {
            numeric_upcasts: true,
            null_defaults: true,
            string_parsing: false,
        }
    }
}

impl BuiltinSet {
    /// No built-in converters at all.
    #[must_use]
    pub fn none() -> Self {
        Self {
            numeric_upcasts: false,
            null_defaults: false,
            string_parsing: false,
        }
    }
}

impl RegistryConfig {
    /// Set the longest chain path building may create.
    #[must_use]
    pub fn with_max_chain_length(mut self, max_chain_length: usize) -> Self {
        self.max_chain_length = max_chain_length;
        self
    }

    /// Enable or disable memoization of supertype lookups.
    #[must_use]
    pub fn with_memoize_lookups(mut self, memoize_lookups: bool) -> Self {
        self.memoize_lookups = memoize_lookups;
        self
    }

    /// Choose the built-in converter groups.
    #[must_use]
    pub fn with_builtins(mut self, builtins: BuiltinSet) -> Self {
        self.builtins = builtins;
        self
    }

    /// Check the configuration for values the registry cannot work with.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::InvalidConfig` if `max_chain_length` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_chain_length == 0 {
            return Err(ConvertError::invalid_config(
                "max_chain_length must be at least 1",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this struct or
    /// fails [`validate`](Self::validate).
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from environment variables.
    ///
    /// This will look for:
    /// - `TYPEPATH_MAX_CHAIN_LENGTH` (must be a valid usize)
    /// - `TYPEPATH_MEMOIZE_LOOKUPS` (`true` or `false`)
    /// - `TYPEPATH_NUMERIC_UPCASTS` (`true` or `false`)
    /// - `TYPEPATH_NULL_DEFAULTS` (`true` or `false`)
    /// - `TYPEPATH_STRING_PARSING` (`true` or `false`)
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set but cannot be parsed, or the
    /// result fails [`validate`](Self::validate).
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(max_chain_length) = env_var("TYPEPATH_MAX_CHAIN_LENGTH")? {
            config.max_chain_length = max_chain_length;
        }
        if let Some(memoize) = env_var("TYPEPATH_MEMOIZE_LOOKUPS")? {
            config.memoize_lookups = memoize;
        }
        if let Some(enabled) = env_var("TYPEPATH_NUMERIC_UPCASTS")? {
            config.builtins.numeric_upcasts = enabled;
        }
        if let Some(enabled) = env_var("TYPEPATH_NULL_DEFAULTS")? {
            config.builtins.null_defaults = enabled;
        }
        if let Some(enabled) = env_var("TYPEPATH_STRING_PARSING")? {
            config.builtins.string_parsing = enabled;
        }

        config.validate()?;
        Ok(config)
    }
}

fn env_var<T: FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            ConvertError::invalid_config(format!("{name} has an invalid value: '{raw}'"))
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.max_chain_length, 16);
        assert!(config.memoize_lookups);
        assert!(config.builtins.numeric_upcasts);
        assert!(config.builtins.null_defaults);
        assert!(!config.builtins.string_parsing);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_chain_length() {
        let err = RegistryConfig::default()
            .with_max_chain_length(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = RegistryConfig::from_toml_str(
            r"
            max_chain_length = 4

            [builtins]
            string_parsing = true
            ",
        )
        .unwrap();
        assert_eq!(config.max_chain_length, 4);
        assert!(config.memoize_lookups);
        assert!(config.builtins.numeric_upcasts);
        assert!(config.builtins.string_parsing);
    }

    #[test]
    fn test_toml_type_error() {
        let err = RegistryConfig::from_toml_str("max_chain_length = \"long\"").unwrap_err();
        assert!(matches!(err, ConvertError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "memoize_lookups = false").unwrap();
        writeln!(file, "[builtins]").unwrap();
        writeln!(file, "null_defaults = false").unwrap();

        let config = RegistryConfig::from_file(file.path()).unwrap();
        assert!(!config.memoize_lookups);
        assert!(!config.builtins.null_defaults);
        assert_eq!(config.max_chain_length, 16);
    }

    #[test]
    fn test_from_missing_file() {
        let err = RegistryConfig::from_file("/nonexistent/typepath.toml").unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[test]
    fn test_from_env_variables() {
        temp_env::with_vars(
            [
                ("TYPEPATH_MAX_CHAIN_LENGTH", Some("3")),
                ("TYPEPATH_MEMOIZE_LOOKUPS", Some("false")),
                ("TYPEPATH_NUMERIC_UPCASTS", None),
                ("TYPEPATH_NULL_DEFAULTS", Some("false")),
                ("TYPEPATH_STRING_PARSING", Some(" true ")),
            ],
            || {
                let config = RegistryConfig::from_env().unwrap();
                assert_eq!(config.max_chain_length, 3);
                assert!(!config.memoize_lookups);
                assert!(config.builtins.numeric_upcasts);
                assert!(!config.builtins.null_defaults);
                assert!(config.builtins.string_parsing);
            },
        );
    }

    #[test]
    fn test_from_env_invalid_value() {
        temp_env::with_var("TYPEPATH_MAX_CHAIN_LENGTH", Some("many"), || {
            let err = RegistryConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("TYPEPATH_MAX_CHAIN_LENGTH"));
        });
    }

    #[test]
    fn test_from_env_zero_chain_length() {
        temp_env::with_var("TYPEPATH_MAX_CHAIN_LENGTH", Some("0"), || {
            assert!(RegistryConfig::from_env().is_err());
        });
    }
}
