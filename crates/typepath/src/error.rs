//! Error types for conversion and registry configuration

use thiserror::Error;

/// Result type for typepath operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors that can occur while converting values or configuring a registry
#[derive(Debug, Error)]
pub enum ConvertError {
    // Lookup errors
    /// No converter path exists between the two types
    #[error("No converter found from {from} to {to}")]
    NoConverter {
        /// Runtime type of the source value
        from: &'static str,
        /// Requested target type
        to: &'static str,
    },

    // Value errors
    /// A value did not have the type a converter or caller expected
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type the caller asked for
        expected: &'static str,
        /// Runtime type of the value
        found: &'static str,
    },

    /// A converter ran but could not produce a value
    #[error("Conversion from {from} to {to} failed: {message}")]
    Failed {
        /// Declared source type of the failing converter
        from: &'static str,
        /// Declared target type of the failing converter
        to: &'static str,
        /// What went wrong
        message: String,
    },

    // Configuration errors
    /// Registry configuration is invalid
    #[error("Invalid registry configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file is not valid TOML for `RegistryConfig`
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    // Composed errors
    /// Error raised by user conversion code
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    /// Create a new `NoConverter` error
    pub fn no_converter(from: &'static str, to: &'static str) -> Self {
        Self::NoConverter { from, to }
    }

    /// Create a new `TypeMismatch` error
    pub fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch { expected, found }
    }

    /// Create a new `Failed` error
    pub fn failed(from: &'static str, to: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            from,
            to,
            message: message.into(),
        }
    }

    /// Create a new `InvalidConfig` error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether this error means no conversion path was found
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoConverter { .. })
    }
}
