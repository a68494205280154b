// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for option resolution.
//!
//! Every failure in this crate is detected once, at startup, and is fatal to
//! the caller. Errors carry enough context (option name, offending raw value,
//! or the path/URL that failed) for an operator to fix the invocation.

use thiserror::Error;

/// The main error type for option resolution.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::errors::ConfigError;
///
/// fn lookup() -> Result<String, ConfigError> {
///     Err(ConfigError::UnknownOption {
///         name: "postgres.hots".to_string(),
///     })
/// }
///
/// assert!(lookup().is_err());
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A raw value could not be converted to the option's declared type.
    #[error("invalid value {value:?} for option '{key}' (expected {target_type}): {source}")]
    MalformedArgument {
        /// The option being set
        key: String,
        /// The raw text that failed to parse
        value: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// `-cfg` was given without a usable value.
    #[error("invalid or missing path to config file")]
    InvalidConfigPath,

    /// The command line names a flag that was never registered.
    #[error("flag provided but not defined: -{name}")]
    UnknownOption {
        /// The flag name as given, without leading dashes
        name: String,
    },

    /// Any other command-line syntax problem, such as a missing value.
    #[error("invalid command line: {message}")]
    CommandLine {
        /// The error message
        message: String,
    },

    /// `-h` or `-help` was given; carries the rendered usage text.
    #[error("help requested")]
    HelpRequested {
        /// Usage text listing every registered option
        usage: String,
    },

    /// The properties document could not be read, fetched or parsed.
    #[error("failed to load properties from '{location}': {message}")]
    ProviderLoadFailure {
        /// The file path or URL that failed
        location: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Failed to parse a properties document.
    #[error("Failed to parse configuration: {message}")]
    ParseError {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error occurred in a custom configuration source.
    #[error("Configuration source '{source_name}' error: {message}")]
    SourceError {
        /// The name of the source that encountered the error
        source_name: String,
        /// The error message
        message: String,
        /// The underlying error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a `MalformedArgument` for text that is not a recognized
    /// boolean spelling.
    pub fn invalid_bool(key: &str, value: &str) -> Self {
        ConfigError::MalformedArgument {
            key: key.to_string(),
            value: value.to_string(),
            target_type: "boolean".to_string(),
            source: "expected one of true/false, t/f, yes/no, 1/0, on/off".into(),
        }
    }

    /// Creates a `ProviderLoadFailure` with no underlying error.
    pub fn load_failure(location: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ProviderLoadFailure {
            location: location.into(),
            message: message.into(),
            source: None,
        }
    }
}

/// A specialized Result type for option resolution.
pub type Result<T> = std::result::Result<T, ConfigError>;
