// SPDX-License-Identifier: MIT OR Apache-2.0

//! Properties document configuration source adapter.
//!
//! This module provides an adapter that answers lookups from a Java-style
//! `.properties` document read from a local file or fetched from an
//! `http://`/`https://` URL. Keys are the literal option names.

use crate::domain::{ConfigError, ConfigValue, OptionName, Origin, Result};
use crate::ports::{ConfigParser, ConfigSource};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Maximum allowed size for local properties files (10MB)
/// This prevents denial of service attacks via extremely large files
const MAX_PROPERTIES_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default transport timeout for remote documents.
pub const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Parser for Java-style `.properties` documents.
///
/// Supports `key=value`, `key: value` and `key value` lines, `#` and `!`
/// comments, line continuations and `\uXXXX` escapes. Content is UTF-8.
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::PropertiesParser;
/// use flagcfg::ports::ConfigParser;
///
/// let parser = PropertiesParser::new();
/// let values = parser.parse("# db\npostgres.host = db1\npostgres.port: 5432").unwrap();
/// assert_eq!(values.get("postgres.host"), Some(&"db1".to_string()));
/// assert_eq!(values.get("postgres.port"), Some(&"5432".to_string()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertiesParser;

impl PropertiesParser {
    /// Creates a new properties parser.
    pub fn new() -> Self {
        PropertiesParser
    }
}

impl ConfigParser for PropertiesParser {
    fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
        let mut values = HashMap::new();
        java_properties::PropertiesIter::new_with_encoding(content.as_bytes(), encoding_rs::UTF_8)
            .read_into(|key, value| {
                values.insert(key, value);
            })
            .map_err(|e| ConfigError::ParseError {
                message: match e.line_number() {
                    Some(line) => format!("invalid properties syntax on line {}", line),
                    None => "invalid properties syntax".to_string(),
                },
                source: Some(Box::new(e)),
            })?;
        Ok(values)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["properties"]
    }
}

/// Configuration source adapter for properties documents.
///
/// # Priority
///
/// Properties documents have a priority of 1, the lowest: both environment
/// variables (priority 2) and the command line (priority 3) override them.
///
/// # Examples
///
/// ```rust,no_run
/// use flagcfg::adapters::PropertiesAdapter;
/// use flagcfg::ports::ConfigSource;
///
/// // Local file
/// let adapter = PropertiesAdapter::load(Some("/etc/migrate/app.properties")).unwrap();
///
/// // Remote document
/// let adapter = PropertiesAdapter::load(Some("https://config.example/app.properties")).unwrap();
///
/// // No document: every lookup misses
/// let adapter = PropertiesAdapter::load(None).unwrap();
/// assert!(adapter.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PropertiesAdapter {
    /// File path or URL the document came from
    location: String,
    /// Parsed key/value pairs
    values: HashMap<String, String>,
}

impl PropertiesAdapter {
    /// Creates an adapter with no document. All lookups miss.
    pub fn empty() -> Self {
        Self {
            location: String::new(),
            values: HashMap::new(),
        }
    }

    /// Loads the document at `path`.
    ///
    /// `None` yields an empty adapter. Paths starting with `http://` or
    /// `https://` are fetched with [`DEFAULT_REMOTE_TIMEOUT`]; anything else
    /// is read as a local file.
    pub fn load(path: Option<&str>) -> Result<Self> {
        Self::load_with_timeout(path, DEFAULT_REMOTE_TIMEOUT)
    }

    /// Like [`load`](Self::load) with an explicit transport timeout.
    pub fn load_with_timeout(path: Option<&str>, timeout: Duration) -> Result<Self> {
        match path {
            None => Ok(Self::empty()),
            Some(url) if is_remote(url) => Self::from_url(url, timeout),
            Some(file) => Self::from_file(file),
        }
    }

    /// Parses `content` with the default properties parser.
    pub fn from_content(location: impl Into<String>, content: &str) -> Result<Self> {
        Self::from_content_with(location, content, &PropertiesParser::new())
    }

    /// Parses `content` with a caller-supplied parser.
    pub fn from_content_with(
        location: impl Into<String>,
        content: &str,
        parser: &dyn ConfigParser,
    ) -> Result<Self> {
        let location = location.into();
        let values = parser.parse(content).map_err(|e| match e {
            ConfigError::ParseError { message, source } => ConfigError::ProviderLoadFailure {
                location: location.clone(),
                message,
                source,
            },
            other => other,
        })?;

        tracing::debug!("Loaded {} properties from {}", values.len(), location);

        Ok(Self { location, values })
    }

    /// Reads and parses a local properties file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let location = path.display().to_string();

        // Check file size before reading to prevent DoS via large files
        let metadata = fs::metadata(path).map_err(|e| ConfigError::ProviderLoadFailure {
            location: location.clone(),
            message: "cannot access file".to_string(),
            source: Some(Box::new(e)),
        })?;

        if metadata.len() > MAX_PROPERTIES_FILE_SIZE {
            return Err(ConfigError::load_failure(
                location,
                format!(
                    "file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_PROPERTIES_FILE_SIZE
                ),
            ));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ProviderLoadFailure {
            location: location.clone(),
            message: "cannot read file".to_string(),
            source: Some(Box::new(e)),
        })?;

        Self::from_content(location, &content)
    }

    /// Fetches and parses a remote properties document.
    ///
    /// Non-2xx responses, transport failures and timeouts are load failures.
    #[cfg(feature = "remote")]
    pub fn from_url(url: &str, timeout: Duration) -> Result<Self> {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();

        tracing::debug!("Fetching properties from {} (timeout {:?})", url, timeout);

        let response = agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => {
                ConfigError::load_failure(url, format!("server responded with HTTP {}", code))
            }
            ureq::Error::Transport(transport) => ConfigError::ProviderLoadFailure {
                location: url.to_string(),
                message: "request failed".to_string(),
                source: Some(Box::new(transport)),
            },
        })?;

        let content = response
            .into_string()
            .map_err(|e| ConfigError::ProviderLoadFailure {
                location: url.to_string(),
                message: "cannot read response body".to_string(),
                source: Some(Box::new(e)),
            })?;

        Self::from_content(url, &content)
    }

    /// Remote documents need the `remote` feature.
    #[cfg(not(feature = "remote"))]
    pub fn from_url(url: &str, _timeout: Duration) -> Result<Self> {
        Err(ConfigError::load_failure(
            url,
            "remote properties support is not compiled in (enable the `remote` feature)",
        ))
    }

    /// The file path or URL of the document; empty for [`empty`](Self::empty).
    pub fn location(&self) -> &str {
        &self.location
    }

    /// Number of keys in the document.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the document holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for PropertiesAdapter {
    fn default() -> Self {
        Self::empty()
    }
}

/// Returns true for `http://` and `https://` locations.
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://")
}

impl ConfigSource for PropertiesAdapter {
    fn name(&self) -> &str {
        "properties"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn get(&self, key: &OptionName) -> Result<Option<ConfigValue>> {
        Ok(self
            .values
            .get(key.as_str())
            .map(|v| ConfigValue::from(v.as_str())))
    }

    fn all_keys(&self) -> Result<Vec<OptionName>> {
        Ok(self
            .values
            .keys()
            .map(|k| OptionName::from(k.as_str()))
            .collect())
    }

    fn origin(&self, _key: &OptionName) -> Origin {
        Origin::Properties {
            location: self.location.clone(),
        }
    }
}
