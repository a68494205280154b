// SPDX-License-Identifier: MIT OR Apache-2.0

//! Document parser trait definition.
//!
//! A parser turns the text of a key/value document into a flat map keyed by
//! the literal option names. The properties adapter is written against this
//! trait, so a different flat format only needs a new parser.

use crate::domain::Result;
use std::collections::HashMap;

/// A trait for parsing flat key/value documents.
///
/// # Examples
///
/// ```rust
/// use flagcfg::ports::ConfigParser;
/// use flagcfg::domain::Result;
/// use std::collections::HashMap;
///
/// struct LineParser;
///
/// impl ConfigParser for LineParser {
///     fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
///         Ok(content
///             .lines()
///             .filter_map(|line| line.split_once('='))
///             .map(|(k, v)| (k.to_string(), v.to_string()))
///             .collect())
///     }
///
///     fn supported_extensions(&self) -> &[&str] {
///         &["kv"]
///     }
/// }
///
/// let map = LineParser.parse("a=1\nb=2").unwrap();
/// assert_eq!(map.get("b"), Some(&"2".to_string()));
/// ```
pub trait ConfigParser: Send + Sync {
    /// Parses document content into a flat key-value map.
    fn parse(&self, content: &str) -> Result<HashMap<String, String>>;

    /// Returns the file extensions (without the leading dot) this parser
    /// is meant for.
    fn supported_extensions(&self) -> &[&str];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ConfigError;

    struct RejectingParser;

    impl ConfigParser for RejectingParser {
        fn parse(&self, content: &str) -> Result<HashMap<String, String>> {
            Err(ConfigError::ParseError {
                message: format!("cannot parse {} bytes", content.len()),
                source: None,
            })
        }

        fn supported_extensions(&self) -> &[&str] {
            &["never"]
        }
    }

    #[test]
    fn test_parser_errors_propagate() {
        let err = RejectingParser.parse("abc").unwrap_err();
        assert_eq!(err.to_string(), "Failed to parse configuration: cannot parse 3 bytes");
    }

    #[test]
    fn test_parser_is_object_safe() {
        let parser: Box<dyn ConfigParser> = Box::new(RejectingParser);
        assert_eq!(parser.supported_extensions(), &["never"]);
    }
}
