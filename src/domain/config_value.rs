// SPDX-License-Identifier: MIT OR Apache-2.0

//! Raw option values as supplied by a source.
//!
//! Every source hands values to the registry as a `ConfigValue`: the text
//! exactly as it appeared on the command line, in the environment or in the
//! properties document. Conversion to the option's type happens in the value
//! adapter, through the methods defined here.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::kv::{self, Kv};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A raw, not yet typed, option value.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::ConfigValue;
///
/// let value = ConfigValue::from("5432");
/// let port: u16 = value.parse("postgres.port").unwrap();
/// assert_eq!(port, 5432);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue(String);

impl ConfigValue {
    /// Creates a new `ConfigValue` from a `String`.
    pub fn new(value: String) -> Self {
        ConfigValue(value)
    }

    /// Returns the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an owned copy of the value.
    pub fn as_string(&self) -> String {
        self.0.clone()
    }

    /// Converts the value to a boolean.
    ///
    /// Recognizes the following values (case-insensitive):
    /// - `true`: "true", "t", "yes", "1", "on"
    /// - `false`: "false", "f", "no", "0", "off"
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::ConfigValue;
    ///
    /// assert!(ConfigValue::from("TRUE").as_bool("postgres.debug").unwrap());
    /// assert!(!ConfigValue::from("off").as_bool("postgres.debug").unwrap());
    /// assert!(ConfigValue::from("sometimes").as_bool("postgres.debug").is_err());
    /// ```
    pub fn as_bool(&self, key: &str) -> Result<bool> {
        match self.0.to_lowercase().as_str() {
            "true" | "t" | "yes" | "1" | "on" => Ok(true),
            "false" | "f" | "no" | "0" | "off" => Ok(false),
            _ => Err(ConfigError::invalid_bool(key, &self.0)),
        }
    }

    /// Parses the value into any type that implements `FromStr`.
    ///
    /// Surrounding whitespace is not stripped: `" 42"` is not an integer.
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.0
            .parse::<T>()
            .map_err(|e| ConfigError::MalformedArgument {
                key: key.to_string(),
                value: self.0.clone(),
                target_type: std::any::type_name::<T>().to_string(),
                source: Box::new(e),
            })
    }

    /// Interprets the value with the KV grammar (`k1=v1;k2=v2`).
    pub fn as_kv(&self) -> Kv {
        kv::parse_kv(&self.0)
    }

    /// Interprets the value as `,`-separated KV segments.
    pub fn as_kv_slice(&self) -> Vec<Kv> {
        kv::parse_kv_slice(&self.0)
    }

    /// Interprets the value as a trimmed `,`-separated list.
    pub fn as_string_slice(&self) -> Vec<String> {
        kv::parse_string_slice(&self.0)
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue(s)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue(s.to_string())
    }
}

impl From<ConfigValue> for String {
    fn from(value: ConfigValue) -> Self {
        value.0
    }
}

impl AsRef<str> for ConfigValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    #[test]
    fn test_as_bool_true_variants() {
        for val in ["true", "True", "TRUE", "t", "T", "yes", "YES", "1", "on", "On"] {
            let value = ConfigValue::from(val);
            assert!(value.as_bool("k").unwrap(), "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_as_bool_false_variants() {
        for val in ["false", "False", "f", "F", "no", "NO", "0", "off", "OFF"] {
            let value = ConfigValue::from(val);
            assert!(!value.as_bool("k").unwrap(), "Failed for value: {}", val);
        }
    }

    #[test]
    fn test_as_bool_invalid_names_key_and_value() {
        let err = ConfigValue::from("maybe").as_bool("postgres.debug").unwrap_err();
        match err {
            ConfigError::MalformedArgument {
                key,
                value,
                target_type,
                ..
            } => {
                assert_eq!(key, "postgres.debug");
                assert_eq!(value, "maybe");
                assert_eq!(target_type, "boolean");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_integer() {
        let value = ConfigValue::from("25060");
        assert_eq!(value.parse::<u16>("postgres.port").unwrap(), 25060);
    }

    #[test]
    fn test_parse_integer_out_of_range() {
        let value = ConfigValue::from("70000");
        let err = value.parse::<u16>("postgres.port").unwrap_err();
        assert!(err.to_string().contains("u16"));
    }

    #[test]
    fn test_parse_rejects_surrounding_whitespace() {
        assert!(ConfigValue::from(" 42").parse::<i64>("k").is_err());
    }

    #[test]
    fn test_parse_custom_type() {
        let value = ConfigValue::from("127.0.0.1");
        let ip: IpAddr = value.parse("clickhouse.ip").unwrap();
        assert_eq!(ip.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_composite_accessors() {
        let value = ConfigValue::from("b=2;a=1");
        assert_eq!(value.as_kv().len(), 2);
        assert_eq!(ConfigValue::from("a,b=1").as_kv_slice().len(), 2);
        assert_eq!(
            ConfigValue::from(" jobs , audits ,").as_string_slice(),
            vec!["jobs", "audits"]
        );
    }

    #[test]
    fn test_display_and_conversions() {
        let value = ConfigValue::new("hello".to_string());
        assert_eq!(format!("{}", value), "hello");
        assert_eq!(value.as_string(), "hello");
        let s: String = value.into();
        assert_eq!(s, "hello");
    }
}
