// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration source trait definition.
//!
//! This module defines the `ConfigSource` trait, the port every lookup source
//! (command line, environment, properties document, or anything custom)
//! implements so the resolver can query it.

use crate::domain::{ConfigValue, OptionName, Origin, Result};

/// A trait for configuration sources.
///
/// # Priority
///
/// Each source has a priority value (0-255). The resolver asks sources in
/// descending priority and stops at the first one that has a value. The
/// built-in priorities are:
///
/// - **3 (highest)**: Command-line arguments
/// - **2**: Environment variables
/// - **1 (lowest)**: Properties documents
///
/// # Examples
///
/// ```rust
/// use flagcfg::ports::ConfigSource;
/// use flagcfg::domain::{ConfigValue, OptionName, Origin, Result};
///
/// struct Fixed;
///
/// impl ConfigSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn priority(&self) -> u8 {
///         1
///     }
///
///     fn get(&self, key: &OptionName) -> Result<Option<ConfigValue>> {
///         Ok((key.as_str() == "app.name").then(|| ConfigValue::from("demo")))
///     }
///
///     fn all_keys(&self) -> Result<Vec<OptionName>> {
///         Ok(vec![OptionName::from("app.name")])
///     }
/// }
///
/// let source = Fixed;
/// assert!(source.get_str("app.name").unwrap().is_some());
/// assert_eq!(source.origin(&OptionName::from("app.name")), Origin::Source { name: "fixed".into() });
/// ```
pub trait ConfigSource: Send + Sync {
    /// Returns the name of this source, used in logs and errors.
    fn name(&self) -> &str;

    /// Returns the priority of this source. Higher values win.
    fn priority(&self) -> u8;

    /// Retrieves the raw value for `key`.
    ///
    /// * `Ok(Some(value))` - The value was found
    /// * `Ok(None)` - The key does not exist in this source
    /// * `Err(ConfigError)` - An error occurred
    fn get(&self, key: &OptionName) -> Result<Option<ConfigValue>>;

    /// Returns every key this source can answer for.
    ///
    /// Sources that compute keys on demand (such as the environment with
    /// prefixes) may return the raw names they hold instead.
    fn all_keys(&self) -> Result<Vec<OptionName>>;

    /// Describes where a value for `key` came from.
    ///
    /// Only called after `get` returned a value for `key`.
    fn origin(&self, _key: &OptionName) -> Origin {
        Origin::Source {
            name: self.name().to_string(),
        }
    }

    /// Returns true if the keys from [`all_keys`](ConfigSource::all_keys) are
    /// option names, so keys matching no registered option can be reported.
    fn keyed_by_option_name(&self) -> bool {
        true
    }

    /// Convenience wrapper around [`get`](ConfigSource::get) for string keys.
    fn get_str(&self, key: &str) -> Result<Option<ConfigValue>> {
        self.get(&OptionName::from(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestSource {
        name: String,
        priority: u8,
    }

    impl ConfigSource for TestSource {
        fn name(&self) -> &str {
            &self.name
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn get(&self, key: &OptionName) -> Result<Option<ConfigValue>> {
            if key.as_str() == "known" {
                Ok(Some(ConfigValue::from("yes")))
            } else {
                Ok(None)
            }
        }

        fn all_keys(&self) -> Result<Vec<OptionName>> {
            Ok(vec![OptionName::from("known")])
        }
    }

    fn source() -> TestSource {
        TestSource {
            name: "test-source".to_string(),
            priority: 2,
        }
    }

    #[test]
    fn test_config_source_name_and_priority() {
        let source = source();
        assert_eq!(source.name(), "test-source");
        assert_eq!(source.priority(), 2);
    }

    #[test]
    fn test_get_str_delegates_to_get() {
        let source = source();
        assert_eq!(source.get_str("known").unwrap().unwrap().as_str(), "yes");
        assert!(source.get_str("unknown").unwrap().is_none());
    }

    #[test]
    fn test_default_origin_names_source() {
        let source = source();
        assert_eq!(
            source.origin(&OptionName::from("known")),
            Origin::Source {
                name: "test-source".to_string()
            }
        );
        assert!(source.keyed_by_option_name());
    }

    #[test]
    fn test_config_source_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Box<dyn ConfigSource>>();
    }
}
