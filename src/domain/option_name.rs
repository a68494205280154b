// SPDX-License-Identifier: MIT OR Apache-2.0

//! Option name newtype.
//!
//! Option names follow a dotted convention (`component.field`). The same name
//! is used verbatim as the properties key and, after translation, as the
//! environment variable name.

use std::borrow::Borrow;
use std::fmt;

/// The literal name of a registered option, e.g. `postgres.host`.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::OptionName;
///
/// let name = OptionName::from("postgres.host");
/// assert_eq!(name.as_str(), "postgres.host");
/// assert_eq!(name.env_name("APP_", true), "APP_POSTGRES_HOST");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionName(String);

impl OptionName {
    /// Creates a new `OptionName` from a `String`.
    pub fn new(name: String) -> Self {
        OptionName(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Converts the `OptionName` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Builds the environment variable name for this option.
    ///
    /// The result is `prefix + name`, upper-cased. When `replace_dots` is set,
    /// every `.` in the name becomes `_` so that `postgres.host` maps to `POSTGRES_HOST`.
    ///
    /// # Examples
    ///
    /// ```
    /// use flagcfg::domain::OptionName;
    ///
    /// let name = OptionName::from("clickhouse.ip");
    /// assert_eq!(name.env_name("", true), "CLICKHOUSE_IP");
    /// assert_eq!(name.env_name("", false), "CLICKHOUSE.IP");
    /// ```
    pub fn env_name(&self, prefix: &str, replace_dots: bool) -> String {
        let mut candidate = String::with_capacity(prefix.len() + self.0.len());
        candidate.push_str(prefix);
        if replace_dots {
            candidate.push_str(&self.0.replace('.', "_"));
        } else {
            candidate.push_str(&self.0);
        }
        candidate.to_uppercase()
    }
}

impl From<String> for OptionName {
    fn from(s: String) -> Self {
        OptionName(s)
    }
}

impl From<&str> for OptionName {
    fn from(s: &str) -> Self {
        OptionName(s.to_string())
    }
}

impl From<OptionName> for String {
    fn from(name: OptionName) -> Self {
        name.0
    }
}

impl AsRef<str> for OptionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for OptionName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
