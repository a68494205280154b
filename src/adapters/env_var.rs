// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable configuration source adapter.
//!
//! Variable names are matched case-insensitively: the adapter upper-cases
//! every name it holds, and option names are translated to
//! `upper(prefix + name)` with `.` replaced by `_` before lookup.

use crate::domain::{ConfigValue, OptionName, Origin, Result};
use crate::ports::ConfigSource;
use std::collections::HashMap;
use std::env;

#[derive(Debug, Clone)]
struct EnvEntry {
    variable: String,
    value: String,
}

/// Configuration source adapter for environment variables.
///
/// For every option the adapter tries each prefix in order and returns the
/// first variable that matches. An empty prefix list behaves as a single
/// empty prefix.
///
/// # Priority
///
/// Environment variables have a priority of 2: they override properties
/// documents (priority 1) and are overridden by the command line (priority 3).
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::EnvVarAdapter;
/// use flagcfg::ports::ConfigSource;
///
/// let adapter = EnvVarAdapter::from_environ(["app_postgres_host=db1", "PATH=/bin"])
///     .with_prefixes(["APP_"]);
///
/// let value = adapter.get_str("postgres.host").unwrap().unwrap();
/// assert_eq!(value.as_str(), "db1");
/// ```
#[derive(Debug, Clone)]
pub struct EnvVarAdapter {
    /// Name prefixes, tried in order
    prefixes: Vec<String>,
    /// Whether `.` in option names becomes `_`
    replace_dots: bool,
    /// Variables keyed by upper-cased name
    vars: HashMap<String, EnvEntry>,
}

impl EnvVarAdapter {
    /// Creates an adapter over `KEY=VALUE` strings, as found in a process
    /// environment block.
    ///
    /// Entries without `=` are skipped. When two entries differ only in case,
    /// the later one wins.
    pub fn from_environ<I, S>(environ: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let pairs = environ.into_iter().filter_map(|entry| {
            let entry = entry.as_ref();
            match entry.split_once('=') {
                Some((key, value)) => Some((key.to_string(), value.to_string())),
                None => {
                    tracing::debug!("Skipping malformed environment entry without '='");
                    None
                }
            }
        });
        Self::from_vars(pairs)
    }

    /// Creates an adapter over `(name, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();

        for (key, value) in vars {
            map.insert(
                key.to_uppercase(),
                EnvEntry {
                    variable: key,
                    value,
                },
            );
        }

        tracing::debug!("Loaded {} environment variables", map.len());

        Self {
            prefixes: Vec::new(),
            replace_dots: true,
            vars: map,
        }
    }

    /// Creates an adapter over the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process_env() -> Self {
        let pairs = env::vars_os().filter_map(|(key, value)| {
            match (key.into_string(), value.into_string()) {
                (Ok(key), Ok(value)) => Some((key, value)),
                (Ok(key), Err(_)) => {
                    tracing::warn!("Skipping environment variable {} with non-Unicode value", key);
                    None
                }
                _ => {
                    tracing::warn!("Skipping environment variable with non-Unicode name");
                    None
                }
            }
        });
        Self::from_vars(pairs)
    }

    /// Sets the name prefixes, replacing any set before.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Appends one name prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefixes.push(prefix.into());
        self
    }

    /// Sets whether `.` in option names is translated to `_` (default on).
    pub fn replace_dots(mut self, enabled: bool) -> Self {
        self.replace_dots = enabled;
        self
    }

    /// The configured prefixes, with the empty list normalized to `[""]`.
    pub fn prefixes(&self) -> Vec<&str> {
        if self.prefixes.is_empty() {
            vec![""]
        } else {
            self.prefixes.iter().map(String::as_str).collect()
        }
    }

    fn lookup(&self, key: &OptionName) -> Option<&EnvEntry> {
        self.prefixes().into_iter().find_map(|prefix| {
            let candidate = key.env_name(prefix, self.replace_dots);
            self.vars.get(&candidate)
        })
    }
}

impl ConfigSource for EnvVarAdapter {
    fn name(&self) -> &str {
        "env"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn get(&self, key: &OptionName) -> Result<Option<ConfigValue>> {
        Ok(self
            .lookup(key)
            .map(|entry| ConfigValue::from(entry.value.as_str())))
    }

    fn all_keys(&self) -> Result<Vec<OptionName>> {
        Ok(self
            .vars
            .values()
            .map(|entry| OptionName::from(entry.variable.as_str()))
            .collect())
    }

    fn keyed_by_option_name(&self) -> bool {
        false
    }

    fn origin(&self, key: &OptionName) -> Origin {
        let variable = match self.lookup(key) {
            Some(entry) => entry.variable.clone(),
            None => key.env_name(self.prefixes()[0], self.replace_dots),
        };
        Origin::Environment { variable }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_adapter_name_and_priority() {
        let adapter = EnvVarAdapter::from_environ(Vec::<String>::new());
        assert_eq!(adapter.name(), "env");
        assert_eq!(adapter.priority(), 2);
        assert!(!adapter.keyed_by_option_name());
    }

    #[test]
    fn test_env_adapter_matches_case_insensitively() {
        let adapter = EnvVarAdapter::from_environ(["Postgres_Host=db1"]);
        let value = adapter.get_str("postgres.host").unwrap();
        assert_eq!(value.unwrap().as_str(), "db1");
    }

    #[test]
    fn test_env_adapter_value_case_is_preserved() {
        let adapter = EnvVarAdapter::from_environ(["POSTGRES_PASSWORD=S3cr3T"]);
        let value = adapter.get_str("postgres.password").unwrap();
        assert_eq!(value.unwrap().as_str(), "S3cr3T");
    }

    #[test]
    fn test_env_adapter_with_prefix() {
        let adapter = EnvVarAdapter::from_environ(["APP_POSTGRES_HOST=db1", "POSTGRES_HOST=db2"])
            .with_prefixes(["APP_"]);
        let value = adapter.get_str("postgres.host").unwrap();
        assert_eq!(value.unwrap().as_str(), "db1");
    }

    #[test]
    fn test_env_adapter_prefixes_tried_in_order() {
        let environ = ["NEW_POSTGRES_HOST=new", "OLD_POSTGRES_HOST=old", "OLD_POSTGRES_USER=u"];
        let adapter = EnvVarAdapter::from_environ(environ).with_prefixes(["NEW_", "OLD_"]);

        assert_eq!(adapter.get_str("postgres.host").unwrap().unwrap().as_str(), "new");
        assert_eq!(adapter.get_str("postgres.user").unwrap().unwrap().as_str(), "u");
    }

    #[test]
    fn test_env_adapter_empty_prefix_list_means_no_prefix() {
        let adapter = EnvVarAdapter::from_environ(["CLICKHOUSE_IP=10.0.0.1"]);
        assert_eq!(adapter.prefixes(), vec![""]);
        assert!(adapter.get_str("clickhouse.ip").unwrap().is_some());
    }

    #[test]
    fn test_env_adapter_without_dot_replacement() {
        let adapter = EnvVarAdapter::from_environ(["POSTGRES.HOST=dotted", "POSTGRES_HOST=plain"])
            .replace_dots(false);
        let value = adapter.get_str("postgres.host").unwrap();
        assert_eq!(value.unwrap().as_str(), "dotted");
    }

    #[test]
    fn test_env_adapter_value_keeps_equals_signs() {
        let adapter = EnvVarAdapter::from_environ(["POSTGRES_PARAMS=sslmode=disable;x=1"]);
        let value = adapter.get_str("postgres.params").unwrap();
        assert_eq!(value.unwrap().as_str(), "sslmode=disable;x=1");
    }

    #[test]
    fn test_env_adapter_skips_entries_without_equals() {
        let adapter = EnvVarAdapter::from_environ(["GARBAGE", "A=1"]);
        assert_eq!(adapter.all_keys().unwrap(), vec![OptionName::from("A")]);
    }

    #[test]
    fn test_env_adapter_later_duplicate_wins() {
        let adapter = EnvVarAdapter::from_environ(["key=first", "KEY=second"]);
        assert_eq!(adapter.get_str("key").unwrap().unwrap().as_str(), "second");
    }

    #[test]
    fn test_env_adapter_keeps_large_values() {
        let big = "x".repeat(2 * 1024 * 1024);
        let key = format!("APP_{}", "K".repeat(600));
        let adapter = EnvVarAdapter::from_vars(vec![
            ("BIG".to_string(), big.clone()),
            (key.clone(), "long".to_string()),
        ]);
        assert_eq!(adapter.get_str("big").unwrap().unwrap().as_string(), big);
        assert_eq!(
            adapter.get_str(&key.to_lowercase()).unwrap().unwrap().as_str(),
            "long"
        );
    }

    #[test]
    fn test_env_adapter_origin_names_matched_variable() {
        let adapter =
            EnvVarAdapter::from_environ(["app_postgres_host=db1"]).with_prefix("APP_");
        assert_eq!(
            adapter.origin(&OptionName::from("postgres.host")),
            Origin::Environment {
                variable: "app_postgres_host".to_string()
            }
        );
    }

    #[test]
    fn test_env_adapter_missing_key() {
        let adapter = EnvVarAdapter::from_environ(["A=1"]);
        assert!(adapter.get_str("nonexistent.var").unwrap().is_none());
    }
}
