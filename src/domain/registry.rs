// SPDX-License-Identifier: MIT OR Apache-2.0

//! The option registry.
//!
//! The registry binds option names to fields of a configuration struct via
//! value adapters, and remembers which options were explicitly set and by
//! which source. It borrows the fields it binds, so the struct is only usable
//! again once the registry has been turned into a [`Provenance`].

use crate::domain::errors::{ConfigError, Result};
use crate::domain::kv::Kv;
use crate::domain::value::{
    BoolValue, KvSliceValue, KvValue, ScalarValue, StringSliceValue, Value, ValueKind,
};
use crate::domain::{ConfigValue, OptionName, Origin, Provenance};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

/// A registered option: name, usage text, default and the bound adapter.
pub struct OptionDefinition<'a> {
    name: OptionName,
    usage: String,
    default: String,
    value: Box<dyn Value + 'a>,
}

impl<'a> OptionDefinition<'a> {
    /// The option name.
    pub fn name(&self) -> &OptionName {
        &self.name
    }

    /// The usage text given at registration.
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The default value, rendered at registration time.
    pub fn default_text(&self) -> &str {
        &self.default
    }

    /// The value shape.
    pub fn kind(&self) -> ValueKind {
        self.value.kind()
    }

    /// The current value, rendered.
    pub fn current(&self) -> String {
        self.value.render()
    }
}

impl std::fmt::Debug for OptionDefinition<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("default", &self.default)
            .finish()
    }
}

/// A named collection of typed options with "explicitly set" tracking.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::OptionRegistry;
///
/// let mut host = String::new();
/// let mut port = 0u16;
///
/// let mut registry = OptionRegistry::new("app");
/// registry
///     .string_var(&mut host, "db.host", "localhost", "Database host")
///     .scalar_var(&mut port, "db.port", 5432u16, "Database port");
///
/// assert_eq!(registry.len(), 2);
/// assert!(!registry.is_set("db.host"));
///
/// let provenance = registry.into_provenance();
/// assert!(provenance.is_empty());
/// assert_eq!(host, "localhost");
/// assert_eq!(port, 5432);
/// ```
pub struct OptionRegistry<'a> {
    program: String,
    definitions: Vec<OptionDefinition<'a>>,
    index: HashMap<OptionName, usize>,
    origins: HashMap<OptionName, Origin>,
}

impl<'a> OptionRegistry<'a> {
    /// Creates an empty registry. `program` is used in usage text.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            definitions: Vec::new(),
            index: HashMap::new(),
            origins: HashMap::new(),
        }
    }

    /// Registers an option bound to `value`.
    ///
    /// The adapter's current value (the default written when it was bound)
    /// is recorded as the option's default.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already registered. Option tables are static, so a
    /// duplicate is a programming error.
    pub fn register(
        &mut self,
        name: impl Into<OptionName>,
        value: impl Value + 'a,
        usage: impl Into<String>,
    ) -> &mut Self {
        let name = name.into();
        if self.index.contains_key(&name) {
            panic!("option '{}' is already registered", name);
        }

        let default = value.render();
        tracing::trace!(option = %name, default = %default, "registered option");

        self.index.insert(name.clone(), self.definitions.len());
        self.definitions.push(OptionDefinition {
            name,
            usage: usage.into(),
            default,
            value: Box::new(value),
        });
        self
    }

    /// Registers a string option.
    pub fn string_var(
        &mut self,
        dest: &'a mut String,
        name: impl Into<OptionName>,
        default: impl Into<String>,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.register(name, ScalarValue::new(dest, default.into()), usage)
    }

    /// Registers a boolean switch.
    pub fn bool_var(
        &mut self,
        dest: &'a mut bool,
        name: impl Into<OptionName>,
        default: bool,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.register(name, BoolValue::new(dest, default), usage)
    }

    /// Registers an option of any `FromStr + Display` type (integers, floats, ...).
    pub fn scalar_var<T>(
        &mut self,
        dest: &'a mut T,
        name: impl Into<OptionName>,
        default: T,
        usage: impl Into<String>,
    ) -> &mut Self
    where
        T: FromStr + Display + 'a,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.register(name, ScalarValue::new(dest, default), usage)
    }

    /// Registers a `k1=v1;k2=v2` option.
    pub fn kv_var(
        &mut self,
        dest: &'a mut Kv,
        name: impl Into<OptionName>,
        default: Kv,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.register(name, KvValue::new(dest, default), usage)
    }

    /// Registers a `,`-separated list of KV maps.
    pub fn kv_slice_var(
        &mut self,
        dest: &'a mut Vec<Kv>,
        name: impl Into<OptionName>,
        default: Vec<Kv>,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.register(name, KvSliceValue::new(dest, default), usage)
    }

    /// Registers a `,`-separated list of trimmed strings.
    pub fn string_slice_var(
        &mut self,
        dest: &'a mut Vec<String>,
        name: impl Into<OptionName>,
        default: Vec<String>,
        usage: impl Into<String>,
    ) -> &mut Self {
        self.register(name, StringSliceValue::new(dest, default), usage)
    }

    /// The program name given at construction.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Iterates definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &OptionDefinition<'a>> {
        self.definitions.iter()
    }

    /// Looks up a definition by name.
    pub fn get(&self, name: &str) -> Option<&OptionDefinition<'a>> {
        self.index.get(name).map(|&i| &self.definitions[i])
    }

    /// Returns true if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of registered options.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if no option is registered.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Returns true if any source has written a value for `name`.
    ///
    /// Always false for names that were never registered.
    pub fn is_set(&self, name: &str) -> bool {
        self.origins.contains_key(name)
    }

    /// The source that wrote `name`, if any.
    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.origins.get(name)
    }

    /// Names of options not yet set, in registration order.
    pub fn unset_names(&self) -> Vec<OptionName> {
        self.definitions
            .iter()
            .filter(|def| !self.origins.contains_key(&def.name))
            .map(|def| def.name.clone())
            .collect()
    }

    /// Records that `name` was written by `origin`. The first origin sticks.
    pub(crate) fn mark_set(&mut self, name: &OptionName, origin: Origin) {
        self.origins.entry(name.clone()).or_insert(origin);
    }

    /// Parses `raw` into the option `name` and marks it set.
    ///
    /// Options already set are left untouched and `Ok(false)` is returned.
    pub(crate) fn apply(&mut self, name: &str, raw: &ConfigValue, origin: Origin) -> Result<bool> {
        let index = *self
            .index
            .get(name)
            .ok_or_else(|| ConfigError::UnknownOption {
                name: name.to_string(),
            })?;

        if self.origins.contains_key(name) {
            tracing::debug!(option = %name, "option already set, ignoring {}", origin);
            return Ok(false);
        }

        let definition = &mut self.definitions[index];
        definition.value.set(name, raw)?;
        tracing::debug!(option = %name, "resolved from {}", origin);

        let key = definition.name.clone();
        self.mark_set(&key, origin);
        Ok(true)
    }

    /// Consumes the registry, releasing the bound fields.
    pub fn into_provenance(self) -> Provenance {
        Provenance::new(self.origins)
    }
}

impl std::fmt::Debug for OptionRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionRegistry")
            .field("program", &self.program)
            .field("definitions", &self.definitions)
            .field("origins", &self.origins)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_writes_defaults() {
        let mut driver = String::from("junk");
        let mut debug = true;
        {
            let mut registry = OptionRegistry::new("test");
            registry
                .string_var(&mut driver, "postgres.driver", "postgres", "driver")
                .bool_var(&mut debug, "postgres.debug", false, "debug");
            let def = registry.get("postgres.driver").unwrap();
            assert_eq!(def.default_text(), "postgres");
            assert_eq!(def.usage(), "driver");
        }
        assert_eq!(driver, "postgres");
        assert!(!debug);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut a = String::new();
        let mut b = String::new();
        let mut registry = OptionRegistry::new("test");
        registry.string_var(&mut a, "x", "", "");
        registry.string_var(&mut b, "x", "", "");
    }

    #[test]
    fn test_definitions_keep_registration_order() {
        let (mut a, mut b, mut c) = (0i64, 0i64, 0i64);
        let mut registry = OptionRegistry::new("test");
        registry
            .scalar_var(&mut a, "zeta", 1, "")
            .scalar_var(&mut b, "alpha", 2, "")
            .scalar_var(&mut c, "mid", 3, "");
        let names: Vec<&str> = registry.definitions().map(|d| d.name().as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_apply_marks_set_and_writes() {
        let mut port = 0u16;
        {
            let mut registry = OptionRegistry::new("test");
            registry.scalar_var(&mut port, "clickhouse.port", 9000u16, "");
            assert!(!registry.is_set("clickhouse.port"));

            let written = registry
                .apply("clickhouse.port", &ConfigValue::from("9440"), Origin::CommandLine)
                .unwrap();
            assert!(written);
            assert!(registry.is_set("clickhouse.port"));
            assert_eq!(registry.origin("clickhouse.port"), Some(&Origin::CommandLine));
            assert_eq!(registry.get("clickhouse.port").unwrap().current(), "9440");
        }
        assert_eq!(port, 9440);
    }

    #[test]
    fn test_apply_never_overwrites_set_option() {
        let mut host = String::new();
        {
            let mut registry = OptionRegistry::new("test");
            registry.string_var(&mut host, "postgres.host", "", "");
            registry
                .apply("postgres.host", &ConfigValue::from("cli"), Origin::CommandLine)
                .unwrap();
            let written = registry
                .apply(
                    "postgres.host",
                    &ConfigValue::from("env"),
                    Origin::Environment {
                        variable: "POSTGRES_HOST".to_string(),
                    },
                )
                .unwrap();
            assert!(!written);
            assert_eq!(registry.origin("postgres.host"), Some(&Origin::CommandLine));
        }
        assert_eq!(host, "cli");
    }

    #[test]
    fn test_apply_failure_does_not_mark_set() {
        let mut port = 0u16;
        let mut registry = OptionRegistry::new("test");
        registry.scalar_var(&mut port, "postgres.port", 25060u16, "");
        let result = registry.apply("postgres.port", &ConfigValue::from("abc"), Origin::CommandLine);
        assert!(matches!(result, Err(ConfigError::MalformedArgument { .. })));
        assert!(!registry.is_set("postgres.port"));
    }

    #[test]
    fn test_apply_unknown_option() {
        let mut registry = OptionRegistry::new("test");
        let result = registry.apply("nope", &ConfigValue::from("1"), Origin::CommandLine);
        assert!(matches!(result, Err(ConfigError::UnknownOption { .. })));
    }

    #[test]
    fn test_is_set_false_for_unregistered() {
        let registry = OptionRegistry::new("test");
        assert!(!registry.is_set("anything"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_unset_names() {
        let (mut a, mut b) = (String::new(), String::new());
        let mut registry = OptionRegistry::new("test");
        registry.string_var(&mut a, "a", "", "").string_var(&mut b, "b", "", "");
        registry
            .apply("a", &ConfigValue::from("x"), Origin::CommandLine)
            .unwrap();
        assert_eq!(registry.unset_names(), vec![OptionName::from("b")]);
    }

    #[test]
    fn test_into_provenance_carries_origins() {
        let mut tables = Vec::new();
        let provenance = {
            let mut registry = OptionRegistry::new("test");
            registry.string_slice_var(&mut tables, "migrate.tables", vec![], "");
            registry
                .apply(
                    "migrate.tables",
                    &ConfigValue::from("jobs, audits"),
                    Origin::Source {
                        name: "mock".to_string(),
                    },
                )
                .unwrap();
            registry.into_provenance()
        };
        assert!(provenance.is_set("migrate.tables"));
        assert_eq!(tables, vec!["jobs", "audits"]);
    }
}
