// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line argument configuration source adapter.
//!
//! Flags follow the conventional single-dash style: `-name`, `-name value`,
//! `-name=value`, with `--name` accepted as well. Boolean options never take
//! a separate value (`-debug`, `-debug=false`). Flag parsing stops at `--`
//! or at the first argument that is not a flag.
//!
//! A `clap::Command` is generated from the option registry to do the actual
//! parsing, so unknown flags, repeated flags and usage text are handled by
//! clap. Arguments are first rewritten into clap's `--name=value` form,
//! because which arguments are values depends on the option types.

use crate::domain::{ConfigError, ConfigValue, OptionName, OptionRegistry, Origin, Result};
use crate::ports::ConfigSource;
use clap::error::{ContextKind, ErrorKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};
use std::collections::HashMap;

/// Argument id for everything after flag parsing stops.
const POSITIONAL: &str = "[args]";

/// Configuration source adapter for command-line arguments.
///
/// # Priority
///
/// Command-line arguments have the highest priority (3): they override both
/// environment variables (priority 2) and properties documents (priority 1).
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::CommandLineAdapter;
/// use flagcfg::domain::OptionRegistry;
/// use flagcfg::ports::ConfigSource;
///
/// let mut host = String::new();
/// let mut debug = false;
/// let mut registry = OptionRegistry::new("demo");
/// registry
///     .string_var(&mut host, "postgres.host", "", "Database host")
///     .bool_var(&mut debug, "postgres.debug", false, "Verbose SQL");
///
/// let args = ["-postgres.host", "db1", "-postgres.debug", "extra"];
/// let adapter = CommandLineAdapter::parse(&registry, &args).unwrap();
///
/// assert_eq!(adapter.get_str("postgres.host").unwrap().unwrap().as_str(), "db1");
/// assert_eq!(adapter.get_str("postgres.debug").unwrap().unwrap().as_str(), "true");
/// assert_eq!(adapter.positional(), &["extra".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CommandLineAdapter {
    /// Raw values of the flags that were given
    values: HashMap<String, String>,
    /// Arguments left after flag parsing stopped
    positional: Vec<String>,
}

impl CommandLineAdapter {
    /// Creates an adapter with no arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `args` (without the program name) against `registry`.
    ///
    /// Unknown flags are `UnknownOption`; missing values and bad syntax are
    /// `CommandLine`; `-h`/`-help` is `HelpRequested` unless the registry
    /// defines an option with that name. Values are not type-checked here:
    /// that happens when the resolver applies them.
    pub fn parse<S: AsRef<str>>(registry: &OptionRegistry<'_>, args: &[S]) -> Result<Self> {
        let normalized = normalize(registry, args)?;

        let matches = Self::command(registry)
            .try_get_matches_from(normalized)
            .map_err(|e| match e.kind() {
                ErrorKind::UnknownArgument => {
                    let name = e
                        .get(ContextKind::InvalidArg)
                        .map(|arg| arg.to_string())
                        .unwrap_or_default();
                    ConfigError::UnknownOption {
                        name: name.trim_start_matches('-').to_string(),
                    }
                }
                _ => ConfigError::CommandLine {
                    message: e.to_string().trim().to_string(),
                },
            })?;

        let mut values = HashMap::new();
        for definition in registry.definitions() {
            let id = definition.name().as_str();
            if matches.value_source(id) != Some(ValueSource::CommandLine) {
                continue;
            }
            if let Some(raw) = matches.get_one::<String>(id) {
                values.insert(id.to_string(), raw.clone());
            }
        }

        let positional: Vec<String> = matches
            .get_many::<String>(POSITIONAL)
            .map(|rest| rest.cloned().collect())
            .unwrap_or_default();

        tracing::debug!(
            "Parsed {} command-line flags and {} positional arguments",
            values.len(),
            positional.len()
        );

        Ok(Self { values, positional })
    }

    /// Builds the clap command for `registry`.
    pub fn command(registry: &OptionRegistry<'_>) -> Command {
        let program = if registry.program().is_empty() {
            "flagcfg".to_string()
        } else {
            registry.program().to_string()
        };

        let mut command = Command::new(program)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .args_override_self(true)
            .arg(
                Arg::new(POSITIONAL)
                    .action(ArgAction::Append)
                    .num_args(1..)
                    .hide(true),
            );

        for definition in registry.definitions() {
            let kind = definition.kind();
            let help = if definition.default_text().is_empty() {
                definition.usage().to_string()
            } else {
                format!("{} (default: {})", definition.usage(), definition.default_text())
            };

            let mut arg = Arg::new(definition.name().as_str().to_string())
                .long(definition.name().as_str().to_string())
                .value_name(kind.value_name())
                .action(ArgAction::Set)
                .help(help);

            arg = if kind.takes_argument() {
                arg.allow_hyphen_values(true)
            } else {
                arg.num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
            };

            command = command.arg(arg);
        }

        command
    }

    /// Renders usage text listing every registered option.
    pub fn usage(registry: &OptionRegistry<'_>) -> String {
        Self::command(registry).render_help().to_string()
    }

    /// Arguments left after flag parsing stopped.
    pub fn positional(&self) -> &[String] {
        &self.positional
    }

    /// Number of flags given.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no flags were given.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Rewrites conventional flag syntax into `--name=value` tokens for clap.
///
/// Everything after the point where flag parsing stops is passed on behind a
/// `--` so clap treats it as positional.
fn normalize<S: AsRef<str>>(registry: &OptionRegistry<'_>, args: &[S]) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(args.len());
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_ref();

        if arg == "--" {
            out.push("--".to_string());
            out.extend(args[i + 1..].iter().map(|a| a.as_ref().to_string()));
            break;
        }
        if arg.len() < 2 || !arg.starts_with('-') {
            out.push("--".to_string());
            out.extend(args[i..].iter().map(|a| a.as_ref().to_string()));
            break;
        }

        let body = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .unwrap_or(arg);
        let (name, value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if name.is_empty() || name.starts_with('-') {
            return Err(ConfigError::CommandLine {
                message: format!("bad flag syntax: {}", arg),
            });
        }
        if (name == "h" || name == "help") && !registry.contains(name) {
            return Err(ConfigError::HelpRequested {
                usage: CommandLineAdapter::usage(registry),
            });
        }

        let kind = registry
            .get(name)
            .map(|definition| definition.kind())
            .ok_or_else(|| ConfigError::UnknownOption {
                name: name.to_string(),
            })?;

        match value {
            Some(value) => out.push(format!("--{}={}", name, value)),
            None if kind.takes_argument() => match args.get(i + 1) {
                Some(next) => {
                    out.push(format!("--{}={}", name, next.as_ref()));
                    i += 1;
                }
                None => {
                    return Err(ConfigError::CommandLine {
                        message: format!("flag needs an argument: -{}", name),
                    })
                }
            },
            None => out.push(format!("--{}", name)),
        }

        i += 1;
    }

    Ok(out)
}

impl ConfigSource for CommandLineAdapter {
    fn name(&self) -> &str {
        "cli"
    }

    fn priority(&self) -> u8 {
        3
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
        Origin::CommandLine
    }
}
