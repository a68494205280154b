// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process startup: from raw arguments to a resolved [`Configuration`].
//!
//! Bootstrap looks at the raw arguments before any flag parsing. `-v`
//! anywhere means the caller only wants the version, so nothing else runs.
//! Otherwise `-cfg` names the properties document (local path or
//! `http(s)://` URL), which is loaded before the options are resolved.

use crate::adapters::{EnvVarAdapter, PropertiesAdapter, DEFAULT_REMOTE_TIMEOUT};
use crate::domain::{ConfigError, OptionRegistry, Provenance, Result};
use crate::service::Resolver;
use crate::settings::{register_options, Configuration};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Usage lines for the flags handled by bootstrap itself.
pub const BOOTSTRAP_USAGE: &str = "  -cfg <PATH|URL>  Path or URL to config file\n  -v               Show version\n";

/// Returns true if `-v` (or `--v`) appears anywhere in `args`.
pub fn version_requested<S: AsRef<str>>(args: &[S]) -> bool {
    args.iter()
        .any(|arg| matches!(arg.as_ref(), "-v" | "--v"))
}

/// Splits a `-cfg`-like token into the part after the dashes.
fn cfg_body(arg: &str) -> Option<&str> {
    let body = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'))?;
    body.starts_with("cfg").then_some(body)
}

/// Finds the config path given with `-cfg`.
///
/// Supports `-cfg value`, `-cfg=value` and `-cfg='quoted value'`. Returns
/// `Ok(None)` when no argument starts with `-cfg`.
///
/// # Errors
///
/// `InvalidConfigPath` when the first `-cfg` argument has no usable value,
/// or is some other flag that merely starts with `-cfg`.
///
/// # Examples
///
/// ```
/// use flagcfg::service::extract_config_path;
///
/// let path = extract_config_path(&["-cfg='/tmp/a b.properties'"]).unwrap();
/// assert_eq!(path.as_deref(), Some("/tmp/a b.properties"));
///
/// assert!(extract_config_path(&["-cfg="]).is_err());
/// assert_eq!(extract_config_path(&["-postgres.debug"]).unwrap(), None);
/// ```
pub fn extract_config_path<S: AsRef<str>>(args: &[S]) -> Result<Option<String>> {
    for (i, arg) in args.iter().enumerate() {
        let body = match cfg_body(arg.as_ref()) {
            Some(body) => body,
            None => continue,
        };

        if body == "cfg" {
            return match args.get(i + 1).map(|next| next.as_ref()) {
                Some(path) if !path.is_empty() => Ok(Some(path.to_string())),
                _ => Err(ConfigError::InvalidConfigPath),
            };
        }

        let value = body
            .strip_prefix("cfg=")
            .ok_or(ConfigError::InvalidConfigPath)?;
        let path = match value.chars().next() {
            Some(quote @ ('\'' | '"')) => value.trim_matches(quote),
            _ => value,
        };
        if path.is_empty() {
            return Err(ConfigError::InvalidConfigPath);
        }
        return Ok(Some(path.to_string()));
    }

    Ok(None)
}

/// Drops the arguments bootstrap consumes itself, so they do not reach the
/// flag parser: `-cfg` tokens (and their separate value) and test-harness
/// `-test.*` flags.
///
/// Only tokens in flag position are dropped. The value of an option that
/// takes an argument is kept as is, and everything from the first non-flag
/// argument or `--` on is positional. Other flags that merely start with
/// `-cfg` are left for the flag parser to reject.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::OptionRegistry;
/// use flagcfg::service::strip_bootstrap_args;
///
/// let mut password = String::new();
/// let mut registry = OptionRegistry::new("demo");
/// registry.string_var(&mut password, "db.password", "", "Database password");
///
/// let args = ["-cfg", "app.properties", "-db.password", "-test.x", "-test.v"];
/// assert_eq!(
///     strip_bootstrap_args(&registry, &args),
///     vec!["-db.password", "-test.x"]
/// );
/// ```
pub fn strip_bootstrap_args<S: AsRef<str>>(
    registry: &OptionRegistry<'_>,
    args: &[S],
) -> Vec<String> {
    let mut kept = Vec::with_capacity(args.len());
    let mut i = 0;

    while i < args.len() {
        let arg = args[i].as_ref();
        i += 1;

        if arg == "--" || arg.len() < 2 || !arg.starts_with('-') {
            kept.push(arg.to_string());
            kept.extend(args[i..].iter().map(|a| a.as_ref().to_string()));
            break;
        }
        if arg.starts_with("-test.") {
            continue;
        }
        match cfg_body(arg) {
            Some("cfg") => {
                i += 1;
                continue;
            }
            Some(body) if body.starts_with("cfg=") => continue,
            _ => {}
        }

        kept.push(arg.to_string());
        let body = arg
            .strip_prefix("--")
            .or_else(|| arg.strip_prefix('-'))
            .unwrap_or(arg);
        let takes_value = !body.contains('=')
            && registry
                .get(body)
                .map_or(false, |definition| definition.kind().takes_argument());
        if takes_value {
            if let Some(value) = args.get(i) {
                kept.push(value.as_ref().to_string());
                i += 1;
            }
        }
    }

    kept
}

/// Loads the properties document at `path`, or an empty one for `None`.
pub fn load_provider(path: Option<&str>) -> Result<PropertiesAdapter> {
    PropertiesAdapter::load(path)
}

/// The outcome of a successful bootstrap.
#[derive(Clone, Debug)]
pub struct Loaded {
    /// The resolved configuration
    pub config: Configuration,
    /// Which options were explicitly set, and by which source
    pub provenance: Provenance,
    /// Arguments left after flag parsing
    pub positional: Vec<String>,
}

/// Startup driver: version check, config path, provider, resolution.
///
/// # Examples
///
/// ```
/// use flagcfg::service::Bootstrap;
///
/// # fn main() -> flagcfg::domain::Result<()> {
/// let loaded = Bootstrap::new(["-postgres.host", "db1"], ["POSTGRES_PORT=5432"])
///     .run()?
///     .expect("no -v given");
///
/// assert_eq!(loaded.config.postgres.host, "db1");
/// assert_eq!(loaded.config.postgres.port, 5432);
/// assert!(!loaded.provenance.is_set("clickhouse.port"));
///
/// assert!(Bootstrap::new(["-cfg=x", "-v"], Vec::<String>::new()).run()?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bootstrap {
    program: String,
    args: Vec<String>,
    env: EnvVarAdapter,
    prefixes: Vec<String>,
    timeout: Duration,
}

impl Bootstrap {
    /// Creates a bootstrap over `args` (without the program name) and an
    /// environment block of `KEY=VALUE` strings.
    pub fn new<A, S, E, T>(args: A, environ: E) -> Self
    where
        A: IntoIterator<Item = S>,
        S: AsRef<str>,
        E: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            program: env!("CARGO_PKG_NAME").to_string(),
            args: args.into_iter().map(|a| a.as_ref().to_string()).collect(),
            env: EnvVarAdapter::from_environ(environ),
            prefixes: vec![String::new()],
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Creates a bootstrap over the process arguments and environment.
    ///
    /// Arguments that are not valid Unicode are converted lossily.
    pub fn from_process() -> Self {
        let mut os_args = env::args_os();
        let program = os_args
            .next()
            .and_then(|p| {
                Path::new(&p)
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string());

        Self {
            program,
            args: os_args.map(|a| a.to_string_lossy().into_owned()).collect(),
            env: EnvVarAdapter::from_process_env(),
            prefixes: vec![String::new()],
            timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }

    /// Sets the program name shown in usage text.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Sets the environment name prefixes, tried in order.
    pub fn with_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the transport timeout for remote properties documents.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Runs bootstrap. `Ok(None)` means `-v` was given.
    pub fn run(self) -> Result<Option<Loaded>> {
        if version_requested(&self.args) {
            tracing::debug!("Version requested, skipping configuration");
            return Ok(None);
        }

        let path = extract_config_path(&self.args)?;
        match &path {
            Some(path) => tracing::info!("Loading configuration from {}", path),
            None => tracing::debug!("No config file given"),
        }
        let properties = PropertiesAdapter::load_with_timeout(path.as_deref(), self.timeout)?;

        let mut config = Configuration::default();
        let (provenance, positional) = {
            let mut registry = OptionRegistry::new(self.program);
            register_options(&mut config, &mut registry);

            let resolver = Resolver::builder()
                .with_cli_args(strip_bootstrap_args(&registry, &self.args))
                .with_source(Box::new(self.env.with_prefixes(self.prefixes)))
                .with_properties(properties)
                .build()?;
            let positional = resolver.resolve(&mut registry).map_err(|e| match e {
                ConfigError::HelpRequested { usage } => ConfigError::HelpRequested {
                    usage: format!("{}\n{}", usage.trim_end(), BOOTSTRAP_USAGE),
                },
                other => other,
            })?;
            (registry.into_provenance(), positional)
        };

        tracing::debug!("{} options set explicitly", provenance.len());

        Ok(Some(Loaded {
            config,
            provenance,
            positional,
        }))
    }
}

/// Resolves the configuration from the process arguments and environment.
///
/// Returns `Ok(None)` when `-v` was given.
pub fn bootstrap() -> Result<Option<Configuration>> {
    Ok(Bootstrap::from_process().run()?.map(|loaded| loaded.config))
}
