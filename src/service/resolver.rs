// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered option resolution.
//!
//! The resolver fills every registered option from the first source that has
//! a value for it. The command line always comes first; the remaining
//! sources (environment, properties, custom) follow by descending priority. Options no
//! source knows about keep their defaults and stay unset.

use crate::adapters::{CommandLineAdapter, EnvVarAdapter, PropertiesAdapter};
use crate::domain::{OptionRegistry, Result};
use crate::ports::ConfigSource;
use std::cmp::Reverse;

/// Resolves an [`OptionRegistry`] against its sources.
///
/// Command-line arguments are held raw and parsed against the registry on
/// each [`resolve`](Resolver::resolve), because how they split into flags and
/// values depends on the option types.
///
/// # Examples
///
/// ```rust
/// use flagcfg::domain::OptionRegistry;
/// use flagcfg::service::Resolver;
///
/// # fn main() -> flagcfg::domain::Result<()> {
/// let mut host = String::new();
/// let mut port = 0u16;
///
/// let resolver = Resolver::builder()
///     .with_cli_args(["-db.host", "cli-host"])
///     .with_environ(["DB_HOST=env-host", "DB_PORT=6543"], Vec::<String>::new())
///     .build()?;
///
/// let provenance = {
///     let mut registry = OptionRegistry::new("demo");
///     registry
///         .string_var(&mut host, "db.host", "localhost", "Database host")
///         .scalar_var(&mut port, "db.port", 5432u16, "Database port");
///     resolver.resolve(&mut registry)?;
///     registry.into_provenance()
/// };
///
/// assert_eq!(host, "cli-host");
/// assert_eq!(port, 6543);
/// assert!(provenance.is_set("db.port"));
/// # Ok(())
/// # }
/// ```
pub struct Resolver {
    /// Raw command-line arguments, without the program name
    cli_args: Vec<String>,
    /// Lookup sources, maintained in priority order (highest first)
    sources: Vec<Box<dyn ConfigSource>>,
}

impl Resolver {
    /// Creates a resolver with no arguments and no sources.
    pub fn new() -> Self {
        Self {
            cli_args: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Creates a new resolver builder.
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Adds a lookup source. Sources are kept sorted by priority.
    pub fn add_source(&mut self, source: Box<dyn ConfigSource>) {
        self.sources.push(source);
        self.sort_sources();
    }

    /// Sorts sources by priority (highest first). Equal priorities keep
    /// insertion order.
    fn sort_sources(&mut self) {
        self.sources.sort_by_key(|s| Reverse(s.priority()));
    }

    /// Names of the lookup sources in the order they are consulted.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Fills `registry` from the command line and the lookup sources.
    ///
    /// Returns the positional arguments left after flag parsing. The first
    /// error aborts resolution; options applied before it keep their new
    /// values.
    pub fn resolve(&self, registry: &mut OptionRegistry<'_>) -> Result<Vec<String>> {
        let cli = CommandLineAdapter::parse(registry, &self.cli_args)?;

        // The command line is applied in full before any other source, so no
        // custom priority can outrank it.
        for name in registry.unset_names() {
            if let Some(value) = cli.get(&name)? {
                registry.apply(name.as_str(), &value, cli.origin(&name))?;
            }
        }

        for name in registry.unset_names() {
            for source in &self.sources {
                if let Some(value) = source.get(&name)? {
                    registry.apply(name.as_str(), &value, source.origin(&name))?;
                    break;
                }
            }
        }

        for source in &self.sources {
            if !source.keyed_by_option_name() {
                continue;
            }
            for key in source.all_keys()? {
                if !registry.contains(key.as_str()) {
                    tracing::debug!(
                        "Ignoring key '{}' from source '{}': no such option",
                        key,
                        source.name()
                    );
                }
            }
        }

        tracing::debug!(
            "Resolved {} of {} options",
            registry.len() - registry.unset_names().len(),
            registry.len()
        );

        Ok(cli.positional().to_vec())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("cli_args", &self.cli_args)
            .field("sources", &self.source_names())
            .finish()
    }
}

/// Builder for constructing a [`Resolver`].
///
/// # Examples
///
/// ```rust
/// use flagcfg::adapters::PropertiesAdapter;
/// use flagcfg::service::ResolverBuilder;
///
/// # fn main() -> flagcfg::domain::Result<()> {
/// let properties = PropertiesAdapter::from_content("inline", "db.host=props")?;
/// let resolver = ResolverBuilder::new()
///     .with_environ(["APP_DB_HOST=env"], ["APP_"])
///     .with_properties(properties)
///     .build()?;
///
/// assert_eq!(resolver.source_names(), vec!["env", "properties"]);
/// # Ok(())
/// # }
/// ```
pub struct ResolverBuilder {
    cli_args: Vec<String>,
    sources: Vec<Box<dyn ConfigSource>>,
}

impl ResolverBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            cli_args: Vec::new(),
            sources: Vec::new(),
        }
    }

    /// Sets the command-line arguments, without the program name.
    pub fn with_cli_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.cli_args = args.into_iter().map(|a| a.as_ref().to_string()).collect();
        self
    }

    /// Adds an environment block of `KEY=VALUE` strings, matched with the
    /// given name prefixes.
    pub fn with_environ<I, S, P, T>(self, environ: I, prefixes: P) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let adapter = EnvVarAdapter::from_environ(environ).with_prefixes(prefixes);
        self.with_source(Box::new(adapter))
    }

    /// Adds the current process environment, matched with the given name
    /// prefixes.
    pub fn with_process_env<P, T>(self, prefixes: P) -> Self
    where
        P: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let adapter = EnvVarAdapter::from_process_env().with_prefixes(prefixes);
        self.with_source(Box::new(adapter))
    }

    /// Adds a loaded properties document.
    pub fn with_properties(self, properties: PropertiesAdapter) -> Self {
        self.with_source(Box::new(properties))
    }

    /// Adds a custom lookup source.
    pub fn with_source(mut self, source: Box<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Builds the resolver.
    pub fn build(self) -> Result<Resolver> {
        let mut resolver = Resolver::new();
        resolver.cli_args = self.cli_args;

        for source in self.sources {
            resolver.add_source(source);
        }

        Ok(resolver)
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves `registry` from command-line `args`, an environment block and an
/// optional properties document, in that order of precedence.
///
/// Returns the positional arguments.
pub fn resolve<A, E, P>(
    registry: &mut OptionRegistry<'_>,
    args: &[A],
    environ: &[E],
    prefixes: &[P],
    properties: Option<PropertiesAdapter>,
) -> Result<Vec<String>>
where
    A: AsRef<str>,
    E: AsRef<str>,
    P: AsRef<str>,
{
    let mut builder = Resolver::builder().with_cli_args(args).with_environ(
        environ,
        prefixes.iter().map(|p| p.as_ref().to_string()),
    );
    if let Some(properties) = properties {
        builder = builder.with_properties(properties);
    }
    builder.build()?.resolve(registry)
}
