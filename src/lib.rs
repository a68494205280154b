// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered flag configuration: command line, environment, properties.
//!
//! Options are registered once, bound to the fields of a plain configuration
//! struct, and then resolved from three sources in fixed precedence:
//!
//! 1. command-line flags (`-name value`, `-name=value`, `-flag`)
//! 2. environment variables (`upper(prefix + name)` with `.` as `_`,
//!    matched case-insensitively)
//! 3. a Java-style properties document, from a local file or an
//!    `http(s)://` URL, looked up by the literal option name
//!
//! The first source with a value wins; options no source mentions keep their
//! defaults and are reported as not set.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: option names, raw values, the composite value grammars,
//!   value adapters, the option registry and errors
//! - **Ports**: the `ConfigSource` and `ConfigParser` traits
//! - **Adapters**: command-line, environment and properties sources
//! - **Service**: the resolver and the process bootstrap
//!
//! # Feature Flags
//!
//! - `remote`: load properties documents over HTTP(S) (default)
//!
//! # Quick Start
//!
//! ```rust
//! use flagcfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let mut host = String::new();
//! let mut tables = Vec::new();
//!
//! let properties = PropertiesAdapter::from_content("inline", "migrate.tables=jobs, audits")?;
//! let resolver = Resolver::builder()
//!     .with_cli_args(["-db.host=db1"])
//!     .with_environ(["APP_DB_HOST=ignored"], ["APP_"])
//!     .with_properties(properties)
//!     .build()?;
//!
//! let provenance = {
//!     let mut registry = OptionRegistry::new("demo");
//!     registry
//!         .string_var(&mut host, "db.host", "localhost", "Database host")
//!         .string_slice_var(&mut tables, "migrate.tables", vec![], "Tables to copy");
//!     resolver.resolve(&mut registry)?;
//!     registry.into_provenance()
//! };
//!
//! assert_eq!(host, "db1");
//! assert_eq!(tables, vec!["jobs", "audits"]);
//! assert_eq!(provenance.origin("db.host"), Some(&Origin::CommandLine));
//! # Ok(())
//! # }
//! ```
//!
//! For the bundled migration settings, [`service::bootstrap`] does all of
//! the above from the process arguments and environment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;
pub mod settings;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::adapters::{CommandLineAdapter, EnvVarAdapter, PropertiesAdapter};
    pub use crate::domain::{
        ConfigError, ConfigValue, Kv, OptionName, OptionRegistry, Origin, Provenance, Result,
        Value, ValueKind,
    };
    pub use crate::ports::{ConfigParser, ConfigSource};
    pub use crate::service::{bootstrap, Bootstrap, Loaded, Resolver};
    pub use crate::settings::Configuration;
}
