// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing configuration source implementations.
//!
//! Each adapter implements the `ConfigSource` port for one place option
//! values can come from: the command line, the environment, or a properties
//! document.

pub mod cli;
pub mod env_var;
pub mod properties;

// Re-export commonly used types
pub use cli::CommandLineAdapter;
pub use env_var::EnvVarAdapter;
pub use properties::{is_remote, PropertiesAdapter, PropertiesParser, DEFAULT_REMOTE_TIMEOUT};
