// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core types and logic.
//!
//! Option names, raw values, the composite value grammars, value adapters,
//! the option registry and error types. Nothing in here knows about the
//! command line, the environment or properties documents.

pub mod config_value;
pub mod errors;
pub mod kv;
pub mod option_name;
pub mod origin;
pub mod registry;
pub mod value;

// Re-export commonly used types
pub use config_value::ConfigValue;
pub use errors::{ConfigError, Result};
pub use kv::Kv;
pub use option_name::OptionName;
pub use origin::{Origin, Provenance};
pub use registry::{OptionDefinition, OptionRegistry};
pub use value::{Value, ValueKind};
