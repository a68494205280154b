// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer: option resolution and process bootstrap.
//!
//! The resolver drives an option registry against its sources; bootstrap
//! wires the resolver to the process arguments, environment and `-cfg`
//! document.

pub mod bootstrap;
pub mod resolver;

// Re-export commonly used types
pub use bootstrap::{
    bootstrap, extract_config_path, load_provider, strip_bootstrap_args, version_requested,
    Bootstrap, Loaded,
};
pub use resolver::{resolve, Resolver, ResolverBuilder};
