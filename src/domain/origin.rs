// SPDX-License-Identifier: MIT OR Apache-2.0

//! Where a resolved option value came from.

use crate::domain::OptionName;
use std::collections::HashMap;
use std::fmt;

/// The source that supplied an option's value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Given explicitly on the command line.
    CommandLine,
    /// Matched an environment variable.
    Environment {
        /// The variable name as it appeared in the environment
        variable: String,
    },
    /// Found in the properties document.
    Properties {
        /// The file path or URL of the document
        location: String,
    },
    /// Supplied by a custom source.
    Source {
        /// The source's name
        name: String,
    },
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::CommandLine => f.write_str("command line"),
            Origin::Environment { variable } => write!(f, "environment ({})", variable),
            Origin::Properties { location } => write!(f, "properties ({})", location),
            Origin::Source { name } => write!(f, "source '{}'", name),
        }
    }
}

/// Which options were explicitly set, and by whom.
///
/// Produced by [`OptionRegistry::into_provenance`](crate::domain::OptionRegistry::into_provenance)
/// once resolution is done, so it can outlive the registry's borrows of the
/// configuration struct.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    origins: HashMap<OptionName, Origin>,
}

impl Provenance {
    pub(crate) fn new(origins: HashMap<OptionName, Origin>) -> Self {
        Self { origins }
    }

    /// Returns true if any source supplied a value for `name`.
    ///
    /// Unknown names and options left at their default return false.
    pub fn is_set(&self, name: &str) -> bool {
        self.origins.contains_key(name)
    }

    /// Returns the source that supplied `name`, if any did.
    pub fn origin(&self, name: &str) -> Option<&Origin> {
        self.origins.get(name)
    }

    /// Number of explicitly set options.
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Returns true if no option was explicitly set.
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }

    /// Iterates explicitly set options in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&OptionName, &Origin)> {
        let mut entries: Vec<_> = self.origins.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries.into_iter()
    }
}
