// SPDX-License-Identifier: MIT OR Apache-2.0

//! Value adapters: typed destinations behind a uniform text interface.
//!
//! An adapter borrows a field of the configuration struct for the duration of
//! resolution. `set` parses raw text into the field, replacing whatever was
//! there; `render` writes the field back out in the grammar `set` accepts.

use crate::domain::errors::Result;
use crate::domain::kv::{self, Kv};
use crate::domain::ConfigValue;
use std::fmt::{self, Display};
use std::str::FromStr;

/// The closed set of value shapes an option can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// A boolean switch; accepted on the command line without a value.
    Bool,
    /// Any other `FromStr` type; carries the short type name.
    Scalar(&'static str),
    /// `k1=v1;k2=v2`
    Kv,
    /// `k1=v1;k2=v2,k3=v3`
    KvSlice,
    /// `a,b,c`
    StringSlice,
}

impl ValueKind {
    /// Returns true if the option needs an argument on the command line.
    pub fn takes_argument(&self) -> bool {
        !matches!(self, ValueKind::Bool)
    }

    /// Placeholder used for the value in usage text.
    pub fn value_name(&self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Scalar(name) => name,
            ValueKind::Kv => "k=v;...",
            ValueKind::KvSlice => "k=v;...,...",
            ValueKind::StringSlice => "a,b,...",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value_name())
    }
}

/// A typed destination that can be set from text and rendered back to text.
///
/// Rendering a value produced by `set` and setting it again yields an equal
/// value.
pub trait Value {
    /// Parses `raw` and stores the result, fully replacing the old contents.
    ///
    /// `key` is the option name, used for error context.
    fn set(&mut self, key: &str, raw: &ConfigValue) -> Result<()>;

    /// Renders the current value in the grammar `set` accepts.
    fn render(&self) -> String;

    /// The shape of this value.
    fn kind(&self) -> ValueKind;
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Adapter for any `FromStr + Display` field: strings, integers, floats, addresses.
pub struct ScalarValue<'a, T>(&'a mut T);

impl<'a, T> ScalarValue<'a, T> {
    /// Binds `dest` and writes `default` into it.
    pub fn new(dest: &'a mut T, default: T) -> Self {
        *dest = default;
        ScalarValue(dest)
    }
}

impl<T> Value for ScalarValue<'_, T>
where
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fn set(&mut self, key: &str, raw: &ConfigValue) -> Result<()> {
        *self.0 = raw.parse(key)?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Scalar(short_type_name::<T>())
    }
}

/// Adapter for boolean switches.
pub struct BoolValue<'a>(&'a mut bool);

impl<'a> BoolValue<'a> {
    /// Binds `dest` and writes `default` into it.
    pub fn new(dest: &'a mut bool, default: bool) -> Self {
        *dest = default;
        BoolValue(dest)
    }
}

impl Value for BoolValue<'_> {
    fn set(&mut self, key: &str, raw: &ConfigValue) -> Result<()> {
        *self.0 = raw.as_bool(key)?;
        Ok(())
    }

    fn render(&self) -> String {
        self.0.to_string()
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Bool
    }
}

/// Adapter for a single key/value map.
pub struct KvValue<'a>(&'a mut Kv);

impl<'a> KvValue<'a> {
    /// Binds `dest` and writes `default` into it.
    pub fn new(dest: &'a mut Kv, default: Kv) -> Self {
        *dest = default;
        KvValue(dest)
    }
}

impl Value for KvValue<'_> {
    fn set(&mut self, _key: &str, raw: &ConfigValue) -> Result<()> {
        *self.0 = raw.as_kv();
        Ok(())
    }

    fn render(&self) -> String {
        kv::format_kv(self.0)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::Kv
    }
}

/// Adapter for a list of key/value maps.
pub struct KvSliceValue<'a>(&'a mut Vec<Kv>);

impl<'a> KvSliceValue<'a> {
    /// Binds `dest` and writes `default` into it.
    pub fn new(dest: &'a mut Vec<Kv>, default: Vec<Kv>) -> Self {
        *dest = default;
        KvSliceValue(dest)
    }
}

impl Value for KvSliceValue<'_> {
    fn set(&mut self, _key: &str, raw: &ConfigValue) -> Result<()> {
        *self.0 = raw.as_kv_slice();
        Ok(())
    }

    fn render(&self) -> String {
        kv::format_kv_slice(self.0)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::KvSlice
    }
}

/// Adapter for a trimmed list of strings.
pub struct StringSliceValue<'a>(&'a mut Vec<String>);

impl<'a> StringSliceValue<'a> {
    /// Binds `dest` and writes `default` into it.
    pub fn new(dest: &'a mut Vec<String>, default: Vec<String>) -> Self {
        *dest = default;
        StringSliceValue(dest)
    }
}

impl Value for StringSliceValue<'_> {
    fn set(&mut self, _key: &str, raw: &ConfigValue) -> Result<()> {
        *self.0 = raw.as_string_slice();
        Ok(())
    }

    fn render(&self) -> String {
        kv::format_string_slice(self.0)
    }

    fn kind(&self) -> ValueKind {
        ValueKind::StringSlice
    }
}
