// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text grammars for the composite option types.
//!
//! - KV: `k1=v1;k2=v2;...`; a bare `key` means an empty value. Keys are
//!   trimmed, values are kept as written.
//! - KV slice: KV segments separated by `,`.
//! - String slice: items separated by `,`, trimmed, empty items dropped.
//!
//! None of these grammars can fail. Odd tokens degrade to empty values.

use std::collections::BTreeMap;

/// A single key/value map. Iteration order is the canonical (sorted) order.
pub type Kv = BTreeMap<String, String>;

/// Parses `k1=v1;k2=v2` into a map.
///
/// Tokens that are empty or whitespace-only are skipped, so `""` parses to an
/// empty map and a trailing `;` is harmless.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::kv::{format_kv, parse_kv};
///
/// let kv = parse_kv("b=2;a=1;flag");
/// assert_eq!(kv["a"], "1");
/// assert_eq!(kv["flag"], "");
/// assert_eq!(format_kv(&kv), "a=1;b=2;flag=");
/// ```
pub fn parse_kv(s: &str) -> Kv {
    let mut kv = Kv::new();
    for token in s.split(';') {
        if token.trim().is_empty() {
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) => kv.insert(key.trim().to_string(), value.to_string()),
            None => kv.insert(token.trim().to_string(), String::new()),
        };
    }
    kv
}

/// Renders a map in canonical form: sorted keys, `key=value` joined by `;`.
pub fn format_kv(kv: &Kv) -> String {
    kv.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(";")
}

/// Parses `,`-separated KV segments.
///
/// Every segment yields one map, so empty input yields a single empty map.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::kv::parse_kv_slice;
///
/// assert_eq!(parse_kv_slice("").len(), 1);
/// assert_eq!(parse_kv_slice("a=1,b=2;c=3").len(), 2);
/// ```
pub fn parse_kv_slice(s: &str) -> Vec<Kv> {
    s.split(',').map(parse_kv).collect()
}

/// Renders each map in canonical form, joined by `,`.
pub fn format_kv_slice(slice: &[Kv]) -> String {
    slice.iter().map(format_kv).collect::<Vec<_>>().join(",")
}

/// Parses a `,`-separated list, trimming items and dropping empty ones.
///
/// # Examples
///
/// ```
/// use flagcfg::domain::kv::parse_string_slice;
///
/// assert_eq!(parse_string_slice(" a , ,b"), vec!["a", "b"]);
/// assert!(parse_string_slice("").is_empty());
/// ```
pub fn parse_string_slice(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders a string list joined by `,`.
pub fn format_string_slice(items: &[String]) -> String {
    items.join(",")
}
