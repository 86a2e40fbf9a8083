//! JSON-to-metric flattening.
//!
//! Walks a parsed document depth-first (pre-order) from the root marker `$`
//! and yields one `(path, f64)` pair per numeric leaf. Strings, booleans and
//! nulls are dropped: the metric model only stores numbers, and booleans are
//! deliberately *not* coerced to 0/1.
//!
//! Path grammar:
//! - object member whose key has no `.`: `<parent>.<key>`
//! - object member whose key contains `.`: `<parent>['<key>']`
//! - list element: `<parent>[<index>]` (zero-based)
//!
//! A `'` inside a bracketed key is not escaped, so adversarial keys such as
//! `a.']['b` can collide with a genuinely nested path.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::FlattenFault;

/// Root marker every path starts from.
pub const ROOT_PATH: &str = "$";

/// One numeric leaf.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatPair {
    pub path: String,
    pub value: f64,
}

/// Path of an object member below `parent`.
pub fn child_key_path(parent: &str, key: &str) -> String {
    if key.contains('.') {
        format!("{parent}['{key}']")
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of a list element below `parent`.
pub fn child_index_path(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Lazy, one-shot iterator over the numeric leaves of a document.
///
/// Uses an explicit stack instead of recursion, so deeply nested input costs
/// heap, not call stack.
pub struct Flatten<'a> {
    stack: Vec<(String, &'a Value)>,
}

/// Start flattening `value`. Nothing is walked until the iterator is polled.
pub fn flatten(value: &Value) -> Flatten<'_> {
    Flatten {
        stack: vec![(ROOT_PATH.to_string(), value)],
    }
}

/// Flatten eagerly into a path-keyed map.
pub fn flatten_to_map(value: &Value) -> Result<BTreeMap<String, f64>, FlattenFault> {
    flatten(value)
        .map(|r| r.map(|p| (p.path, p.value)))
        .collect()
}

impl<'a> Iterator for Flatten<'a> {
    type Item = Result<FlatPair, FlattenFault>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((path, value)) = self.stack.pop() {
            match value {
                Value::Number(n) => {
                    // Only `arbitrary_precision` numbers can refuse; treat as a defect.
                    return Some(match n.as_f64() {
                        Some(v) => Ok(FlatPair { path, value: v }),
                        None => Err(FlattenFault { path }),
                    });
                }
                Value::Null | Value::Bool(_) | Value::String(_) => continue,
                Value::Object(map) => {
                    // Reverse push keeps the walk in the map's own order.
                    for (k, v) in map.iter().rev() {
                        self.stack.push((child_key_path(&path, k), v));
                    }
                }
                Value::Array(items) => {
                    for (i, v) in items.iter().enumerate().rev() {
                        self.stack.push((child_index_path(&path, i), v));
                    }
                }
            }
        }
        None
    }
}
