//! Override merge
//!
//! Merges a source mapping into a destination mapping:
//! - Keys absent from the destination: added
//! - Mappings on both sides: deep-merge by key (recursive)
//! - Null source values: ignored, the destination keeps its value
//! - Mapping against a non-mapping: conflict, destination kept
//! - Scalars and sequences: override (source wins, sequences are replaced)

use std::fmt;

use crate::value::{kind, Mapping, Value};

/// A key whose destination and source values cannot be combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Dotted key path from the root of the merged mapping
    pub path: String,
    /// Kind of value already present in the destination
    pub existing: &'static str,
    /// Kind of value offered by the source
    pub incoming: &'static str,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}': cannot merge {} into {}",
            self.path, self.incoming, self.existing
        )
    }
}

/// Merge failed for one or more keys.
///
/// Every key that did not conflict has still been applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", ConflictList(.conflicts))]
pub struct MergeError {
    pub conflicts: Vec<Conflict>,
}

struct ConflictList<'a>(&'a [Conflict]);

impl fmt::Display for ConflictList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} conflicting key(s)", self.0.len())?;
        for conflict in self.0 {
            write!(f, "; {}", conflict)?;
        }
        Ok(())
    }
}

/// Merge `src` into `dst` with override semantics.
pub fn merge(dst: &mut Mapping, src: Mapping) -> Result<(), MergeError> {
    let mut conflicts = Vec::new();
    merge_mapping(dst, src, "", &mut conflicts);
    if conflicts.is_empty() {
        Ok(())
    } else {
        Err(MergeError { conflicts })
    }
}

fn merge_mapping(dst: &mut Mapping, src: Mapping, prefix: &str, conflicts: &mut Vec<Conflict>) {
    for (key, incoming) in src {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match dst.get_mut(&key) {
            Some(existing) => merge_value(existing, incoming, path, conflicts),
            None => {
                dst.insert(key, incoming);
            }
        }
    }
}

fn merge_value(existing: &mut Value, incoming: Value, path: String, conflicts: &mut Vec<Conflict>) {
    match (existing, incoming) {
        // Null never erases what is already there
        (_, Value::Null) => {}

        (Value::Object(dst), Value::Object(src)) => merge_mapping(dst, src, &path, conflicts),

        (Value::Object(_), incoming) => conflicts.push(Conflict {
            path,
            existing: "mapping",
            incoming: kind(&incoming),
        }),

        (existing, Value::Object(_)) if !existing.is_null() => conflicts.push(Conflict {
            path,
            existing: kind(existing),
            incoming: "mapping",
        }),

        // Scalars and sequences: REPLACE
        (existing, incoming) => *existing = incoming,
    }
}
