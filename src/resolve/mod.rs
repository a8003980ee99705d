//! Resolution engine
//!
//! Walks the implication graph depth-first. A component's implied components
//! are merged before the component itself (post-order), so its own settings
//! override anything it inherits, and later siblings override earlier ones.
//! A visited set makes every component contribute at most once, which also
//! terminates cycles.

mod trace;

pub use trace::{ResolutionTrace, SkippedComponent, TableConflict};

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use classyfy_merge::{merge, Mapping, MergeError};
use tracing::{debug, warn};

use crate::component::{self, normalize_name, Component};
use crate::error::StrictViolation;

/// How policy-gated failures are handled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Unknown nodes, unloadable components and merge conflicts abort
    Strict,
    /// Failures are logged and the offending contribution is skipped
    #[default]
    Lenient,
}

impl FailurePolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }

    pub fn is_strict(self) -> bool {
        self == FailurePolicy::Strict
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Strict => write!(f, "strict"),
            FailurePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

/// One of the three merged tables of a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Classes,
    Data,
    Parameters,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Table::Classes => write!(f, "classes"),
            Table::Data => write!(f, "data"),
            Table::Parameters => write!(f, "parameters"),
        }
    }
}

/// Accumulated classes, data and parameters of one resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult {
    pub classes: Mapping,
    pub data: Mapping,
    pub parameters: Mapping,
}

impl ResolutionResult {
    fn table_mut(&mut self, table: Table) -> &mut Mapping {
        match table {
            Table::Classes => &mut self.classes,
            Table::Data => &mut self.data,
            Table::Parameters => &mut self.parameters,
        }
    }
}

/// Component names already seen in one resolution (normalized)
#[derive(Debug, Clone, Default)]
pub struct Visited(HashSet<String>);

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a component as visited. Returns false if it already was.
    pub fn insert(&mut self, name: &str) -> bool {
        self.0.insert(normalize_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(&normalize_name(name))
    }
}

/// Resolves implication lists against one components tree
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    components_base: &'a Path,
    policy: FailurePolicy,
}

impl<'a> Resolver<'a> {
    pub fn new(components_base: &'a Path, policy: FailurePolicy) -> Self {
        Self {
            components_base,
            policy,
        }
    }

    /// Resolve `implies` into `result`, in declared order.
    ///
    /// `result`, `visited` and `trace` belong to a single resolution and are
    /// threaded through every recursive call.
    pub fn resolve(
        &self,
        result: &mut ResolutionResult,
        implies: &[String],
        visited: &mut Visited,
        trace: &mut ResolutionTrace,
    ) -> Result<(), StrictViolation> {
        for implication in implies {
            let name = normalize_name(implication);
            // Marked before recursing so a cycle back to it is skipped
            if !visited.insert(&name) {
                continue;
            }

            debug!(component = %name, "Loading component");
            let component = match component::load(&name, self.components_base) {
                Ok(component) => component,
                Err(err) => {
                    if self.policy.is_strict() {
                        return Err(StrictViolation::Component(err));
                    }
                    warn!(component = %name, error = %err, "Skipping component");
                    trace.skipped.push(SkippedComponent {
                        name,
                        reason: err.to_string(),
                    });
                    continue;
                }
            };

            self.resolve(result, &component.implies, visited, trace)?;
            self.merge_component(result, component, trace)?;
        }
        Ok(())
    }

    fn merge_component(
        &self,
        result: &mut ResolutionResult,
        component: Component,
        trace: &mut ResolutionTrace,
    ) -> Result<(), StrictViolation> {
        let Component {
            name,
            classes,
            data,
            parameters,
            ..
        } = component;

        let tables = [
            (Table::Classes, classes),
            (Table::Data, data),
            (Table::Parameters, parameters),
        ];
        for (table, source) in tables {
            if let Err(err) = merge(result.table_mut(table), source) {
                self.merge_failed(&name, table, err, trace)?;
            }
        }

        debug!(component = %name, "Merged component");
        trace.merged.push(name);
        Ok(())
    }

    fn merge_failed(
        &self,
        component: &str,
        table: Table,
        err: MergeError,
        trace: &mut ResolutionTrace,
    ) -> Result<(), StrictViolation> {
        if self.policy.is_strict() {
            return Err(StrictViolation::Merge {
                component: component.to_string(),
                table,
                source: err,
            });
        }
        warn!(component = %component, %table, error = %err, "Failed to merge");
        trace.conflicts.push(TableConflict {
            component: component.to_string(),
            table,
            conflicts: err.conflicts,
        });
        Ok(())
    }
}

/// Resolve `implies` from scratch with a fresh accumulator and visited set.
pub fn resolve(
    implies: &[String],
    components_base: &Path,
    policy: FailurePolicy,
) -> Result<(ResolutionResult, ResolutionTrace), StrictViolation> {
    let mut result = ResolutionResult::default();
    let mut visited = Visited::new();
    let mut trace = ResolutionTrace::default();
    Resolver::new(components_base, policy).resolve(&mut result, implies, &mut visited, &mut trace)?;
    Ok((result, trace))
}
