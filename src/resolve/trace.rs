//! Record of what a resolution did

use classyfy_merge::Conflict;

use super::Table;

/// A component that contributed nothing because it failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedComponent {
    pub name: String,
    pub reason: String,
}

/// Keys of one component table that could not be merged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConflict {
    pub component: String,
    pub table: Table,
    pub conflicts: Vec<Conflict>,
}

/// Ordered log of a single resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionTrace {
    /// Components in the order they were merged (post-order)
    pub merged: Vec<String>,
    /// Components skipped under the lenient policy
    pub skipped: Vec<SkippedComponent>,
    /// Merge conflicts tolerated under the lenient policy
    pub conflicts: Vec<TableConflict>,
}

impl ResolutionTrace {
    /// True when nothing was skipped and nothing conflicted
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.conflicts.is_empty()
    }
}
