//! Classification errors

use classyfy_merge::MergeError;

use crate::component::ComponentError;
use crate::nodes::NodeSpecError;
use crate::resolve::Table;

/// A failure that the strict policy turns fatal.
///
/// Under the lenient policy the same conditions are logged and degraded.
#[derive(Debug, thiserror::Error)]
pub enum StrictViolation {
    #[error("Node '{0}' is not defined")]
    UnknownNode(String),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("Failed to merge {table} of component '{component}': {source}")]
    Merge {
        component: String,
        table: Table,
        #[source]
        source: MergeError,
    },
}

/// Errors returned by classification
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// The node specification could not be loaded; never policy-gated
    #[error(transparent)]
    NodeSpec(#[from] NodeSpecError),

    #[error("Strict mode: {0}")]
    StrictViolation(#[from] StrictViolation),
}
