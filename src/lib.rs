//! classyfy - external node classifier
//!
//! Produces the classification (classes, data, parameters, environment) of a
//! node by resolving the graph of components its node entry implies. Components
//! are merged in post-order: implied components first, then the component
//! itself, so explicit settings beat inherited ones and later siblings beat
//! earlier ones.

pub mod classifier;
pub mod component;
pub mod error;
pub mod logging;
pub mod network;
pub mod nodes;
pub mod output;
pub mod resolve;

mod yaml;

pub use classifier::{classify, Classification, Classifier, ClassifierConfig, Explanation};
pub use classyfy_merge::{kind, Mapping, Value};
pub use component::{Component, ComponentError};
pub use error::{ClassifyError, StrictViolation};
pub use nodes::{Node, NodeSpec, NodeSpecError};
pub use resolve::{FailurePolicy, ResolutionResult, ResolutionTrace, Resolver, Visited};
