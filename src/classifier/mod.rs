//! Classifier - produces the classification of one node
//!
//! Loads the node specification, picks the node (or the fallback), derives
//! the environment and the components tree for it, and resolves the node's
//! implications into a single [`Classification`].

mod explain;

pub use explain::Explanation;

use std::path::{Path, PathBuf};

use classyfy_merge::Mapping;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ClassifyError, StrictViolation};
use crate::nodes::NodeSpec;
use crate::resolve::{self, FailurePolicy};

/// Default node specification path
pub const DEFAULT_NODES_FILE: &str = "nodes.yml";

/// Default components base
pub const DEFAULT_COMPONENTS_BASE: &str = "production";

/// Replaced by the node's environment in the components base
pub const ENVIRONMENT_PLACEHOLDER: &str = "%s";

/// The final classification handed to the provisioning system
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub classes: Mapping,
    pub data: Mapping,
    pub parameters: Mapping,
    pub environment: String,
}

/// Where node and component documents live, and how failures are handled
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    pub nodes_file: PathBuf,
    /// May contain [`ENVIRONMENT_PLACEHOLDER`]
    pub components_base: String,
    pub policy: FailurePolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            nodes_file: PathBuf::from(DEFAULT_NODES_FILE),
            components_base: DEFAULT_COMPONENTS_BASE.to_string(),
            policy: FailurePolicy::Lenient,
        }
    }
}

/// The classifier. Holds no state between calls.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a node
    pub fn classify(&self, node_name: &str) -> Result<Classification, ClassifyError> {
        self.explain(node_name).map(|(classification, _)| classification)
    }

    /// Classify a node and report how the classification was reached
    pub fn explain(&self, node_name: &str) -> Result<(Classification, Explanation), ClassifyError> {
        let policy = self.config.policy;
        let spec = NodeSpec::load(&self.config.nodes_file)?;

        let (node, node_known) = spec.lookup(node_name);
        if !node_known {
            if policy.is_strict() {
                return Err(StrictViolation::UnknownNode(node_name.to_string()).into());
            }
            warn!(node = %node_name, "Node is not known, falling back");
        }

        let environment = node.environment_or(&spec.fallback).to_string();
        let components_base = components_base_for(&self.config.components_base, &environment);
        debug!(
            node = %node_name,
            environment = %environment,
            components_base = %components_base.display(),
            "Resolving node"
        );

        let (result, trace) = resolve::resolve(&node.implies, &components_base, policy)?;

        let classification = Classification {
            classes: result.classes,
            data: result.data,
            parameters: result.parameters,
            environment: environment.clone(),
        };
        let explanation = Explanation {
            node: node_name.to_string(),
            node_known,
            environment,
            components_base,
            policy,
            trace,
            addresses: Vec::new(),
            digest: None,
        };
        Ok((classification, explanation))
    }
}

/// Components base for an environment.
///
/// Every placeholder occurrence is replaced; a base without one is used as is.
pub fn components_base_for(template: &str, environment: &str) -> PathBuf {
    if template.contains(ENVIRONMENT_PLACEHOLDER) {
        PathBuf::from(template.replace(ENVIRONMENT_PLACEHOLDER, environment))
    } else {
        PathBuf::from(template)
    }
}

/// Classify `node_name` in one call
pub fn classify(
    node_name: &str,
    nodes_file: &Path,
    components_base: &str,
    strict: bool,
) -> Result<Classification, ClassifyError> {
    Classifier::new(ClassifierConfig {
        nodes_file: nodes_file.to_path_buf(),
        components_base: components_base.to_string(),
        policy: FailurePolicy::from_strict(strict),
    })
    .classify(node_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components_base_substitution() {
        assert_eq!(
            components_base_for("/etc/enc/%s/components", "staging"),
            PathBuf::from("/etc/enc/staging/components")
        );
        assert_eq!(
            components_base_for("production", "staging"),
            PathBuf::from("production")
        );
    }

    #[test]
    fn test_default_config() {
        let config = ClassifierConfig::default();
        assert_eq!(config.nodes_file, PathBuf::from("nodes.yml"));
        assert_eq!(config.components_base, "production");
        assert!(!config.policy.is_strict());
    }

    #[test]
    fn test_missing_node_spec_is_fatal_in_both_policies() {
        for strict in [false, true] {
            let err = classify(
                "unknown",
                Path::new("__BROKEN__nodes.yml__"),
                "__BROKEN__components_base__",
                strict,
            )
            .unwrap_err();
            assert!(matches!(err, ClassifyError::NodeSpec(_)));
        }
    }
}
