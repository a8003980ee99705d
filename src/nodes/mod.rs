//! Node directory
//!
//! Parses the node specification file (`nodes.yml` by default). The file
//! declares a fallback node and a table of named nodes, each with an optional
//! environment and an ordered list of implied components.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::yaml::{is_blank_document, null_as_default};

/// A node entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Node {
    /// Environment name; empty means "inherit from the fallback node"
    #[serde(default, deserialize_with = "null_as_default")]
    pub environment: String,

    /// Implied components, in precedence order (later wins)
    #[serde(default, deserialize_with = "null_as_default")]
    pub implies: Vec<String>,
}

impl Node {
    /// This node's environment, or the fallback's when unset
    pub fn environment_or<'a>(&'a self, fallback: &'a Node) -> &'a str {
        if self.environment.is_empty() {
            &fallback.environment
        } else {
            &self.environment
        }
    }
}

/// Node specification document
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NodeSpec {
    /// Used for unknown nodes and as the default environment
    #[serde(default, alias = "defaults", deserialize_with = "nullable_node")]
    pub fallback: Node,

    /// Known nodes by exact host name
    #[serde(default, deserialize_with = "nullable_nodes")]
    pub nodes: BTreeMap<String, Node>,
}

fn nullable_node<'de, D>(deserializer: D) -> Result<Node, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Node>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_nodes<'de, D>(deserializer: D) -> Result<BTreeMap<String, Node>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let nodes: Option<BTreeMap<String, Option<Node>>> = Option::deserialize(deserializer)?;
    Ok(nodes
        .unwrap_or_default()
        .into_iter()
        .map(|(name, node)| (name, node.unwrap_or_default()))
        .collect())
}

/// Errors that can occur when loading the node specification
#[derive(Debug, thiserror::Error)]
pub enum NodeSpecError {
    #[error("Node specification not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read node specification {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse node specification {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl NodeSpec {
    /// Load the node specification from a file
    pub fn load(path: &Path) -> Result<Self, NodeSpecError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                NodeSpecError::NotFound(path.to_path_buf())
            } else {
                NodeSpecError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&content).map_err(|source| NodeSpecError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a node specification from a YAML string
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Get a node by exact, case-sensitive name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    /// Look up a node, substituting the fallback when it is unknown.
    ///
    /// The flag reports whether `name` was found.
    pub fn lookup(&self, name: &str) -> (&Node, bool) {
        match self.get(name) {
            Some(node) => (node, true),
            None => (&self.fallback, false),
        }
    }
}
