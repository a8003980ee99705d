//! Explain output for a classification
//!
//! Renders how a classification was reached as YAML comment lines, so the
//! explanation can precede the document on stdout without changing it.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::resolve::{FailurePolicy, ResolutionTrace};

/// How a classification was produced
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Requested node name
    pub node: String,
    /// False when the fallback node was substituted
    pub node_known: bool,
    pub environment: String,
    /// Components base after environment substitution
    pub components_base: PathBuf,
    pub policy: FailurePolicy,
    pub trace: ResolutionTrace,
    /// Addresses the node name resolved to (informational only)
    pub addresses: Vec<IpAddr>,
    /// Digest of the rendered classification
    pub digest: Option<String>,
}

impl Explanation {
    /// Render as `#` comment lines, one fact per line
    pub fn to_comments(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("node: {}", self.node));
        if !self.node_known {
            lines.push("node unknown, fallback used".to_string());
        }
        lines.push(format!("environment: {}", self.environment));
        lines.push(format!("components base: {}", self.components_base.display()));
        lines.push(format!("policy: {}", self.policy));

        if !self.addresses.is_empty() {
            let addresses: Vec<String> = self.addresses.iter().map(|a| a.to_string()).collect();
            lines.push(format!("addresses: {}", addresses.join(", ")));
        }

        for name in &self.trace.merged {
            lines.push(format!("component: {}", name));
        }
        for skipped in &self.trace.skipped {
            lines.push(format!("skipped: {} ({})", skipped.name, skipped.reason));
        }
        for conflict in &self.trace.conflicts {
            for detail in &conflict.conflicts {
                lines.push(format!(
                    "conflict: {} {} {}",
                    conflict.component, conflict.table, detail
                ));
            }
        }

        if let Some(ref digest) = self.digest {
            lines.push(format!("digest: {}", digest));
        }

        lines
            .iter()
            .map(|line| format!("# {}\n", line.replace('\n', " ")))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::{SkippedComponent, TableConflict, Table};
    use classyfy_merge::Conflict;

    fn explanation() -> Explanation {
        Explanation {
            node: "web01".to_string(),
            node_known: true,
            environment: "production".to_string(),
            components_base: PathBuf::from("/srv/enc/production"),
            policy: FailurePolicy::Lenient,
            trace: ResolutionTrace {
                merged: vec!["base".to_string(), "role/web".to_string()],
                skipped: vec![SkippedComponent {
                    name: "ghost".to_string(),
                    reason: "not found".to_string(),
                }],
                conflicts: vec![TableConflict {
                    component: "role/web".to_string(),
                    table: Table::Classes,
                    conflicts: vec![Conflict {
                        path: "apt.repos".to_string(),
                        existing: "mapping",
                        incoming: "string",
                    }],
                }],
            },
            addresses: vec!["10.0.0.5".parse().unwrap()],
            digest: Some("sha256:abc".to_string()),
        }
    }

    #[test]
    fn test_every_line_is_a_comment() {
        let rendered = explanation().to_comments();
        assert!(rendered.lines().all(|l| l.starts_with("# ")));
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_lines_in_order() {
        let rendered = explanation().to_comments();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec![
                "# node: web01",
                "# environment: production",
                "# components base: /srv/enc/production",
                "# policy: lenient",
                "# addresses: 10.0.0.5",
                "# component: base",
                "# component: role/web",
                "# skipped: ghost (not found)",
                "# conflict: role/web classes 'apt.repos': cannot merge string into mapping",
                "# digest: sha256:abc",
            ]
        );
    }

    #[test]
    fn test_fallback_noted() {
        let mut explanation = explanation();
        explanation.node_known = false;
        assert!(explanation
            .to_comments()
            .contains("# node unknown, fallback used\n"));
    }
}
