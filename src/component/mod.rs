//! Component loader
//!
//! A component is a reusable bundle of classes, data and parameters stored
//! as one YAML file under the components base. Names are case-insensitive and
//! may be hierarchical: `Debian/Backports` lives at `debian/backports.yml`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use classyfy_merge::{kind, Mapping, Value};
use serde::Deserialize;

use crate::yaml::{is_blank_document, null_as_default};

/// File extension of component documents
pub const COMPONENT_EXTENSION: &str = "yml";

/// Errors that can occur when loading a component
#[derive(Debug, thiserror::Error)]
pub enum ComponentError {
    #[error("Invalid component name '{0}'")]
    InvalidName(String),

    #[error("Component '{name}' not found at {}", .path.display())]
    NotFound { name: String, path: PathBuf },

    #[error("Failed to read component '{name}' from {}: {source}", .path.display())]
    Io {
        name: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse component '{name}': {source}")]
    Parse {
        name: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Malformed component '{name}': {reason}")]
    Malformed { name: String, reason: String },
}

impl ComponentError {
    /// Name of the component that failed to load
    pub fn name(&self) -> &str {
        match self {
            ComponentError::InvalidName(name)
            | ComponentError::NotFound { name, .. }
            | ComponentError::Io { name, .. }
            | ComponentError::Parse { name, .. }
            | ComponentError::Malformed { name, .. } => name,
        }
    }

    /// True for a storage miss, false for unreadable or malformed content
    pub fn is_not_found(&self) -> bool {
        matches!(self, ComponentError::NotFound { .. })
    }
}

/// A loaded, normalized component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Component {
    /// Normalized (lowercase) name
    pub name: String,
    /// Class name -> class settings. Every class has a mapping body.
    pub classes: Mapping,
    pub data: Mapping,
    pub parameters: Mapping,
    /// Components this one pulls in, in declared order
    pub implies: Vec<String>,
}

/// On-disk shape of a component document
#[derive(Debug, Default, Deserialize)]
struct ComponentDocument {
    #[serde(default)]
    classes: Value,
    #[serde(default)]
    data: Value,
    #[serde(default)]
    parameters: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    implies: Vec<String>,
}

/// Canonical form of a component name.
///
/// Every place that compares or locates components goes through this.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Location of a component's document under `base`
pub fn component_path(base: &Path, name: &str) -> Result<PathBuf, ComponentError> {
    let normalized = normalize_name(name);
    let segments: Vec<&str> = normalized.split('/').collect();

    if segments
        .iter()
        .any(|s| s.is_empty() || *s == "." || *s == "..")
    {
        return Err(ComponentError::InvalidName(name.to_string()));
    }

    let Some((file, dirs)) = segments.split_last() else {
        return Err(ComponentError::InvalidName(name.to_string()));
    };

    let mut path = base.to_path_buf();
    path.extend(dirs);
    path.push(format!("{}.{}", file, COMPONENT_EXTENSION));
    Ok(path)
}

/// Load a component by name from the components base.
///
/// Every call reads storage; nothing is cached between calls.
pub fn load(name: &str, base: &Path) -> Result<Component, ComponentError> {
    let path = component_path(base, name)?;
    let name = normalize_name(name);

    let contents = fs::read_to_string(&path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ComponentError::NotFound {
                name: name.clone(),
                path: path.clone(),
            }
        } else {
            ComponentError::Io {
                name: name.clone(),
                path: path.clone(),
                source,
            }
        }
    })?;

    Component::parse(&name, &contents)
}

impl Component {
    /// Parse and normalize a component document
    pub fn parse(name: &str, contents: &str) -> Result<Self, ComponentError> {
        let name = normalize_name(name);

        if is_blank_document(contents) {
            return Ok(Self {
                name,
                ..Self::default()
            });
        }

        let document: ComponentDocument =
            serde_yaml::from_str(contents).map_err(|source| ComponentError::Parse {
                name: name.clone(),
                source,
            })?;

        let classes = table(&name, "classes", document.classes)?
            .into_iter()
            .map(|(class, body)| match body {
                Value::Null => Ok((class, Value::Object(Mapping::new()))),
                body @ Value::Object(_) => Ok((class, body)),
                other => Err(ComponentError::Malformed {
                    name: name.clone(),
                    reason: format!("class '{}' must be a mapping, found {}", class, kind(&other)),
                }),
            })
            .collect::<Result<Mapping, _>>()?;

        let data = table(&name, "data", document.data)?;
        let parameters = table(&name, "parameters", document.parameters)?;

        Ok(Self {
            name,
            classes,
            data,
            parameters,
            implies: document.implies,
        })
    }
}

fn table(name: &str, section: &str, value: Value) -> Result<Mapping, ComponentError> {
    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Object(m) => Ok(m),
        other => Err(ComponentError::Malformed {
            name: name.to_string(),
            reason: format!("'{}' must be a mapping, found {}", section, kind(&other)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, contents: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_component_path_flat() {
        let path = component_path(Path::new("production"), "Base").unwrap();
        assert_eq!(path, PathBuf::from("production/base.yml"));
    }

    #[test]
    fn test_component_path_hierarchical() {
        let path = component_path(Path::new("/srv/enc"), "Debian/BackPorts").unwrap();
        assert_eq!(path, PathBuf::from("/srv/enc/debian/backports.yml"));
    }

    #[test]
    fn test_normalize_only_folds_case() {
        assert_eq!(normalize_name("Debian/BackPorts"), "debian/backports");
        assert_eq!(normalize_name(" Base"), " base");
        assert_ne!(
            component_path(Path::new("production"), " base").unwrap(),
            component_path(Path::new("production"), "base").unwrap()
        );
    }

    #[test]
    fn test_component_path_rejects_traversal() {
        for name in ["", "a//b", "../secrets", "a/./b", "trailing/"] {
            let err = component_path(Path::new("production"), name).unwrap_err();
            assert!(
                matches!(err, ComponentError::InvalidName(_)),
                "expected InvalidName for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_parse_normalizes_class_bodies() {
        let component = Component::parse(
            "Web",
            "classes:\n  nginx:\n  ntp:\n    servers: [a, b]\nimplies: [base]\n",
        )
        .unwrap();

        assert_eq!(component.name, "web");
        assert_eq!(component.classes["nginx"], Value::Object(Mapping::new()));
        assert!(component.classes["ntp"].as_object().unwrap().contains_key("servers"));
        assert!(component.data.is_empty());
        assert!(component.parameters.is_empty());
        assert_eq!(component.implies, vec!["base".to_string()]);
    }

    #[test]
    fn test_parse_null_sections() {
        let component = Component::parse("x", "classes:\ndata: ~\nparameters:\nimplies:\n").unwrap();

        assert!(component.classes.is_empty());
        assert!(component.data.is_empty());
        assert!(component.parameters.is_empty());
        assert!(component.implies.is_empty());
    }

    #[test]
    fn test_parse_blank_document() {
        let component = Component::parse("empty", "---\n# placeholder\n").unwrap();
        assert_eq!(
            component,
            Component {
                name: "empty".to_string(),
                ..Component::default()
            }
        );
    }

    #[test]
    fn test_parse_rejects_non_mapping_class() {
        let err = Component::parse("bad", "classes:\n  apt: yes-please\n").unwrap_err();
        assert!(matches!(err, ComponentError::Malformed { .. }));
        assert!(err.to_string().contains("class 'apt'"));
    }

    #[test]
    fn test_parse_rejects_non_mapping_table() {
        let err = Component::parse("bad", "data: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ComponentError::Malformed { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = Component::parse("bad", "classes: {apt: [\n").unwrap_err();
        assert!(matches!(err, ComponentError::Parse { .. }));
        assert_eq!(err.name(), "bad");
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "role/db.yml",
            "parameters:\n  engine: postgres\n",
        );

        let component = load("Role/DB", dir.path()).unwrap();
        assert_eq!(component.name, "role/db");
        assert_eq!(component.parameters["engine"], Value::from("postgres"));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = load("nope", dir.path()).unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.name(), "nope");
    }

    #[test]
    fn test_load_reads_fresh_each_time() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "base.yml", "data:\n  v: 1\n");
        assert_eq!(load("base", dir.path()).unwrap().data["v"], Value::from(1));

        write(dir.path(), "base.yml", "data:\n  v: 2\n");
        assert_eq!(load("base", dir.path()).unwrap().data["v"], Value::from(2));
    }
}
