//! Test fixtures for classification tests
//!
//! `test_data/nodes.yml` declares the nodes; components live under
//! `test_data/<environment>/`.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

/// Root of the fixture tree
pub fn test_data() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/test_data")
}

/// Path to the fixture node specification
pub fn nodes_file() -> PathBuf {
    test_data().join("nodes.yml")
}

/// Components base with the environment placeholder
pub fn components_base() -> String {
    format!("{}/%s", test_data().display())
}

/// A node specification path that does not exist
pub const BROKEN_NODES_FILE: &str = "__BROKEN__nodes.yml__";

/// A components base that does not exist
pub const BROKEN_COMPONENTS_BASE: &str = "__BROKEN__components_base__";
