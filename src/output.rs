//! Output rendering
//!
//! The provisioning system reads a single YAML document from stdout,
//! introduced by a document-start marker.

use sha2::{Digest, Sha256};

use crate::classifier::Classification;

/// YAML document-start marker
pub const DOCUMENT_START: &str = "---\n";

/// Render the full classification, or only its data table.
///
/// The document ends with a single newline.
pub fn render(classification: &Classification, data_only: bool) -> Result<String, serde_yaml::Error> {
    let body = if data_only {
        serde_yaml::to_string(&classification.data)?
    } else {
        serde_yaml::to_string(classification)?
    };
    Ok(format!("{}{}", DOCUMENT_START, body))
}

/// SHA-256 digest of the rendered full classification
pub fn digest(classification: &Classification) -> Result<String, serde_yaml::Error> {
    let rendered = render(classification, false)?;

    let mut hasher = Sha256::new();
    hasher.update(rendered.as_bytes());
    Ok(format!("sha256:{}", hex::encode(hasher.finalize())))
}
