//! Analyzer response types: AnalyzeReport and ActionDescriptor.
//!
//! These match the JSON returned by `POST /api/analyze` and deserialize
//! directly from the response body.

use serde::{Deserialize, Serialize};

/// Full analyzer reply for one file name.
///
/// Only `actions` is required; older servers send nothing else.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzeReport {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub actions: Vec<ActionDescriptor>,
}

/// A single operation the server suggests for the current file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: String,
    pub name: String,
    /// Coarse grouping ("convert", "extract", ...). Informational only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ActionDescriptor {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind: None,
        }
    }
}
