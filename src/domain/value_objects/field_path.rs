use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::errors::DomainError;

/// Dotted path into a document (e.g., "price", "_id.decade")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FieldPath {
    raw: String,
    segments: Vec<String>,
}

impl FieldPath {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidFieldPath(
                "Field path cannot be empty".to_string(),
            ));
        }

        let segments: Vec<String> = value.split('.').map(|s| s.to_string()).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(DomainError::InvalidFieldPath(format!(
                "Field path has an empty segment: {}",
                value
            )));
        }

        if segments.iter().any(|s| s.starts_with('$')) {
            return Err(DomainError::InvalidFieldPath(format!(
                "Field path segments cannot start with '$': {}",
                value
            )));
        }

        Ok(Self {
            raw: value.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path through nested objects. Returns None when any segment
    /// is absent or an intermediate value is not an object.
    pub fn resolve<'a>(&self, document: &'a Value) -> Option<&'a Value> {
        let mut current = document;
        for segment in &self.segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Whether this path addresses the document id.
    pub fn is_id(&self) -> bool {
        self.segments.len() == 1 && self.segments[0] == "_id"
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl std::str::FromStr for FieldPath {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.raw
    }
}
