use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{FieldPath, SortOrder};

/// Declared index over one or more fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    keys: Vec<(FieldPath, SortOrder)>,
    unique: bool,
}

impl IndexSpec {
    const MAX_KEYS: usize = 8;

    pub fn new(keys: Vec<(FieldPath, SortOrder)>, unique: bool) -> Result<Self, DomainError> {
        if keys.is_empty() {
            return Err(DomainError::InvalidIndexSpec(
                "Index must have at least one key".to_string(),
            ));
        }

        if keys.len() > Self::MAX_KEYS {
            return Err(DomainError::InvalidIndexSpec(format!(
                "Index has too many keys: {} > {}",
                keys.len(),
                Self::MAX_KEYS
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for (path, _) in &keys {
            if !seen.insert(path.as_str()) {
                return Err(DomainError::InvalidIndexSpec(format!(
                    "Duplicate index key: {}",
                    path
                )));
            }
        }

        Ok(Self { keys, unique })
    }

    pub fn keys(&self) -> &[(FieldPath, SortOrder)] {
        &self.keys
    }

    pub fn leading_key(&self) -> &FieldPath {
        // Constructor guarantees at least one key
        &self.keys[0].0
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    /// Derived name, e.g. "author_1_published_year_-1"
    pub fn derived_name(&self) -> String {
        self.keys
            .iter()
            .map(|(path, order)| format!("{}_{}", path, order.as_signum()))
            .collect::<Vec<_>>()
            .join("_")
    }
}
