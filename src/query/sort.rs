use std::cmp::Ordering;

use serde_json::Value;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{FieldPath, SortOrder};
use crate::query::errors::QueryParseError;
use crate::query::ordering::compare_values;

/// Parsed sort document (`{price: -1}`, `{"_id.decade": 1}`)
///
/// Keys apply in document order; ties fall back to the input order, so a
/// stable sort preserves the store's insertion ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    keys: Vec<(FieldPath, SortOrder)>,
}

impl SortSpec {
    pub fn new(keys: Vec<(FieldPath, SortOrder)>) -> Result<Self, DomainError> {
        if keys.is_empty() {
            return Err(DomainError::InvalidSortOrder(
                "Sort document cannot be empty".to_string(),
            ));
        }
        Ok(Self { keys })
    }

    pub fn parse(sort_doc: &Value) -> Result<Self, QueryParseError> {
        let entries = sort_doc
            .as_object()
            .ok_or(QueryParseError::NotADocument("sort document"))?;

        let mut keys = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let path = FieldPath::new(key)?;
            let signum = value.as_i64().ok_or_else(|| {
                QueryParseError::Domain(DomainError::InvalidSortOrder(format!(
                    "Sort value for {} must be 1 or -1",
                    key
                )))
            })?;
            keys.push((path, SortOrder::from_signum(signum)?));
        }

        Ok(Self::new(keys)?)
    }

    pub fn keys(&self) -> &[(FieldPath, SortOrder)] {
        &self.keys
    }

    /// Compare two rendered documents; missing fields sort as null.
    pub fn compare(&self, a: &Value, b: &Value) -> Ordering {
        for (path, order) in &self.keys {
            let left = path.resolve(a).unwrap_or(&Value::Null);
            let right = path.resolve(b).unwrap_or(&Value::Null);

            let cmp = order.apply(compare_values(left, right));
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    }

    /// Stable in-place sort, ties keep their input order.
    pub fn sort(&self, documents: &mut [Value]) {
        documents.sort_by(|a, b| self.compare(a, b));
    }
}
