use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

static NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("collection name pattern is valid"));

/// Validated collection name (e.g., "books")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    const MAX_LENGTH: usize = 64;

    pub fn new(value: String) -> Result<Self, DomainError> {
        if value.is_empty() {
            return Err(DomainError::InvalidCollectionName(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if value.len() > Self::MAX_LENGTH {
            return Err(DomainError::InvalidCollectionName(format!(
                "Collection name too long: {} > {}",
                value.len(),
                Self::MAX_LENGTH
            )));
        }

        if !NAME_PATTERN.is_match(&value) {
            return Err(DomainError::InvalidCollectionName(
                "Collection name must be alphanumeric with underscores/hyphens".to_string(),
            ));
        }

        Ok(Self(value.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for CollectionName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_collection_name_valid() {
        let name = CollectionName::new("books".to_string()).unwrap();
        assert_eq!(name.as_str(), "books");
    }

    #[test]
    fn test_collection_name_lowercased() {
        let name = CollectionName::new("Books".to_string()).unwrap();
        assert_eq!(name.as_str(), "books");
    }

    #[test]
    fn test_collection_name_empty_rejected() {
        assert!(CollectionName::new(String::new()).is_err());
    }

    #[test]
    fn test_collection_name_too_long_rejected() {
        assert!(CollectionName::new("a".repeat(65)).is_err());
    }

    #[test]
    fn test_collection_name_invalid_characters_rejected() {
        for invalid in ["books!", "my books", "books.archive", "a/b"] {
            assert!(
                CollectionName::from_str(invalid).is_err(),
                "Should reject: {}",
                invalid
            );
        }
    }

    #[test]
    fn test_collection_name_allows_underscores_and_hyphens() {
        assert!(CollectionName::from_str("book_reviews-2024").is_ok());
    }
}
