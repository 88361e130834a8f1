//! Common validation utilities for use cases
//!
//! Reusable request validation to reduce duplication across use case
//! implementations.

use crate::application::errors::{IndexUseCaseError, QueryUseCaseError, WriteUseCaseError};
use crate::config::Config;
use crate::domain::value_objects::CollectionName;

/// Validate the collection name for read operations
pub fn validate_collection(name: &str) -> Result<CollectionName, QueryUseCaseError> {
    CollectionName::new(name.to_string())
        .map_err(|e| QueryUseCaseError::InvalidRequest(e.to_string()))
}

/// Validate the collection name for write operations
pub fn validate_collection_for_write(name: &str) -> Result<CollectionName, WriteUseCaseError> {
    CollectionName::new(name.to_string())
        .map_err(|e| WriteUseCaseError::InvalidRequest(e.to_string()))
}

/// Validate the collection name for index operations
pub fn validate_collection_for_index(name: &str) -> Result<CollectionName, IndexUseCaseError> {
    CollectionName::new(name.to_string())
        .map_err(|e| IndexUseCaseError::InvalidRequest(e.to_string()))
}

/// Resolve requested limit/skip against the configured page bounds.
///
/// Returns (limit, skip); a missing limit falls back to the default page
/// size, and requests above the maximum are clamped.
pub fn resolve_page_bounds(
    limit: Option<i64>,
    skip: Option<i64>,
    config: &Config,
) -> Result<(usize, usize), QueryUseCaseError> {
    let limit = match limit {
        None => config.default_find_limit,
        Some(n) if n < 1 => {
            return Err(QueryUseCaseError::InvalidRequest(format!(
                "limit must be positive, got {}",
                n
            )))
        }
        Some(n) => (n as usize).min(config.max_find_limit),
    };

    let skip = match skip {
        None => 0,
        Some(n) if n < 0 => {
            return Err(QueryUseCaseError::InvalidRequest(format!(
                "skip cannot be negative, got {}",
                n
            )))
        }
        Some(n) => n as usize,
    };

    Ok((limit, skip))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_collection_accepts_books() {
        assert!(validate_collection("books").is_ok());
    }

    #[test]
    fn test_validate_collection_rejects_invalid() {
        assert!(validate_collection("").is_err());
        assert!(validate_collection_for_write("my books").is_err());
        assert!(validate_collection_for_index("a.b").is_err());
    }

    #[test]
    fn test_resolve_page_bounds_defaults() {
        let config = Config::default();
        let (limit, skip) = resolve_page_bounds(None, None, &config).unwrap();

        assert_eq!(limit, config.default_find_limit);
        assert_eq!(skip, 0);
    }

    #[test]
    fn test_resolve_page_bounds_clamps_to_max() {
        let config = Config::default();
        let (limit, _) = resolve_page_bounds(Some(1_000_000), None, &config).unwrap();

        assert_eq!(limit, config.max_find_limit);
    }

    #[test]
    fn test_resolve_page_bounds_rejects_non_positive_limit() {
        let config = Config::default();

        assert!(resolve_page_bounds(Some(0), None, &config).is_err());
        assert!(resolve_page_bounds(Some(-5), None, &config).is_err());
        assert!(resolve_page_bounds(None, Some(-1), &config).is_err());
    }
}
