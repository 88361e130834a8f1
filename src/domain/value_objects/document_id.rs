use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Unique identifier for a document within a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DocumentId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| DomainError::InvalidDocumentId(format!("{}: {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_document_id_new_creates_unique_ids() {
        let id1 = DocumentId::new();
        let id2 = DocumentId::new();

        assert_ne!(id1, id2, "New DocumentIds should be unique");
    }

    #[test]
    fn test_document_id_display_round_trip() {
        let id = DocumentId::new();
        let parsed: DocumentId = id.to_string().parse().unwrap();

        assert_eq!(id, parsed);
    }

    #[test]
    fn test_document_id_from_str_invalid() {
        let invalid_ids = vec!["", "not-a-uuid", "550e8400-e29b-41d4-a716"];

        for invalid in invalid_ids {
            assert!(
                invalid.parse::<DocumentId>().is_err(),
                "Should fail to parse invalid id: {}",
                invalid
            );
        }
    }

    #[test]
    fn test_document_id_hash() {
        let uuid = Uuid::new_v4();
        let id1 = DocumentId::from_uuid(uuid);
        let id2 = DocumentId::from_uuid(uuid);

        let mut set = HashSet::new();
        set.insert(id1);

        assert!(set.contains(&id2), "Equal DocumentIds should have same hash");
    }

    #[test]
    fn test_document_id_serialization() {
        let uuid = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let id = DocumentId::from_uuid(uuid);

        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"550e8400-e29b-41d4-a716-446655440000\"");

        let deserialized: DocumentId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
