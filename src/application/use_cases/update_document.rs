use std::sync::Arc;

use crate::application::dto::{UpdateRequest, UpdateResponse};
use crate::application::errors::WriteUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection_for_write;
use crate::query::{Filter, UpdateDocument};

/// Use case: Apply an update to the first matching document
pub struct UpdateDocumentUseCase {
    store: Arc<dyn DocumentStore>,
}

impl UpdateDocumentUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute updateOne
    pub async fn execute(
        &self,
        request: UpdateRequest,
    ) -> Result<UpdateResponse, WriteUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection_for_write(&request.collection)?;
        let filter = Filter::parse(&request.filter)?;
        let update = UpdateDocument::parse(&request.update)?;

        // 2. Apply through the store
        let outcome = self.store.update_one(&collection, &filter, &update).await?;

        tracing::debug!(
            collection = %collection,
            matched = outcome.matched_count,
            modified = outcome.modified_count,
            "updateOne"
        );

        Ok(UpdateResponse {
            matched_count: outcome.matched_count,
            modified_count: outcome.modified_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockDocumentStore, UpdateOutcome};
    use crate::query::QueryParseError;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_update_document_happy_path() {
        // Arrange
        let mut mock_store = MockDocumentStore::new();
        mock_store
            .expect_update_one()
            .withf(|collection, filter, _| {
                collection.as_str() == "books" && !filter.is_empty()
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                })
            });

        let use_case = UpdateDocumentUseCase::new(Arc::new(mock_store));
        let request = UpdateRequest {
            collection: "books".to_string(),
            filter: json!({"title": "The Alchemist"}),
            update: json!({"$set": {"price": 15.99}}),
        };

        // Act
        let result = use_case.execute(request).await;

        // Assert
        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.matched_count, 1);
        assert_eq!(response.modified_count, 1);
    }

    #[tokio::test]
    async fn test_update_document_zero_matches_is_not_an_error() {
        let mut mock_store = MockDocumentStore::new();
        mock_store.expect_update_one().times(1).returning(|_, _, _| {
            Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            })
        });

        let use_case = UpdateDocumentUseCase::new(Arc::new(mock_store));
        let result = use_case
            .execute(UpdateRequest {
                collection: "books".to_string(),
                filter: json!({"title": "No Such Book"}),
                update: json!({"$set": {"price": 1.0}}),
            })
            .await;

        assert_eq!(result.unwrap().matched_count, 0);
    }

    #[tokio::test]
    async fn test_update_document_rejects_operator_free_update() {
        let mock_store = MockDocumentStore::new();
        let use_case = UpdateDocumentUseCase::new(Arc::new(mock_store));

        let result = use_case
            .execute(UpdateRequest {
                collection: "books".to_string(),
                filter: json!({"title": "The Alchemist"}),
                update: json!({"price": 15.99}),
            })
            .await;

        assert!(matches!(
            result.unwrap_err(),
            WriteUseCaseError::Parse(QueryParseError::UpdateWithoutOperators)
        ));
    }
}
