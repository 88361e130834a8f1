use std::sync::Arc;

use crate::application::dto::{InsertRequest, InsertResponse};
use crate::application::errors::WriteUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection_for_write;
use crate::domain::entities::Document;
use crate::domain::errors::DomainError;

/// Use case: Insert a batch of documents
pub struct InsertDocumentsUseCase {
    store: Arc<dyn DocumentStore>,
}

impl InsertDocumentsUseCase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Execute batch insert
    pub async fn execute(
        &self,
        request: InsertRequest,
    ) -> Result<InsertResponse, WriteUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection_for_write(&request.collection)?;

        if request.documents.is_empty() {
            return Err(WriteUseCaseError::InvalidRequest(
                "Insert requires at least one document".to_string(),
            ));
        }

        let mut documents = Vec::with_capacity(request.documents.len());
        for raw in request.documents {
            let body = match raw {
                serde_json::Value::Object(body) => body,
                other => {
                    return Err(WriteUseCaseError::Domain(DomainError::NotAnObject(
                        other.to_string(),
                    )))
                }
            };
            documents.push(Document::new(body)?);
        }

        // 2. Store the batch
        let inserted_ids = self.store.insert_many(&collection, documents).await?;

        tracing::debug!(
            collection = %collection,
            count = inserted_ids.len(),
            "Inserted documents"
        );

        Ok(InsertResponse {
            inserted_count: inserted_ids.len(),
            inserted_ids: inserted_ids.iter().map(|id| id.to_string()).collect(),
        })
    }
}
