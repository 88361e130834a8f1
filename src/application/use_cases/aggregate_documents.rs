use std::sync::Arc;

use crate::application::dto::{AggregateRequest, AggregateResponse};
use crate::application::errors::QueryUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::validate_collection;
use crate::config::Config;
use crate::query::Pipeline;

/// Use case: Execute an aggregation pipeline
pub struct AggregateDocumentsUseCase {
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl AggregateDocumentsUseCase {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// Execute aggregate
    pub async fn execute(
        &self,
        request: AggregateRequest,
    ) -> Result<AggregateResponse, QueryUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection(&request.collection)?;
        let pipeline = Pipeline::parse(&request.pipeline)?;

        if pipeline.len() > self.config.max_pipeline_stages {
            return Err(QueryUseCaseError::InvalidRequest(format!(
                "Pipeline has too many stages: {} > {}",
                pipeline.len(),
                self.config.max_pipeline_stages
            )));
        }

        // 2. Execute through the store
        let documents = self.store.aggregate(&collection, &pipeline).await?;

        tracing::debug!(
            collection = %collection,
            stages = pipeline.len(),
            results = documents.len(),
            "aggregate"
        );

        Ok(AggregateResponse { documents })
    }
}
