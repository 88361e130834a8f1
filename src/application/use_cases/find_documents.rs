use std::sync::Arc;

use crate::application::dto::{FindRequest, FindResponse};
use crate::application::errors::QueryUseCaseError;
use crate::application::ports::DocumentStore;
use crate::application::validation::{resolve_page_bounds, validate_collection};
use crate::config::Config;
use crate::query::{Filter, FindQuery, Projection, SortSpec};

/// Use case: Find documents with filter, projection, sort and pagination
pub struct FindDocumentsUseCase {
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl FindDocumentsUseCase {
    pub fn new(store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self { store, config }
    }

    /// Execute find
    pub async fn execute(&self, request: FindRequest) -> Result<FindResponse, QueryUseCaseError> {
        // 1. Parse and validate
        let collection = validate_collection(&request.collection)?;

        let filter = match &request.filter {
            Some(doc) => Filter::parse(doc)?,
            None => Filter::empty(),
        };

        let sort = request.sort.as_ref().map(SortSpec::parse).transpose()?;
        let projection = request
            .projection
            .as_ref()
            .map(Projection::parse)
            .transpose()?;

        let (limit, skip) = resolve_page_bounds(request.limit, request.skip, &self.config)?;

        // 2. Query the store
        let mut query = FindQuery::new(filter).with_skip(skip).with_limit(limit);
        if let Some(sort) = sort {
            query = query.with_sort(sort);
        }

        let documents = self.store.find(&collection, &query).await?;

        // 3. Shape the results
        let documents = match &projection {
            Some(projection) => documents.iter().map(|doc| projection.apply(doc)).collect(),
            None => documents,
        };

        let total = documents.len();

        Ok(FindResponse {
            documents,
            total,
            limit,
            skip,
        })
    }
}
