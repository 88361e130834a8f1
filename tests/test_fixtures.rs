//! Shared test fixtures and utilities for all test types
//!
//! Common setup for integration tests: a store wired to the full set of
//! use cases, plus a book catalog matching the canonical examples.

use std::sync::Arc;

use serde_json::{json, Value};

use shelfdb::dto::InsertRequest;
use shelfdb::infrastructure::memory::MemoryDocumentStore;
use shelfdb::use_cases::{
    AggregateDocumentsUseCase, CreateIndexUseCase, DeleteDocumentUseCase, ExplainQueryUseCase,
    FindDocumentsUseCase, InsertDocumentsUseCase, UpdateDocumentUseCase,
};
use shelfdb::Config;

pub const BOOKS: &str = "books";

/// Test environment container with all necessary components
pub struct TestEnvironment {
    pub config: Config,
    pub insert: InsertDocumentsUseCase,
    pub find: FindDocumentsUseCase,
    pub update: UpdateDocumentUseCase,
    pub delete: DeleteDocumentUseCase,
    pub aggregate: AggregateDocumentsUseCase,
    pub create_index: CreateIndexUseCase,
    pub explain: ExplainQueryUseCase,
}

impl TestEnvironment {
    /// Create a complete test environment around a fresh in-memory store
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let store = Arc::new(MemoryDocumentStore::with_config(config.clone()));

        Self {
            insert: InsertDocumentsUseCase::new(store.clone()),
            find: FindDocumentsUseCase::new(store.clone(), config.clone()),
            update: UpdateDocumentUseCase::new(store.clone()),
            delete: DeleteDocumentUseCase::new(store.clone()),
            aggregate: AggregateDocumentsUseCase::new(store.clone(), config.clone()),
            create_index: CreateIndexUseCase::new(store.clone()),
            explain: ExplainQueryUseCase::new(store),
            config,
        }
    }

    /// Seed the canonical book catalog into the "books" collection
    pub async fn seed_books(&self) {
        self.insert
            .execute(InsertRequest {
                collection: BOOKS.to_string(),
                documents: sample_books(),
            })
            .await
            .expect("seeding the book catalog should succeed");
    }
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

/// The catalog the canonical statements run against
pub fn sample_books() -> Vec<Value> {
    vec![
        json!({"title": "1984", "author": "George Orwell", "genre": "Fiction",
               "published_year": 1949, "price": 9.99, "in_stock": true}),
        json!({"title": "Animal Farm", "author": "George Orwell", "genre": "Fiction",
               "published_year": 1945, "price": 7.5, "in_stock": true}),
        json!({"title": "The Alchemist", "author": "Paulo Coelho", "genre": "Fiction",
               "published_year": 1988, "price": 12.5, "in_stock": true}),
        json!({"title": "Moby Dick", "author": "Herman Melville", "genre": "Adventure",
               "published_year": 1851, "price": 11.0, "in_stock": false}),
        json!({"title": "Dune", "author": "Frank Herbert", "genre": "Science Fiction",
               "published_year": 1965, "price": 12.0, "in_stock": true}),
        json!({"title": "The Martian", "author": "Andy Weir", "genre": "Science Fiction",
               "published_year": 2011, "price": 14.0, "in_stock": true}),
        json!({"title": "Project Hail Mary", "author": "Andy Weir", "genre": "Science Fiction",
               "published_year": 2021, "price": 18.99, "in_stock": true}),
        json!({"title": "Klara and the Sun", "author": "Kazuo Ishiguro", "genre": "Fiction",
               "published_year": 2021, "price": 16.5, "in_stock": false}),
        json!({"title": "Emma", "author": "Jane Austen", "genre": "Romance",
               "published_year": 1815, "price": 8.25, "in_stock": true}),
        json!({"title": "Brave New World", "author": "Aldous Huxley", "genre": "Fiction",
               "published_year": 1932, "price": 10.25, "in_stock": true}),
    ]
}

/// Assertion helpers shared across integration tests
pub mod assertions {
    use serde_json::Value;

    pub fn titles(documents: &[Value]) -> Vec<String> {
        documents
            .iter()
            .map(|doc| {
                doc.get("title")
                    .and_then(Value::as_str)
                    .expect("document should carry a title")
                    .to_string()
            })
            .collect()
    }

    pub fn assert_titles(documents: &[Value], expected: &[&str]) {
        assert_eq!(titles(documents), expected);
    }
}
