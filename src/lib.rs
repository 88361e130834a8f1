//! # ShelfDB - Embedded In-Memory Document Store
//!
//! A small document store with a MongoDB-flavored query surface, built on
//! Clean Architecture principles.
//!
//! ## Architecture Layers
//!
//! - **Domain**: Core business logic (entities, value objects, domain errors)
//! - **Query**: Filter, projection, sort and update documents, plus the
//!   aggregation pipeline
//! - **Application**: Use cases and ports (interfaces)
//! - **Infrastructure**: The in-memory store adapter with secondary indexes
//!
//! ## Key Features
//!
//! - Filters with comparison operators and implicit equality
//! - Projection, sort, and skip/limit pagination
//! - updateOne / deleteOne with first-match-in-insertion-order semantics
//! - Aggregation pipelines ($match, $group, $sort, $limit, $skip)
//! - Secondary indexes (optionally unique) and explain() plan reports
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use shelfdb::{Config, use_cases::FindDocumentsUseCase};
//! use shelfdb::infrastructure::memory::MemoryDocumentStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryDocumentStore::new());
//! let find = FindDocumentsUseCase::new(store, Config::default());
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod query;

// Re-export key types explicitly to avoid ambiguity
pub use application::errors as use_case_errors;
pub use application::{dto, ports, use_cases};
pub use config::Config;
pub use domain::errors as domain_errors;
pub use domain::{entities, value_objects};
