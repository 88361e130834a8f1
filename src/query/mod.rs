//! The query language: filter, projection, sort, and update documents,
//! plus the aggregation pipeline. Everything here is pure - parsing from
//! the JSON shapes used in shell statements, and evaluation against
//! rendered documents.

pub mod errors;
pub mod filter;
pub mod find;
pub mod ordering;
pub mod pipeline;
pub mod projection;
pub mod sort;
pub mod update;

pub use errors::QueryParseError;
pub use filter::{Clause, Filter, Predicate};
pub use find::FindQuery;
pub use pipeline::{Expression, ExpressionError, Pipeline, Stage};
pub use projection::Projection;
pub use sort::SortSpec;
pub use update::{UpdateDocument, UpdateError};
