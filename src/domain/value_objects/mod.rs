mod collection_name;
mod document_id;
mod field_path;
mod index_spec;
mod sort_order;

pub use collection_name::CollectionName;
pub use document_id::DocumentId;
pub use field_path::FieldPath;
pub use index_spec::IndexSpec;
pub use sort_order::SortOrder;
