mod aggregate_documents;
mod create_index;
mod delete_document;
mod explain_query;
mod find_documents;
mod insert_documents;
mod update_document;

pub use aggregate_documents::AggregateDocumentsUseCase;
pub use create_index::CreateIndexUseCase;
pub use delete_document::DeleteDocumentUseCase;
pub use explain_query::ExplainQueryUseCase;
pub use find_documents::FindDocumentsUseCase;
pub use insert_documents::InsertDocumentsUseCase;
pub use update_document::UpdateDocumentUseCase;
