mod document_store;

pub use document_store::{DeleteOutcome, DocumentStore, StoreError, UpdateOutcome};

#[cfg(test)]
pub use document_store::MockDocumentStore;
