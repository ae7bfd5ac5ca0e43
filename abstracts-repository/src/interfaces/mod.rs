//! Interface definitions for the document store.

mod document_store;

pub use document_store::DocumentStore;
