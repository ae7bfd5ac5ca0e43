//! # Abstracts Ingest
//!
//! This crate provides the ingestion pipeline that streams an encyclopedia
//! abstracts dump into the document store.
//!
//! ## Architecture
//!
//! The pipeline is a strictly sequential pull chain:
//!
//! 1. **Parser**: Streams `<doc>` elements out of the XML dump as articles
//! 2. **Batches**: Groups articles into fixed-size, order-preserving batches
//! 3. **Loader**: Submits each batch as one bulk request, with bounded retry
//! 4. **Orchestrator**: Prepares the collection and drives the loader
//!
//! Only one bulk request is ever in flight; the parser is not advanced while a
//! batch is being submitted.

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod parser;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::IngestError;
pub use loader::{BulkLoader, LoadSummary, LoaderConfig};
pub use orchestrator::{IngestOrchestrator, OrchestratorConfig};
pub use parser::{AbstractParser, ParserStats};
