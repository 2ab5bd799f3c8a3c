//! # medindex Storage
//!
//! Everything between files on disk and query answers:
//!
//! - [`ingest`] - raw regulatory dataset reader
//! - [`interchange`] - aggregated corpus file, the persisted artifact
//! - [`IndexSnapshot`] - immutable record store plus flat index
//! - [`RetrievalService`] - semantic search and detail lookup over the
//!   current snapshot

pub mod ingest;
pub mod interchange;
pub mod snapshot;
pub mod service;

pub use ingest::{parse_raw_records, read_raw_records, IngestConfig, RawColumns, SourceEncoding};
pub use interchange::{read_corpus, read_corpus_from, write_corpus, write_corpus_to};
pub use snapshot::IndexSnapshot;
pub use service::{QueryResult, RetrievalService, ServiceConfig, ServiceStatus};
