//! # medindex
//!
//! Recommends registered medications for free-text symptom descriptions.
//!
//! Raw regulatory filings are normalized, categorized and aggregated into one
//! record per active ingredient. Each record's search text is embedded and
//! stored in an exact flat index; queries are embedded the same way and
//! answered by squared-L2 nearest-neighbor search.
//!
//! ## Quick Start
//!
//! ### Command line
//!
//! ```bash
//! medindex aggregate --input data/DADOS_ABERTOS_MEDICAMENTOS.csv --output anvisa_medicamentos.csv
//! medindex search --corpus anvisa_medicamentos.csv --top-k 5 "dor de cabeca e febre"
//! medindex details --corpus anvisa_medicamentos.csv paracetamol
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use medindex::prelude::*;
//! use std::sync::Arc;
//!
//! let rows = vec![RawRecord {
//!     active_ingredient: Some("PARACETAMOL".into()),
//!     therapeutic_class: Some("ANALGESICOS".into()),
//!     product_name: Some("TYLENOL".into()),
//!     company: Some("JANSSEN".into()),
//!     registration_status: Some("VÁLIDO".into()),
//!     registration_number: Some("1000".into()),
//! }];
//!
//! let service = RetrievalService::new(Arc::new(HashEmbedder::default()), ServiceConfig::default());
//! service.rebuild(aggregate(&rows)).unwrap();
//!
//! let hits = service.search_medications("analgesico para dor", 5).unwrap();
//! assert_eq!(hits[0].medication.display_name, "Paracetamol");
//! ```
//!
//! ## Crate Structure
//!
//! - `medindex-core` - vectors, distance kernels, flat index, embedding providers
//! - `medindex-records` - normalization, categories, aggregation, search corpus
//! - `medindex-storage` - CSV ingestion, corpus file, snapshots, retrieval service

pub use medindex_core::{
    similarity, EmbeddingProvider, Error, FlatIndex, HashEmbedder, Neighbor, Result, Vector,
    DEFAULT_EMBEDDING_DIM,
};

pub use medindex_records::{
    aggregate, build_corpus, categorize, normalize, title_case, AggregatedMedication, Category,
    MedicationView, RawRecord, Tier,
};

pub use medindex_storage::{
    read_corpus, read_raw_records, write_corpus, IndexSnapshot, IngestConfig, QueryResult,
    RawColumns, RetrievalService, ServiceConfig, ServiceStatus, SourceEncoding,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        aggregate, build_corpus, categorize, normalize, read_corpus, read_raw_records,
        write_corpus, AggregatedMedication, Category, EmbeddingProvider, Error, FlatIndex,
        HashEmbedder, IndexSnapshot, IngestConfig, QueryResult, RawRecord, Result,
        RetrievalService, ServiceConfig, SourceEncoding, Tier, Vector,
    };
}

/// Distance kernels
pub mod simd {
    pub use medindex_core::simd::{norm_squared, squared_l2_simd};
}
