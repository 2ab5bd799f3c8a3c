//! Retrieval service
//!
//! Owns the current [`IndexSnapshot`] behind an `Arc`. Readers clone the `Arc`
//! under a short read lock and then work without any lock held. Rebuilds
//! construct a complete snapshot first and swap the reference afterwards, so
//! a query sees either the old snapshot or the new one, never a mix.

use crate::interchange::read_corpus;
use crate::snapshot::IndexSnapshot;
use medindex_core::{EmbeddingProvider, Error, Result};
use medindex_records::{AggregatedMedication, MedicationView};
use parking_lot::RwLock;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Query validation and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Minimum trimmed query length, in characters
    pub min_query_chars: usize,
    /// Maximum trimmed query length, in characters
    pub max_query_chars: usize,
    pub default_top_k: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            min_query_chars: 5,
            max_query_chars: 500,
            default_top_k: 5,
        }
    }
}

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub record_index: usize,
    pub distance: f32,
    pub similarity: f32,
    pub medication: MedicationView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub ready: bool,
    pub records: usize,
    pub dimension: usize,
    pub fingerprint: Option<String>,
}

pub struct RetrievalService {
    config: ServiceConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    snapshot: RwLock<Option<Arc<IndexSnapshot>>>,
}

impl RetrievalService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, config: ServiceConfig) -> Self {
        Self {
            config,
            embedder,
            snapshot: RwLock::new(None),
        }
    }

    #[inline]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Current snapshot, if one has been installed
    #[inline]
    pub fn snapshot(&self) -> Option<Arc<IndexSnapshot>> {
        self.snapshot.read().clone()
    }

    /// Build a snapshot from `records` and make it current.
    ///
    /// On failure the previous snapshot stays in place.
    pub fn rebuild(&self, records: Vec<AggregatedMedication>) -> Result<Arc<IndexSnapshot>> {
        let snapshot = Arc::new(IndexSnapshot::build(records, self.embedder.as_ref())?);
        self.install(snapshot.clone());
        Ok(snapshot)
    }

    /// Load a corpus file and make it current.
    pub fn load_corpus<P: AsRef<Path>>(&self, path: P) -> Result<Arc<IndexSnapshot>> {
        let records = read_corpus(path)?;
        self.rebuild(records)
    }

    /// Swap in a prebuilt snapshot, returning the one it replaced.
    pub fn install(&self, snapshot: Arc<IndexSnapshot>) -> Option<Arc<IndexSnapshot>> {
        if snapshot.index().dim() != 0 && snapshot.index().dim() != self.embedder.dim() {
            warn!(
                index_dim = snapshot.index().dim(),
                embedder_dim = self.embedder.dim(),
                "installed snapshot does not match the embedder width"
            );
        }
        info!(records = snapshot.len(), "installing index snapshot");
        self.snapshot.write().replace(snapshot)
    }

    fn ready_snapshot(&self) -> Result<Arc<IndexSnapshot>> {
        self.snapshot()
            .filter(|s| !s.is_empty())
            .ok_or(Error::NotReady)
    }

    fn validate_query<'q>(&self, query: &'q str) -> Result<&'q str> {
        let trimmed = query.trim();
        let chars = trimmed.chars().count();

        if chars < self.config.min_query_chars {
            return Err(Error::InvalidQuery(format!(
                "query must have at least {} characters, got {}",
                self.config.min_query_chars, chars
            )));
        }
        if chars > self.config.max_query_chars {
            return Err(Error::InvalidQuery(format!(
                "query must have at most {} characters, got {}",
                self.config.max_query_chars, chars
            )));
        }
        Ok(trimmed)
    }

    /// Rank records by semantic closeness to `query`.
    ///
    /// `top_k` is clamped into `[1, records]`.
    pub fn search_medications(&self, query: &str, top_k: usize) -> Result<Vec<QueryResult>> {
        let query = self.validate_query(query)?;
        let snapshot = self.ready_snapshot()?;

        let k = top_k.clamp(1, snapshot.len());
        let query_vector = self.embedder.embed(query)?;
        let neighbors = snapshot.index().search(&query_vector, k)?;

        let results: Vec<QueryResult> = neighbors
            .into_iter()
            .filter_map(|n| {
                snapshot.record(n.index).map(|record| QueryResult {
                    record_index: n.index,
                    distance: n.distance,
                    similarity: n.similarity(),
                    medication: record.view(),
                })
            })
            .collect();

        debug!(k, hits = results.len(), "search_medications");
        Ok(results)
    }

    /// [`search_medications`](Self::search_medications) with the configured default `top_k`
    pub fn search_default(&self, query: &str) -> Result<Vec<QueryResult>> {
        self.search_medications(query, self.config.default_top_k)
    }

    /// First record, in store order, whose display name or key contains
    /// `name` case-insensitively. `Ok(None)` when nothing matches.
    pub fn get_details(&self, name: &str) -> Result<Option<MedicationView>> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(Error::InvalidQuery("medication name is empty".to_string()));
        }
        let snapshot = self.ready_snapshot()?;

        let found = snapshot
            .records()
            .iter()
            .find(|r| r.matches_name(&needle))
            .map(AggregatedMedication::view);

        debug!(name = %needle, found = found.is_some(), "get_details");
        Ok(found)
    }

    pub fn status(&self) -> ServiceStatus {
        match self.snapshot() {
            Some(snapshot) => ServiceStatus {
                ready: !snapshot.is_empty(),
                records: snapshot.len(),
                dimension: snapshot.index().dim(),
                fingerprint: Some(snapshot.fingerprint().to_string()),
            },
            None => ServiceStatus {
                ready: false,
                records: 0,
                dimension: self.embedder.dim(),
                fingerprint: None,
            },
        }
    }
}
