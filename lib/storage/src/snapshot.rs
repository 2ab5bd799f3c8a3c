//! Immutable index snapshots
//!
//! A snapshot pairs the ordered record store with the flat index built over
//! its search texts. Position `i` in the index always refers to record `i`.
//! Snapshots are never mutated; a rebuild produces a new one.

use medindex_core::{EmbeddingProvider, Error, FlatIndex, Result};
use medindex_records::{corpus, AggregatedMedication};
use sha2::{Digest, Sha256};
use std::time::Instant;
use tracing::info;

#[derive(Debug)]
pub struct IndexSnapshot {
    records: Vec<AggregatedMedication>,
    index: FlatIndex,
    fingerprint: String,
}

impl IndexSnapshot {
    /// Embed every record's search text and build the index over the results.
    pub fn build(records: Vec<AggregatedMedication>, embedder: &dyn EmbeddingProvider) -> Result<Self> {
        let started = Instant::now();
        let texts = corpus_texts(&records);
        let vectors = embedder.embed_batch(&texts)?;

        if let Some(bad) = vectors.iter().find(|v| v.dim() != embedder.dim()) {
            return Err(Error::DimensionMismatch {
                expected: embedder.dim(),
                actual: bad.dim(),
            });
        }

        let index = FlatIndex::build(vectors)?;
        let fingerprint = fingerprint(&texts, embedder.dim());

        info!(
            records = records.len(),
            dim = index.dim(),
            fingerprint = %&fingerprint[..12],
            elapsed_ms = started.elapsed().as_millis() as u64,
            "built index snapshot"
        );

        Ok(Self {
            records,
            index,
            fingerprint,
        })
    }

    #[inline]
    pub fn records(&self) -> &[AggregatedMedication] {
        &self.records
    }

    #[inline]
    pub fn record(&self, index: usize) -> Option<&AggregatedMedication> {
        self.records.get(index)
    }

    #[inline]
    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// SHA-256 over the embedded texts and the vector dimension, hex encoded
    #[inline]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

/// Text embedded for each record. Records without a stored search text get
/// one composed from their fields.
fn corpus_texts(records: &[AggregatedMedication]) -> Vec<String> {
    records
        .iter()
        .map(|r| {
            if r.search_text.is_empty() {
                corpus::search_text(r)
            } else {
                r.search_text.clone()
            }
        })
        .collect()
}

fn fingerprint(texts: &[String], dim: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update((dim as u64).to_le_bytes());
    for text in texts {
        hasher.update((text.len() as u64).to_le_bytes());
        hasher.update(text.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medindex_core::{HashEmbedder, Vector};
    use medindex_records::{aggregate, RawRecord};

    fn records(names: &[&str]) -> Vec<AggregatedMedication> {
        let rows: Vec<RawRecord> = names
            .iter()
            .map(|name| RawRecord {
                active_ingredient: Some(name.to_string()),
                registration_status: Some("VÁLIDO".to_string()),
                ..RawRecord::default()
            })
            .collect();
        aggregate(&rows)
    }

    /// Returns vectors of the wrong width
    struct SkewedEmbedder;

    impl EmbeddingProvider for SkewedEmbedder {
        fn dim(&self) -> usize {
            4
        }

        fn embed(&self, _text: &str) -> Result<Vector> {
            Ok(Vector::new(vec![0.0; 3]))
        }
    }

    #[test]
    fn test_one_vector_per_record() {
        let embedder = HashEmbedder::new(32).unwrap();
        let snapshot = IndexSnapshot::build(records(&["Paracetamol", "Ibuprofeno"]), &embedder).unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.index().len(), 2);
        assert_eq!(snapshot.index().dim(), 32);
        assert_eq!(snapshot.fingerprint().len(), 64);
    }

    #[test]
    fn test_identical_input_identical_fingerprint() {
        let embedder = HashEmbedder::new(32).unwrap();
        let a = IndexSnapshot::build(records(&["Paracetamol", "Ibuprofeno"]), &embedder).unwrap();
        let b = IndexSnapshot::build(records(&["Paracetamol", "Ibuprofeno"]), &embedder).unwrap();
        let c = IndexSnapshot::build(records(&["Ibuprofeno", "Paracetamol"]), &embedder).unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn test_embedder_width_mismatch() {
        let err = IndexSnapshot::build(records(&["Paracetamol"]), &SkewedEmbedder).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch { expected: 4, actual: 3 }
        ));
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = IndexSnapshot::build(Vec::new(), &HashEmbedder::default()).unwrap();
        assert!(snapshot.is_empty());
        assert!(snapshot.index().is_empty());
    }
}
