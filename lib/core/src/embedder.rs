//! Embedding providers
//!
//! The retrieval layer only depends on [`EmbeddingProvider`]: a deterministic
//! map from text to a vector of fixed dimension. [`HashEmbedder`] is the
//! built-in provider, a feature-hashing model over character trigrams and
//! words that needs no model files or network access.

use crate::{Error, Result, Vector};
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Default output width, matching common sentence-embedding models.
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Text to fixed-length vector. Must return the same vector for the same text.
pub trait EmbeddingProvider: Send + Sync {
    /// Dimension of every vector this provider returns
    fn dim(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vector>;

    /// Embed many texts, preserving input order.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vector>> {
        texts.par_iter().map(|text| self.embed(text)).collect()
    }
}

/// Feature-hashing embedder over lower-cased trigrams and words
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(Error::InvalidConfig(
                "embedding dimension must be at least 1".to_string(),
            ));
        }
        Ok(Self { dim })
    }

    fn bucket<T: Hash + ?Sized>(&self, item: &T) -> usize {
        let mut hasher = DefaultHasher::new();
        item.hash(&mut hasher);
        (hasher.finish() % self.dim as u64) as usize
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self {
            dim: DEFAULT_EMBEDDING_DIM,
        }
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn embed(&self, text: &str) -> Result<Vector> {
        let mut components = vec![0.0f32; self.dim];
        let lowered = text.to_lowercase();

        for trigram in trigrams(&lowered) {
            components[self.bucket(trigram.as_str())] += 1.0;
        }

        // Whole words weigh more than their fragments
        for word in lowered.split_whitespace() {
            components[self.bucket(word)] += 2.0;
        }

        let mut vector = Vector::new(components);
        vector.normalize();
        Ok(vector)
    }
}

fn trigrams(s: &str) -> Vec<String> {
    let padded: Vec<char> = format!("  {}  ", s).chars().collect();
    padded
        .windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
