//! Exact flat index under squared L2 distance.
//!
//! Every query scans all stored vectors. Results are ordered by ascending
//! distance, with ties broken by ascending position, so two indexes built from
//! the same vectors always answer the same query identically.

use crate::{Error, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;

/// Below this many vectors the scan stays on the calling thread.
const PARALLEL_SCAN_THRESHOLD: usize = 4096;

/// One search hit: a position in the build sequence and its squared L2 distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: f32,
}

impl Neighbor {
    /// `1 / (1 + distance)`, see [`similarity`].
    #[inline]
    pub fn similarity(&self) -> f32 {
        similarity(self.distance)
    }

    #[inline]
    fn sort_key(&self) -> (OrderedFloat<f32>, usize) {
        (OrderedFloat(self.distance), self.index)
    }
}

/// Map a non-negative distance into `(0, 1]`.
///
/// Strictly decreasing in `distance`. Only the ordering is meaningful.
#[inline]
pub fn similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance)
}

/// Immutable store of equal-dimension vectors addressed by position
#[derive(Debug, Clone, Default)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vector>,
}

impl FlatIndex {
    /// Build an index from `vectors`. All of them must share the first one's dimension.
    pub fn build(vectors: Vec<Vector>) -> Result<Self> {
        let dim = vectors.first().map(Vector::dim).unwrap_or(0);

        if let Some(bad) = vectors.iter().find(|v| v.dim() != dim) {
            return Err(Error::DimensionMismatch {
                expected: dim,
                actual: bad.dim(),
            });
        }

        Ok(Self { dim, vectors })
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Vector> {
        self.vectors.get(index)
    }

    /// Return the `k` nearest stored vectors to `query`.
    ///
    /// An empty index answers every query with an empty list. `k` larger than
    /// the index returns every entry.
    pub fn search(&self, query: &Vector, k: usize) -> Result<Vec<Neighbor>> {
        if self.is_empty() || k == 0 {
            return Ok(Vec::new());
        }

        if query.dim() != self.dim {
            return Err(Error::DimensionMismatch {
                expected: self.dim,
                actual: query.dim(),
            });
        }

        let score = |(index, vector): (usize, &Vector)| Neighbor {
            index,
            distance: vector.squared_l2_distance(query),
        };

        let mut neighbors: Vec<Neighbor> = if self.len() >= PARALLEL_SCAN_THRESHOLD {
            self.vectors.par_iter().enumerate().map(score).collect()
        } else {
            self.vectors.iter().enumerate().map(score).collect()
        };

        let k = k.min(neighbors.len());
        if k < neighbors.len() {
            neighbors.select_nth_unstable_by_key(k - 1, Neighbor::sort_key);
            neighbors.truncate(k);
        }
        neighbors.sort_unstable_by_key(Neighbor::sort_key);

        Ok(neighbors)
    }
}
