//! # medindex Core
//!
//! Vector primitives for the medication retrieval index.
//!
//! - [`Vector`] - dense `f32` vector
//! - [`FlatIndex`] - exact nearest-neighbor index under squared L2 distance
//! - [`EmbeddingProvider`] - text to vector capability, with [`HashEmbedder`]
//!   as the built-in implementation
//!
//! ## Example
//!
//! ```rust
//! use medindex_core::{FlatIndex, Vector};
//!
//! let index = FlatIndex::build(vec![
//!     Vector::new(vec![0.0, 0.0]),
//!     Vector::new(vec![3.0, 4.0]),
//! ]).unwrap();
//!
//! let hits = index.search(&Vector::new(vec![3.0, 3.0]), 1).unwrap();
//! assert_eq!(hits[0].index, 1);
//! assert_eq!(hits[0].distance, 1.0);
//! ```

pub mod vector;
pub mod error;
pub mod index;
pub mod embedder;

/// Distance kernels
///
/// - AVX2/FMA on x86_64
/// - NEON on ARM64
/// - scalar fallback elsewhere
pub mod simd;

pub use vector::Vector;
pub use error::{Error, Result};
pub use index::{similarity, FlatIndex, Neighbor};
pub use embedder::{EmbeddingProvider, HashEmbedder, DEFAULT_EMBEDDING_DIM};
