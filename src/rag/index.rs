//! In-memory embedding index over the knowledge corpus.
//!
//! Candidates are found by exact (brute-force) Euclidean search over an
//! `ndarray` matrix, then re-scored with cosine similarity against the raw
//! chunk vectors. The two metrics serve different purposes and both are kept.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IndexError {
    #[error("embedding index needs at least one chunk")]
    Empty,
    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("embedding vectors must not be empty")]
    ZeroDimension,
}

/// Immutable chunk text with its precomputed embedding.
#[derive(Debug, Clone)]
pub struct KnowledgeChunk {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Candidate produced by the Euclidean search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    /// Squared L2 distance to the query.
    pub distance: f32,
}

/// Chunk that survived the similarity floor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedChunk {
    pub index: usize,
    pub text: String,
    pub distance: f32,
    pub similarity: f32,
}

#[derive(Debug)]
pub struct EmbeddingIndex {
    texts: Vec<String>,
    vectors: Array2<f32>,
    squared_norms: Array1<f32>,
}

impl EmbeddingIndex {
    pub fn new(chunks: Vec<KnowledgeChunk>) -> Result<Self, IndexError> {
        let dimension = chunks.first().ok_or(IndexError::Empty)?.embedding.len();
        if dimension == 0 {
            return Err(IndexError::ZeroDimension);
        }

        let mut texts = Vec::with_capacity(chunks.len());
        let mut flat = Vec::with_capacity(chunks.len() * dimension);
        for chunk in chunks {
            if chunk.embedding.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: chunk.embedding.len(),
                });
            }
            flat.extend_from_slice(&chunk.embedding);
            texts.push(chunk.text);
        }

        let vectors = Array2::from_shape_vec((texts.len(), dimension), flat).map_err(|_| {
            IndexError::DimensionMismatch {
                expected: dimension,
                actual: 0,
            }
        })?;
        let squared_norms = vectors.map_axis(Axis(1), |row| row.dot(&row));

        Ok(Self {
            texts,
            vectors,
            squared_norms,
        })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.vectors.ncols()
    }

    pub fn text(&self, index: usize) -> Option<&str> {
        self.texts.get(index).map(String::as_str)
    }

    /// Raw stored vector for a chunk.
    pub fn vector(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.len()).then(|| self.vectors.row(index))
    }

    /// The `k` closest chunks by Euclidean distance, nearest first.
    ///
    /// Ties keep corpus order so results are stable across calls.
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>, IndexError> {
        let query = self.check_query(query)?;
        if k == 0 {
            return Ok(Vec::new());
        }

        let query_norm = query.dot(&query);
        let dots = self.vectors.dot(&query);

        let mut neighbors: Vec<Neighbor> = dots
            .iter()
            .zip(self.squared_norms.iter())
            .enumerate()
            .map(|(index, (dot, norm))| Neighbor {
                index,
                distance: squared_distance(*norm, query_norm, *dot),
            })
            .collect();

        neighbors.sort_by(|left, right| {
            left.distance
                .total_cmp(&right.distance)
                .then(left.index.cmp(&right.index))
        });
        neighbors.truncate(k);
        Ok(neighbors)
    }

    /// Cosine similarity between a stored chunk and the query; 0 for zero vectors.
    pub fn cosine_similarity(&self, index: usize, query: &[f32]) -> Result<f32, IndexError> {
        let query = self.check_query(query)?;
        let Some(candidate) = self.vector(index) else {
            return Ok(0.0);
        };
        Ok(cosine(candidate, query))
    }

    /// Euclidean top-k followed by the cosine floor. May return fewer than `k`.
    pub fn search(
        &self,
        query: &[f32],
        k: usize,
        min_similarity: f32,
    ) -> Result<Vec<RetrievedChunk>, IndexError> {
        let neighbors = self.nearest(query, k)?;
        let query_view = ArrayView1::from(query);

        let accepted = neighbors
            .into_iter()
            .filter_map(|neighbor| {
                let similarity = cosine(self.vectors.row(neighbor.index), query_view);
                if similarity < min_similarity {
                    return None;
                }
                Some(RetrievedChunk {
                    index: neighbor.index,
                    text: self.texts[neighbor.index].clone(),
                    distance: neighbor.distance,
                    similarity,
                })
            })
            .collect();
        Ok(accepted)
    }

    fn check_query<'a>(&self, query: &'a [f32]) -> Result<ArrayView1<'a, f32>, IndexError> {
        if query.len() != self.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension(),
                actual: query.len(),
            });
        }
        Ok(ArrayView1::from(query))
    }
}

// NaN ranks last instead of being clamped to a perfect match.
fn squared_distance(norm: f32, query_norm: f32, dot: f32) -> f32 {
    let distance = norm + query_norm - 2.0 * dot;
    if distance.is_nan() {
        f32::INFINITY
    } else {
        distance.max(0.0)
    }
}

fn cosine(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let denom = a.dot(&a).sqrt() * b.dot(&b).sqrt();
    if denom <= f32::EPSILON {
        0.0
    } else {
        a.dot(&b) / denom
    }
}
