//! Exact brute-force index under squared Euclidean distance.

use std::cmp::Ordering;

use jsonsearch_core::error::{Error, Result};
use jsonsearch_core::traits::VectorIndex;
use jsonsearch_core::types::{Metric, Neighbor};

/// Rows are stored back to back; slot `i` occupies `data[i * dim..(i + 1) * dim]`.
#[derive(Debug, Clone)]
pub struct FlatL2Index {
    dim: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    pub fn new(dim: usize) -> Self { Self { dim, data: Vec::new() } }

    pub fn with_capacity(dim: usize, rows: usize) -> Self {
        Self { dim, data: Vec::with_capacity(dim * rows) }
    }

    fn row(&self, slot: usize) -> &[f32] { &self.data[slot * self.dim..(slot + 1) * self.dim] }

    fn check_dim(&self, actual: usize) -> Result<()> {
        if actual != self.dim {
            return Err(Error::DimensionMismatch { expected: self.dim, actual });
        }
        Ok(())
    }
}

pub fn l2_squared(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn by_distance_then_slot(a: &Neighbor, b: &Neighbor) -> Ordering {
    a.distance.total_cmp(&b.distance).then(a.slot.cmp(&b.slot))
}

impl VectorIndex for FlatL2Index {
    fn metric(&self) -> Metric { Metric::L2Squared }
    fn dim(&self) -> usize { self.dim }
    fn len(&self) -> usize { if self.dim == 0 { 0 } else { self.data.len() / self.dim } }

    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        if self.dim == 0 {
            return Err(Error::Index("cannot add vectors to a zero-dimensional index".into()));
        }
        // Validate everything first so a bad row leaves the index unchanged.
        for v in vectors {
            self.check_dim(v.len())?;
        }
        self.data.reserve(vectors.len() * self.dim);
        for v in vectors {
            self.data.extend_from_slice(v);
        }
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dim(query.len())?;
        let mut hits: Vec<Neighbor> = (0..self.len())
            .map(|slot| Neighbor { slot, distance: l2_squared(self.row(slot), query) })
            .collect();
        let k = k.min(hits.len());
        if k == 0 {
            return Ok(Vec::new());
        }
        if k < hits.len() {
            hits.select_nth_unstable_by(k - 1, by_distance_then_slot);
            hits.truncate(k);
        }
        hits.sort_unstable_by(by_distance_then_slot);
        Ok(hits)
    }
}
