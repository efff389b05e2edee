//! Shortest Hamiltonian path solvers share one contract.
//!
//! A solver orders the vertices `0..n` of a weight model. It may pin vertex 0
//! as the first vertex (semi-enclosed), or pin both vertex 0 first and
//! vertex `n - 1` last (enclosed). `path_through` solves over an arbitrary
//! vertex list by resequencing the weights onto `0..k` first.

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::graph::is_path;
use crate::weights::{MatrixWeights, Weights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathShape {
    Open,
    SemiEnclosed,
    Enclosed,
}

impl PathShape {
    /// True when `path` respects the fixed endpoints of this shape.
    pub fn admits(&self, path: &[usize]) -> bool {
        let n = path.len();
        match self {
            PathShape::Open => true,
            PathShape::SemiEnclosed => n == 0 || path[0] == 0,
            PathShape::Enclosed => n <= 1 || (path[0] == 0 && path[n - 1] == n - 1),
        }
    }
}

pub trait ShortHamPath {
    fn name(&self) -> &str;

    /// Shortest open path over vertices `0..n`.
    fn path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>>;

    /// Shortest path over `0..n` starting at vertex 0.
    fn semi_enclosed_path(&self, _weights: &dyn Weights, _n: usize) -> Result<Vec<usize>> {
        Err(OrderError::unsupported(self.name(), PathShape::SemiEnclosed))
    }

    /// Shortest path over `0..n` from vertex 0 to vertex `n - 1`.
    fn enclosed_path(&self, _weights: &dyn Weights, _n: usize) -> Result<Vec<usize>> {
        Err(OrderError::unsupported(self.name(), PathShape::Enclosed))
    }

    fn solve(&self, shape: PathShape, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        match shape {
            PathShape::Open => self.path(weights, n),
            PathShape::SemiEnclosed => self.semi_enclosed_path(weights, n),
            PathShape::Enclosed => self.enclosed_path(weights, n),
        }
    }

    /// Solve over `vertices`, returned as a reordering of `vertices`. Fixed
    /// endpoints refer to the first and last entries of `vertices`.
    fn path_through(
        &self,
        shape: PathShape,
        weights: &dyn Weights,
        vertices: &[usize],
    ) -> Result<Vec<usize>> {
        let n = vertices.len();
        let local = MatrixWeights::resequence(weights, vertices);
        let order = self.solve(shape, &local, n)?;
        if order.len() != n || !is_path(&order) {
            return Err(OrderError::invalid_path(format!(
                "{} returned {:?} for {} vertices",
                self.name(),
                order,
                n
            )));
        }
        Ok(order.into_iter().map(|i| vertices[i]).collect())
    }
}

/// `0..n` in order.
pub(crate) fn identity(n: usize) -> Vec<usize> {
    (0..n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::DepthSearch;
    use crate::heuristics::BranchElimination;
    use crate::instance::LocationSet;
    use crate::weights::EuclidWeights;

    #[test]
    fn test_admits() {
        assert!(PathShape::Open.admits(&[2, 0, 1]));
        assert!(PathShape::SemiEnclosed.admits(&[0, 2, 1]));
        assert!(!PathShape::SemiEnclosed.admits(&[1, 2, 0]));
        assert!(PathShape::Enclosed.admits(&[0, 1, 2]));
        assert!(!PathShape::Enclosed.admits(&[0, 2, 1]));
    }

    #[test]
    fn test_path_through_maps_back() {
        let set = LocationSet::random(10, 100.0, 100.0, 11);
        let w = EuclidWeights::new(&set.coords);
        let vertices = [9, 4, 1, 7, 2];
        let path = DepthSearch::default()
            .path_through(PathShape::Enclosed, &w, &vertices)
            .unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path[0], 9);
        assert_eq!(path[4], 2);
        let mut sorted = path.clone();
        sorted.sort();
        assert_eq!(sorted, vec![1, 2, 4, 7, 9]);
    }

    #[test]
    fn test_unsupported_shape() {
        let set = LocationSet::random(5, 100.0, 100.0, 2);
        let w = EuclidWeights::new(&set.coords);
        let result = BranchElimination::default().solve(PathShape::Enclosed, &w, 5);
        assert!(matches!(
            result,
            Err(OrderError::Unsupported {
                shape: PathShape::Enclosed,
                ..
            })
        ));
    }
}
