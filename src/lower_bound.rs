//! Admissible lower bounds on shortest Hamiltonian path weight.
//!
//! Any Hamiltonian path is itself a spanning tree, so its weight is at least
//! the MST weight. No metric assumption is needed.

use crate::mst::{MinSpanTree, Prims};
use crate::weights::{MatrixWeights, ShiftWeights, Weights};

pub trait LowerBound {
    /// Bound on an open path over vertices `0..n`.
    fn shp(&self, n: usize) -> f64;

    /// Bound on a path over `0..n` that starts at vertex 0.
    fn semi_enclosed_shp(&self, n: usize) -> f64;

    /// Bound on a path over `0..n` from vertex 0 to vertex `n - 1`.
    fn enclosed_shp(&self, n: usize) -> f64;

    /// `shp` over an explicit vertex list.
    fn shp_of(&self, vertices: &[usize]) -> f64;

    /// `semi_enclosed_shp` with `vertices[0]` as the fixed start.
    fn semi_enclosed_shp_of(&self, vertices: &[usize]) -> f64;

    /// `enclosed_shp` with the first and last of `vertices` fixed.
    fn enclosed_shp_of(&self, vertices: &[usize]) -> f64;
}

pub struct MstLowerBound<'a> {
    weights: &'a dyn Weights,
    mst: Prims,
}

impl<'a> MstLowerBound<'a> {
    pub fn new(weights: &'a dyn Weights) -> Self {
        MstLowerBound {
            weights,
            mst: Prims,
        }
    }

    fn shp_with(&self, n: usize, weights: &dyn Weights) -> f64 {
        self.mst.weight(n, weights)
    }

    fn semi_enclosed_with(&self, n: usize, weights: &dyn Weights) -> f64 {
        if n <= 1 {
            return 0.0;
        } else if n == 2 {
            return weights.value(0, 1);
        }
        let first = (1..n)
            .map(|i| weights.value(0, i))
            .fold(f64::MAX, f64::min);
        first + self.mst.weight(n - 1, &ShiftWeights::new(weights, 1))
    }

    fn enclosed_with(&self, n: usize, weights: &dyn Weights) -> f64 {
        if n <= 1 {
            return 0.0;
        } else if n == 2 {
            return weights.value(0, 1);
        }
        let mut first = f64::MAX;
        let mut last = f64::MAX;
        for i in 1..n - 1 {
            first = first.min(weights.value(0, i));
            last = last.min(weights.value(n - 1, i));
        }
        first + self.mst.weight(n - 2, &ShiftWeights::new(weights, 1)) + last
    }
}

impl LowerBound for MstLowerBound<'_> {
    fn shp(&self, n: usize) -> f64 {
        self.shp_with(n, self.weights)
    }

    fn semi_enclosed_shp(&self, n: usize) -> f64 {
        self.semi_enclosed_with(n, self.weights)
    }

    fn enclosed_shp(&self, n: usize) -> f64 {
        self.enclosed_with(n, self.weights)
    }

    fn shp_of(&self, vertices: &[usize]) -> f64 {
        let sub = MatrixWeights::resequence(self.weights, vertices);
        self.shp_with(vertices.len(), &sub)
    }

    fn semi_enclosed_shp_of(&self, vertices: &[usize]) -> f64 {
        let sub = MatrixWeights::resequence(self.weights, vertices);
        self.semi_enclosed_with(vertices.len(), &sub)
    }

    fn enclosed_shp_of(&self, vertices: &[usize]) -> f64 {
        let sub = MatrixWeights::resequence(self.weights, vertices);
        self.enclosed_with(vertices.len(), &sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::DepthSearch;
    use crate::instance::LocationSet;
    use crate::shp::ShortHamPath;
    use crate::graph::path_weight;
    use crate::weights::EuclidWeights;

    #[test]
    fn test_bound_ordering() {
        for seed in 0..10 {
            let set = LocationSet::random(7, 400.0, 100.0, seed);
            let w = EuclidWeights::new(&set.coords);
            let lb = MstLowerBound::new(&w);
            let open = lb.shp(7);
            let semi = lb.semi_enclosed_shp(7);
            let enclosed = lb.enclosed_shp(7);
            assert!(open <= semi + 1e-9);
            assert!(semi <= enclosed + 1e-9);

            let depth = DepthSearch::default();
            let best = path_weight(&w, &depth.path(&w, 7).unwrap());
            assert!(open <= best + 1e-9);
            let best_semi = path_weight(&w, &depth.semi_enclosed_path(&w, 7).unwrap());
            assert!(semi <= best_semi + 1e-9);
            let best_enclosed = path_weight(&w, &depth.enclosed_path(&w, 7).unwrap());
            assert!(enclosed <= best_enclosed + 1e-9);
        }
    }

    #[test]
    fn test_small_cases_are_exact() {
        let set = LocationSet::random(3, 10.0, 10.0, 1);
        let w = EuclidWeights::new(&set.coords);
        let lb = MstLowerBound::new(&w);
        assert_eq!(lb.shp(1), 0.0);
        assert_eq!(lb.enclosed_shp(0), 0.0);
        let d = w.value(0, 1);
        assert!((lb.shp(2) - d).abs() < 1e-12);
        assert!((lb.semi_enclosed_shp(2) - d).abs() < 1e-12);
        assert!((lb.enclosed_shp(2) - d).abs() < 1e-12);
    }

    #[test]
    fn test_vertex_subset() {
        let set = LocationSet::random(8, 100.0, 100.0, 3);
        let w = EuclidWeights::new(&set.coords);
        let lb = MstLowerBound::new(&w);
        let vertices = [5, 2, 7, 0];
        let sub = MatrixWeights::resequence(&w, &vertices);
        let sub_lb = MstLowerBound::new(&sub);
        assert!((lb.shp_of(&vertices) - sub_lb.shp(4)).abs() < 1e-9);
        assert!((lb.semi_enclosed_shp_of(&vertices) - sub_lb.semi_enclosed_shp(4)).abs() < 1e-9);
        assert!((lb.enclosed_shp_of(&vertices) - sub_lb.enclosed_shp(4)).abs() < 1e-9);
        assert!((lb.enclosed_shp_of(&[3, 6]) - w.value(3, 6)).abs() < 1e-12);
    }
}
