//! Exact shortest Hamiltonian path solvers.
//!
//! `DepthSearch` enumerates every permutation and is only a reference for
//! testing. `DynamicProgramming` runs Held-Karp over vertex subsets.
//! `BranchAndBound` prunes a depth-first search with local-move verifiers and
//! MST lower bounds, and is the solver the ordering pipeline relies on.

pub mod branch_bound;
pub mod depth;
pub mod dynamic;
pub mod verify;

pub use branch_bound::*;
pub use depth::*;
pub use dynamic::*;
pub use verify::*;

use crate::error::{OrderError, Result};
use crate::graph::{is_path, path_weight};
use crate::weights::Weights;

/// Best path found so far during one solve. Never shared between solves.
#[derive(Debug, Clone)]
pub(crate) struct BestPath {
    pub path: Option<Vec<usize>>,
    pub weight: f64,
    pub checks: u64,
    pub replacements: u64,
}

impl BestPath {
    /// Only paths strictly lighter than `limit` are accepted.
    pub fn new(limit: f64) -> Self {
        BestPath {
            path: None,
            weight: limit,
            checks: 0,
            replacements: 0,
        }
    }

    /// Keep `path` when `weight` beats the current best.
    pub fn check(&mut self, weight: f64, path: &[usize]) -> bool {
        self.checks += 1;
        if weight >= self.weight {
            return false;
        }
        self.replacements += 1;
        self.weight = weight;
        match &mut self.path {
            Some(best) => best.copy_from_slice(path),
            None => self.path = Some(path.to_vec()),
        }
        log::trace!("Best so far with weight {:.4}", weight);
        true
    }

    /// The best path, validated as a permutation whose weight matches.
    pub fn finish(self, weights: &dyn Weights, limit: f64) -> Result<Vec<usize>> {
        let path = self
            .path
            .ok_or(OrderError::UpperLimitTooLow { limit })?;
        if !is_path(&path) {
            return Err(OrderError::invalid_path(format!("{:?}", path)));
        }
        let actual = path_weight(weights, &path);
        if (actual - self.weight).abs() > self.weight.abs() / 100.0 + 1e-9 {
            return Err(OrderError::invalid_path(format!(
                "tracked weight {} but path weighs {}",
                self.weight, actual
            )));
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::BranchElimination;
    use crate::instance::LocationSet;
    use crate::shp::{PathShape, ShortHamPath};
    use crate::weights::EuclidWeights;

    fn weight_of(solver: &dyn ShortHamPath, shape: PathShape, w: &EuclidWeights, n: usize) -> f64 {
        let path = solver.solve(shape, w, n).unwrap();
        assert_eq!(path.len(), n);
        assert!(is_path(&path));
        assert!(shape.admits(&path), "{} broke {:?}: {:?}", solver.name(), shape, path);
        path_weight(w, &path)
    }

    #[test]
    fn test_exact_solvers_agree() {
        let depth = DepthSearch::default();
        let dynamic = DynamicProgramming::default();
        let bab = BranchAndBound::default();
        for n in 1..=8 {
            for seed in 0..4 {
                let set = LocationSet::random(n, 400.0, 100.0, 100 * n as u64 + seed);
                let w = EuclidWeights::new(&set.coords);
                for shape in [PathShape::Open, PathShape::SemiEnclosed, PathShape::Enclosed] {
                    let expected = weight_of(&depth, shape, &w, n);
                    let dp = weight_of(&dynamic, shape, &w, n);
                    let bb = weight_of(&bab, shape, &w, n);
                    assert!((dp - expected).abs() < 1e-6, "n={} {:?} dp {} vs {}", n, shape, dp, expected);
                    assert!((bb - expected).abs() < 1e-6, "n={} {:?} bab {} vs {}", n, shape, bb, expected);
                }
            }
        }
    }

    #[test]
    fn test_branch_and_bound_matches_dynamic_at_twelve() {
        let dynamic = DynamicProgramming::default();
        let bab = BranchAndBound::default();
        for seed in 0..3 {
            let set = LocationSet::random(12, 400.0, 100.0, seed);
            let w = EuclidWeights::new(&set.coords);
            let dp = weight_of(&dynamic, PathShape::Open, &w, 12);
            let bb = weight_of(&bab, PathShape::Open, &w, 12);
            assert!((dp - bb).abs() < 1e-6);
        }
    }

    #[test]
    fn test_branch_elimination_is_close() {
        let be = BranchElimination::default();
        let bab = BranchAndBound::default();
        let (mut total_approx, mut total_exact) = (0.0, 0.0);
        for seed in 0..10 {
            let set = LocationSet::random(14, 400.0, 100.0, 7000 + seed);
            let w = EuclidWeights::new(&set.coords);
            let approx = weight_of(&be, PathShape::Open, &w, 14);
            let exact = weight_of(&bab, PathShape::Open, &w, 14);
            assert!(exact <= approx + 1e-9);
            assert!(approx <= 1.25 * exact, "seed {}: {} vs {}", seed, approx, exact);
            total_approx += approx;
            total_exact += exact;
        }
        assert!(total_approx <= 1.10 * total_exact);
    }

    #[test]
    fn test_best_path_limit() {
        let mut best = BestPath::new(10.0);
        assert!(!best.check(12.0, &[0, 1]));
        assert!(best.check(4.0, &[1, 0]));
        assert!(!best.check(4.0, &[0, 1]));
        assert_eq!(best.checks, 3);
        assert_eq!(best.replacements, 1);
    }
}
