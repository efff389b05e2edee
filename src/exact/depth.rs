//! Exhaustive permutation search. Factorial time, so only useful as a
//! reference answer for other solvers on about a dozen vertices.

use crate::error::Result;
use crate::exact::BestPath;
use crate::shp::{identity, ShortHamPath};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, Default)]
pub struct DepthSearch;

impl DepthSearch {
    /// Try every arrangement of `path[start..end]` behind the placed prefix.
    /// Positions from `end` onwards are fixed.
    fn search(
        weights: &dyn Weights,
        best: &mut BestPath,
        path: &[usize],
        weight_so_far: f64,
        start: usize,
        end: usize,
    ) {
        if weight_so_far >= best.weight {
            return;
        }
        if start + 1 == end {
            let total = weight_so_far
                + (start..path.len())
                    .map(|i| weights.value(path[i - 1], path[i]))
                    .sum::<f64>();
            best.check(total, path);
            return;
        }
        let mut next = path.to_vec();
        for i in start..end {
            next.swap(start, i);
            let step = weights.value(next[start - 1], next[start]);
            Self::search(weights, best, &next, weight_so_far + step, start + 1, end);
        }
    }
}

impl ShortHamPath for DepthSearch {
    fn name(&self) -> &str {
        "DepthSearch"
    }

    fn path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        if n <= 1 {
            return Ok(identity(n));
        }
        let mut best = BestPath::new(f64::MAX);
        let mut path = identity(n);
        for i in 0..n {
            path.swap(0, i);
            Self::search(weights, &mut best, &path, 0.0, 1, n);
        }
        best.finish(weights, f64::MAX)
    }

    fn semi_enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        if n <= 1 {
            return Ok(identity(n));
        }
        let mut best = BestPath::new(f64::MAX);
        Self::search(weights, &mut best, &identity(n), 0.0, 1, n);
        best.finish(weights, f64::MAX)
    }

    fn enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        if n <= 2 {
            return Ok(identity(n));
        }
        let mut best = BestPath::new(f64::MAX);
        Self::search(weights, &mut best, &identity(n), 0.0, 1, n - 1);
        best.finish(weights, f64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::path_weight;
    use crate::instance::Coord;
    use crate::weights::EuclidWeights;

    #[test]
    fn test_collinear_points() {
        let coords: Vec<Coord> = [3.0, 0.0, 4.0, 1.0, 2.0]
            .iter()
            .map(|&x| Coord::new(x, 0.0))
            .collect();
        let w = EuclidWeights::new(&coords);
        let path = DepthSearch.path(&w, 5).unwrap();
        assert!((path_weight(&w, &path) - 4.0).abs() < 1e-12);

        let semi = DepthSearch.semi_enclosed_path(&w, 5).unwrap();
        assert_eq!(semi[0], 0);
        // x: 3, 4, 2, 1, 0
        assert!((path_weight(&w, &semi) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_enclosed_keeps_ends() {
        let coords = vec![
            Coord::new(0.0, 0.0),
            Coord::new(5.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
        ];
        let w = EuclidWeights::new(&coords);
        let path = DepthSearch.enclosed_path(&w, 4).unwrap();
        assert_eq!(path, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_base_cases() {
        let w = EuclidWeights::new(&[Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]);
        assert_eq!(DepthSearch.path(&w, 0).unwrap(), Vec::<usize>::new());
        assert_eq!(DepthSearch.path(&w, 1).unwrap(), vec![0]);
        assert_eq!(DepthSearch.path(&w, 2).unwrap().len(), 2);
        assert_eq!(DepthSearch.enclosed_path(&w, 2).unwrap(), vec![0, 1]);
    }
}
