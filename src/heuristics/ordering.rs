//! Location ordering strategies.
//!
//! Each strategy maps a set of coordinates to a visiting order. The default,
//! `SegmentShpOrder`, reduces the minimum spanning tree to bounded branching,
//! cuts it into chains and orders the chains exactly. That keeps the exact
//! sub-problem small however many locations there are.

use std::time::Instant;

use ordered_float::OrderedFloat;

use crate::config::{BranchAndBoundConfig, OrderConfig};
use crate::error::{OrderError, Result};
use crate::exact::{BranchAndBound, DynamicProgramming};
use crate::heuristics::branch_elimination::BranchElimination;
use crate::heuristics::line_fit::LineFit;
use crate::heuristics::segment_path::SegmentShortHamPath;
use crate::heuristics::segmenter::Segmenter;
use crate::instance::Coord;
use crate::mst::{MinSpanTree, Prims};
use crate::shp::{identity, ShortHamPath};
use crate::solution::Ordering;
use crate::weights::{EuclidWeights, Weights};

pub trait OrderLocations {
    fn name(&self) -> &str;

    /// Visiting order of `coords`, a permutation of `0..coords.len()`.
    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>>;

    /// Order and record weight and timing.
    fn solve(&self, coords: &[Coord]) -> Result<Ordering> {
        let start = Instant::now();
        let path = self.order(coords)?;
        let elapsed = start.elapsed().as_secs_f64();
        let mut ordering = Ordering::from_path(&EuclidWeights::new(coords), path, self.name())?;
        ordering.computation_time = elapsed;
        Ok(ordering)
    }
}

/// MST, branch elimination down to `max_branching`, segmentation, then an
/// exact ordering of the segments.
#[derive(Debug, Clone, Default)]
pub struct SegmentShpOrder {
    pub config: OrderConfig,
}

impl SegmentShpOrder {
    pub fn new(config: OrderConfig) -> Self {
        SegmentShpOrder { config }
    }

    /// Order vertices `0..n` of any weight model. Returns the path and the
    /// number of segments that were ordered.
    pub fn order_weights(&self, n: usize, weights: &dyn Weights) -> Result<(Vec<usize>, usize)> {
        if n <= 2 {
            return Ok((identity(n), n.min(1)));
        }

        let mut edges = Prims.edges(n, weights);
        BranchElimination::default().reduce_branching(weights, &mut edges, self.config.max_branching);

        let segments = Segmenter::new(self.config.median_mult).segments(&edges, weights);
        let num_segments = segments.len();
        let ordered = SegmentShortHamPath::new(self.config.verbose).path(segments, weights)?;

        let mut path = vec![0; n];
        let mut start = 0;
        for segment in &ordered {
            segment.load(&mut path, start);
            start += segment.len();
        }
        assert_eq!(start, n, "segments do not cover every vertex");
        Ok((path, num_segments))
    }
}

impl OrderLocations for SegmentShpOrder {
    fn name(&self) -> &str {
        "segment-shp"
    }

    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>> {
        let weights = EuclidWeights::new(coords);
        Ok(self.order_weights(coords.len(), &weights)?.0)
    }

    fn solve(&self, coords: &[Coord]) -> Result<Ordering> {
        let start = Instant::now();
        let weights = EuclidWeights::new(coords);
        let (path, num_segments) = self.order_weights(coords.len(), &weights)?;
        let mut ordering = Ordering::from_path(&weights, path, self.name())?;
        ordering.computation_time = start.elapsed().as_secs_f64();
        ordering.num_segments = Some(num_segments);
        Ok(ordering)
    }
}

/// Branch elimination straight to a path.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchEliminateOrder;

impl OrderLocations for BranchEliminateOrder {
    fn name(&self) -> &str {
        "branch-eliminate"
    }

    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>> {
        let weights = EuclidWeights::new(coords);
        BranchElimination::default().path(&weights, coords.len())
    }
}

/// Exact branch and bound over every location. Practical up to a few dozen.
#[derive(Debug, Clone, Copy, Default)]
pub struct FullShpOrder {
    pub config: BranchAndBoundConfig,
}

impl OrderLocations for FullShpOrder {
    fn name(&self) -> &str {
        "full-shp"
    }

    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>> {
        if coords.len() <= 1 {
            return Ok(identity(coords.len()));
        }
        let weights = EuclidWeights::new(coords);
        BranchAndBound::new(self.config).path(&weights, coords.len())
    }
}

/// Exact Held-Karp over every location, fewer than 32 of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicOrder;

impl OrderLocations for DynamicOrder {
    fn name(&self) -> &str {
        "dynamic"
    }

    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>> {
        if coords.len() >= 32 {
            return Err(OrderError::invalid_input(format!(
                "dynamic programming handles fewer than 32 locations, got {}",
                coords.len()
            )));
        }
        let weights = EuclidWeights::new(coords);
        DynamicProgramming.path(&weights, coords.len())
    }
}

/// Sort by position along the least-squares line through the locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectOntoLineOrder;

impl OrderLocations for ProjectOntoLineOrder {
    fn name(&self) -> &str {
        "project-line"
    }

    fn order(&self, coords: &[Coord]) -> Result<Vec<usize>> {
        if coords.len() <= 1 {
            return Ok(identity(coords.len()));
        }
        let fit = LineFit::fit(coords);
        let projections: Vec<f64> = coords.iter().map(|c| fit.project(c)).collect();
        let mut path = identity(coords.len());
        path.sort_by_key(|&i| OrderedFloat(projections[i]));
        Ok(path)
    }
}

/// Strategy by its command line name.
pub fn strategy(name: &str, config: &OrderConfig) -> Option<Box<dyn OrderLocations + Send + Sync>> {
    match name {
        "segment-shp" => Some(Box::new(SegmentShpOrder::new(config.clone()))),
        "branch-eliminate" => Some(Box::new(BranchEliminateOrder)),
        "full-shp" => Some(Box::new(FullShpOrder {
            config: BranchAndBoundConfig {
                upper_limit: config.upper_limit.unwrap_or(f64::MAX),
                verbose: config.verbose,
            },
        })),
        "dynamic" => Some(Box::new(DynamicOrder)),
        "project-line" => Some(Box::new(ProjectOntoLineOrder)),
        _ => None,
    }
}

/// Names accepted by `strategy`.
pub const STRATEGIES: [&str; 5] = [
    "segment-shp",
    "branch-eliminate",
    "full-shp",
    "dynamic",
    "project-line",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{is_path, path_weight};
    use crate::instance::LocationSet;

    #[test]
    fn test_all_strategies_return_permutations() {
        let set = LocationSet::random(18, 400.0, 100.0, 61);
        let config = OrderConfig::default();
        for name in STRATEGIES {
            let orderer = strategy(name, &config).unwrap();
            let ordering = orderer.solve(&set.coords).unwrap();
            assert!(ordering.is_complete(18), "{}", name);
            assert_eq!(ordering.algorithm, name);
        }
        assert!(strategy("nearest", &config).is_none());
    }

    #[test]
    fn test_tiny_inputs() {
        let config = OrderConfig::default();
        for n in 0..3 {
            let set = LocationSet::random(n, 10.0, 10.0, 1);
            for name in STRATEGIES {
                let path = strategy(name, &config).unwrap().order(&set.coords).unwrap();
                assert_eq!(path.len(), n, "{} at n = {}", name, n);
                assert!(is_path(&path));
            }
        }
    }

    #[test]
    fn test_segment_order_coincident_locations() {
        for n in [3, 4, 5, 8] {
            let coords = vec![Coord::new(2.0, 2.0); n];
            let ordering = SegmentShpOrder::default().solve(&coords).unwrap();
            assert!(ordering.is_complete(n), "n = {}", n);
            assert_eq!(ordering.weight, 0.0);
        }
    }

    #[test]
    fn test_dynamic_rejects_large_sets() {
        let set = LocationSet::random(40, 400.0, 100.0, 5);
        let err = DynamicOrder.order(&set.coords).unwrap_err();
        assert!(matches!(err, OrderError::InvalidInput(_)), "{:?}", err);
    }

    #[test]
    fn test_segment_order_is_close_to_exact() {
        let order = SegmentShpOrder::default();
        for seed in 0..4 {
            let set = LocationSet::random(12, 400.0, 100.0, 900 + seed);
            let w = EuclidWeights::new(&set.coords);
            let ordering = order.solve(&set.coords).unwrap();
            assert!(ordering.num_segments.unwrap() >= 1);
            let exact = path_weight(&w, &DynamicOrder.order(&set.coords).unwrap());
            assert!(ordering.weight >= exact - 1e-9);
            assert!(ordering.weight <= 1.5 * exact);
        }
    }

    #[test]
    fn test_segment_order_scales() {
        let config = OrderConfig {
            max_branching: 2,
            ..Default::default()
        };
        let set = LocationSet::random(120, 4000.0, 1000.0, 77);
        let ordering = SegmentShpOrder::new(config).solve(&set.coords).unwrap();
        assert!(ordering.is_complete(120));
        let line = ProjectOntoLineOrder.solve(&set.coords).unwrap();
        assert!(ordering.weight < line.weight);
    }

    #[test]
    fn test_project_onto_line() {
        let coords = vec![
            Coord::new(4.0, 4.1),
            Coord::new(0.0, 0.0),
            Coord::new(2.0, 1.9),
            Coord::new(1.0, 1.0),
        ];
        assert_eq!(ProjectOntoLineOrder.order(&coords).unwrap(), vec![1, 3, 2, 0]);
    }

    #[test]
    fn test_project_onto_line_is_stable() {
        // Symmetric cloud: zero direction, every projection ties.
        let coords = vec![
            Coord::new(1.0, 0.0),
            Coord::new(-1.0, 0.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, -1.0),
        ];
        assert_eq!(ProjectOntoLineOrder.order(&coords).unwrap(), vec![0, 1, 2, 3]);
    }
}
