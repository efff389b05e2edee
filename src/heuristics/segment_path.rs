//! Ordering whole segments with one shortest Hamiltonian path solve.
//!
//! Each segment contributes its terminals: one for a single vertex, two
//! otherwise. The weight between a segment's own two terminals is zero, and
//! every other pair costs its true distance plus a penalty `md` larger than
//! `m * D` (m terminals, D the largest terminal distance). Splitting a
//! segment's terminals then costs at least one extra penalty, more than any
//! saving in true distance, so the optimal terminal path keeps every segment
//! whole.

use crate::config::BranchAndBoundConfig;
use crate::error::{OrderError, Result};
use crate::exact::BranchAndBound;
use crate::graph::path_weight;
use crate::heuristics::segmenter::Segment;
use crate::shp::ShortHamPath;
use crate::weights::{MatrixWeights, Weights};

#[derive(Debug, Clone, Copy, Default)]
pub struct SegmentShortHamPath {
    pub verbose: bool,
}

impl SegmentShortHamPath {
    pub fn new(verbose: bool) -> Self {
        SegmentShortHamPath { verbose }
    }

    /// Reorder and reorient `segments` into a short path.
    pub fn path(&self, segments: Vec<Segment>, weights: &dyn Weights) -> Result<Vec<Segment>> {
        let num_segs = segments.len();
        if num_segs <= 1 {
            return Ok(segments);
        }

        // terminal -> (segment, is its start)
        let mut terminals = Vec::new();
        let mut owners = Vec::new();
        for (k, segment) in segments.iter().enumerate() {
            terminals.push(segment.start());
            owners.push((k, true));
            if segment.len() > 1 {
                terminals.push(segment.end());
                owners.push((k, false));
            }
        }
        let m = terminals.len();

        let mut max_distance: f64 = 0.0;
        for i in 0..m {
            for j in i + 1..m {
                max_distance = max_distance.max(weights.value(terminals[i], terminals[j]));
            }
        }
        if max_distance == 0.0 {
            // All terminals coincide: every order and orientation joins at zero cost.
            log::debug!("{} segments share one terminal point, keeping their order", num_segs);
            return Ok(segments);
        }
        let md = 1.001 * m as f64 * max_distance;

        let mut inflated = MatrixWeights::from_fn(m, |i, j| {
            if owners[i].0 == owners[j].0 {
                0.0
            } else {
                weights.value(terminals[i], terminals[j]) + md
            }
        });
        inflated.set_triangle_inequality(false);

        let lower_limit = 0.9999 * md * (num_segs - 1) as f64;
        let upper_limit = 1.0001 * md * num_segs as f64;
        if self.verbose {
            log::info!(
                "Ordering {} segments through {} terminals, D = {:.1}, mD = {:.1}",
                num_segs,
                m,
                max_distance,
                md
            );
        }

        let solver = BranchAndBound::new(BranchAndBoundConfig {
            upper_limit,
            verbose: self.verbose,
        });
        let order = solver.path(&inflated, m)?;

        let weight = path_weight(&inflated, &order);
        log::debug!(
            "Segment path weight {:.1} within [{:.1}, {:.1})",
            weight,
            lower_limit,
            upper_limit
        );
        if !(lower_limit <= weight && weight < upper_limit) {
            return Err(OrderError::invalid_path(format!(
                "segment path weight {} outside [{}, {})",
                weight, lower_limit, upper_limit
            )));
        }

        let mut slots: Vec<Option<Segment>> = segments.into_iter().map(Some).collect();
        let mut ordered = Vec::with_capacity(num_segs);
        let mut pos = 0;
        while pos < m {
            let (k, is_start) = owners[order[pos]];
            let mut segment = slots[k]
                .take()
                .ok_or_else(|| OrderError::invalid_path(format!("segment {} visited twice", k)))?;
            if segment.len() > 1 {
                let partner = order.get(pos + 1).map(|&t| owners[t].0);
                if partner != Some(k) {
                    return Err(OrderError::invalid_path(format!(
                        "terminals of segment {} are not adjacent",
                        k
                    )));
                }
                if !is_start {
                    segment.reverse();
                }
                pos += 2;
            } else {
                pos += 1;
            }
            ordered.push(segment);
        }
        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heuristics::segmenter::Segmenter;
    use crate::heuristics::BranchElimination;
    use crate::instance::{Coord, LocationSet};
    use crate::weights::EuclidWeights;

    fn flatten(segments: &[Segment]) -> Vec<usize> {
        segments.iter().flat_map(|s| s.iter()).collect()
    }

    #[test]
    fn test_single_segment_unchanged() {
        let w = EuclidWeights::new(&[Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]);
        let segments = vec![Segment::new(vec![1, 0])];
        let out = SegmentShortHamPath::default().path(segments.clone(), &w).unwrap();
        assert_eq!(out, segments);
    }

    #[test]
    fn test_coincident_terminals_keep_order() {
        let w = EuclidWeights::new(&vec![Coord::new(2.0, 2.0); 5]);
        let segments = vec![
            Segment::new(vec![0, 1]),
            Segment::single(2),
            Segment::new(vec![4, 3]),
        ];
        let out = SegmentShortHamPath::default().path(segments.clone(), &w).unwrap();
        assert_eq!(out, segments);
    }

    #[test]
    fn test_reorients_segments() {
        // Two chains on a line, given backwards and in the wrong order.
        let coords: Vec<Coord> = (0..6).map(|i| Coord::new(i as f64, 0.0)).collect();
        let w = EuclidWeights::new(&coords);
        let segments = vec![
            Segment::new(vec![3, 4, 5]),
            Segment::single(2),
            Segment::new(vec![1, 0]),
        ];
        let out = SegmentShortHamPath::default().path(segments, &w).unwrap();
        let path = flatten(&out);
        assert!((path_weight(&w, &path) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_segments_stay_whole() {
        for seed in 0..5 {
            let n = 40;
            let set = LocationSet::random(n, 400.0, 100.0, 300 + seed);
            let w = EuclidWeights::new(&set.coords);
            let edges = BranchElimination::default().edges(&w, n, 2);
            let segments = Segmenter::new(2.5).segments(&edges, &w);
            let before: Vec<Vec<usize>> = segments.iter().map(|s| s.iter().collect()).collect();

            let out = SegmentShortHamPath::default().path(segments, &w).unwrap();
            assert_eq!(out.len(), before.len());
            for segment in &out {
                let mut vertices: Vec<usize> = segment.iter().collect();
                if segment.is_reversed() {
                    vertices.reverse();
                }
                assert!(before.contains(&vertices));
            }
            let mut path = flatten(&out);
            path.sort();
            assert_eq!(path, (0..n).collect::<Vec<_>>());
        }
    }
}
