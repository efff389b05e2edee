//! Ordering results.
//!
//! An `Ordering` records the visiting order a strategy chose for a location
//! set, together with its path length and how it was produced.

use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};
use crate::graph::{is_path, path_weight};
use crate::weights::Weights;

/// A visiting order over a location set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ordering {
    /// Location indices in visiting order
    pub path: Vec<usize>,
    /// Total path length
    pub weight: f64,
    /// Strategy that produced the order
    pub algorithm: String,
    /// Computation time in seconds
    pub computation_time: f64,
    /// Number of segments ordered, for segment based strategies
    pub num_segments: Option<usize>,
}

impl Ordering {
    /// Build from a path, which must be a permutation of `0..path.len()`.
    pub fn from_path(weights: &dyn Weights, path: Vec<usize>, algorithm: &str) -> Result<Self> {
        if !is_path(&path) {
            return Err(OrderError::invalid_path(format!(
                "{} returned a path that is not a permutation",
                algorithm
            )));
        }
        Ok(Ordering {
            weight: path_weight(weights, &path),
            path,
            algorithm: algorithm.to_string(),
            computation_time: 0.0,
            num_segments: None,
        })
    }

    /// True when every one of `n` locations is visited exactly once.
    pub fn is_complete(&self, n: usize) -> bool {
        self.path.len() == n && is_path(&self.path)
    }

    /// Position of a location in the order
    pub fn position(&self, location: usize) -> Option<usize> {
        self.path.iter().position(|&v| v == location)
    }

    /// Length of each step along the path.
    pub fn legs(&self, weights: &dyn Weights) -> Vec<f64> {
        self.path
            .windows(2)
            .map(|w| weights.value(w[0], w[1]))
            .collect()
    }

    /// Gap to a reference weight, in percent.
    pub fn gap_to(&self, reference: f64) -> f64 {
        if reference > 0.0 {
            100.0 * (self.weight - reference) / reference
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for Ordering {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Ordering ({})", self.algorithm)?;
        writeln!(f, "  Locations: {}", self.path.len())?;
        writeln!(f, "  Path length: {:.4}", self.weight)?;
        if let Some(segments) = self.num_segments {
            writeln!(f, "  Segments: {}", segments)?;
        }
        writeln!(f, "  Time: {:.3}s", self.computation_time)?;
        write!(f, "  Path: ")?;
        for (i, v) in self.path.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "{}", v)?;
            if i >= 30 && self.path.len() > 32 {
                write!(f, " -> ... ({} more)", self.path.len() - i - 1)?;
                break;
            }
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Coord;
    use crate::weights::EuclidWeights;

    fn weights() -> EuclidWeights {
        EuclidWeights::new(&[
            Coord::new(0.0, 0.0),
            Coord::new(3.0, 0.0),
            Coord::new(3.0, 4.0),
        ])
    }

    #[test]
    fn test_from_path() {
        let ordering = Ordering::from_path(&weights(), vec![0, 1, 2], "test").unwrap();
        assert!((ordering.weight - 7.0).abs() < 1e-12);
        assert!(ordering.is_complete(3));
        assert!(!ordering.is_complete(4));
        assert_eq!(ordering.position(2), Some(2));
        assert_eq!(ordering.legs(&weights()), vec![3.0, 4.0]);
    }

    #[test]
    fn test_rejects_non_permutation() {
        assert!(Ordering::from_path(&weights(), vec![0, 0, 2], "test").is_err());
    }

    #[test]
    fn test_gap_and_display() {
        let ordering = Ordering::from_path(&weights(), vec![1, 0, 2], "test").unwrap();
        assert!((ordering.gap_to(7.0) - 100.0 * (8.0 - 7.0) / 7.0).abs() < 1e-9);
        assert!(ordering.to_string().contains("1 -> 0 -> 2"));
    }

    #[test]
    fn test_serde() {
        let ordering = Ordering::from_path(&weights(), vec![2, 1, 0], "test").unwrap();
        let json = serde_json::to_string(&ordering).unwrap();
        let back: Ordering = serde_json::from_str(&json).unwrap();
        assert_eq!(back.path, vec![2, 1, 0]);
    }
}
