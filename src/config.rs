//! Tunables for the ordering pipeline and the exact solvers.
//!
//! These replace process-wide verbosity flags: every solve receives its
//! configuration explicitly, so solver values stay reentrant.

use serde::{Deserialize, Serialize};

/// Configuration of the segment-then-solve ordering pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    /// Branching degree the MST is reduced to before segmentation.
    /// Caps the number of segments handed to the exact solver.
    pub max_branching: usize,
    /// MST edges longer than `median_mult` times the median MST edge are
    /// cut before chains are built. Zero disables the cut.
    pub median_mult: f64,
    /// Optional externally proven upper limit for exact whole-set orderings.
    pub upper_limit: Option<f64>,
    /// Log solver progress at info level.
    pub verbose: bool,
}

impl Default for OrderConfig {
    fn default() -> Self {
        OrderConfig {
            max_branching: 30,
            median_mult: 2.5,
            upper_limit: None,
            verbose: false,
        }
    }
}

/// Configuration of a single branch-and-bound solve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BranchAndBoundConfig {
    /// Paths at or above this weight are never accepted.
    pub upper_limit: f64,
    pub verbose: bool,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        BranchAndBoundConfig {
            upper_limit: f64::MAX,
            verbose: false,
        }
    }
}

impl BranchAndBoundConfig {
    pub fn with_upper_limit(upper_limit: f64) -> Self {
        assert!(upper_limit >= 0.0, "upper limit must be non-negative");
        BranchAndBoundConfig {
            upper_limit,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OrderConfig::default();
        assert_eq!(config.max_branching, 30);
        assert!((config.median_mult - 2.5).abs() < 1e-12);
        assert!(config.upper_limit.is_none());
    }

    #[test]
    fn test_config_serde() {
        let config = OrderConfig {
            max_branching: 4,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: OrderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.max_branching, 4);
    }
}
