//! Held-Karp dynamic programming over vertex subsets.
//!
//! `dp[mask][i]` is the lightest path that visits exactly the vertices in
//! `mask` and ends at `i`. O(2^n n^2) time and O(2^n n) space, with the subset
//! held in one machine word, so `n < 32`.

use crate::error::Result;
use crate::shp::{identity, PathShape, ShortHamPath};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, Default)]
pub struct DynamicProgramming;

impl DynamicProgramming {
    fn run(&self, shape: PathShape, weights: &dyn Weights, n: usize) -> Vec<usize> {
        assert!(n < 32, "dynamic programming needs n < 32, got {}", n);
        if n <= 1 || (n == 2 && shape == PathShape::Enclosed) {
            return identity(n);
        }

        let weight: Vec<f64> = (0..n * n)
            .map(|k| {
                let (i, j) = (k / n, k % n);
                if i == j {
                    0.0
                } else {
                    weights.value(i, j)
                }
            })
            .collect();
        let w = |i: usize, j: usize| weight[i * n + j];

        let subsets = 1usize << n;
        let mut dp = vec![f64::INFINITY; subsets * n];
        match shape {
            PathShape::Open => {
                for i in 0..n {
                    dp[(1 << i) * n + i] = 0.0;
                }
            }
            PathShape::SemiEnclosed | PathShape::Enclosed => dp[n] = 0.0,
        }

        for mask in 1..subsets {
            for i in 0..n {
                let bit = 1 << i;
                if mask & bit == 0 {
                    continue;
                }
                let prev = mask ^ bit;
                if prev == 0 {
                    continue;
                }
                let mut min = dp[mask * n + i];
                for j in 0..n {
                    if prev & (1 << j) != 0 {
                        min = min.min(dp[prev * n + j] + w(j, i));
                    }
                }
                dp[mask * n + i] = min;
            }
        }

        let mut path = vec![0; n];
        let mut current = subsets - 1;
        let mut last: Option<usize> = None;
        for pos in (0..n).rev() {
            let link = |j: usize| dp[current * n + j] + last.map_or(0.0, |l| w(j, l));
            let chosen = if pos == n - 1 && shape == PathShape::Enclosed {
                n - 1
            } else {
                let mut chosen = usize::MAX;
                for j in 0..n {
                    if current & (1 << j) != 0 && (chosen == usize::MAX || link(chosen) > link(j)) {
                        chosen = j;
                    }
                }
                chosen
            };
            path[pos] = chosen;
            current ^= 1 << chosen;
            last = Some(chosen);
        }
        path
    }
}

impl ShortHamPath for DynamicProgramming {
    fn name(&self) -> &str {
        "DynamicProgramming"
    }

    fn path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.run(PathShape::Open, weights, n))
    }

    fn semi_enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.run(PathShape::SemiEnclosed, weights, n))
    }

    fn enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.run(PathShape::Enclosed, weights, n))
    }
}
