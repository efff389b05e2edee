//! Branch and bound for the shortest Hamiltonian path.
//!
//! Depth-first over partial permutations. A node is pruned when a verifier
//! shows its prefix can be shortened locally, or when the weight so far plus
//! an MST bound on the unplaced vertices cannot beat the best path. The best
//! path is seeded by branch elimination, so pruning bites from the first
//! descent. Each recursion level owns one path buffer.

use std::fmt::Write;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::config::BranchAndBoundConfig;
use crate::error::Result;
use crate::exact::verify::{standard_verifiers, Verifier};
use crate::exact::BestPath;
use crate::graph::path_weight;
use crate::heuristics::BranchElimination;
use crate::lower_bound::{LowerBound, MstLowerBound};
use crate::shp::{identity, PathShape, ShortHamPath};
use crate::weights::Weights;

/// Counters for one solve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Pruning rules, in the order they are tried.
    pub rules: Vec<String>,
    /// `prunes[rule][level]`
    pub prunes: Vec<Vec<u64>>,
    /// Nodes entered per level.
    pub calls: Vec<u64>,
    pub best_checks: u64,
    pub best_replacements: u64,
    /// Seconds.
    pub elapsed: f64,
}

impl SearchStats {
    fn new(rules: Vec<String>, n: usize) -> Self {
        SearchStats {
            prunes: vec![vec![0; n]; rules.len()],
            rules,
            calls: vec![0; n],
            ..Default::default()
        }
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.iter().sum()
    }

    pub fn total_prunes(&self) -> u64 {
        self.prunes.iter().flatten().sum()
    }

    /// Table of prunes per thousand calls, by level and rule.
    pub fn report(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "   Execution time was {:.3} s", self.elapsed);
        let _ = writeln!(out, "   Number of optimum checks was {}.", self.best_checks);
        let _ = writeln!(
            out,
            "   Optimum path was replaced {} times.\n",
            self.best_replacements
        );

        let _ = write!(out, "   Level  ");
        for rule in &self.rules {
            let _ = write!(out, " {:>8}", rule);
        }
        let _ = writeln!(out, " {:>8}       Calls", "All");

        for (level, &calls) in self.calls.iter().enumerate() {
            if calls == 0 {
                continue;
            }
            let _ = write!(out, "     {:3}  ", level);
            let mut all = 0;
            for rule in &self.prunes {
                let prunes = rule[level];
                all += prunes;
                if prunes == 0 {
                    let _ = write!(out, "         ");
                } else {
                    let _ = write!(out, " {:8}", 1000 * prunes / calls);
                }
            }
            let _ = writeln!(out, " {:8} {:11}", 1000 * all / calls, calls);
        }

        let _ = write!(out, "   Total  ");
        for rule in &self.prunes {
            let _ = write!(out, " {:8}", rule.iter().sum::<u64>());
        }
        let _ = writeln!(out, " {:8} {:11}", self.total_prunes(), self.total_calls());
        out
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound {
    pub config: BranchAndBoundConfig,
}

impl BranchAndBound {
    pub fn new(config: BranchAndBoundConfig) -> Self {
        BranchAndBound { config }
    }

    pub fn with_upper_limit(upper_limit: f64) -> Self {
        Self::new(BranchAndBoundConfig::with_upper_limit(upper_limit))
    }

    /// Solve and return the search counters along with the path.
    pub fn solve_with_stats(
        &self,
        shape: PathShape,
        weights: &dyn Weights,
        n: usize,
    ) -> Result<(Vec<usize>, SearchStats)> {
        let timer = Instant::now();
        if self.config.verbose {
            log::info!("Shortest Hamiltonian path, {:?}, {} vertices", shape, n);
        }
        if n <= 1 || (n == 2 && shape == PathShape::Enclosed) {
            return Ok((identity(n), SearchStats::default()));
        }

        let verifiers = standard_verifiers(shape != PathShape::Open);
        let rules = verifiers
            .iter()
            .map(|v| v.name().to_string())
            .chain(std::iter::once("Bound".to_string()))
            .collect();

        let mut search = Search {
            weights,
            bound: MstLowerBound::new(weights),
            verifiers,
            shape,
            n,
            end: if shape == PathShape::Enclosed { n - 1 } else { n },
            paths: vec![vec![0; n]; n],
            best: BestPath::new(self.config.upper_limit),
            stats: SearchStats::new(rules, n),
            verbose: self.config.verbose,
        };

        match shape {
            PathShape::Open => {
                let mut path = BranchElimination::default().path(weights, n)?;
                search.best.check(path_weight(weights, &path), &path);
                for i in 0..n - 1 {
                    path.swap(0, i);
                    search.paths[0].copy_from_slice(&path);
                    search.descend(0, 0.0);
                }
            }
            PathShape::SemiEnclosed => {
                let path = BranchElimination::default().semi_enclosed_path(weights, n)?;
                search.best.check(path_weight(weights, &path), &path);
                search.paths[0].copy_from_slice(&path);
                search.descend(0, 0.0);
            }
            PathShape::Enclosed => {
                let path = identity(n);
                search.best.check(path_weight(weights, &path), &path);
                search.paths[0].copy_from_slice(&path);
                search.descend(0, 0.0);
            }
        }

        let Search {
            best, mut stats, ..
        } = search;
        stats.best_checks = best.checks;
        stats.best_replacements = best.replacements;
        stats.elapsed = timer.elapsed().as_secs_f64();
        let weight = best.weight;
        let path = best.finish(weights, self.config.upper_limit)?;

        if self.config.verbose {
            log::info!("Optimum path has a weight of {:.4}\n{}", weight, stats.report());
        } else {
            log::debug!(
                "Branch and bound on {} vertices: weight {:.4}, {} calls, {:.3} s",
                n,
                weight,
                stats.total_calls(),
                stats.elapsed
            );
        }
        Ok((path, stats))
    }
}

struct Search<'a> {
    weights: &'a dyn Weights,
    bound: MstLowerBound<'a>,
    verifiers: Vec<Box<dyn Verifier>>,
    shape: PathShape,
    n: usize,
    /// Positions `end..n` are fixed.
    end: usize,
    paths: Vec<Vec<usize>>,
    best: BestPath,
    stats: SearchStats,
    verbose: bool,
}

impl Search<'_> {
    /// Extend `paths[level]`, whose positions `0..=level` are placed.
    fn descend(&mut self, level: usize, weight_so_far: f64) {
        if self.verbose && level == 0 {
            log::info!("   Top index = {}", self.paths[0][0]);
        }
        self.stats.calls[level] += 1;

        if level + 2 == self.end {
            let path = &self.paths[level];
            let mut total = weight_so_far + self.weights.value(path[level], path[level + 1]);
            if self.shape == PathShape::Enclosed {
                total += self.weights.value(path[self.n - 2], path[self.n - 1]);
            }
            self.best.check(total, path);
            return;
        }

        let path = &self.paths[level];
        for (rule, verifier) in self.verifiers.iter().enumerate() {
            if verifier.reject(self.weights, path, level) {
                self.stats.prunes[rule][level] += 1;
                return;
            }
        }

        let remaining = match self.shape {
            PathShape::Enclosed => self.bound.enclosed_shp_of(&path[level..]),
            _ => self.bound.semi_enclosed_shp_of(&path[level..self.end]),
        };
        if self.best.weight <= weight_so_far + remaining {
            let rule = self.verifiers.len();
            self.stats.prunes[rule][level] += 1;
            return;
        }

        for i in level + 1..self.end {
            let (head, tail) = self.paths.split_at_mut(level + 1);
            let current = &head[level];
            let next = &mut tail[0];
            next.copy_from_slice(current);
            next.swap(level + 1, i);
            let step = self.weights.value(current[level], current[i]);
            self.descend(level + 1, weight_so_far + step);
        }
    }
}

impl ShortHamPath for BranchAndBound {
    fn name(&self) -> &str {
        "BranchAndBound"
    }

    fn path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.solve_with_stats(PathShape::Open, weights, n)?.0)
    }

    fn semi_enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.solve_with_stats(PathShape::SemiEnclosed, weights, n)?.0)
    }

    fn enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        Ok(self.solve_with_stats(PathShape::Enclosed, weights, n)?.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrderError;
    use crate::exact::DynamicProgramming;
    use crate::graph::is_path;
    use crate::instance::{Coord, LocationSet};
    use crate::weights::EuclidWeights;

    #[test]
    fn test_collinear() {
        let coords: Vec<Coord> = [5.0, 1.0, 3.0, 0.0, 4.0, 2.0]
            .iter()
            .map(|&x| Coord::new(x, 0.0))
            .collect();
        let w = EuclidWeights::new(&coords);
        let path = BranchAndBound::default().path(&w, 6).unwrap();
        assert!((path_weight(&w, &path) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_coincident_points() {
        let coords = vec![Coord::new(2.0, 2.0); 5];
        let w = EuclidWeights::new(&coords);
        let path = BranchAndBound::default().path(&w, 5).unwrap();
        assert!(is_path(&path));
        assert_eq!(path_weight(&w, &path), 0.0);
    }

    #[test]
    fn test_matches_dynamic_programming() {
        for seed in 0..4 {
            let set = LocationSet::random(11, 400.0, 100.0, 40 + seed);
            let w = EuclidWeights::new(&set.coords);
            for shape in [PathShape::Open, PathShape::SemiEnclosed, PathShape::Enclosed] {
                let exact = DynamicProgramming.solve(shape, &w, 11).unwrap();
                let (path, stats) = BranchAndBound::default()
                    .solve_with_stats(shape, &w, 11)
                    .unwrap();
                assert!(shape.admits(&path));
                assert!((path_weight(&w, &path) - path_weight(&w, &exact)).abs() < 1e-6);
                assert!(stats.total_calls() > 0);
                assert_eq!(stats.rules.len(), 4);
            }
        }
    }

    #[test]
    fn test_upper_limit_too_low() {
        let set = LocationSet::random(8, 400.0, 100.0, 9);
        let w = EuclidWeights::new(&set.coords);
        let result = BranchAndBound::with_upper_limit(1e-3).path(&w, 8);
        match result {
            Err(err @ OrderError::UpperLimitTooLow { .. }) => assert!(err.is_retryable()),
            other => panic!("expected UpperLimitTooLow, got {:?}", other),
        }
    }

    #[test]
    fn test_generous_upper_limit() {
        let set = LocationSet::random(8, 400.0, 100.0, 9);
        let w = EuclidWeights::new(&set.coords);
        let exact = path_weight(&w, &DynamicProgramming.path(&w, 8).unwrap());
        let path = BranchAndBound::with_upper_limit(exact * 1.01).path(&w, 8).unwrap();
        assert!((path_weight(&w, &path) - exact).abs() < 1e-6);
    }

    #[test]
    fn test_report() {
        let set = LocationSet::random(9, 400.0, 100.0, 2);
        let w = EuclidWeights::new(&set.coords);
        let (_, stats) = BranchAndBound::default()
            .solve_with_stats(PathShape::Open, &w, 9)
            .unwrap();
        let report = stats.report();
        assert!(report.contains("Reverse"));
        assert!(report.contains("Bound"));
        assert!(stats.best_checks >= 1);
    }
}
