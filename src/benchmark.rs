//! Benchmarking and experimentation module.
//!
//! Runs every ordering strategy on seeded random location sets (or sets
//! loaded from disk), collects statistics, and compares path lengths and
//! running times.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::config::{BranchAndBoundConfig, OrderConfig};
use crate::error::Result;
use crate::heuristics::ordering::{
    BranchEliminateOrder, DynamicOrder, FullShpOrder, OrderLocations, ProjectOntoLineOrder,
    SegmentShpOrder,
};
use crate::instance::LocationSet;

/// Result of running a single strategy on a location set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Strategy name
    pub algorithm: String,
    /// Location set name
    pub instance: String,
    /// Number of locations
    pub n: usize,
    /// Path length
    pub weight: f64,
    /// Computation time in seconds
    pub time: f64,
    /// Segments ordered (segment strategy only)
    pub num_segments: Option<usize>,
    /// Gap to the shortest path any strategy found on this set, in percent
    pub gap_to_best: Option<f64>,
    /// RFC 3339 time the run finished
    pub timestamp: String,
}

/// Aggregated statistics for a strategy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_instances: usize,
    pub avg_weight: f64,
    pub best_weight: f64,
    pub worst_weight: f64,
    pub std_weight: f64,
    pub avg_time: f64,
    pub total_time: f64,
    pub avg_gap: Option<f64>,
}

/// Benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Location counts to generate
    pub sizes: Vec<usize>,
    /// Random sets per size
    pub instances_per_size: usize,
    /// Base seed; set `k` of size `n` uses `seed + 1000 n + k`
    pub seed: u64,
    /// Extent of the random rectangle
    pub width: f64,
    pub height: f64,
    /// Evaluate sets in parallel
    pub parallel: bool,
    /// Largest set handed to exact branch and bound
    pub full_shp_max_n: usize,
    /// Largest set handed to dynamic programming
    pub dynamic_max_n: usize,
    /// Pipeline tunables for the segment strategy
    pub order: OrderConfig,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            sizes: vec![10, 25, 100, 500],
            instances_per_size: 5,
            seed: 42,
            width: 400.0,
            height: 100.0,
            parallel: true,
            full_shp_max_n: 30,
            dynamic_max_n: 16,
            order: OrderConfig::default(),
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// The random location sets described by the configuration.
    pub fn generate_instances(&self) -> Vec<LocationSet> {
        let c = &self.config;
        c.sizes
            .iter()
            .flat_map(|&n| {
                (0..c.instances_per_size).map(move |k| {
                    LocationSet::random(n, c.width, c.height, c.seed + 1000 * n as u64 + k as u64)
                })
            })
            .collect()
    }

    /// Strategies worth running on `n` locations.
    fn strategies_for(&self, n: usize) -> Vec<Box<dyn OrderLocations + Send + Sync>> {
        let mut strategies: Vec<Box<dyn OrderLocations + Send + Sync>> = vec![
            Box::new(SegmentShpOrder::new(self.config.order.clone())),
            Box::new(BranchEliminateOrder),
            Box::new(ProjectOntoLineOrder),
        ];
        if n <= self.config.full_shp_max_n {
            strategies.push(Box::new(FullShpOrder {
                config: BranchAndBoundConfig::default(),
            }));
        }
        if n <= self.config.dynamic_max_n {
            strategies.push(Box::new(DynamicOrder));
        }
        strategies
    }

    /// Run every applicable strategy on one set.
    pub fn run_instance(&self, set: &LocationSet) -> Vec<AlgorithmResult> {
        let mut results = Vec::new();
        for strategy in self.strategies_for(set.len()) {
            match strategy.solve(&set.coords) {
                Ok(ordering) => results.push(AlgorithmResult {
                    algorithm: ordering.algorithm,
                    instance: set.name.clone(),
                    n: set.len(),
                    weight: ordering.weight,
                    time: ordering.computation_time,
                    num_segments: ordering.num_segments,
                    gap_to_best: None,
                    timestamp: Utc::now().to_rfc3339(),
                }),
                Err(e) => log::error!("{} failed on {}: {}", strategy.name(), set.name, e),
            }
        }

        let best = results.iter().map(|r| r.weight).fold(f64::INFINITY, f64::min);
        if best.is_finite() {
            for r in &mut results {
                r.gap_to_best = Some(if best > 0.0 {
                    (r.weight - best) / best * 100.0
                } else {
                    0.0
                });
            }
        }
        results
    }

    /// Run on the given sets, with a progress bar.
    pub fn run_on_instances(&mut self, sets: &[LocationSet]) {
        let progress = ProgressBar::new(sets.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let run = |set: &LocationSet| {
            log::info!("Running benchmark on location set: {}", set.name);
            let results = self.run_instance(set);
            progress.inc(1);
            results
        };
        let batches: Vec<Vec<AlgorithmResult>> = if self.config.parallel {
            sets.par_iter().map(run).collect()
        } else {
            sets.iter().map(run).collect()
        };
        progress.finish_with_message("done");

        self.results.extend(batches.into_iter().flatten());
    }

    /// Generate the configured random sets and run on them.
    pub fn run(&mut self) {
        let sets = self.generate_instances();
        self.run_on_instances(&sets);
    }

    /// Compute statistics for each strategy, shortest average first.
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut by_algorithm: HashMap<&str, Vec<&AlgorithmResult>> = HashMap::new();
        for result in &self.results {
            by_algorithm
                .entry(result.algorithm.as_str())
                .or_default()
                .push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = by_algorithm
            .into_iter()
            .map(|(algorithm, results)| {
                let weights: Vec<f64> = results.iter().map(|r| r.weight).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_best).collect();

                AlgorithmStatistics {
                    algorithm: algorithm.to_string(),
                    num_instances: results.len(),
                    avg_weight: weights.iter().mean(),
                    best_weight: weights.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_weight: weights.iter().cloned().fold(0.0, f64::max),
                    std_weight: if weights.len() > 1 {
                        weights.iter().std_dev()
                    } else {
                        0.0
                    },
                    avg_time: times.iter().mean(),
                    total_time: times.iter().sum(),
                    avg_gap: if gaps.is_empty() {
                        None
                    } else {
                        Some(gaps.iter().mean())
                    },
                }
            })
            .collect();

        statistics.sort_by_key(|s| OrderedFloat(s.avg_gap.unwrap_or(s.avg_weight)));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("      SHP Ordering Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("Strategy Performance Summary:\n");
        report.push_str(&"-".repeat(80));
        report.push('\n');
        report.push_str(&format!(
            "{:<20} {:>8} {:>12} {:>12} {:>12} {:>10}\n",
            "Strategy", "Sets", "Avg Length", "Std Length", "Avg Gap%", "Avg Time"
        ));
        report.push_str(&"-".repeat(80));
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());
            report.push_str(&format!(
                "{:<20} {:>8} {:>12.2} {:>12.2} {:>12} {:>10.4}\n",
                stat.algorithm, stat.num_instances, stat.avg_weight, stat.std_weight, gap, stat.avg_time
            ));
        }
        report.push_str(&"-".repeat(80));
        report.push('\n');

        report.push_str("\nShortest Path per Location Set:\n");
        let mut best: HashMap<&str, &AlgorithmResult> = HashMap::new();
        for result in &self.results {
            let entry = best.entry(result.instance.as_str()).or_insert(result);
            if result.weight < entry.weight {
                *entry = result;
            }
        }
        let mut names: Vec<&&str> = best.keys().collect();
        names.sort();
        for name in names {
            let r = best[*name];
            report.push_str(&format!("  {}: {:.2} ({})\n", name, r.weight, r.algorithm));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

/// Load every `.csv`, `.tsp` or `.txt` location file in a directory,
/// smallest first. Unreadable files are skipped with a warning.
pub fn load_location_sets_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<LocationSet>> {
    let mut sets = Vec::new();
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let known = path
            .extension()
            .map(|e| ["csv", "tsp", "txt"].iter().any(|k| e.eq_ignore_ascii_case(k)))
            .unwrap_or(false);
        if !known {
            continue;
        }
        match LocationSet::from_file(&path) {
            Ok(set) => sets.push(set),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    sets.sort_by_key(|s| s.len());
    Ok(sets)
}
