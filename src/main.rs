//! SHP Order - Command Line Interface
//!
//! Orders scattered 2D locations along an approximate Shortest Hamiltonian Path.

use clap::{Args, Parser, Subcommand, ValueEnum};
use shp_order::benchmark::{load_location_sets_from_dir, Benchmark, BenchmarkConfig};
use shp_order::graph::{edges_weight, Adjacency};
use shp_order::heuristics::branch_elimination::BranchElimination;
use shp_order::heuristics::ordering::{strategy, STRATEGIES};
use shp_order::heuristics::segmenter::Segmenter;
use shp_order::lower_bound::{LowerBound, MstLowerBound};
use shp_order::mst::{MinSpanTree, Prims};
use shp_order::visualization::{generate_comparison_data, Visualizer};
use shp_order::weights::EuclidWeights;
use shp_order::{LocationSet, OrderConfig, OrderError, Ordering, Result};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "shp-order")]
#[command(version = "1.0")]
#[command(about = "Orders 2D locations along an approximate Shortest Hamiltonian Path")]
struct Cli {
    /// Log solver progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where the locations come from
#[derive(Args)]
struct Source {
    /// Location file (csv `x,y` / `id,x,y`, TSPLIB, or whitespace columns)
    #[arg(short, long, required_unless_present = "random", conflicts_with = "random")]
    input: Option<PathBuf>,

    /// Generate this many random locations instead
    #[arg(long)]
    random: Option<usize>,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Width of the random rectangle
    #[arg(long, default_value = "400")]
    width: f64,

    /// Height of the random rectangle
    #[arg(long, default_value = "100")]
    height: f64,
}

impl Source {
    fn load(&self) -> Result<LocationSet> {
        match (&self.input, self.random) {
            (Some(path), _) => {
                println!("Loading locations from {:?}...", path);
                LocationSet::from_file(path)
            }
            (None, Some(n)) => Ok(LocationSet::random(n, self.width, self.height, self.seed)),
            (None, None) => Err(OrderError::invalid_input("either --input or --random is required")),
        }
    }

    /// Base path for figures written next to the input.
    fn figure_path(&self, set: &LocationSet, suffix: &str) -> PathBuf {
        match &self.input {
            Some(path) => path.with_extension(suffix),
            None => PathBuf::from(format!("{}.{}", set.name, suffix)),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Order a location set
    Order {
        #[command(flatten)]
        source: Source,

        /// Ordering strategy
        #[arg(short, long, value_enum, default_value = "segment-shp")]
        algorithm: Algorithm,

        /// Branching degree the spanning tree is reduced to before segmentation
        #[arg(long, default_value = "30")]
        max_branching: usize,

        /// Cut spanning tree edges longer than this multiple of the median edge
        #[arg(long, default_value = "2.5")]
        median_mult: f64,

        /// Externally proven upper limit on the path length
        #[arg(long)]
        upper_limit: Option<f64>,

        /// Write the ordering as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Render the ordering as PNG (SVG when no converter is available)
        #[arg(long)]
        visualize: bool,
    },

    /// Run every strategy on random location sets
    Benchmark {
        /// Location counts to generate
        #[arg(long, value_delimiter = ',', default_value = "10,25,100")]
        sizes: Vec<usize>,

        /// Random sets per size
        #[arg(long, default_value = "5")]
        instances: usize,

        /// Base random seed
        #[arg(short, long, default_value = "42")]
        seed: u64,

        /// Benchmark the location files of this directory instead
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Largest set handed to exact branch and bound
        #[arg(long, default_value = "30")]
        full_shp_max_n: usize,

        /// Evaluate sets one at a time
        #[arg(long)]
        serial: bool,
    },

    /// Describe a location set and its spanning tree
    Analyze {
        #[command(flatten)]
        source: Source,

        /// Branching degree cap used for the segment count
        #[arg(long, default_value = "30")]
        max_branching: usize,

        /// Median multiplier used for the segment count
        #[arg(long, default_value = "2.5")]
        median_mult: f64,

        /// Render the reduced tree and its segments
        #[arg(long)]
        visualize: bool,
    },

    /// Compare all strategies on one location set
    Compare {
        #[command(flatten)]
        source: Source,

        /// Largest set handed to the exact strategies
        #[arg(long, default_value = "30")]
        exact_max_n: usize,

        /// Output CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum Algorithm {
    /// Spanning tree segments ordered by branch and bound
    SegmentShp,
    /// Branch elimination straight to a path
    BranchEliminate,
    /// Exact branch and bound over every location
    FullShp,
    /// Exact dynamic programming, fewer than 32 locations
    Dynamic,
    /// Sort along the least-squares line
    ProjectLine,
}

impl Algorithm {
    fn name(self) -> &'static str {
        match self {
            Algorithm::SegmentShp => "segment-shp",
            Algorithm::BranchEliminate => "branch-eliminate",
            Algorithm::FullShp => "full-shp",
            Algorithm::Dynamic => "dynamic",
            Algorithm::ProjectLine => "project-line",
        }
    }
}

fn init_logger(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let outcome = match cli.command {
        Commands::Order {
            source,
            algorithm,
            max_branching,
            median_mult,
            upper_limit,
            output,
            visualize,
        } => {
            let config = OrderConfig {
                max_branching,
                median_mult,
                upper_limit,
                verbose: cli.verbose,
            };
            order_locations(&source, algorithm, &config, output, visualize)
        }

        Commands::Benchmark {
            sizes,
            instances,
            seed,
            dir,
            output,
            full_shp_max_n,
            serial,
        } => {
            let config = BenchmarkConfig {
                sizes,
                instances_per_size: instances,
                seed,
                parallel: !serial,
                full_shp_max_n,
                ..Default::default()
            };
            run_benchmark(config, dir.as_deref(), &output)
        }

        Commands::Analyze {
            source,
            max_branching,
            median_mult,
            visualize,
        } => analyze_locations(&source, max_branching, median_mult, visualize),

        Commands::Compare {
            source,
            exact_max_n,
            output,
        } => compare_strategies(&source, exact_max_n, output),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn order_locations(
    source: &Source,
    algorithm: Algorithm,
    config: &OrderConfig,
    output: Option<PathBuf>,
    visualize: bool,
) -> Result<()> {
    let set = source.load()?;
    if config.verbose {
        println!("{}", set.statistics());
    }

    println!("Ordering {} locations with {}...", set.len(), algorithm.name());
    let orderer = strategy(algorithm.name(), config)
        .ok_or_else(|| OrderError::invalid_input(format!("unknown strategy {}", algorithm.name())))?;
    let ordering = orderer.solve(&set.coords)?;

    println!("\n========== Results ==========");
    println!("{}", ordering);

    let w = EuclidWeights::new(&set.coords);
    let bound = MstLowerBound::new(&w).shp(set.len());
    if bound > 0.0 {
        println!("Lower bound: {:.4} (gap at most {:.2}%)", bound, ordering.gap_to(bound));
    }

    if let Some(out_path) = output {
        std::fs::write(&out_path, serde_json::to_string_pretty(&ordering)?)?;
        println!("\nOrdering saved to {:?}", out_path);
    }

    if visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_svg(&set, &ordering);
        save_figure(&viz, &svg, &source.figure_path(&set, "png"))?;
    }
    Ok(())
}

/// Save as PNG, falling back to SVG when no renderer is available.
fn save_figure(viz: &Visualizer, svg: &str, png_path: &Path) -> Result<()> {
    match viz.save_png(svg, png_path) {
        Ok(()) => println!("Visualization saved to {:?}", png_path),
        Err(e) => {
            let svg_path = png_path.with_extension("svg");
            viz.save_svg(svg, &svg_path)?;
            println!("PNG conversion failed ({}). Saved SVG to {:?}", e, svg_path);
        }
    }
    Ok(())
}

fn run_benchmark(config: BenchmarkConfig, dir: Option<&Path>, output: &Path) -> Result<()> {
    std::fs::create_dir_all(output)?;
    let mut benchmark = Benchmark::new(config);

    match dir {
        Some(dir) => {
            println!("Loading location sets from {:?}...", dir);
            let sets = load_location_sets_from_dir(dir)?;
            println!("Found {} location sets", sets.len());
            if sets.is_empty() {
                return Err(OrderError::invalid_input("no location files found"));
            }
            benchmark.run_on_instances(&sets);
        }
        None => benchmark.run(),
    }

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);
    Ok(())
}

fn analyze_locations(source: &Source, max_branching: usize, median_mult: f64, visualize: bool) -> Result<()> {
    let set = source.load()?;

    println!("========== Location Analysis ==========\n");
    println!("{}", set.statistics());

    let n = set.len();
    if n < 2 {
        println!("Too few locations for a spanning tree.");
        return Ok(());
    }

    let w = EuclidWeights::new(&set.coords);
    let mut edges = Prims.edges(n, &w);
    let tree = Adjacency::from_edges(&edges);
    let bound = MstLowerBound::new(&w);

    println!("Spanning Tree:");
    println!("  MST weight: {:.4}", edges_weight(&w, &edges));
    println!("  Branching degree: {}", tree.total_branching_degree());
    println!("  Max vertex degree: {}", (0..n).map(|v| tree.degree(v)).fold(0, usize::max));

    println!("\nLower Bounds:");
    println!("  Open path: {:.4}", bound.shp(n));
    println!("  From first location: {:.4}", bound.semi_enclosed_shp(n));
    println!("  First to last location: {:.4}", bound.enclosed_shp(n));

    BranchElimination::default().reduce_branching(&w, &mut edges, max_branching);
    let reduced = Adjacency::from_edges(&edges);
    let segments = Segmenter::new(median_mult).segments(&edges, &w);
    let longest = segments.iter().map(|s| s.len()).fold(0, usize::max);

    println!("\nSegmentation (max branching {}, median x{}):", max_branching, median_mult);
    println!("  Reduced tree weight: {:.4}", edges_weight(&w, &edges));
    println!("  Reduced branching degree: {}", reduced.total_branching_degree());
    println!("  Segments: {}", segments.len());
    println!("  Longest segment: {}", longest);

    if visualize {
        let viz = Visualizer::new();
        let svg = viz.generate_tree_svg(&set, &edges, &segments);
        save_figure(&viz, &svg, &source.figure_path(&set, "tree.png"))?;
    }
    Ok(())
}

fn compare_strategies(source: &Source, exact_max_n: usize, output: Option<PathBuf>) -> Result<()> {
    let set = source.load()?;
    println!("Comparing strategies on {} (n={})...\n", set.name, set.len());

    let config = OrderConfig::default();
    let mut orderings: Vec<Ordering> = Vec::new();

    for name in STRATEGIES {
        let exact = name == "full-shp" || name == "dynamic";
        if exact && (set.len() > exact_max_n || (name == "dynamic" && set.len() >= 20)) {
            println!("Skipping {} (n={} too large)", name, set.len());
            continue;
        }
        let Some(orderer) = strategy(name, &config) else {
            continue;
        };
        match orderer.solve(&set.coords) {
            Ok(ordering) => {
                println!("{:<18} length={:.2}, time={:.4}s", name, ordering.weight, ordering.computation_time);
                orderings.push(ordering);
            }
            Err(e) => println!("{:<18} failed: {}", name, e),
        }
    }

    let best = orderings
        .iter()
        .map(|o| o.weight)
        .fold(f64::INFINITY, f64::min);

    println!("\n========== Summary ==========");
    println!("{:<18} {:>12} {:>10} {:>10}", "Strategy", "Length", "Gap%", "Time");
    println!("{}", "-".repeat(54));
    for ordering in &orderings {
        println!(
            "{:<18} {:>12.2} {:>10.2} {:>10.4}",
            ordering.algorithm,
            ordering.weight,
            ordering.gap_to(best),
            ordering.computation_time
        );
    }

    if let Some(out_path) = output {
        std::fs::write(&out_path, generate_comparison_data(&orderings))?;
        println!("\nResults exported to {:?}", out_path);
    }
    Ok(())
}
