//! SHP Order Library
//!
//! Orders scattered 2D locations, such as the source or receiver stations of
//! a survey, along an approximate Shortest Hamiltonian Path.
//!
//! # Features
//!
//! - Weight models over coordinates or explicit matrices, with zero-copy views
//! - Prim's minimum spanning tree and MST lower bounds
//! - Exact solvers: branch and bound, Held-Karp dynamic programming, exhaustive search
//! - Branch elimination heuristic
//! - Segment-then-solve pipeline scaling to thousands of locations
//! - Benchmarking and visualization tools
//!
//! # Example
//!
//! ```no_run
//! use shp_order::heuristics::{OrderLocations, SegmentShpOrder};
//! use shp_order::instance::LocationSet;
//!
//! let locations = LocationSet::from_file("stations.csv").unwrap();
//! let ordering = SegmentShpOrder::default().solve(&locations.coords).unwrap();
//!
//! println!("Path length: {:.2}", ordering.weight);
//! ```

pub mod benchmark;
pub mod config;
pub mod error;
pub mod exact;
pub mod graph;
pub mod heuristics;
pub mod instance;
pub mod lower_bound;
pub mod mst;
pub mod shp;
pub mod solution;
pub mod visualization;
pub mod weights;

pub use config::{BranchAndBoundConfig, OrderConfig};
pub use error::{OrderError, Result};
pub use instance::{Coord, LocationSet};
pub use shp::{PathShape, ShortHamPath};
pub use solution::Ordering;
pub use weights::Weights;
