//! Heuristic ordering.
//!
//! Branch elimination and the segment pipeline built on it, plus the
//! location ordering strategies exposed to callers.

pub mod branch_elimination;
pub mod line_fit;
pub mod ordering;
pub mod segment_path;
pub mod segmenter;

pub use branch_elimination::*;
pub use line_fit::*;
pub use ordering::*;
pub use segment_path::*;
pub use segmenter::*;
