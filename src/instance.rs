//! Module for parsing and representing sets of survey locations.
//!
//! A location set is an ordered collection of 2D coordinates, typically the
//! source or receiver stations of one survey line. Files may be CSV
//! (`x,y` or `id,x,y` rows with an optional header), TSP-LIB style
//! (`NODE_COORD_SECTION`), or plain whitespace separated `x y` rows.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::error::{OrderError, Result};

/// Two-dimensional coordinates with Euclidean norm.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Self {
        Coord { x, y }
    }

    pub fn norm(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Plain Euclidean distance. Can overflow for huge coordinates.
    pub fn distance(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Euclidean distance computed as `a * sqrt(1 + (b/a)^2)` with `a` the
    /// larger of the two offsets, so squaring never overflows.
    pub fn distance_hypot(&self, other: &Coord) -> f64 {
        let mut a = (self.x - other.x).abs();
        let mut b = (self.y - other.y).abs();
        if a < b {
            std::mem::swap(&mut a, &mut b);
        }
        if a == 0.0 {
            return 0.0;
        }
        let r = b / a;
        a * (1.0 + r * r).sqrt()
    }

    pub fn distance_sq(&self, other: &Coord) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A named, ordered set of locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationSet {
    /// Name of the set (file stem or generator tag)
    pub name: String,
    /// Coordinates, indexed by vertex
    pub coords: Vec<Coord>,
}

impl LocationSet {
    pub fn new(name: &str, coords: Vec<Coord>) -> Result<Self> {
        if let Some(i) = coords.iter().position(|c| !c.is_finite()) {
            return Err(OrderError::invalid_input(format!(
                "location {} has a non-finite coordinate",
                i
            )));
        }
        Ok(LocationSet {
            name: name.to_string(),
            coords,
        })
    }

    /// Uniformly scattered locations in a `width` by `height` rectangle.
    /// Deterministic via seed.
    pub fn random(n: usize, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let coords = (0..n)
            .map(|_| Coord::new(width * rng.gen::<f64>(), height * rng.gen::<f64>()))
            .collect();
        LocationSet {
            name: format!("random-{}-{}", n, seed),
            coords,
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Load a location set, picking the parser from the file extension and
    /// content.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        let coords = if is_csv {
            Self::read_csv(File::open(path)?)?
        } else {
            Self::read_text(BufReader::new(File::open(path)?))?
        };

        log::debug!("Loaded {} locations from {}", coords.len(), path.display());
        Self::new(&name, coords)
    }

    /// Parse `x,y` or `id,x,y` records. A first row that does not parse as
    /// numbers is treated as a header.
    pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<Coord>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut coords = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record?;
            let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
            if fields.is_empty() {
                continue;
            }
            match parse_xy(&fields) {
                Some(coord) => coords.push(coord),
                None if row == 0 => continue,
                None => {
                    return Err(OrderError::invalid_input(format!(
                        "cannot parse CSV row {}: {:?}",
                        row + 1,
                        fields
                    )))
                }
            }
        }
        Ok(coords)
    }

    /// Parse TSP-LIB style files or plain whitespace separated rows.
    pub fn read_text<R: BufRead>(reader: R) -> Result<Vec<Coord>> {
        let mut coords = Vec::new();
        let mut tsplib = false;
        let mut in_coords = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line == "EOF" || line.starts_with('#') {
                continue;
            }

            if line.starts_with("NODE_COORD_SECTION") {
                tsplib = true;
                in_coords = true;
                continue;
            }
            if line.ends_with("_SECTION") {
                in_coords = false;
                continue;
            }
            if line.contains(':') {
                // TSP-LIB header (NAME:, DIMENSION:, ...)
                tsplib = true;
                continue;
            }
            if tsplib && !in_coords {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            let coord = if tsplib {
                if parts.len() < 3 {
                    None
                } else {
                    parse_xy(&parts[..3])
                }
            } else {
                parse_xy(&parts)
            };
            match coord {
                Some(c) => coords.push(c),
                None => {
                    return Err(OrderError::invalid_input(format!(
                        "cannot parse line {}: {}",
                        line_no + 1,
                        line
                    )))
                }
            }
        }
        Ok(coords)
    }

    /// Get statistics about the location set
    pub fn statistics(&self) -> LocationStatistics {
        let n = self.len();
        let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
        for c in &self.coords {
            min_x = min_x.min(c.x);
            max_x = max_x.max(c.x);
            min_y = min_y.min(c.y);
            max_y = max_y.max(c.y);
        }

        let mut sum = 0.0;
        let mut count = 0usize;
        let mut max_distance: f64 = 0.0;
        let mut coincident = 0usize;
        for i in 0..n {
            for j in i + 1..n {
                let d = self.coords[i].distance_hypot(&self.coords[j]);
                sum += d;
                count += 1;
                max_distance = max_distance.max(d);
                if d == 0.0 {
                    coincident += 1;
                }
            }
        }

        LocationStatistics {
            name: self.name.clone(),
            num_locations: n,
            min_x,
            max_x,
            min_y,
            max_y,
            avg_distance: if count > 0 { sum / count as f64 } else { 0.0 },
            max_distance,
            coincident_pairs: coincident,
        }
    }
}

/// Accepts `x y` or `id x y`.
fn parse_xy(fields: &[&str]) -> Option<Coord> {
    let values: Vec<f64> = fields
        .iter()
        .map(|f| f.parse::<f64>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match values.len() {
        2 => Some(Coord::new(values[0], values[1])),
        3 => Some(Coord::new(values[1], values[2])),
        _ => None,
    }
}

/// Statistics about a location set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationStatistics {
    pub name: String,
    pub num_locations: usize,
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub avg_distance: f64,
    pub max_distance: f64,
    pub coincident_pairs: usize,
}

impl std::fmt::Display for LocationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Location set: {}", self.name)?;
        writeln!(f, "  Locations: {}", self.num_locations)?;
        writeln!(
            f,
            "  Extent: x [{:.2}, {:.2}]  y [{:.2}, {:.2}]",
            self.min_x, self.max_x, self.min_y, self.max_y
        )?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Coincident pairs: {}", self.coincident_pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_calculation() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
        assert!((a.distance_hypot(&b) - 5.0).abs() < 1e-12);
        assert!((b.distance_hypot(&a) - 5.0).abs() < 1e-12);
        assert!((a.distance_sq(&b) - 25.0).abs() < 1e-12);
        assert!((b.norm() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_identical_points() {
        let a = Coord::new(2.5, -1.0);
        assert_eq!(a.distance_hypot(&a), 0.0);
    }

    #[test]
    fn test_hypot_does_not_overflow() {
        let a = Coord::new(-1e300, 0.0);
        let b = Coord::new(1e300, 1e300);
        let d = a.distance_hypot(&b);
        assert!(d.is_finite());
        assert!(a.distance(&b).is_infinite());
        assert!((d / 1e300 - 5f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_read_csv_with_header() {
        let data = "x,y\n1.0,2.0\n3,4\n";
        let coords = LocationSet::read_csv(data.as_bytes()).unwrap();
        assert_eq!(coords, vec![Coord::new(1.0, 2.0), Coord::new(3.0, 4.0)]);
    }

    #[test]
    fn test_read_csv_with_ids() {
        let data = "id,x,y\n7,1.0,2.0\n8,3,4\n";
        let coords = LocationSet::read_csv(data.as_bytes()).unwrap();
        assert_eq!(coords[1], Coord::new(3.0, 4.0));
    }

    #[test]
    fn test_read_tsplib() {
        let data = "NAME: line\nTYPE: TSP\nDIMENSION: 2\nNODE_COORD_SECTION\n1 5 7\n2 6 2\nEOF\n";
        let coords = LocationSet::read_text(data.as_bytes()).unwrap();
        assert_eq!(coords, vec![Coord::new(5.0, 7.0), Coord::new(6.0, 2.0)]);
    }

    #[test]
    fn test_read_plain_rows() {
        let data = "# stations\n5 7\n6 2\n\n3 5\n";
        let coords = LocationSet::read_text(data.as_bytes()).unwrap();
        assert_eq!(coords.len(), 3);
        assert!(LocationSet::read_text("5 seven\n".as_bytes()).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let result = LocationSet::new("bad", vec![Coord::new(f64::NAN, 0.0)]);
        assert!(matches!(result, Err(OrderError::InvalidInput(_))));
    }

    #[test]
    fn test_random_is_deterministic() {
        let a = LocationSet::random(20, 400.0, 100.0, 6104);
        let b = LocationSet::random(20, 400.0, 100.0, 6104);
        assert_eq!(a.coords, b.coords);
        assert!(a.coords.iter().all(|c| c.x >= 0.0 && c.x <= 400.0 && c.y <= 100.0));
    }
}
