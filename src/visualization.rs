//! Visualization utilities for location orderings.
//!
//! Generates SVG drawings of ordered paths and segmented spanning trees,
//! plus plain-text exports for external plotting.

use std::fs::File;
use std::io::Write;
use std::path::Path;
#[cfg(not(feature = "resvg"))]
use std::process::Command;

#[cfg(feature = "resvg")]
use resvg::render;
#[cfg(feature = "resvg")]
use resvg::tiny_skia::{Pixmap, Transform};
#[cfg(feature = "resvg")]
use resvg::usvg;
#[cfg(feature = "resvg")]
use resvg::usvg::TreeParsing;
#[cfg(feature = "resvg")]
use resvg::FitTo;

use crate::error::{OrderError, Result};
use crate::heuristics::segmenter::Segment;
use crate::instance::{Coord, LocationSet};
use crate::solution::Ordering;

const SEGMENT_COLORS: [&str; 6] = ["#e74c3c", "#2ecc71", "#9b59b6", "#f39c12", "#1abc9c", "#34495e"];

/// SVG visualization generator
pub struct Visualizer {
    /// Canvas width
    pub width: f64,
    /// Canvas height
    pub height: f64,
    /// Margin
    pub margin: f64,
    /// Location marker radius
    pub node_radius: f64,
    /// Label locations with their index when there are at most this many
    pub label_limit: usize,
}

impl Default for Visualizer {
    fn default() -> Self {
        Visualizer {
            width: 1000.0,
            height: 600.0,
            margin: 40.0,
            node_radius: 4.0,
            label_limit: 100,
        }
    }
}

/// Maps location coordinates onto the canvas, y up.
struct Canvas {
    min_x: f64,
    min_y: f64,
    scale: f64,
    margin: f64,
    height: f64,
}

impl Canvas {
    fn point(&self, c: &Coord) -> (f64, f64) {
        (
            self.margin + (c.x - self.min_x) * self.scale,
            self.height - self.margin - (c.y - self.min_y) * self.scale,
        )
    }
}

impl Visualizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn canvas(&self, coords: &[Coord]) -> Canvas {
        let (min_x, max_x, min_y, max_y) = bounds(coords);
        let scale_x = (self.width - 2.0 * self.margin) / (max_x - min_x).max(1e-9);
        let scale_y = (self.height - 2.0 * self.margin) / (max_y - min_y).max(1e-9);
        Canvas {
            min_x,
            min_y,
            scale: scale_x.min(scale_y),
            margin: self.margin,
            height: self.height,
        }
    }

    fn header(&self, title: &str) -> String {
        format!(
            r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">
<style>
    .node {{ fill: #3498db; stroke: #2c3e50; stroke-width: 1; }}
    .start {{ fill: #2ecc71; stroke: #27ae60; stroke-width: 1; }}
    .end {{ fill: #e74c3c; stroke: #c0392b; stroke-width: 1; }}
    .edge {{ stroke: #34495e; stroke-width: 1.5; fill: none; }}
    .tree {{ stroke: #95a5a6; stroke-width: 1; stroke-dasharray: 4,3; fill: none; }}
    .label {{ font-family: Arial; font-size: 9px; fill: #2c3e50; }}
    .title {{ font-family: Arial; font-size: 14px; fill: #2c3e50; font-weight: bold; }}
</style>
<rect width="100%" height="100%" fill="#ecf0f1"/>
<text x="{}" y="25" class="title">{}</text>
"##,
            self.width, self.height, self.width, self.height, self.margin, title
        )
    }

    fn push_locations(&self, svg: &mut String, canvas: &Canvas, coords: &[Coord], class_of: impl Fn(usize) -> &'static str) {
        for (i, c) in coords.iter().enumerate() {
            let (x, y) = canvas.point(c);
            svg.push_str(&format!(
                r##"<circle cx="{:.2}" cy="{:.2}" r="{}" class="{}"/>
"##,
                x,
                y,
                self.node_radius,
                class_of(i)
            ));
            if coords.len() <= self.label_limit {
                svg.push_str(&format!(
                    r##"<text x="{:.2}" y="{:.2}" class="label" text-anchor="middle">{}</text>
"##,
                    x,
                    y - self.node_radius - 2.0,
                    i
                ));
            }
        }
    }

    /// Generate SVG visualization of an ordering: the path as a polyline,
    /// its first location green and its last red.
    pub fn generate_svg(&self, set: &LocationSet, ordering: &Ordering) -> String {
        let canvas = self.canvas(&set.coords);
        let mut svg = self.header(&format!(
            "Locations: {} | {} | Length: {:.2}",
            set.name, ordering.algorithm, ordering.weight
        ));

        if ordering.path.len() > 1 {
            let points: Vec<String> = ordering
                .path
                .iter()
                .map(|&v| {
                    let (x, y) = canvas.point(&set.coords[v]);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            svg.push_str(&format!(
                r##"<polyline points="{}" class="edge"/>
"##,
                points.join(" ")
            ));
        }

        let first = ordering.path.first().copied();
        let last = ordering.path.last().copied();
        self.push_locations(&mut svg, &canvas, &set.coords, |i| {
            if Some(i) == first {
                "start"
            } else if Some(i) == last {
                "end"
            } else {
                "node"
            }
        });

        svg.push_str("</svg>");
        svg
    }

    /// Generate SVG of a spanning tree edge array, with each segment's
    /// chain drawn in its own colour over the dashed tree.
    pub fn generate_tree_svg(&self, set: &LocationSet, edges: &[usize], segments: &[Segment]) -> String {
        let canvas = self.canvas(&set.coords);
        let mut svg = self.header(&format!(
            "Locations: {} | Segments: {}",
            set.name,
            segments.len()
        ));

        for (i, &parent) in edges.iter().enumerate() {
            let (x1, y1) = canvas.point(&set.coords[i]);
            let (x2, y2) = canvas.point(&set.coords[parent]);
            svg.push_str(&format!(
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" class="tree"/>
"#,
                x1, y1, x2, y2
            ));
        }

        for (k, segment) in segments.iter().enumerate() {
            if segment.len() < 2 {
                continue;
            }
            let points: Vec<String> = segment
                .iter()
                .map(|v| {
                    let (x, y) = canvas.point(&set.coords[v]);
                    format!("{:.2},{:.2}", x, y)
                })
                .collect();
            svg.push_str(&format!(
                r##"<polyline points="{}" stroke="{}" stroke-width="2.5" fill="none"/>
"##,
                points.join(" "),
                SEGMENT_COLORS[k % SEGMENT_COLORS.len()]
            ));
        }

        self.push_locations(&mut svg, &canvas, &set.coords, |_| "node");
        svg.push_str("</svg>");
        svg
    }

    /// Save SVG to file
    pub fn save_svg<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(svg.as_bytes())?;
        Ok(())
    }

    /// Save SVG as PNG, natively when built with the `resvg` feature,
    /// otherwise through `rsvg-convert`, `magick` or `inkscape`.
    pub fn save_png<P: AsRef<Path>>(&self, svg: &str, path: P) -> Result<()> {
        svg_to_png_file(svg, path.as_ref())
    }

    /// Export data for external plotting (e.g., matplotlib)
    pub fn export_plot_data(&self, set: &LocationSet, ordering: &Ordering) -> String {
        let mut data = String::new();

        data.push_str("# SHP Ordering Data\n");
        data.push_str(&format!("# Locations: {}\n", set.name));
        data.push_str(&format!("# Algorithm: {}\n", ordering.algorithm));
        data.push_str(&format!("# Length: {:.4}\n\n", ordering.weight));

        data.push_str("# Locations: index, x, y, position\n");
        let mut position = vec![usize::MAX; set.len()];
        for (k, &v) in ordering.path.iter().enumerate() {
            position[v] = k;
        }
        for (i, c) in set.coords.iter().enumerate() {
            data.push_str(&format!("{},{},{},{}\n", i, c.x, c.y, position[i]));
        }

        data.push_str("\n# Path: sequence of location indices\n");
        let path: Vec<String> = ordering.path.iter().map(|v| v.to_string()).collect();
        data.push_str(&path.join(","));
        data.push('\n');

        data
    }
}

/// Generate comparison data for several orderings of the same locations
pub fn generate_comparison_data(orderings: &[Ordering]) -> String {
    let mut data = String::new();

    data.push_str("# Strategy Comparison\n");
    data.push_str("algorithm,length,time,segments\n");

    for ordering in orderings {
        data.push_str(&format!(
            "{},{:.4},{:.4},{}\n",
            ordering.algorithm,
            ordering.weight,
            ordering.computation_time,
            ordering.num_segments.map(|s| s.to_string()).unwrap_or_default()
        ));
    }

    data
}

fn bounds(coords: &[Coord]) -> (f64, f64, f64, f64) {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for c in coords {
        min_x = min_x.min(c.x);
        max_x = max_x.max(c.x);
        min_y = min_y.min(c.y);
        max_y = max_y.max(c.y);
    }

    if coords.is_empty() {
        (0.0, 1.0, 0.0, 1.0)
    } else {
        (min_x, max_x, min_y, max_y)
    }
}

/// Canvas size from the `width` and `height` attributes of an SVG header.
#[cfg(any(feature = "resvg", test))]
fn svg_size(svg: &str) -> (u32, u32) {
    let attribute = |name: &str, fallback: u32| {
        svg.split_once(&format!("{}=\"", name))
            .and_then(|(_, rest)| rest.split_once('"'))
            .and_then(|(value, _)| value.parse::<f64>().ok())
            .map(|v| v as u32)
            .unwrap_or(fallback)
    };
    (attribute("width", 800), attribute("height", 800))
}

fn converter_error(message: impl Into<String>) -> OrderError {
    OrderError::Io(std::io::Error::new(std::io::ErrorKind::Other, message.into()))
}

/// Render an SVG string directly to a PNG file.
#[cfg(feature = "resvg")]
pub fn svg_to_png_file(svg: &str, out: &Path) -> Result<()> {
    let opt = usvg::Options::default();
    let rtree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| converter_error(format!("usvg parse error: {}", e)))?;
    let (w, h) = svg_size(svg);
    let mut pixmap =
        Pixmap::new(w.max(1), h.max(1)).ok_or_else(|| converter_error("failed to create pixmap"))?;
    render(&rtree, FitTo::Original, Transform::default(), pixmap.as_mut())
        .ok_or_else(|| converter_error("resvg render failed"))?;
    pixmap
        .save_png(out)
        .map_err(|e| converter_error(format!("save_png failed: {}", e)))?;
    Ok(())
}

/// Render an SVG string to a PNG file with the first external converter
/// that succeeds.
#[cfg(not(feature = "resvg"))]
pub fn svg_to_png_file(svg: &str, out: &Path) -> Result<()> {
    let tmp = out.with_extension("svg.tmp");
    std::fs::write(&tmp, svg)?;
    let tmp_arg = tmp.to_string_lossy().to_string();
    let out_arg = out.to_string_lossy().to_string();

    let attempts: [(&str, Vec<&str>); 3] = [
        ("rsvg-convert", vec!["-o", out_arg.as_str(), tmp_arg.as_str()]),
        ("magick", vec!["convert", tmp_arg.as_str(), out_arg.as_str()]),
        (
            "inkscape",
            vec![tmp_arg.as_str(), "--export-type=png", "--export-filename", out_arg.as_str()],
        ),
    ];
    for (program, args) in &attempts {
        match Command::new(program).args(args).status() {
            Ok(status) if status.success() => {
                let _ = std::fs::remove_file(&tmp);
                return Ok(());
            }
            Ok(status) => log::debug!("{} exited with {}", program, status),
            Err(e) => log::debug!("{} unavailable: {}", program, e),
        }
    }

    let _ = std::fs::remove_file(&tmp);
    Err(converter_error(
        "no SVG to PNG converter succeeded (tried rsvg-convert, magick, inkscape)",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weights::EuclidWeights;

    fn create_test_set() -> LocationSet {
        LocationSet::new(
            "test",
            vec![Coord::new(0.0, 0.0), Coord::new(10.0, 0.0), Coord::new(10.0, 5.0)],
        )
        .unwrap()
    }

    #[test]
    fn test_visualizer() {
        let set = create_test_set();
        let ordering =
            Ordering::from_path(&EuclidWeights::new(&set.coords), vec![0, 1, 2], "test").unwrap();

        let viz = Visualizer::new();
        let svg = viz.generate_svg(&set, &ordering);

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("polyline"));
        assert!(svg.contains("Length: 15.00"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert_eq!(svg.matches("class=\"start\"").count(), 1);
        assert_eq!(svg_size(&svg), (1000, 600));
    }

    #[test]
    fn test_tree_svg() {
        let set = create_test_set();
        let segments = vec![Segment::new(vec![0, 1]), Segment::single(2)];
        let svg = Visualizer::new().generate_tree_svg(&set, &[1, 2], &segments);
        assert_eq!(svg.matches("<line").count(), 2);
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("Segments: 2"));
    }

    #[test]
    fn test_export_plot_data() {
        let set = create_test_set();
        let ordering =
            Ordering::from_path(&EuclidWeights::new(&set.coords), vec![2, 1, 0], "test").unwrap();
        let data = Visualizer::new().export_plot_data(&set, &ordering);
        assert!(data.contains("0,0,0,2\n"));
        assert!(data.contains("\n2,1,0\n"));

        let comparison = generate_comparison_data(&[ordering]);
        assert!(comparison.contains("test,15.0000,"));
    }

    #[test]
    fn test_empty_bounds() {
        assert_eq!(bounds(&[]), (0.0, 1.0, 0.0, 1.0));
    }
}
