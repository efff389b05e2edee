use std::fs;
use std::path::PathBuf;

use shp_order::visualization::svg_to_png_file;

/// Converts every SVG figure in a directory (default `figs`) to PNG.
fn main() {
    env_logger::init();

    let figs = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("figs"));
    let entries = match fs::read_dir(&figs) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("{:?} not readable: {}", figs, e);
            std::process::exit(1);
        }
    };

    let mut failures = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().map_or(true, |ext| ext != "svg") {
            continue;
        }
        let svg = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {:?}: {}", path, e);
                failures += 1;
                continue;
            }
        };
        let out = path.with_extension("png");
        match svg_to_png_file(&svg, &out) {
            Ok(()) => println!("Converted {:?} -> {:?}", path, out),
            Err(e) => {
                eprintln!("Failed to convert {:?}: {}", path, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
