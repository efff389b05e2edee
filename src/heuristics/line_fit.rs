//! Orthogonal least-squares line through a point cloud.

use crate::instance::Coord;

/// Centroid plus unit direction of the best-fit line. The direction points
/// towards positive x (positive y when vertical). It is zero when the cloud
/// has no preferred direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub centroid: Coord,
    pub direction: Coord,
}

impl LineFit {
    /// Fit a line minimising the squared perpendicular distances.
    pub fn fit(coords: &[Coord]) -> Self {
        assert!(coords.len() >= 2, "line fit needs at least two points");
        let n = coords.len() as f64;
        let centroid = Coord::new(
            coords.iter().map(|c| c.x).sum::<f64>() / n,
            coords.iter().map(|c| c.y).sum::<f64>() / n,
        );

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for c in coords {
            let dx = c.x - centroid.x;
            let dy = c.y - centroid.y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        let direction = if sxx != syy || sxy != 0.0 {
            let theta = 0.5 * (2.0 * sxy).atan2(sxx - syy);
            let (mut x, mut y) = (theta.cos(), theta.sin());
            if x < 0.0 || (x == 0.0 && y < 0.0) {
                x = -x;
                y = -y;
            }
            Coord::new(x, y)
        } else {
            Coord::default()
        };

        LineFit {
            centroid,
            direction,
        }
    }

    /// Signed position of `c` along the line, measured from the centroid.
    pub fn project(&self, c: &Coord) -> f64 {
        (c.x - self.centroid.x) * self.direction.x + (c.y - self.centroid.y) * self.direction.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_horizontal() {
        let coords = vec![Coord::new(0.0, 1.0), Coord::new(4.0, 1.0), Coord::new(2.0, 1.0)];
        let fit = LineFit::fit(&coords);
        assert!((fit.centroid.x - 2.0).abs() < 1e-12);
        assert!((fit.direction.x - 1.0).abs() < 1e-12);
        assert!(fit.direction.y.abs() < 1e-12);
        assert!((fit.project(&coords[1]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_points_right() {
        let coords = vec![Coord::new(3.0, -3.0), Coord::new(0.0, 0.0), Coord::new(-2.0, 2.0)];
        let fit = LineFit::fit(&coords);
        let h = 0.5f64.sqrt();
        assert!((fit.direction.x - h).abs() < 1e-9);
        assert!((fit.direction.y + h).abs() < 1e-9);
    }

    #[test]
    fn test_vertical_points_up() {
        let coords = vec![Coord::new(1.0, 5.0), Coord::new(1.0, -5.0)];
        let fit = LineFit::fit(&coords);
        assert!(fit.direction.x.abs() < 1e-12);
        assert!((fit.direction.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetric_cloud_has_no_direction() {
        let coords = vec![
            Coord::new(1.0, 0.0),
            Coord::new(-1.0, 0.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, -1.0),
        ];
        let fit = LineFit::fit(&coords);
        assert_eq!(fit.direction, Coord::default());
    }
}
