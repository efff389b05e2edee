//! Splitting a spanning tree into simple chains.
//!
//! Edges much longer than the median tree edge are dropped first, so chains
//! follow local structure. Every chain then runs from a leaf along degree-2
//! vertices until it hits a dead end or a branch point. A branch point
//! becomes a segment of its own and each of its unvisited neighbors starts a
//! new chain.

use statrs::statistics::{Data, OrderStatistics};

use crate::weights::Weights;

/// A directed chain of distinct vertices. The vertex order is fixed at
/// construction; only the orientation can change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    vertices: Vec<usize>,
    reversed: bool,
}

impl Segment {
    pub fn new(vertices: Vec<usize>) -> Self {
        assert!(!vertices.is_empty(), "a segment needs at least one vertex");
        Segment {
            vertices,
            reversed: false,
        }
    }

    pub fn single(vertex: usize) -> Self {
        Self::new(vec![vertex])
    }

    /// `first` followed by `second`, both in their current orientation.
    pub fn join(first: &Segment, second: &Segment) -> Self {
        Self::new(first.iter().chain(second.iter()).collect())
    }

    pub fn start(&self) -> usize {
        if self.reversed {
            self.vertices[self.vertices.len() - 1]
        } else {
            self.vertices[0]
        }
    }

    pub fn end(&self) -> usize {
        if self.reversed {
            self.vertices[0]
        } else {
            self.vertices[self.vertices.len() - 1]
        }
    }

    pub fn reverse(&mut self) {
        self.reversed = !self.reversed;
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Vertex at position `i` in the current orientation.
    pub fn index(&self, i: usize) -> usize {
        assert!(i < self.len(), "i = {}", i);
        if self.reversed {
            self.vertices[self.len() - 1 - i]
        } else {
            self.vertices[i]
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).map(move |i| self.index(i))
    }

    /// Write the vertices into `out[start..start + len]`.
    pub fn load(&self, out: &mut [usize], start: usize) {
        for (slot, v) in out[start..start + self.len()].iter_mut().zip(self.iter()) {
            *slot = v;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Segmenter {
    /// Edges longer than `median_mult` times the median tree edge are cut.
    /// Zero keeps every edge.
    pub median_mult: f64,
}

impl Default for Segmenter {
    fn default() -> Self {
        Segmenter { median_mult: 2.0 }
    }
}

impl Segmenter {
    pub fn new(median_mult: f64) -> Self {
        assert!(median_mult >= 0.0, "median multiplier must be non-negative");
        Segmenter { median_mult }
    }

    /// Segments of the tree `edges` (parent array rooted at `n - 1`).
    pub fn segments(&self, edges: &[usize], weights: &dyn Weights) -> Vec<Segment> {
        assert!(!edges.is_empty(), "segmenting needs at least two vertices");
        if edges.len() == 1 {
            return vec![Segment::new(vec![0, 1])];
        }
        let n = edges.len() + 1;

        // median() reorders its buffer, so the cut loop reads the weights again
        let median = Data::new(
            edges
                .iter()
                .enumerate()
                .map(|(i, &parent)| weights.value(i, parent))
                .collect::<Vec<f64>>(),
        )
        .median();
        let limit = self.median_mult * median;

        let mut connect: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut cut = 0;
        for (i, &parent) in edges.iter().enumerate() {
            if limit == 0.0 || weights.value(i, parent) <= limit {
                connect[i].push(parent);
                connect[parent].push(i);
            } else {
                cut += 1;
            }
        }
        log::debug!(
            "Segmenting {} vertices: median edge {:.4}, cutoff {:.4}, {} edges cut",
            n,
            median,
            limit,
            cut
        );

        let mut segments = Vec::new();
        let mut visited = vec![false; n];
        for start in 0..n {
            if !visited[start] && connect[start].len() <= 1 {
                build(start, &connect, &mut visited, &mut segments);
            }
        }
        log::debug!("{} segments", segments.len());
        segments
    }
}

/// Walk the component reached from `start`. Branch points push their
/// neighbors on a work stack rather than recursing.
fn build(start: usize, connect: &[Vec<usize>], visited: &mut [bool], segments: &mut Vec<Segment>) {
    let mut stack = vec![start];
    while let Some(start) = stack.pop() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let degree = connect[start].len();

        if degree == 0 || (degree == 1 && visited[connect[start][0]]) {
            segments.push(Segment::single(start));
        } else if degree <= 2 {
            let mut chain = vec![start];
            let mut current = start;
            loop {
                let next = match connect[current].iter().find(|&&v| !visited[v]) {
                    Some(&v) => v,
                    None => {
                        segments.push(Segment::new(chain));
                        break;
                    }
                };
                match connect[next].len() {
                    1 | 2 => {
                        visited[next] = true;
                        chain.push(next);
                        current = next;
                    }
                    _ => {
                        segments.push(Segment::new(chain));
                        stack.push(next);
                        break;
                    }
                }
            }
        } else {
            segments.push(Segment::single(start));
            for &v in connect[start].iter().rev() {
                if !visited[v] {
                    stack.push(v);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{is_path, path_weight};
    use crate::instance::{Coord, LocationSet};
    use crate::mst::{MinSpanTree, Prims};
    use crate::weights::EuclidWeights;

    fn flatten(segments: &[Segment], n: usize) -> Vec<usize> {
        let mut out = vec![0; n];
        let mut start = 0;
        for s in segments {
            s.load(&mut out, start);
            start += s.len();
        }
        assert_eq!(start, n);
        out
    }

    #[test]
    fn test_segment_orientation() {
        let mut s = Segment::new(vec![4, 7, 2]);
        assert_eq!((s.start(), s.end()), (4, 2));
        s.reverse();
        assert!(s.is_reversed());
        assert_eq!((s.start(), s.end()), (2, 4));
        assert_eq!(s.index(0), 2);
        let mut out = vec![9; 5];
        s.load(&mut out, 1);
        assert_eq!(out, vec![9, 2, 7, 4, 9]);

        let joined = Segment::join(&s, &Segment::single(5));
        assert_eq!(joined.iter().collect::<Vec<_>>(), vec![2, 7, 4, 5]);
    }

    #[test]
    fn test_two_vertices() {
        let w = EuclidWeights::new(&[Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)]);
        let segments = Segmenter::default().segments(&[1], &w);
        assert_eq!(segments, vec![Segment::new(vec![0, 1])]);
    }

    #[test]
    fn test_line_is_one_segment() {
        let coords: Vec<Coord> = (0..6).map(|i| Coord::new(i as f64, 0.0)).collect();
        let w = EuclidWeights::new(&coords);
        let edges = Prims.edges(6, &w);
        let segments = Segmenter::default().segments(&edges, &w);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 6);
    }

    #[test]
    fn test_long_edge_is_cut() {
        let xs = [0.0, 1.0, 2.0, 3.0, 50.0, 51.0, 52.0];
        let coords: Vec<Coord> = xs.iter().map(|&x| Coord::new(x, 0.0)).collect();
        let w = EuclidWeights::new(&coords);
        let edges = Prims.edges(7, &w);
        assert_eq!(Segmenter::new(2.5).segments(&edges, &w).len(), 2);
        assert_eq!(Segmenter::new(0.0).segments(&edges, &w).len(), 1);
    }

    #[test]
    fn test_star_branch_point() {
        let coords = vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(2.0, 0.0),
            Coord::new(-1.0, 0.0),
            Coord::new(0.0, 1.0),
        ];
        let w = EuclidWeights::new(&coords);
        let edges = Prims.edges(5, &w);
        let segments = Segmenter::default().segments(&edges, &w);
        assert!(segments.contains(&Segment::single(0)));
        let total: usize = segments.iter().map(|s| s.len()).sum();
        assert_eq!(total, 5);
    }

    #[test]
    fn test_segments_cover_every_vertex() {
        for seed in 0..8 {
            let n = 150;
            let set = LocationSet::random(n, 400.0, 100.0, seed);
            let w = EuclidWeights::new(&set.coords);
            let edges = Prims.edges(n, &w);
            let mut segments = Segmenter::new(2.5).segments(&edges, &w);
            assert!(is_path(&flatten(&segments, n)));

            // Any orientation and order still covers every vertex once.
            segments.reverse();
            for s in segments.iter_mut().step_by(2) {
                s.reverse();
            }
            let path = flatten(&segments, n);
            assert!(is_path(&path));
            assert!(path_weight(&w, &path) > 0.0);
        }
    }
}
