//! Branch elimination: turn a minimum spanning tree into a path by repeated
//! leaf swaps.
//!
//! While the tree branches too much, every edge `i - j` at a branching
//! vertex is tried for removal. The two resulting subtrees are rejoined
//! through the cheapest pair of their leaves, and the swap with the smallest
//! weight increase wins. Θ(n³) to reach a path, and usually within a few
//! percent of optimal.

use crate::error::Result;
use crate::graph::{self, leaves, path_from_tree, Adjacency};
use crate::mst::{MinSpanTree, Prims};
use crate::shp::{identity, ShortHamPath};
use crate::weights::Weights;

#[derive(Debug, Clone, Copy, Default)]
pub struct BranchElimination {
    mst: Prims,
}

/// Remove `i - j`, add `a - b`.
#[derive(Debug, Clone, Copy)]
struct Swap {
    i: usize,
    j: usize,
    a: usize,
    b: usize,
    change: f64,
}

impl BranchElimination {
    /// MST edges over `0..n` with the total branching degree cut to at most
    /// `max_branch`.
    pub fn edges(&self, weights: &dyn Weights, n: usize, max_branch: usize) -> Vec<usize> {
        let mut edges = self.mst.edges(n, weights);
        if n > 3 {
            self.reduce_branching(weights, &mut edges, max_branch);
        }
        edges
    }

    /// Reduce a tree given as an edge array, in place.
    pub fn reduce_branching(&self, weights: &dyn Weights, edges: &mut [usize], max_branch: usize) {
        let n = edges.len() + 1;
        if n <= 3 {
            return;
        }
        let mut adjacency = Adjacency::from_edges(edges);
        self.reduce_branching_tree(weights, &mut adjacency, max_branch);
        graph::set_edges(&adjacency, edges);
    }

    /// Apply swaps until the total branching degree is at most `max_branch`.
    pub fn reduce_branching_tree(
        &self,
        weights: &dyn Weights,
        adjacency: &mut Adjacency,
        max_branch: usize,
    ) {
        debug_assert!(graph::is_spanning_tree(adjacency));
        let start = adjacency.total_branching_degree();
        let mut swaps = 0;
        let mut added = 0.0;
        while adjacency.total_branching_degree() > max_branch {
            added += self.branch_eliminate(weights, adjacency);
            swaps += 1;
        }
        debug_assert!(graph::is_spanning_tree(adjacency));
        if swaps > 0 {
            log::debug!(
                "Branching degree {} -> {} after {} swaps, weight +{:.4}",
                start,
                adjacency.total_branching_degree(),
                swaps,
                added
            );
        }
    }

    /// Apply the single cheapest swap. Returns the weight it adds.
    pub fn branch_eliminate(&self, weights: &dyn Weights, adjacency: &mut Adjacency) -> f64 {
        let swap = best_swap(weights, adjacency, |i, adj| adj.degree(i) > 2, |_, _, _| true);
        apply(adjacency, swap)
    }

    /// Like `branch_eliminate`, but also works vertex 0 down to a single
    /// neighbor and never gives it a second one.
    pub fn branch_eliminate_semi_enclosed(
        &self,
        weights: &dyn Weights,
        adjacency: &mut Adjacency,
    ) -> f64 {
        let swap = best_swap(
            weights,
            adjacency,
            |i, adj| {
                if i == 0 {
                    adj.degree(0) != 1
                } else {
                    adj.degree(i) > 2
                }
            },
            |a, b, degree0| !(degree0 == 1 && (a == 0 || b == 0)),
        );
        apply(adjacency, swap)
    }
}

fn best_swap<C, P>(weights: &dyn Weights, adjacency: &mut Adjacency, candidate: C, allowed: P) -> Swap
where
    C: Fn(usize, &Adjacency) -> bool,
    P: Fn(usize, usize, usize) -> bool,
{
    let mut best: Option<Swap> = None;
    for i in 0..adjacency.num_vertices() {
        if !candidate(i, adjacency) {
            continue;
        }
        for j in adjacency.neighbors(i) {
            let weight_ij = weights.value(i, j);
            adjacency.remove(i, j);
            let (leaves_a, _) = leaves(adjacency, i);
            let (leaves_b, _) = leaves(adjacency, j);
            let degree0 = adjacency.degree(0);
            for &a in &leaves_a {
                for &b in &leaves_b {
                    if !allowed(a, b, degree0) {
                        continue;
                    }
                    let change = weights.value(a, b) - weight_ij;
                    if best.map_or(true, |s| change < s.change) {
                        best = Some(Swap { i, j, a, b, change });
                    }
                }
            }
            adjacency.add(i, j);
        }
    }
    best.unwrap_or_else(|| panic!("no leaf swap available; the tree has no branching"))
}

fn apply(adjacency: &mut Adjacency, swap: Swap) -> f64 {
    assert!(adjacency.is_neighbor(swap.i, swap.j));
    adjacency.remove(swap.i, swap.j);
    assert!(adjacency.degree(swap.a) <= 1 && adjacency.degree(swap.b) <= 1);
    adjacency.add(swap.a, swap.b);
    log::trace!(
        "Swap {}-{} for {}-{} ({:+.4})",
        swap.i,
        swap.j,
        swap.a,
        swap.b,
        swap.change
    );
    swap.change
}

impl ShortHamPath for BranchElimination {
    fn name(&self) -> &str {
        "BranchElimination"
    }

    fn path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        if n <= 2 {
            return Ok(identity(n));
        }
        Ok(graph::path_from_edges(&self.edges(weights, n, 0)))
    }

    fn semi_enclosed_path(&self, weights: &dyn Weights, n: usize) -> Result<Vec<usize>> {
        if n <= 2 {
            return Ok(identity(n));
        }
        let mut adjacency = Adjacency::from_edges(&self.mst.edges(n, weights));
        while adjacency.degree(0) != 1 || adjacency.total_branching_degree() > 0 {
            self.branch_eliminate_semi_enclosed(weights, &mut adjacency);
        }
        let mut path = path_from_tree(&adjacency);
        if path[n - 1] == 0 {
            path.reverse();
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{are_edges_a_spanning_tree, edges_weight, is_path, path_weight};
    use crate::instance::{Coord, LocationSet};
    use crate::weights::EuclidWeights;

    fn star() -> Vec<Coord> {
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(1.0, 0.0),
            Coord::new(-1.0, 0.0),
            Coord::new(0.0, 1.0),
            Coord::new(0.0, -1.0),
        ]
    }

    #[test]
    fn test_star_becomes_path() {
        let w = EuclidWeights::new(&star());
        let path = BranchElimination::default().path(&w, 5).unwrap();
        assert!(is_path(&path));
        // The centre must be interior and at most two diagonals are used.
        assert!(path[0] != 0 && path[4] != 0);
        assert!(path_weight(&w, &path) <= 2.0 + 2.0 * 2f64.sqrt() + 1e-9);
    }

    #[test]
    fn test_reduce_branching_respects_cap() {
        let set = LocationSet::random(60, 400.0, 100.0, 17);
        let w = EuclidWeights::new(&set.coords);
        let be = BranchElimination::default();
        let mst = Prims.edges(60, &w);
        let mst_weight = edges_weight(&w, &mst);
        for cap in [0, 2, 5] {
            let edges = be.edges(&w, 60, cap);
            assert!(are_edges_a_spanning_tree(&edges));
            let adjacency = Adjacency::from_edges(&edges);
            assert!(adjacency.total_branching_degree() <= cap);
            assert!(edges_weight(&w, &edges) >= mst_weight - 1e-9);
        }
    }

    #[test]
    fn test_semi_enclosed_starts_at_zero() {
        for seed in 0..10 {
            let set = LocationSet::random(25, 400.0, 100.0, seed);
            let w = EuclidWeights::new(&set.coords);
            let path = BranchElimination::default().semi_enclosed_path(&w, 25).unwrap();
            assert!(is_path(&path));
            assert_eq!(path[0], 0);
        }
    }

    #[test]
    fn test_semi_enclosed_moves_interior_start() {
        // Vertex 0 sits in the middle of the line.
        let coords: Vec<Coord> = [2.0, 0.0, 1.0, 3.0, 4.0]
            .iter()
            .map(|&x| Coord::new(x, 0.0))
            .collect();
        let w = EuclidWeights::new(&coords);
        let path = BranchElimination::default().semi_enclosed_path(&w, 5).unwrap();
        assert_eq!(path[0], 0);
        assert!(is_path(&path));
    }

    #[test]
    fn test_small_cases() {
        let w = EuclidWeights::new(&star());
        let be = BranchElimination::default();
        assert_eq!(be.path(&w, 0).unwrap(), Vec::<usize>::new());
        assert_eq!(be.path(&w, 2).unwrap(), vec![0, 1]);
        assert!(is_path(&be.path(&w, 3).unwrap()));
        assert_eq!(be.semi_enclosed_path(&w, 3).unwrap()[0], 0);
    }
}
