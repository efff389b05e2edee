//! Undirected graphs over a fixed vertex set, plus tree and path utilities.
//!
//! `Adjacency` keeps its degree and branching statistics up to date on every
//! edge mutation, since branch elimination queries the total branching
//! degree inside its innermost loop.
//!
//! Trees are serialised as edge arrays: `edges[i]` is the parent of vertex
//! `i` for `i < n - 1`, and the tree is rooted at vertex `n - 1`.

use std::collections::BTreeSet;
use std::fmt::Write;

use crate::weights::Weights;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjacency {
    neighbors: Vec<BTreeSet<usize>>,
    total_degree: usize,
    total_branching_degree: usize,
}

impl Adjacency {
    pub fn new(n: usize) -> Self {
        Adjacency {
            neighbors: vec![BTreeSet::new(); n],
            total_degree: 0,
            total_branching_degree: 0,
        }
    }

    /// Build from a tree edge array.
    pub fn from_edges(edges: &[usize]) -> Self {
        let mut adjacency = Adjacency::new(edges.len() + 1);
        add_edges(edges, &mut adjacency);
        adjacency
    }

    pub fn num_vertices(&self) -> usize {
        self.neighbors.len()
    }

    pub fn add(&mut self, i: usize, j: usize) {
        self.check_pair(i, j);
        assert!(!self.is_neighbor(i, j), "edge {}-{} already present", i, j);

        self.neighbors[i].insert(j);
        self.neighbors[j].insert(i);

        self.total_degree += 1;
        if self.degree(i) > 2 {
            self.total_branching_degree += 1;
        }
        if self.degree(j) > 2 {
            self.total_branching_degree += 1;
        }
    }

    pub fn remove(&mut self, i: usize, j: usize) {
        self.check_pair(i, j);
        assert!(self.is_neighbor(i, j), "edge {}-{} not present", i, j);

        self.neighbors[i].remove(&j);
        self.neighbors[j].remove(&i);

        self.total_degree -= 1;
        if self.degree(i) >= 2 {
            self.total_branching_degree -= 1;
        }
        if self.degree(j) >= 2 {
            self.total_branching_degree -= 1;
        }
    }

    pub fn is_neighbor(&self, i: usize, j: usize) -> bool {
        self.check_pair(i, j);
        self.neighbors[i].contains(&j)
    }

    /// Copy of the neighbors of `i`, ascending.
    pub fn neighbors(&self, i: usize) -> Vec<usize> {
        self.neighbors[i].iter().copied().collect()
    }

    #[inline]
    pub fn degree(&self, i: usize) -> usize {
        self.neighbors[i].len()
    }

    #[inline]
    pub fn branching_degree(&self, i: usize) -> usize {
        self.degree(i).saturating_sub(2)
    }

    /// Number of edges.
    #[inline]
    pub fn total_degree(&self) -> usize {
        self.total_degree
    }

    /// Sum over vertices of `max(0, degree - 2)`. Zero exactly when every
    /// component is a simple path.
    #[inline]
    pub fn total_branching_degree(&self) -> usize {
        self.total_branching_degree
    }

    fn check_pair(&self, i: usize, j: usize) {
        let n = self.num_vertices();
        assert!(i < n, "i = {}", i);
        assert!(j < n, "j = {}", j);
        assert!(i != j, "self loop at {}", i);
    }
}

/// Text dump of an adjacency: vertex, degree, branching degree, neighbors.
pub fn describe(adjacency: &Adjacency) -> String {
    let mut out = String::new();
    for i in 0..adjacency.num_vertices() {
        let _ = write!(
            out,
            "{:5}: {:5} {:5}   ",
            i,
            adjacency.degree(i),
            adjacency.branching_degree(i)
        );
        for j in adjacency.neighbors(i) {
            let _ = write!(out, "{:5}", j);
        }
        out.push('\n');
    }
    let _ = writeln!(
        out,
        "Total & total branching degree: {:5} {:5}",
        adjacency.total_degree(),
        adjacency.total_branching_degree()
    );
    out
}

/// Degree-1 vertices connected to `parent`, together with the degree of
/// every vertex in the component of `parent` (zero elsewhere). An isolated
/// `parent` is its own single leaf.
pub fn leaves(adjacency: &Adjacency, parent: usize) -> (Vec<usize>, Vec<usize>) {
    let degrees = degrees(adjacency, parent);
    if adjacency.degree(parent) == 0 {
        return (vec![parent], degrees);
    }
    let leaves = degrees
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 1)
        .map(|(i, _)| i)
        .collect();
    (leaves, degrees)
}

/// Degree of every vertex reachable from `vertex`; unreachable vertices get 0.
pub fn degrees(adjacency: &Adjacency, vertex: usize) -> Vec<usize> {
    let n = adjacency.num_vertices();
    let mut degrees = vec![0; n];
    let mut visited = vec![false; n];
    let mut stack = vec![vertex];
    visited[vertex] = true;
    while let Some(v) = stack.pop() {
        degrees[v] = adjacency.degree(v);
        for &w in &adjacency.neighbors[v] {
            if !visited[w] {
                visited[w] = true;
                stack.push(w);
            }
        }
    }
    degrees
}

/// True when the component containing `start` has no cycle.
pub fn is_tree(adjacency: &Adjacency, start: usize) -> bool {
    let n = adjacency.num_vertices();
    assert!(start < n, "start = {}", start);
    if n <= 1 {
        return true;
    }
    let mut visited = vec![false; n];
    tree_walk(adjacency, start, &mut visited)
}

/// True when the adjacency is a single tree touching every vertex.
pub fn is_spanning_tree(adjacency: &Adjacency) -> bool {
    let n = adjacency.num_vertices();
    if n <= 1 {
        return true;
    }
    let mut visited = vec![false; n];
    tree_walk(adjacency, 0, &mut visited) && visited.iter().all(|&v| v)
}

fn tree_walk(adjacency: &Adjacency, start: usize, visited: &mut [bool]) -> bool {
    let mut stack = vec![(start, usize::MAX)];
    while let Some((v, from)) = stack.pop() {
        if visited[v] {
            return false;
        }
        visited[v] = true;
        for &w in &adjacency.neighbors[v] {
            if w != from {
                stack.push((w, v));
            }
        }
    }
    true
}

/// Serialise a spanning tree as an edge array rooted at `n - 1`.
pub fn edges(adjacency: &Adjacency) -> Vec<usize> {
    let n = adjacency.num_vertices();
    if n <= 1 {
        return Vec::new();
    }
    let mut edges = vec![usize::MAX; n - 1];
    set_edges(adjacency, &mut edges);
    edges
}

/// Overwrite `edges` with the edge array of `adjacency`.
pub fn set_edges(adjacency: &Adjacency, edges: &mut [usize]) {
    let n = adjacency.num_vertices();
    assert_eq!(edges.len() + 1, n, "edge array length must be n - 1");
    if n <= 1 {
        return;
    }
    edges.fill(usize::MAX);
    let root = n - 1;
    let mut stack: Vec<(usize, usize)> = adjacency.neighbors[root].iter().map(|&w| (root, w)).collect();
    while let Some((from, to)) = stack.pop() {
        assert_eq!(edges[to], usize::MAX, "vertex {} reached twice", to);
        edges[to] = from;
        for &w in &adjacency.neighbors[to] {
            if w != from {
                stack.push((to, w));
            }
        }
    }
    assert!(
        edges.iter().all(|&e| e != usize::MAX),
        "adjacency is not a spanning tree"
    );
}

/// Add every edge `i - edges[i]` to `adjacency`.
pub fn add_edges(edges: &[usize], adjacency: &mut Adjacency) {
    assert!(edges.len() <= adjacency.num_vertices());
    for (i, &parent) in edges.iter().enumerate() {
        adjacency.add(i, parent);
    }
}

pub fn are_edges_a_spanning_tree(edges: &[usize]) -> bool {
    let n = edges.len() + 1;
    if edges.iter().enumerate().any(|(i, &p)| p >= n || p == i) {
        return false;
    }
    let mut adjacency = Adjacency::new(n);
    for (i, &p) in edges.iter().enumerate() {
        if adjacency.is_neighbor(i, p) {
            return false;
        }
        adjacency.add(i, p);
    }
    is_spanning_tree(&adjacency)
}

/// True when `path` is a permutation of `0..path.len()`.
pub fn is_path(path: &[usize]) -> bool {
    let n = path.len();
    let mut visited = vec![false; n];
    for &v in path {
        if v >= n || visited[v] {
            return false;
        }
        visited[v] = true;
    }
    true
}

/// True when every vertex `0..path.len()` appears in `path`.
pub fn is_path_a_spanning_tree(path: &[usize]) -> bool {
    let n = path.len();
    let mut visited = vec![false; n];
    for &v in path {
        if v < n {
            visited[v] = true;
        }
    }
    visited.iter().all(|&v| v)
}

/// Walk a spanning tree whose vertices all have degree <= 2 into a path,
/// starting from its lowest numbered leaf.
pub fn path_from_tree(adjacency: &Adjacency) -> Vec<usize> {
    let n = adjacency.num_vertices();
    if n <= 1 {
        return (0..n).collect();
    }
    let start = (0..n)
        .find(|&i| adjacency.degree(i) == 1)
        .expect("a tree with two or more vertices has a leaf");

    let mut path = Vec::with_capacity(n);
    path.push(start);
    let mut previous = usize::MAX;
    let mut current = start;
    while path.len() < n {
        let next = adjacency.neighbors[current]
            .iter()
            .copied()
            .find(|&w| w != previous)
            .expect("tree is not a path");
        previous = current;
        current = next;
        path.push(next);
    }
    path
}

/// Path from a tree edge array (see `path_from_tree`).
pub fn path_from_edges(edges: &[usize]) -> Vec<usize> {
    path_from_tree(&Adjacency::from_edges(edges))
}

/// Sum of consecutive weights along `path`.
pub fn path_weight(weights: &dyn Weights, path: &[usize]) -> f64 {
    path.windows(2).map(|w| weights.value(w[0], w[1])).sum()
}

/// Total weight of the edges of an adjacency.
pub fn weight(weights: &dyn Weights, adjacency: &Adjacency) -> f64 {
    let mut total = 0.0;
    for i in 0..adjacency.num_vertices() {
        for &j in adjacency.neighbors[i].range(i + 1..) {
            total += weights.value(i, j);
        }
    }
    total
}

/// Total weight of a tree edge array.
pub fn edges_weight(weights: &dyn Weights, edges: &[usize]) -> f64 {
    edges
        .iter()
        .enumerate()
        .map(|(i, &parent)| weights.value(i, parent))
        .sum()
}
