//! Pairwise weights between vertices, addressed by index.
//!
//! `MatrixWeights` is the dense base representation. `EuclidWeights` and
//! `EuclidSqWeights` precompute coordinate distances into a matrix.
//! `ShiftWeights` and `RenumberWeights` are zero-copy views that restrict or
//! relabel another weight model.
//!
//! The symmetric and triangle-inequality flags are advisory: constructors set
//! them and views propagate them, nothing verifies them at use.

use std::collections::HashMap;

use crate::error::{OrderError, Result};
use crate::instance::Coord;

pub trait Weights {
    /// Weight between vertices `i` and `j`, `i != j`.
    fn value(&self, i: usize, j: usize) -> f64;

    /// Number of addressable vertices.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_symmetric(&self) -> bool {
        true
    }

    fn is_triangle_inequality(&self) -> bool {
        false
    }
}

/// Dense n x n weight matrix, row major.
#[derive(Debug, Clone)]
pub struct MatrixWeights {
    n: usize,
    matrix: Vec<f64>,
    symmetric: bool,
    triangle_inequality: bool,
}

impl MatrixWeights {
    /// Build from a square matrix.
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        let n = rows.len();
        let mut matrix = Vec::with_capacity(n * n);
        for row in rows {
            assert_eq!(row.len(), n, "weight matrix must be square");
            matrix.extend(row);
        }
        let mut weights = MatrixWeights {
            n,
            matrix,
            symmetric: true,
            triangle_inequality: false,
        };
        let symmetric = weights.pairs_match();
        weights.symmetric = symmetric;
        weights
    }

    /// A zero matrix of `n` vertices.
    pub fn zeros(n: usize) -> Self {
        MatrixWeights {
            n,
            matrix: vec![0.0; n * n],
            symmetric: true,
            triangle_inequality: false,
        }
    }

    /// Build a symmetric matrix from a pair function evaluated on `i < j`.
    pub fn from_fn<F: Fn(usize, usize) -> f64>(n: usize, f: F) -> Self {
        let mut weights = Self::zeros(n);
        for i in 0..n {
            for j in i + 1..n {
                weights.set_pair(i, j, f(i, j));
            }
        }
        weights
    }

    /// Materialise the first `n` vertices of any weight model.
    pub fn from_weights(n: usize, weights: &dyn Weights) -> Self {
        let mut dense = Self::zeros(n);
        if weights.is_symmetric() {
            for i in 0..n {
                for j in i + 1..n {
                    dense.set_pair(i, j, weights.value(i, j));
                }
            }
        } else {
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        dense.matrix[i * n + j] = weights.value(i, j);
                    }
                }
            }
            let symmetric = dense.pairs_match();
            dense.symmetric = symmetric;
        }
        dense.triangle_inequality = weights.is_triangle_inequality();
        dense
    }

    /// Dense matrix over `vertices[0..k]` of `weights`: entry (a, b) is
    /// `weights.value(vertices[a], vertices[b])`.
    pub fn resequence(weights: &dyn Weights, vertices: &[usize]) -> Self {
        let view = RenumberWeights::sequence(weights, vertices)
            .expect("resequenced vertices must be distinct");
        Self::from_weights(vertices.len(), &view)
    }

    fn pairs_match(&self) -> bool {
        (0..self.n).all(|i| (i + 1..self.n).all(|j| self.get(i, j) == self.get(j, i)))
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.matrix[i * self.n + j]
    }

    pub fn set_pair(&mut self, i: usize, j: usize, value: f64) {
        self.matrix[i * self.n + j] = value;
        self.matrix[j * self.n + i] = value;
    }

    pub fn set_triangle_inequality(&mut self, flag: bool) {
        self.triangle_inequality = flag;
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.matrix[i * self.n..(i + 1) * self.n]
    }
}

impl Weights for MatrixWeights {
    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.n, "i = {}", i);
        assert!(j < self.n, "j = {}", j);
        self.get(i, j)
    }

    fn len(&self) -> usize {
        self.n
    }

    fn is_symmetric(&self) -> bool {
        self.symmetric
    }

    fn is_triangle_inequality(&self) -> bool {
        self.triangle_inequality
    }
}

/// Euclidean distances between coordinates (overflow-safe).
#[derive(Debug, Clone)]
pub struct EuclidWeights {
    matrix: MatrixWeights,
}

impl EuclidWeights {
    pub fn new(coords: &[Coord]) -> Self {
        let mut matrix =
            MatrixWeights::from_fn(coords.len(), |i, j| coords[i].distance_hypot(&coords[j]));
        matrix.set_triangle_inequality(true);
        EuclidWeights { matrix }
    }
}

impl Weights for EuclidWeights {
    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        self.matrix.value(i, j)
    }

    fn len(&self) -> usize {
        self.matrix.len()
    }

    fn is_triangle_inequality(&self) -> bool {
        true
    }
}

/// Squared Euclidean distances. Ordering-equivalent to true distances, so
/// valid wherever only comparisons matter, such as MST edge selection.
#[derive(Debug, Clone)]
pub struct EuclidSqWeights {
    matrix: MatrixWeights,
}

impl EuclidSqWeights {
    pub fn new(coords: &[Coord]) -> Self {
        EuclidSqWeights {
            matrix: MatrixWeights::from_fn(coords.len(), |i, j| coords[i].distance_sq(&coords[j])),
        }
    }
}

impl Weights for EuclidSqWeights {
    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        self.matrix.value(i, j)
    }

    fn len(&self) -> usize {
        self.matrix.len()
    }
}

/// `value(i, j) = base.value(i + shift, j + shift)`.
pub struct ShiftWeights<'a> {
    base: &'a dyn Weights,
    shift: usize,
}

impl<'a> ShiftWeights<'a> {
    pub fn new(base: &'a dyn Weights, shift: usize) -> Self {
        ShiftWeights { base, shift }
    }
}

impl Weights for ShiftWeights<'_> {
    #[inline]
    fn value(&self, i: usize, j: usize) -> f64 {
        self.base.value(i + self.shift, j + self.shift)
    }

    fn len(&self) -> usize {
        self.base.len().saturating_sub(self.shift)
    }

    fn is_symmetric(&self) -> bool {
        self.base.is_symmetric()
    }

    fn is_triangle_inequality(&self) -> bool {
        self.base.is_triangle_inequality()
    }
}

/// Relabels vertices: view index `from[k]` is base vertex `to[k]`.
pub struct RenumberWeights<'a> {
    base: &'a dyn Weights,
    map: HashMap<usize, usize>,
    unmap: HashMap<usize, usize>,
}

impl<'a> RenumberWeights<'a> {
    pub fn new(base: &'a dyn Weights, from: &[usize], to: &[usize]) -> Result<Self> {
        assert_eq!(from.len(), to.len(), "renumber vectors differ in length");
        let mut map = HashMap::with_capacity(from.len());
        let mut unmap = HashMap::with_capacity(from.len());
        for (&f, &t) in from.iter().zip(to) {
            if map.insert(f, t).is_some() {
                return Err(OrderError::DuplicateIndex { index: f });
            }
            if unmap.insert(t, f).is_some() {
                return Err(OrderError::DuplicateIndex { index: t });
            }
        }
        Ok(RenumberWeights { base, map, unmap })
    }

    /// View index `k` is base vertex `vertices[k]`.
    pub fn sequence(base: &'a dyn Weights, vertices: &[usize]) -> Result<Self> {
        let from: Vec<usize> = (0..vertices.len()).collect();
        Self::new(base, &from, vertices)
    }

    /// Translate base vertices back to view indices.
    pub fn unnumber(&self, base_vertices: &[usize]) -> Vec<usize> {
        base_vertices
            .iter()
            .map(|v| {
                *self
                    .unmap
                    .get(v)
                    .unwrap_or_else(|| panic!("vertex {} is not renumbered", v))
            })
            .collect()
    }

    fn base_index(&self, i: usize) -> usize {
        *self
            .map
            .get(&i)
            .unwrap_or_else(|| panic!("index {} is not renumbered", i))
    }
}

impl Weights for RenumberWeights<'_> {
    fn value(&self, i: usize, j: usize) -> f64 {
        self.base.value(self.base_index(i), self.base_index(j))
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn is_symmetric(&self) -> bool {
        self.base.is_symmetric()
    }

    fn is_triangle_inequality(&self) -> bool {
        self.base.is_triangle_inequality()
    }
}
