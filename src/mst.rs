//! Minimum spanning trees over dense weight models.

use crate::weights::Weights;

pub trait MinSpanTree {
    /// Tree edge array over the first `n` vertices, rooted at `n - 1`.
    fn edges(&self, n: usize, weights: &dyn Weights) -> Vec<usize>;

    /// Weight of a minimum spanning tree, without reconstructing its edges.
    fn weight(&self, n: usize, weights: &dyn Weights) -> f64;
}

/// Prim's algorithm in Θ(n²) time and O(n) extra space.
///
/// Grows the tree from vertex `n - 1`. Every non-tree vertex remembers its
/// cheapest connection to the tree, refreshed only when the vertex just
/// inserted offers a strictly shorter one. Ties go to the lowest index.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prims;

impl MinSpanTree for Prims {
    fn edges(&self, n: usize, weights: &dyn Weights) -> Vec<usize> {
        if n <= 1 {
            return Vec::new();
        } else if n == 2 {
            return vec![1];
        }

        let mut in_tree = vec![false; n - 1];
        let mut nearest_vertex = vec![usize::MAX; n - 1];
        let mut nearest_weight = vec![f64::MAX; n - 1];

        let mut next = n - 1;
        for _ in 0..n - 1 {
            let insert = next;
            next = usize::MAX;
            let mut min_weight = f64::INFINITY;
            for j in 0..n - 1 {
                if in_tree[j] {
                    continue;
                }
                let w = weights.value(j, insert);
                if nearest_weight[j] > w {
                    nearest_vertex[j] = insert;
                    nearest_weight[j] = w;
                }
                if nearest_weight[j] < min_weight {
                    next = j;
                    min_weight = nearest_weight[j];
                }
            }
            assert!(next != usize::MAX, "no vertex left to connect");
            in_tree[next] = true;
        }
        nearest_vertex
    }

    fn weight(&self, n: usize, weights: &dyn Weights) -> f64 {
        if n <= 1 {
            return 0.0;
        } else if n == 2 {
            return weights.value(0, 1);
        }

        let mut in_tree = vec![false; n - 1];
        let mut nearest_weight = vec![f64::MAX; n - 1];
        let mut total = 0.0;

        let mut next = n - 1;
        for _ in 0..n - 1 {
            let insert = next;
            next = usize::MAX;
            let mut min_weight = f64::INFINITY;
            for j in 0..n - 1 {
                if in_tree[j] {
                    continue;
                }
                nearest_weight[j] = nearest_weight[j].min(weights.value(j, insert));
                if nearest_weight[j] < min_weight {
                    next = j;
                    min_weight = nearest_weight[j];
                }
            }
            assert!(next != usize::MAX, "no vertex left to connect");
            in_tree[next] = true;
            total += min_weight;
        }
        total
    }
}
