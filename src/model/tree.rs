//! Randomized partitioning tree stored as an index arena.

use super::forest::average_path_length;
use ndarray::{ArrayView1, ArrayView2};
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    /// Number of sub-sample points that reached this node
    Leaf { size: usize },
}

/// Read-only after construction; node 0 is the root.
#[derive(Debug, Clone)]
pub struct IsolationTree {
    nodes: Vec<Node>,
}

impl IsolationTree {
    /// Grow a tree over the rows of `x` listed in `sample`.
    pub fn build<R: Rng + ?Sized>(
        x: &ArrayView2<'_, f64>,
        sample: Vec<usize>,
        max_depth: usize,
        rng: &mut R,
    ) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(x, sample, 0, max_depth, rng);
        tree
    }

    fn grow<R: Rng + ?Sized>(
        &mut self,
        x: &ArrayView2<'_, f64>,
        points: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut R,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { size: points.len() });
        if points.len() <= 1 || depth >= max_depth {
            return id;
        }

        // Only features that still vary inside this node can split it.
        let candidates: Vec<(usize, f64, f64)> = (0..x.ncols())
            .filter_map(|j| {
                let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &i| {
                    let v = x[[i, j]];
                    (lo.min(v), hi.max(v))
                });
                (hi > lo).then_some((j, lo, hi))
            })
            .collect();
        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = if (hi - lo).is_finite() {
            rng.gen_range(lo..hi)
        } else {
            let u: f64 = rng.gen();
            lo * (1.0 - u) + hi * u
        };
        let (left_points, right_points): (Vec<usize>, Vec<usize>) =
            points.into_iter().partition(|&i| x[[i, feature]] < threshold);

        let left = self.grow(x, left_points, depth + 1, max_depth, rng);
        let right = self.grow(x, right_points, depth + 1, max_depth, rng);
        self.nodes[id] = Node::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Edges from the root to `point`'s leaf, plus the expected remainder for an unsplit leaf.
    pub fn path_length(&self, point: ArrayView1<'_, f64>) -> f64 {
        let mut node = 0;
        let mut depth = 0usize;
        loop {
            match self.nodes[node] {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if point[feature] < threshold { left } else { right };
                    depth += 1;
                }
                Node::Leaf { size } => return depth as f64 + average_path_length(size),
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match nodes[id] {
                Node::Split { left, right, .. } => 1 + walk(nodes, left).max(walk(nodes, right)),
                Node::Leaf { .. } => 0,
            }
        }
        walk(&self.nodes, 0)
    }
}
