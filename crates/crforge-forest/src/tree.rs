//! CART regression trees.
//!
//! A [`RegressionTree`] is grown greedily: each node picks the split that most reduces
//! the sum of squared errors of its targets. Split candidates are midpoints between
//! consecutive distinct feature values, so a row goes left when
//! `row[feature] <= threshold`.
//!
//! # Feature Subsampling
//!
//! Features are visited in a random order per node, and the search stops once
//! `max_features` features that are not constant within the node have been examined.
//! Constant features do not count toward the width, so a node is only turned into a
//! leaf for lack of candidates when every feature is constant over its rows.

use rand::{Rng, seq::SliceRandom as _};

use crate::Regressor;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeParams {
    /// Number of non-constant features examined per split search (at least 1)
    pub max_features: usize,
    /// Minimum number of training rows in each leaf (at least 1)
    pub min_samples_leaf: usize,
    /// Maximum depth of the tree (`None` = unlimited)
    pub max_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf {
        value: f32,
    },
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
}

/// A fitted regression tree.
#[derive(Debug, Clone)]
pub struct RegressionTree {
    nodes: Vec<Node>,
    n_features: usize,
    /// Total squared-error reduction contributed by each feature
    impurity_decrease: Vec<f64>,
}

impl RegressionTree {
    /// Grows a tree on the rows of `x` selected by `sample` (duplicates allowed).
    ///
    /// The caller is responsible for validating `x` and `y`; `sample` must be
    /// non-empty and every index must be in range.
    pub(crate) fn grow<R, X>(
        x: &[X],
        y: &[f32],
        sample: Vec<usize>,
        params: TreeParams,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
        X: AsRef<[f32]>,
    {
        debug_assert!(!sample.is_empty());
        debug_assert!(params.max_features >= 1 && params.min_samples_leaf >= 1);

        let n_features = x[0].as_ref().len();
        let mut grower = TreeGrower {
            x,
            y,
            params,
            features: (0..n_features).collect(),
            nodes: vec![Node::Leaf { value: 0.0 }],
            impurity_decrease: vec![0.0; n_features],
        };

        let mut stack = vec![(0, sample, 0)];
        while let Some((node_id, rows, depth)) = stack.pop() {
            let moments = Moments::of(y, &rows);
            let split = grower.find_split(&rows, depth, &moments, rng);
            let Some(split) = split else {
                #[expect(clippy::cast_possible_truncation)]
                let value = moments.mean() as f32;
                grower.nodes[node_id] = Node::Leaf { value };
                continue;
            };

            let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
                .iter()
                .partition(|&&i| x[i].as_ref()[split.feature] <= split.threshold);
            debug_assert!(left_rows.len() >= params.min_samples_leaf);
            debug_assert!(right_rows.len() >= params.min_samples_leaf);

            let left = grower.nodes.len();
            let right = left + 1;
            grower.nodes.push(Node::Leaf { value: 0.0 });
            grower.nodes.push(Node::Leaf { value: 0.0 });
            grower.nodes[node_id] = Node::Split {
                feature: split.feature,
                threshold: split.threshold,
                left,
                right,
            };
            grower.impurity_decrease[split.feature] += split.gain;

            stack.push((right, right_rows, depth + 1));
            stack.push((left, left_rows, depth + 1));
        }

        Self {
            nodes: grower.nodes,
            n_features,
            impurity_decrease: grower.impurity_decrease,
        }
    }

    /// Number of nodes (splits and leaves).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node, Node::Leaf { .. }))
            .count()
    }

    /// Depth of the deepest leaf (a single-leaf tree has depth 0).
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack = vec![(0, 0)];
        while let Some((node_id, depth)) = stack.pop() {
            match self.nodes[node_id] {
                Node::Leaf { .. } => max_depth = max_depth.max(depth),
                Node::Split { left, right, .. } => {
                    stack.push((left, depth + 1));
                    stack.push((right, depth + 1));
                }
            }
        }
        max_depth
    }

    /// Squared-error reduction attributed to each feature, summed over all splits.
    #[must_use]
    pub fn impurity_decrease(&self) -> &[f64] {
        &self.impurity_decrease
    }
}

impl Regressor for RegressionTree {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f32]) -> f32 {
        assert_eq!(row.len(), self.n_features, "feature count mismatch");
        let mut node_id = 0;
        loop {
            match self.nodes[node_id] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node_id = if row[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Sum and sum of squares of a node's targets.
#[derive(Debug, Clone, Copy)]
struct Moments {
    count: usize,
    sum: f64,
    sum_sq: f64,
}

impl Moments {
    fn of(y: &[f32], rows: &[usize]) -> Self {
        rows.iter().fold(
            Self {
                count: 0,
                sum: 0.0,
                sum_sq: 0.0,
            },
            |acc, &i| {
                let v = f64::from(y[i]);
                Self {
                    count: acc.count + 1,
                    sum: acc.sum + v,
                    sum_sq: acc.sum_sq + v * v,
                }
            },
        )
    }

    #[expect(clippy::cast_precision_loss)]
    fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// `sum^2 / n`, the part of the squared error a split can change.
    #[expect(clippy::cast_precision_loss)]
    fn proxy(sum: f64, count: usize) -> f64 {
        sum * sum / count as f64
    }

    fn sse(&self) -> f64 {
        (self.sum_sq - Self::proxy(self.sum, self.count)).max(0.0)
    }
}

#[derive(Debug, Clone, Copy)]
struct Split {
    feature: usize,
    threshold: f32,
    gain: f64,
}

#[derive(Debug)]
struct TreeGrower<'a, X> {
    x: &'a [X],
    y: &'a [f32],
    params: TreeParams,
    features: Vec<usize>,
    nodes: Vec<Node>,
    impurity_decrease: Vec<f64>,
}

impl<X> TreeGrower<'_, X>
where
    X: AsRef<[f32]>,
{
    fn value(&self, row: usize, feature: usize) -> f32 {
        self.x[row].as_ref()[feature]
    }

    fn find_split<R>(
        &mut self,
        rows: &[usize],
        depth: usize,
        moments: &Moments,
        rng: &mut R,
    ) -> Option<Split>
    where
        R: Rng + ?Sized,
    {
        let min_leaf = self.params.min_samples_leaf;
        if rows.len() < 2 * min_leaf
            || self.params.max_depth.is_some_and(|max| depth >= max)
            || moments.sse() <= f64::EPSILON * moments.sum_sq.abs().max(1.0)
        {
            return None;
        }

        let parent_proxy = Moments::proxy(moments.sum, moments.count);
        let mut best: Option<Split> = None;
        let mut examined = 0;

        self.features.shuffle(rng);
        let mut order = rows.to_vec();
        for fi in 0..self.features.len() {
            if examined >= self.params.max_features {
                break;
            }
            let feature = self.features[fi];
            order.sort_by(|&a, &b| self.value(a, feature).total_cmp(&self.value(b, feature)));

            let lowest = self.value(order[0], feature);
            let highest = self.value(order[order.len() - 1], feature);
            if lowest >= highest {
                continue;
            }
            examined += 1;

            let mut left_sum = 0.0;
            for pos in 0..order.len() - 1 {
                left_sum += f64::from(self.y[order[pos]]);
                let left_count = pos + 1;
                let right_count = order.len() - left_count;
                if left_count < min_leaf {
                    continue;
                }
                if right_count < min_leaf {
                    break;
                }
                let a = self.value(order[pos], feature);
                let b = self.value(order[pos + 1], feature);
                if a >= b {
                    continue;
                }
                let right_sum = moments.sum - left_sum;
                let gain = Moments::proxy(left_sum, left_count)
                    + Moments::proxy(right_sum, right_count)
                    - parent_proxy;
                if gain > best.map_or(0.0, |s| s.gain) {
                    let mut threshold = a + (b - a) / 2.0;
                    if threshold >= b {
                        threshold = a;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        gain,
                    });
                }
            }
        }
        best
    }
}
