use serde::{Deserialize, Serialize};

/// Failures raised by the model's predict call.
#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("feature vector has {actual} values, model expects {expected}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("model tree {tree} is corrupt at node {node}")]
    CorruptTree { tree: usize, node: usize },
}

/// A trained price regression model, deserialized from `model.json`.
///
/// The offline training pipeline exports one of two shapes: a plain linear
/// fit, or a gradient-boosted ensemble of regression trees. Either way the
/// model answers a single question: given one ordered feature vector, what
/// is the price? The struct is loaded once at startup and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PriceModel {
    Linear {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    Gbdt {
        base_score: f64,
        n_features: usize,
        trees: Vec<Tree>,
    },
}

/// One regression tree: nodes linked by index, node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl PriceModel {
    /// Width of the feature vector this model was trained on.
    pub fn n_features(&self) -> usize {
        match self {
            PriceModel::Linear { coefficients, .. } => coefficients.len(),
            PriceModel::Gbdt { n_features, .. } => *n_features,
        }
    }

    /// Predict the price for a single ordered feature vector.
    pub fn predict(&self, row: &[f64]) -> Result<f64, PredictError> {
        let expected = self.n_features();
        if row.len() != expected {
            return Err(PredictError::ShapeMismatch {
                expected,
                actual: row.len(),
            });
        }

        match self {
            PriceModel::Linear {
                intercept,
                coefficients,
            } => Ok(intercept + coefficients.iter().zip(row).map(|(c, v)| c * v).sum::<f64>()),
            PriceModel::Gbdt {
                base_score, trees, ..
            } => {
                let mut score = *base_score;
                for (tree_idx, tree) in trees.iter().enumerate() {
                    score += tree.score(row, tree_idx)?;
                }
                Ok(score)
            }
        }
    }
}

impl Tree {
    fn score(&self, row: &[f64], tree_idx: usize) -> Result<f64, PredictError> {
        let mut idx = 0usize;
        // A well-formed tree reaches a leaf in at most nodes.len() hops;
        // anything longer means a cycle in the node links.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let v = row.get(*feature).copied().ok_or(PredictError::CorruptTree {
                        tree: tree_idx,
                        node: idx,
                    })?;
                    // NaN follows the left branch, same as the trainer
                    idx = if v.is_nan() || v < *threshold { *left } else { *right };
                }
                None => {
                    return Err(PredictError::CorruptTree {
                        tree: tree_idx,
                        node: idx,
                    })
                }
            }
        }
        Err(PredictError::CorruptTree {
            tree: tree_idx,
            node: idx,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linear_predict() {
        let model = PriceModel::Linear {
            intercept: 1.0,
            coefficients: vec![2.0, 0.5],
        };
        let price = model.predict(&[3.0, 4.0]).unwrap();
        assert_eq!(price, 1.0 + 6.0 + 2.0);
    }

    #[test]
    fn test_linear_shape_mismatch() {
        let model = PriceModel::Linear {
            intercept: 0.0,
            coefficients: vec![1.0, 1.0, 1.0],
        };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            PredictError::ShapeMismatch {
                expected: 3,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_gbdt_predict_walks_both_branches() {
        // Single split on feature 0 at 2.5: left leaf 10, right leaf 20.
        let tree = Tree {
            nodes: vec![
                Node::Split {
                    feature: 0,
                    threshold: 2.5,
                    left: 1,
                    right: 2,
                },
                Node::Leaf { value: 10.0 },
                Node::Leaf { value: 20.0 },
            ],
        };
        let model = PriceModel::Gbdt {
            base_score: 1.0,
            n_features: 1,
            trees: vec![tree],
        };
        assert_eq!(model.predict(&[1.0]).unwrap(), 11.0);
        assert_eq!(model.predict(&[3.0]).unwrap(), 21.0);
    }

    #[test]
    fn test_gbdt_cyclic_tree_is_rejected() {
        let tree = Tree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 0.5,
                left: 0,
                right: 0,
            }],
        };
        let model = PriceModel::Gbdt {
            base_score: 0.0,
            n_features: 1,
            trees: vec![tree],
        };
        let err = model.predict(&[1.0]).unwrap_err();
        assert!(matches!(err, PredictError::CorruptTree { tree: 0, .. }));
    }

    #[test]
    fn test_model_json_roundtrip() {
        let raw = json!({
            "kind": "linear",
            "intercept": -1.2,
            "coefficients": [5.6, 0.12, -0.08, -0.1, 0.01, 0.004]
        });
        let model: PriceModel = serde_json::from_value(raw).unwrap();
        assert_eq!(model.n_features(), 6);

        let gbdt = json!({
            "kind": "gbdt",
            "base_score": 3.9,
            "n_features": 2,
            "trees": [{"nodes": [
                {"feature": 0, "threshold": 1.0, "left": 1, "right": 2},
                {"value": -0.5},
                {"value": 0.5}
            ]}]
        });
        let model: PriceModel = serde_json::from_value(gbdt).unwrap();
        assert_eq!(model.predict(&[0.5, 0.0]).unwrap(), 3.4);
    }
}
