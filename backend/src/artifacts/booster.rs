//! Gradient-boosted regression trees read from the XGBoost JSON model format
//!
//! Only the fields needed for scoring are read: per-tree child/split arrays,
//! `learner_model_param.base_score`, `num_feature` and the objective name.
//! In this format a leaf's output is stored in `split_conditions`.

use serde::Deserialize;

use crate::services::prediction::{InferenceError, Regressor};

#[derive(Debug, Deserialize)]
struct ModelFile {
    learner: Learner,
}

#[derive(Debug, Deserialize)]
struct Learner {
    gradient_booster: GradientBooster,
    learner_model_param: LearnerModelParam,
    objective: ObjectiveParam,
}

#[derive(Debug, Deserialize)]
struct GradientBooster {
    name: String,
    model: Option<TreeEnsemble>,
}

#[derive(Debug, Deserialize)]
struct TreeEnsemble {
    trees: Vec<TreeArrays>,
}

#[derive(Debug, Deserialize)]
struct TreeArrays {
    left_children: Vec<i64>,
    right_children: Vec<i64>,
    split_indices: Vec<i64>,
    split_conditions: Vec<f64>,
    default_left: Vec<Flag>,
    #[serde(default)]
    split_type: Vec<i64>,
}

/// XGBoost writes booleans as either `true`/`false` or `0`/`1` depending on version
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

impl Flag {
    fn is_set(&self) -> bool {
        match self {
            Flag::Bool(b) => *b,
            Flag::Int(i) => *i != 0,
        }
    }
}

/// Model parameters are serialized as strings, e.g. `"5E-1"` or `"[1.0465E2]"`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Param {
    Text(String),
    Number(f64),
}

impl Param {
    fn as_f64(&self) -> Result<f64, String> {
        match self {
            Param::Number(n) => Ok(*n),
            Param::Text(s) => s
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']')
                .parse::<f64>()
                .map_err(|_| format!("invalid numeric parameter '{}'", s)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LearnerModelParam {
    base_score: Param,
    num_feature: Param,
    #[serde(default)]
    num_class: Option<Param>,
    #[serde(default)]
    num_target: Option<Param>,
}

#[derive(Debug, Deserialize)]
struct ObjectiveParam {
    name: String,
}

/// How the summed tree margin maps to a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Identity,
    Log,
}

impl Link {
    fn for_objective(name: &str) -> Result<Self, String> {
        match name {
            "reg:squarederror" | "reg:linear" | "reg:squaredlogerror" | "reg:pseudohubererror"
            | "reg:absoluteerror" | "reg:quantileerror" => Ok(Link::Identity),
            "count:poisson" | "reg:gamma" | "reg:tweedie" => Ok(Link::Log),
            other => Err(format!("unsupported objective '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        default_left: bool,
    },
    Leaf {
        value: f32,
    },
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    fn from_arrays(arrays: TreeArrays, n_features: usize) -> Result<Self, String> {
        let n = arrays.left_children.len();
        if n == 0 {
            return Err("tree has no nodes".to_string());
        }
        if arrays.right_children.len() != n
            || arrays.split_indices.len() != n
            || arrays.split_conditions.len() != n
            || arrays.default_left.len() != n
        {
            return Err("tree node arrays have different lengths".to_string());
        }
        if arrays.split_type.iter().any(|t| *t != 0) {
            return Err("categorical splits are not supported".to_string());
        }

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            let left = arrays.left_children[i];
            let right = arrays.right_children[i];
            let condition = arrays.split_conditions[i];

            if left == -1 {
                nodes.push(Node::Leaf {
                    value: condition as f32,
                });
                continue;
            }

            // Children always come after their parent, so traversal terminates
            let child = |c: i64| -> Result<usize, String> {
                usize::try_from(c)
                    .ok()
                    .filter(|c| *c > i && *c < n)
                    .ok_or_else(|| format!("node {} has invalid child index {}", i, c))
            };
            let feature = usize::try_from(arrays.split_indices[i])
                .ok()
                .filter(|f| *f < n_features)
                .ok_or_else(|| {
                    format!(
                        "node {} splits on feature {} but the model has {} features",
                        i, arrays.split_indices[i], n_features
                    )
                })?;

            nodes.push(Node::Split {
                feature,
                threshold: condition as f32,
                left: child(left)?,
                right: child(right)?,
                default_left: arrays.default_left[i].is_set(),
            });
        }

        Ok(Self { nodes })
    }

    fn leaf_value(&self, row: &[f32]) -> Result<f32, InferenceError> {
        let mut index = 0;
        loop {
            match self.nodes.get(index) {
                Some(Node::Leaf { value }) => return Ok(*value),
                Some(Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                }) => {
                    let x = row.get(*feature).copied().ok_or_else(|| {
                        InferenceError::Model(format!("feature {} missing from input", feature))
                    })?;
                    index = if x.is_nan() {
                        if *default_left { *left } else { *right }
                    } else if x < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
                None => {
                    return Err(InferenceError::Model(format!(
                        "tree traversal reached missing node {}",
                        index
                    )))
                }
            }
        }
    }
}

/// Additive tree ensemble for single-output regression
#[derive(Debug, Clone)]
pub struct GradientBoostedTrees {
    trees: Vec<Tree>,
    n_features: usize,
    base_margin: f32,
    link: Link,
}

impl GradientBoostedTrees {
    /// Parse an XGBoost JSON model; the error string describes what is wrong with the content
    pub fn from_json(bytes: &[u8]) -> Result<Self, String> {
        let file: ModelFile =
            serde_json::from_slice(bytes).map_err(|e| format!("invalid model JSON: {}", e))?;
        let learner = file.learner;

        if learner.gradient_booster.name != "gbtree" {
            return Err(format!(
                "unsupported booster '{}'",
                learner.gradient_booster.name
            ));
        }
        let params = &learner.learner_model_param;
        if let Some(num_class) = &params.num_class {
            if num_class.as_f64()? > 1.0 {
                return Err("multi-class models are not supported".to_string());
            }
        }
        if let Some(num_target) = &params.num_target {
            if num_target.as_f64()? > 1.0 {
                return Err("multi-target models are not supported".to_string());
            }
        }

        let n_features = params.num_feature.as_f64()?;
        if n_features < 1.0 || n_features.fract() != 0.0 {
            return Err(format!("invalid num_feature {}", n_features));
        }
        let n_features = n_features as usize;

        let link = Link::for_objective(&learner.objective.name)?;
        let base_score = params.base_score.as_f64()?;
        let base_margin = match link {
            Link::Identity => base_score,
            Link::Log => {
                if base_score <= 0.0 {
                    return Err(format!(
                        "base_score {} is invalid for a log-link objective",
                        base_score
                    ));
                }
                base_score.ln()
            }
        };

        let ensemble = learner
            .gradient_booster
            .model
            .ok_or("gradient booster has no model")?;
        let trees = ensemble
            .trees
            .into_iter()
            .enumerate()
            .map(|(i, arrays)| {
                Tree::from_arrays(arrays, n_features).map_err(|e| format!("tree {}: {}", i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            trees,
            n_features,
            base_margin: base_margin as f32,
            link,
        })
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for GradientBoostedTrees {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.n_features {
            return Err(InferenceError::Model(format!(
                "model expects {} features, got {}",
                self.n_features,
                row.len()
            )));
        }

        // Trees were grown on single-precision features
        let row: Vec<f32> = row.iter().map(|v| *v as f32).collect();
        let mut margin = self.base_margin;
        for tree in &self.trees {
            margin += tree.leaf_value(&row)?;
        }

        let output = match self.link {
            Link::Identity => f64::from(margin),
            Link::Log => f64::from(margin).exp(),
        };
        if !output.is_finite() {
            return Err(InferenceError::Model(format!(
                "model produced a non-finite value ({})",
                output
            )));
        }
        Ok(output)
    }
}
