//! Evaluator configuration.

use serde::{Deserialize, Serialize};

/// Sizing knobs for [`KeyframeEvaluator`](crate::evaluator::KeyframeEvaluator).
/// None of these affect evaluation results, only cost.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EvaluatorConfig {
    /// Maximum memoized (property, frame) entries before the table is flushed.
    /// Zero disables memoization.
    pub cache_capacity: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 65_536,
        }
    }
}
