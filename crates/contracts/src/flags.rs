use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagReason {
    NotFound,
    Inactive,
    Environment,
    Rollout,
    Excluded,
}

/// Outcome of evaluating one flag for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagEvaluation {
    pub key: String,
    pub enabled: bool,
    pub value: Value,
    pub reason: FlagReason,
}

impl FlagEvaluation {
    pub fn disabled(key: &str, reason: FlagReason) -> Self {
        Self { key: key.to_string(), enabled: false, value: Value::Bool(false), reason }
    }
}
