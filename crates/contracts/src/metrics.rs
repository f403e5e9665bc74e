use serde::Deserialize;

use crate::validation::{Validate, ValidationErrors, Validator};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceQuery {
    pub window_minutes: Option<u64>,
}

impl Validate for PerformanceQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.range_i64("windowMinutes", self.window_minutes.map(|m| m.min(i64::MAX as u64) as i64), 1, 1440);
        v.finish()
    }
}
