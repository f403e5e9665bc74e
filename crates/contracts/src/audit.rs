use models::enums::RiskLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::validation::{Validate, ValidationErrors, Validator};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogFilters {
    pub resource: Option<String>,
    pub action: Option<String>,
    pub risk_level: Option<RiskLevel>,
}

impl Validate for AuditLogFilters {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut v = Validator::new();
        v.opt_length("resource", self.resource.as_deref(), 1, 64)
            .opt_length("action", self.action.as_deref(), 1, 64);
        v.finish()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogResponse {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<Uuid>,
    pub risk_level: RiskLevel,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub request_id: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub metadata: Option<Value>,
    pub created_at: String,
}
