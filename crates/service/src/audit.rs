//! Audit trail for mutating requests.
use chrono::Utc;
use contracts::audit::{AuditLogFilters, AuditLogResponse};
use contracts::{PageRequest, PaginatedResponse, Validate};
use models::audit_log;
use models::enums::RiskLevel;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder};
use serde_json::Value;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::mappers::audit::to_audit_log;
use crate::pagination::fetch_page;

/// Request attributes copied onto every audit row.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub request_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: String,
    pub resource_id: Option<Uuid>,
    pub risk_level: RiskLevel,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub metadata: Option<Value>,
    pub context: RequestContext,
}

impl AuditEntry {
    pub fn new(user_id: Uuid, action: impl Into<String>, resource: impl Into<String>, resource_id: Option<Uuid>) -> Self {
        Self {
            user_id: Some(user_id),
            action: action.into(),
            resource: resource.into(),
            resource_id,
            risk_level: RiskLevel::default(),
            old_values: None,
            new_values: None,
            metadata: None,
            context: RequestContext::default(),
        }
    }

    pub fn risk(mut self, level: RiskLevel) -> Self {
        self.risk_level = level;
        self
    }

    pub fn new_values(mut self, values: Value) -> Self {
        self.new_values = Some(values);
        self
    }

    pub fn context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }

    fn into_model(self) -> audit_log::Model {
        audit_log::Model {
            id: Uuid::new_v4(),
            user_id: self.user_id,
            action: self.action,
            resource: self.resource,
            resource_id: self.resource_id,
            risk_level: self.risk_level,
            old_values: self.old_values,
            new_values: self.new_values,
            ip_address: self.context.ip_address,
            user_agent: self.context.user_agent,
            request_id: self.context.request_id,
            endpoint: self.context.endpoint,
            http_method: self.context.http_method,
            metadata: self.metadata,
            created_at: Utc::now().fixed_offset(),
        }
    }
}

/// Writes an audit row. Failures are logged and swallowed.
pub async fn record(db: &DatabaseConnection, entry: AuditEntry) {
    let action = entry.action.clone();
    let resource = entry.resource.clone();
    if let Err(e) = entry.into_model().into_active_model().reset_all().insert(db).await {
        warn!(event = "audit_write_failed", action = %action, resource = %resource, error = %e);
    }
}

/// The caller's own audit history, newest first.
#[instrument(skip(db, filters))]
pub async fn list_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    filters: &AuditLogFilters,
    page: &PageRequest,
) -> Result<PaginatedResponse<AuditLogResponse>, ServiceError> {
    filters.validate()?;
    use audit_log::Column;
    let mut select = audit_log::Entity::find().filter(Column::UserId.eq(user_id));
    if let Some(resource) = filters.resource.as_deref() {
        select = select.filter(Column::Resource.eq(resource));
    }
    if let Some(action) = filters.action.as_deref() {
        select = select.filter(Column::Action.eq(action));
    }
    if let Some(level) = filters.risk_level {
        select = select.filter(Column::RiskLevel.eq(level));
    }
    let (rows, total) = fetch_page(db, select.order_by_desc(Column::CreatedAt), page).await?;
    Ok(PaginatedResponse::new(rows.into_iter().map(to_audit_log).collect(), page, total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, seed_user};

    #[test]
    fn entry_carries_request_context() {
        let user = Uuid::new_v4();
        let ctx = RequestContext { request_id: Some("req_1_abc".into()), http_method: Some("POST".into()), ..Default::default() };
        let row = AuditEntry::new(user, "create", "organization", None)
            .risk(RiskLevel::Medium)
            .new_values(serde_json::json!({"name": "Harbour"}))
            .context(ctx)
            .into_model();
        assert_eq!(row.user_id, Some(user));
        assert_eq!(row.risk_level, RiskLevel::Medium);
        assert_eq!(row.request_id.as_deref(), Some("req_1_abc"));
        assert_eq!(row.http_method.as_deref(), Some("POST"));
        assert_eq!(row.new_values.as_ref().and_then(|v| v["name"].as_str()), Some("Harbour"));
    }

    #[tokio::test]
    async fn record_then_list() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let user = seed_user(&db, "audited").await?;
        record(&db, AuditEntry::new(user.id, "create", "community", None)).await;
        record(&db, AuditEntry::new(user.id, "update", "organization", None).risk(RiskLevel::High)).await;

        let all = list_for_user(&db, user.id, &AuditLogFilters::default(), &PageRequest::default()).await?;
        assert_eq!(all.pagination.total, 2);
        let high = AuditLogFilters { risk_level: Some(RiskLevel::High), ..Default::default() };
        let only = list_for_user(&db, user.id, &high, &PageRequest::default()).await?;
        assert_eq!(only.data[0].resource, "organization");
        Ok(())
    }
}
