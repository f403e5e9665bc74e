use contracts::audit::AuditLogResponse;
use models::audit_log;

use super::ts;

pub fn to_audit_log(a: audit_log::Model) -> AuditLogResponse {
    AuditLogResponse {
        id: a.id,
        user_id: a.user_id,
        action: a.action,
        resource: a.resource,
        resource_id: a.resource_id,
        risk_level: a.risk_level,
        old_values: a.old_values,
        new_values: a.new_values,
        ip_address: a.ip_address,
        user_agent: a.user_agent,
        request_id: a.request_id,
        endpoint: a.endpoint,
        http_method: a.http_method,
        metadata: a.metadata,
        created_at: ts(&a.created_at),
    }
}
