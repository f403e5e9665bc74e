//! Sequential bulk create/update/delete with per-item error capture.
use async_trait::async_trait;
use contracts::bulk::{BulkAction, BulkItemResult, BulkOperation, BulkResult, BulkSummary};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::ServiceError;

const CREATE_NEEDS_DATA: &str = "Data is required for create operation";
const UPDATE_NEEDS_ID_AND_DATA: &str = "ID and data are required for update operation";
const DELETE_NEEDS_ID: &str = "ID is required for delete operation";

/// A resource that can take part in a bulk request.
#[async_trait]
pub trait BulkHandler: Send + Sync {
    /// Returns the new id and the created resource as JSON.
    async fn bulk_create(&self, actor: Uuid, data: Value) -> Result<(Uuid, Value), ServiceError>;
    async fn bulk_update(&self, actor: Uuid, id: Uuid, data: Value) -> Result<Value, ServiceError>;
    async fn bulk_delete(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError>;
}

/// Decodes an operation payload into a typed request.
pub fn decode<T: DeserializeOwned>(data: Value) -> Result<T, ServiceError> {
    serde_json::from_value(data).map_err(|e| ServiceError::BadRequest(format!("Invalid data: {}", e)))
}

fn item_error(e: &ServiceError) -> String {
    match e {
        ServiceError::Validation(errors) => format!("Validation failed: {}", errors),
        other => other.public_message(),
    }
}

async fn apply<H: BulkHandler + ?Sized>(handler: &H, actor: Uuid, op: BulkOperation) -> Result<(Option<Uuid>, Option<Value>), String> {
    match op.action {
        BulkAction::Create => {
            let data = op.data.ok_or_else(|| CREATE_NEEDS_DATA.to_string())?;
            let (id, created) = handler.bulk_create(actor, data).await.map_err(|e| item_error(&e))?;
            Ok((Some(id), Some(created)))
        }
        BulkAction::Update => {
            let (id, data) = match (op.id, op.data) {
                (Some(id), Some(data)) => (id, data),
                _ => return Err(UPDATE_NEEDS_ID_AND_DATA.to_string()),
            };
            let updated = handler.bulk_update(actor, id, data).await.map_err(|e| item_error(&e))?;
            Ok((Some(id), Some(updated)))
        }
        BulkAction::Delete => {
            let id = op.id.ok_or_else(|| DELETE_NEEDS_ID.to_string())?;
            handler.bulk_delete(actor, id).await.map_err(|e| item_error(&e))?;
            Ok((Some(id), None))
        }
    }
}

/// Applies every operation in order. A failing item never aborts the rest.
#[instrument(skip(handler, operations), fields(count = operations.len()))]
pub async fn run_bulk<H: BulkHandler + ?Sized>(handler: &H, actor: Uuid, operations: Vec<BulkOperation>) -> BulkResult {
    let total = operations.len();
    let mut results = Vec::with_capacity(total);
    let mut summary = BulkSummary { total, ..Default::default() };

    for (index, op) in operations.into_iter().enumerate() {
        let requested_id = op.id;
        match apply(handler, actor, op).await {
            Ok((id, data)) => {
                summary.successful += 1;
                results.push(BulkItemResult { index, success: true, id, data, error: None });
            }
            Err(error) => {
                summary.failed += 1;
                results.push(BulkItemResult { index, success: false, id: requested_id, data: None, error: Some(error) });
            }
        }
    }

    info!(event = "bulk_completed", total = summary.total, successful = summary.successful, failed = summary.failed);
    BulkResult { results, summary }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Notes {
        rows: Mutex<HashMap<Uuid, String>>,
    }

    #[async_trait]
    impl BulkHandler for Notes {
        async fn bulk_create(&self, _actor: Uuid, data: Value) -> Result<(Uuid, Value), ServiceError> {
            let text: String = decode(data)?;
            let id = Uuid::new_v4();
            self.rows.lock().unwrap().insert(id, text.clone());
            Ok((id, Value::String(text)))
        }

        async fn bulk_update(&self, _actor: Uuid, id: Uuid, data: Value) -> Result<Value, ServiceError> {
            let text: String = decode(data)?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.get_mut(&id).ok_or(ServiceError::not_found("Note", id))?;
            *row = text.clone();
            Ok(Value::String(text))
        }

        async fn bulk_delete(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError> {
            if actor != id {
                return Err(ServiceError::access_denied());
            }
            Ok(())
        }
    }

    fn op(action: BulkAction, id: Option<Uuid>, data: Option<Value>) -> BulkOperation {
        BulkOperation { id, action, data }
    }

    #[tokio::test]
    async fn mixed_batch_reports_each_item() {
        let notes = Notes::default();
        let actor = Uuid::new_v4();
        let missing = Uuid::new_v4();
        let ops = vec![
            op(BulkAction::Create, None, Some(Value::String("first".into()))),
            op(BulkAction::Create, None, None),
            op(BulkAction::Update, Some(missing), None),
            op(BulkAction::Update, Some(missing), Some(Value::String("x".into()))),
            op(BulkAction::Delete, None, None),
            op(BulkAction::Delete, Some(Uuid::new_v4()), None),
            op(BulkAction::Delete, Some(actor), None),
            op(BulkAction::Create, None, Some(serde_json::json!({"not": "a string"}))),
        ];
        let out = run_bulk(&notes, actor, ops).await;

        assert_eq!(out.summary, BulkSummary { total: 8, successful: 2, failed: 6 });
        assert!(out.results[0].success);
        assert!(out.results[0].id.is_some());
        assert_eq!(out.results[1].error.as_deref(), Some(CREATE_NEEDS_DATA));
        assert_eq!(out.results[2].error.as_deref(), Some(UPDATE_NEEDS_ID_AND_DATA));
        assert_eq!(out.results[2].id, Some(missing));
        assert_eq!(out.results[3].error, Some(format!("Note with ID {} not found", missing)));
        assert_eq!(out.results[4].error.as_deref(), Some(DELETE_NEEDS_ID));
        assert_eq!(out.results[5].error.as_deref(), Some("Access denied"));
        assert!(out.results[6].success);
        assert!(out.results[6].data.is_none());
        assert!(out.results[7].error.as_deref().unwrap_or_default().starts_with("Invalid data"));
        assert_eq!(out.results.iter().map(|r| r.index).collect::<Vec<_>>(), (0..8).collect::<Vec<_>>());
    }
}
