use alloc::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState, Body, IdKind, Identity};
use crate::entities::NotificationId;
use crate::usecases::notification::{list, mark, reconcile, remove};

pub struct NotificationController {
    pub list: Arc<dyn list::Usecase + Sync + Send>,
    pub mark: Arc<dyn mark::Usecase + Sync + Send>,
    pub remove: Arc<dyn remove::Usecase + Sync + Send>,
    pub reconcile: Arc<dyn reconcile::Usecase + Sync + Send>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkRequest {
    #[serde(default)]
    pub notification_ids: Vec<String>,
    #[serde(default = "default_is_read")]
    pub is_read: bool,
}

fn default_is_read() -> bool { true }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveRequest {
    #[serde(default)]
    pub notification_ids: Vec<String>,
}

fn parse_ids(raw: &[String]) -> Result<Vec<NotificationId>, ApiError> {
    raw.iter()
        .map(|id| parse_id(IdKind::Notification, id))
        .collect()
}

pub async fn list(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let list::Output { notifications } = state
        .notifications
        .list
        .handle(list::Input {
            user_id: identity.id,
        })
        .await?;

    Ok(Json(json!({
        "message": "Notifications fetched!",
        "notifications": notifications,
    })))
}

pub async fn mark(
    State(state): State<AppState>,
    identity: Identity,
    Body(body): Body<MarkRequest>,
) -> Result<Json<Value>, ApiError> {
    let ids = parse_ids(&body.notification_ids)?;

    let mark::Output { updated } = state
        .notifications
        .mark
        .handle(mark::Input {
            user_id: identity.id,
            ids,
            is_read: body.is_read,
        })
        .await?;

    Ok(Json(json!({
        "message": "Notifications updated!",
        "updated": updated,
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    identity: Identity,
    Body(body): Body<RemoveRequest>,
) -> Result<Json<Value>, ApiError> {
    let ids = parse_ids(&body.notification_ids)?;

    let remove::Output { removed } = state
        .notifications
        .remove
        .handle(remove::Input {
            user_id: identity.id,
            ids,
        })
        .await?;

    Ok(Json(json!({
        "message": "Notifications deleted!",
        "removed": removed.iter().map(|n| n.id).collect::<Vec<_>>(),
    })))
}

pub async fn reconcile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<Value>, ApiError> {
    let reconcile::Output { pruned } = state
        .notifications
        .reconcile
        .handle(reconcile::Input {
            user_id: identity.id,
        })
        .await?;

    Ok(Json(json!({
        "message": "Notifications reconciled!",
        "pruned": pruned,
    })))
}
