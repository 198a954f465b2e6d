use alloc::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState, Body, IdKind, Identity, Segments};
use crate::entities::{Date, EventToggles, NotificationSettings, User, UserId};
use crate::usecases::user::{edit, follow, get, register, unfollow};

pub struct UserController {
    pub register: Arc<dyn register::Usecase + Sync + Send>,
    pub get: Arc<dyn get::Usecase + Sync + Send>,
    pub edit: Arc<dyn edit::Usecase + Sync + Send>,
    pub follow: Arc<dyn follow::Usecase + Sync + Send>,
    pub unfollow: Arc<dyn unfollow::Usecase + Sync + Send>,
}

/// What anyone may see of a user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub avatar: String,
    pub created: Date,
    pub followers: Vec<UserId>,
    pub notification_count: usize,
}

impl From<User> for UserView {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            avatar: u.avatar,
            created: u.created,
            followers: u.followers,
            notification_count: u.notifications.len(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub avatar: Option<String>,
    pub enable_notifications: Option<EventToggles>,
    pub enable_notification_emails: Option<EventToggles>,
}

pub async fn register(
    State(state): State<AppState>,
    Body(body): Body<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let RegisterRequest {
        username,
        email,
        avatar,
    } = body;

    let register::Output { user } = state
        .users
        .register
        .handle(register::Input {
            username,
            email,
            avatar,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered!",
            "user": UserView::from(user),
        })),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Segments(user_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let user_id = parse_id(IdKind::User, &user_id)?;

    let get::Output { user } = state.users.get.handle(get::Input { user_id }).await?;

    Ok(Json(json!({
        "message": "User fetched!",
        "user": UserView::from(user),
    })))
}

pub async fn edit(
    State(state): State<AppState>,
    identity: Identity,
    Body(body): Body<SettingsRequest>,
) -> Result<Json<Value>, ApiError> {
    let SettingsRequest {
        avatar,
        enable_notifications,
        enable_notification_emails,
    } = body;

    let edit::Output { user } = state
        .users
        .edit
        .handle(edit::Input {
            user_id: identity.id,
            avatar,
            in_app: enable_notifications,
            email: enable_notification_emails,
        })
        .await?;

    let NotificationSettings { in_app, email } = user.settings;
    Ok(Json(json!({
        "message": "Settings updated!",
        "user": UserView::from(user),
        "enableNotifications": in_app,
        "enableNotificationEmails": email,
    })))
}

pub async fn follow(
    State(state): State<AppState>,
    identity: Identity,
    Segments(user_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let target = parse_id(IdKind::User, &user_id)?;

    let follow::Output { user } = state
        .users
        .follow
        .handle(follow::Input {
            follower: identity.id,
            target,
        })
        .await?;

    Ok(Json(json!({
        "message": format!("You are now following {}!", user.username),
        "user": UserView::from(user),
    })))
}

pub async fn unfollow(
    State(state): State<AppState>,
    identity: Identity,
    Segments(user_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let target = parse_id(IdKind::User, &user_id)?;

    let unfollow::Output { user } = state
        .users
        .unfollow
        .handle(unfollow::Input {
            follower: identity.id,
            target,
        })
        .await?;

    Ok(Json(json!({
        "message": format!("You unfollowed {}!", user.username),
        "user": UserView::from(user),
    })))
}
