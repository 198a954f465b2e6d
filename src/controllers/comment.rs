use alloc::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState, Body, IdKind, Identity, Segments};
use crate::entities::{CampgroundId, CommentId};
use crate::usecases::comment::{create, delete, edit, like, list};

pub struct CommentController {
    pub list: Arc<dyn list::Usecase + Sync + Send>,
    pub create: Arc<dyn create::Usecase + Sync + Send>,
    pub edit: Arc<dyn edit::Usecase + Sync + Send>,
    pub delete: Arc<dyn delete::Usecase + Sync + Send>,
    pub like: Arc<dyn like::Usecase + Sync + Send>,
}

#[derive(Debug, Deserialize)]
pub struct TextRequest {
    #[serde(default)]
    pub text: String,
}

fn parse_pair(
    campground_id: &str,
    comment_id: &str,
) -> Result<(CampgroundId, CommentId), ApiError> {
    Ok((
        parse_id(IdKind::Campground, campground_id)?,
        parse_id(IdKind::Comment, comment_id)?,
    ))
}

pub async fn list(
    State(state): State<AppState>,
    Segments(campground_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;

    let list::Output { comments } = state
        .comments
        .list
        .handle(list::Input { campground_id })
        .await?;

    Ok(Json(json!({
        "message": "Comments fetched!",
        "comments": comments,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Segments(campground_id): Segments<String>,
    Body(TextRequest { text }): Body<TextRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;

    let create::Output { comment } = state
        .comments
        .create
        .handle(create::Input {
            campground_id,
            author: identity.id,
            text,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Comment created!",
            "comment": comment,
        })),
    ))
}

pub async fn edit(
    State(state): State<AppState>,
    identity: Identity,
    Segments((campground_id, comment_id)): Segments<(String, String)>,
    Body(TextRequest { text }): Body<TextRequest>,
) -> Result<Json<Value>, ApiError> {
    let (campground_id, comment_id) = parse_pair(&campground_id, &comment_id)?;

    let edit::Output { comment } = state
        .comments
        .edit
        .handle(edit::Input {
            campground_id,
            comment_id,
            requester: identity.id,
            text,
        })
        .await?;

    Ok(Json(json!({
        "message": "Comment updated!",
        "comment": comment,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Segments((campground_id, comment_id)): Segments<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let (campground_id, comment_id) = parse_pair(&campground_id, &comment_id)?;

    let delete::Output { comment } = state
        .comments
        .delete
        .handle(delete::Input {
            campground_id,
            comment_id,
            requester: identity.id,
        })
        .await?;

    Ok(Json(json!({
        "message": "Comment deleted!",
        "comment": comment,
    })))
}

pub async fn like(
    State(state): State<AppState>,
    identity: Identity,
    Segments((campground_id, comment_id)): Segments<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let (campground_id, comment_id) = parse_pair(&campground_id, &comment_id)?;

    let like::Output { comment, liked } = state
        .comments
        .like
        .handle(like::Input {
            campground_id,
            comment_id,
            user_id: identity.id,
        })
        .await?;

    let message = match liked {
        true => "Comment liked!",
        false => "Comment unliked!",
    };
    Ok(Json(json!({
        "message": message,
        "comment": comment,
        "liked": liked,
    })))
}
