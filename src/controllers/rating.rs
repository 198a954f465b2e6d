use alloc::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState, Body, IdKind, Identity, Segments};
use crate::usecases::rating::rate;

pub struct RatingController {
    pub rate: Arc<dyn rate::Usecase + Sync + Send>,
}

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    #[serde(default)]
    pub rating: Value,
}

pub async fn rate(
    State(state): State<AppState>,
    identity: Identity,
    Segments(campground_id): Segments<String>,
    Body(RateRequest { rating }): Body<RateRequest>,
) -> Result<Json<Value>, ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;

    let rate::Output {
        rating,
        created,
        displayed,
    } = state
        .ratings
        .rate
        .handle(rate::Input {
            campground_id,
            author: identity.actor(),
            rating,
        })
        .await?;

    let message = match created {
        true => "Rating added!",
        false => "Rating updated!",
    };
    Ok(Json(json!({
        "message": message,
        "rating": rating,
        "campgroundRating": displayed,
    })))
}
