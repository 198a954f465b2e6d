use alloc::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{parse_id, ApiError, AppState, Body, IdKind, Identity, Params, Segments};
use crate::entities::AmenityId;
use crate::usecases::campground::{amenities, create, delete, edit, get, gets, CampgroundEdit};

pub struct CampgroundController {
    pub create: Arc<dyn create::Usecase + Sync + Send>,
    pub get: Arc<dyn get::Usecase + Sync + Send>,
    pub gets: Arc<dyn gets::Usecase + Sync + Send>,
    pub edit: Arc<dyn edit::Usecase + Sync + Send>,
    pub delete: Arc<dyn delete::Usecase + Sync + Send>,
    pub amenities: Arc<dyn amenities::Usecase + Sync + Send>,
}

/// Prices arrive either as text or as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(serde_json::Number),
}

impl From<Price> for String {
    fn from(p: Price) -> Self {
        match p {
            Price::Text(s) => s,
            Price::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<u64>,
    pub pagesize: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub name: String,
    pub price: Option<Price>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub name: Option<String>,
    pub price: Option<Price>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
}

fn parse_amenities(raw: &[String]) -> Result<Vec<AmenityId>, ApiError> {
    raw.iter().map(|id| parse_id(IdKind::Amenity, id)).collect()
}

pub async fn amenities(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let amenities::Output { amenities } = state
        .campgrounds
        .amenities
        .handle(amenities::Input {})
        .await?;

    Ok(Json(json!({
        "message": "Amenities fetched!",
        "amenities": amenities,
    })))
}

pub async fn gets(
    State(state): State<AppState>,
    Params(params): Params<ListParams>,
) -> Result<Json<Value>, ApiError> {
    let ListParams {
        search,
        page,
        pagesize,
    } = params;

    let gets::Output { campgrounds, total } = state
        .campgrounds
        .gets
        .handle(gets::Input {
            search,
            page,
            page_size: pagesize,
        })
        .await?;

    Ok(Json(json!({
        "message": "Campgrounds fetched!",
        "campgrounds": campgrounds,
        "maxCampgrounds": total,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    identity: Identity,
    Body(body): Body<CreateRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let CreateRequest {
        name,
        price,
        image,
        location,
        description,
        amenities,
    } = body;

    let create::Output { campground } = state
        .campgrounds
        .create
        .handle(create::Input {
            author: identity.actor(),
            name,
            price: price.map(String::from).unwrap_or_default(),
            image,
            location,
            description,
            amenities: parse_amenities(&amenities)?,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Campground created!",
            "campground": campground,
        })),
    ))
}

pub async fn get(
    State(state): State<AppState>,
    Segments(campground_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;

    let get::Output { campground } = state
        .campgrounds
        .get
        .handle(get::Input { campground_id })
        .await?;

    Ok(Json(json!({
        "message": "Campground fetched!",
        "campground": campground,
    })))
}

pub async fn edit(
    State(state): State<AppState>,
    identity: Identity,
    Segments(campground_id): Segments<String>,
    Body(body): Body<EditRequest>,
) -> Result<Json<Value>, ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;
    let EditRequest {
        name,
        price,
        image,
        location,
        description,
        amenities,
    } = body;

    let edit::Output { campground } = state
        .campgrounds
        .edit
        .handle(edit::Input {
            campground_id,
            requester: identity.id,
            mutation: CampgroundEdit {
                name,
                price: price.map(String::from),
                image,
                location,
                description,
                amenities: amenities.as_deref().map(parse_amenities).transpose()?,
            },
        })
        .await?;

    Ok(Json(json!({
        "message": "Campground updated!",
        "campground": campground,
    })))
}

pub async fn delete(
    State(state): State<AppState>,
    identity: Identity,
    Segments(campground_id): Segments<String>,
) -> Result<Json<Value>, ApiError> {
    let campground_id = parse_id(IdKind::Campground, &campground_id)?;

    let delete::Output { campground } = state
        .campgrounds
        .delete
        .handle(delete::Input {
            campground_id,
            requester: identity.id,
        })
        .await?;

    Ok(Json(json!({
        "message": "Campground deleted!",
        "campground": campground,
    })))
}
