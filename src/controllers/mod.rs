//! HTTP surface. Handlers only parse ids, read the caller's identity and shape
//! JSON; everything else is delegated to the usecases.

use alloc::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

pub mod campground;
pub mod comment;
mod error;
mod extract;
mod identity;
pub mod notification;
pub mod rating;
pub mod user;

pub use error::ApiError;
pub use extract::{Body, Params, Segments};
pub use identity::{parse_id, IdKind, Identity};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<user::UserController>,
    pub campgrounds: Arc<campground::CampgroundController>,
    pub comments: Arc<comment::CommentController>,
    pub ratings: Arc<rating::RatingController>,
    pub notifications: Arc<notification::NotificationController>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/users/signup", post(user::register))
        .route("/api/users/settings", put(user::edit))
        .route("/api/users/:user_id", get(user::get))
        .route(
            "/api/users/:user_id/follow",
            post(user::follow).delete(user::unfollow),
        )
        .route(
            "/api/notifications",
            get(notification::list)
                .put(notification::mark)
                .delete(notification::remove),
        )
        .route("/api/notifications/reconcile", post(notification::reconcile))
        .route(
            "/api/campgrounds",
            get(campground::gets).post(campground::create),
        )
        .route("/api/campgrounds/amenities", get(campground::amenities))
        .route(
            "/api/campgrounds/:campground_id",
            get(campground::get)
                .put(campground::edit)
                .delete(campground::delete),
        )
        .route(
            "/api/campgrounds/:campground_id/comments",
            get(comment::list).post(comment::create),
        )
        .route(
            "/api/campgrounds/:campground_id/comments/:comment_id",
            put(comment::edit).delete(comment::delete),
        )
        .route(
            "/api/campgrounds/:campground_id/comments/:comment_id/like",
            post(comment::like),
        )
        .route("/api/campgrounds/:campground_id/rating", post(rating::rate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health(State(_): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
