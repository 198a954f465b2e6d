mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use campfire::controllers::build_router;
use campfire::entities::{AmenityId, User};
use common::Harness;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(h: &Harness) -> Router { build_router(h.state.clone()) }

async fn call(
    app: Router,
    method: Method,
    uri: &str,
    who: Option<&User>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(u) = who {
        req = req
            .header("x-user-id", u.id.to_string())
            .header("x-username", u.username.as_str());
    }
    let req = match body {
        Some(b) => req
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = match bytes.is_empty() {
        true => Value::Null,
        false => serde_json::from_slice(&bytes).unwrap(),
    };

    (status, json)
}

#[tokio::test]
async fn health_reports_ok() {
    let h = Harness::new();
    let (status, body) = call(app(&h), Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn signup_then_fetch_profile() {
    let h = Harness::new();
    let (status, body) = call(
        app(&h),
        Method::POST,
        "/api/users/signup",
        None,
        Some(json!({ "username": "alice", "email": "alice@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["user"]["id"].as_str().unwrap().to_string();
    assert!(body["user"].get("email").is_none());

    let uri = format!("/api/users/{}", id);
    let (status, body) = call(app(&h), Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["notificationCount"], 0);

    let (status, _) = call(
        app(&h),
        Method::POST,
        "/api/users/signup",
        None,
        Some(json!({ "username": "alice", "email": "again@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_ids_are_rejected_before_lookup() {
    let h = Harness::new();
    let alice = h.user("alice").await;

    let (status, body) = call(app(&h), Method::GET, "/api/campgrounds/5f2b9c0e", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Campground requested!");

    let (status, body) = call(app(&h), Method::GET, "/api/users/nope", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid User requested!");

    let pines = h.campground(&alice, "pines").await;
    let (status, body) = call(
        app(&h),
        Method::DELETE,
        &format!("/api/campgrounds/{}/comments/xyz", pines.id),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Comment requested!");

    let (status, body) = call(
        app(&h),
        Method::PUT,
        "/api/notifications",
        Some(&alice),
        Some(json!({ "notificationIds": ["bad"], "isRead": true })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid Notification requested!");
}

#[tokio::test]
async fn protected_routes_need_identity() {
    let h = Harness::new();

    let (status, body) = call(app(&h), Method::GET, "/api/notifications", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = call(
        app(&h),
        Method::POST,
        "/api/campgrounds",
        None,
        Some(json!({ "name": "pines", "price": 10 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn campground_comment_and_rating_flow() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;

    let uri = "/api/campgrounds/amenities";
    let (status, body) = call(app(&h), Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let amenities = body["amenities"].as_array().unwrap();
    assert_eq!(amenities.len(), 29);
    let fire_ring = amenities
        .iter()
        .find(|a| a["name"] == "Campfire")
        .unwrap()["id"]
        .clone();

    let (status, body) = call(
        app(&h),
        Method::POST,
        "/api/campgrounds",
        Some(&alice),
        Some(json!({
            "name": "Pines",
            "price": 12.5,
            "image": "https://img.test/upload/pines.jpg",
            "location": "Lakeside",
            "description": "Quiet",
            "amenities": [fire_ring, fire_ring]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["campground"]["amenities"], json!([fire_ring]));
    assert_eq!(body["campground"]["price"], "12.5");
    let cg = body["campground"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(
        app(&h),
        Method::POST,
        &format!("/api/campgrounds/{}/comments", cg),
        Some(&bob),
        Some(json!({ "text": "great" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let comment = body["comment"]["id"].as_str().unwrap().to_string();

    let (status, body) = call(app(&h), Method::GET, "/api/notifications", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["notifications"].as_array().unwrap().len(), 1);
    assert_eq!(body["notifications"][0]["notificationType"], 1);

    let (status, body) = call(
        app(&h),
        Method::POST,
        &format!("/api/campgrounds/{}/rating", cg),
        Some(&bob),
        Some(json!({ "rating": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["campgroundRating"], "3.0");

    let (status, _) = call(
        app(&h),
        Method::POST,
        &format!("/api/campgrounds/{}/rating", cg),
        Some(&bob),
        Some(json!({ "rating": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        app(&h),
        Method::PUT,
        &format!("/api/campgrounds/{}", cg),
        Some(&bob),
        Some(json!({ "name": "Mine now" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = call(
        app(&h),
        Method::DELETE,
        &format!("/api/campgrounds/{}/comments/{}", cg, comment),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Comment deleted!");

    let (_, body) = call(app(&h), Method::GET, "/api/notifications", Some(&alice), None).await;
    assert!(body["notifications"].as_array().unwrap().is_empty());

    let uri = "/api/campgrounds?search=pin&page=1&pagesize=5";
    let (status, body) = call(app(&h), Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["maxCampgrounds"], 1);
    assert_eq!(body["campgrounds"][0]["rating"], 3.0);
}

#[tokio::test]
async fn follow_and_settings_over_http() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;

    let (status, body) = call(
        app(&h),
        Method::PUT,
        "/api/users/settings",
        Some(&alice),
        Some(json!({
            "enableNotificationEmails": {
                "newCampground": false,
                "newComment": false,
                "newCommentLike": false,
                "newFollower": true
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enableNotificationEmails"]["newFollower"], true);
    assert_eq!(body["enableNotifications"]["newFollower"], true);

    let follow = format!("/api/users/{}/follow", alice.id);
    let (status, _) = call(app(&h), Method::POST, &follow, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(h.emails_to(&alice).await.len(), 1);

    let (status, _) = call(app(&h), Method::POST, &follow, Some(&bob), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(app(&h), Method::DELETE, &follow, Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["followers"].as_array().unwrap().is_empty());
    assert!(h.inbox(&alice).await.is_empty());
}

#[tokio::test]
async fn malformed_requests_answer_with_message() {
    let h = Harness::new();
    let alice = h.user("alice").await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/campgrounds")
        .header("x-user-id", alice.id.to_string())
        .header("x-username", alice.username.as_str())
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app(&h).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].as_str().unwrap().contains("JSON"));

    let uri = "/api/campgrounds?page=abc&pagesize=2";
    let (status, body) = call(app(&h), Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, body) = call(
        app(&h),
        Method::POST,
        "/api/campgrounds",
        Some(&alice),
        Some(json!({ "name": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    let h = Harness::new();

    let uri = "/api/campgrounds?page=18446744073709551615&pagesize=2";
    let (status, body) = call(app(&h), Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid page requested!");

    let uri = "/api/campgrounds?page=1&pagesize=18446744073709551615";
    let (status, body) = call(app(&h), Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid page requested!");
}

#[tokio::test]
async fn campground_amenities_come_from_catalogue() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let create = |amenities: Value| {
        json!({
            "name": "Pines",
            "price": "10",
            "image": "https://img.test/upload/pines.jpg",
            "location": "Lakeside",
            "description": "Quiet",
            "amenities": amenities
        })
    };

    let unknown = AmenityId::new().to_string();
    for amenities in [json!(["Wifi"]), json!([unknown])] {
        let (status, body) = call(
            app(&h),
            Method::POST,
            "/api/campgrounds",
            Some(&alice),
            Some(create(amenities)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid Amenity requested!");
    }

    let (_, body) = call(app(&h), Method::GET, "/api/campgrounds", None, None).await;
    assert_eq!(body["maxCampgrounds"], 0);

    let cg = h.campground(&alice, "firs").await;
    let uri = format!("/api/campgrounds/{}", cg.id);
    let body = json!({ "amenities": [unknown] });
    let (status, _) = call(app(&h), Method::PUT, &uri, Some(&alice), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let pool = h.amenity("Swimming Pool").await;
    let body = json!({ "amenities": [pool.to_string()] });
    let (status, body) = call(app(&h), Method::PUT, &uri, Some(&alice), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["campground"]["amenities"], json!([pool.to_string()]));
}
