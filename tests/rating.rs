mod common;

use campfire::entities::{Campground, CampgroundId, User};
use campfire::repositories::{CampgroundRepository, RatingRepository};
use campfire::usecases::rating::rate;
use campfire::usecases::UsecaseError;
use common::Harness;
use serde_json::{json, Value};

async fn rate(
    h: &Harness,
    campground: &Campground,
    user: &User,
    raw: Value,
) -> Result<rate::Output, UsecaseError> {
    h.state
        .ratings
        .rate
        .handle(rate::Input {
            campground_id: campground.id,
            author: user.actor(),
            rating: raw,
        })
        .await
}

#[tokio::test]
async fn rerating_updates_instead_of_duplicating() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let pines = h.campground(&alice, "pines").await;

    let first = rate(&h, &pines, &bob, json!(2)).await.unwrap();
    assert!(first.created);
    assert_eq!(first.displayed, "2.0");

    let second = rate(&h, &pines, &bob, json!("4")).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.rating.id, first.rating.id);
    assert_eq!(second.rating.value, 4.0);
    assert_eq!(second.displayed, "4.0");

    let stored = h.repos.ratings.finds(pines.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].value, 4.0);
    assert_eq!(h.repos.campgrounds.find(pines.id).await.unwrap().rating, 4.0);
}

#[tokio::test]
async fn average_is_rounded_to_half_stars() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let raters = [h.user("bob").await, h.user("carol").await, h.user("dave").await];
    let pines = h.campground(&alice, "pines").await;

    assert_eq!(rate(&h, &pines, &raters[0], json!(3)).await.unwrap().displayed, "3.0");
    assert_eq!(rate(&h, &pines, &raters[1], json!(4)).await.unwrap().displayed, "3.5");
    assert_eq!(rate(&h, &pines, &raters[2], json!(5)).await.unwrap().displayed, "4.0");
    assert_eq!(h.repos.campgrounds.find(pines.id).await.unwrap().rating, 4.0);
}

#[tokio::test]
async fn invalid_ratings_are_rejected_without_writes() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let bob = h.user("bob").await;
    let pines = h.campground(&alice, "pines").await;

    for raw in [json!(6), json!("abc"), json!(0), json!(null), json!({ "value": 3 })] {
        let res = rate(&h, &pines, &bob, raw.clone()).await;
        assert!(matches!(res, Err(UsecaseError::Validation(_))), "{} accepted", raw);
    }

    assert!(h.repos.ratings.finds(pines.id).await.unwrap().is_empty());
    assert_eq!(h.repos.campgrounds.find(pines.id).await.unwrap().rating, 0.0);
}

#[tokio::test]
async fn rating_unknown_campground_is_not_found() {
    let h = Harness::new();
    let alice = h.user("alice").await;
    let mut ghost = h.campground(&alice, "pines").await;
    ghost.id = CampgroundId::new();

    let res = rate(&h, &ghost, &alice, json!(3)).await;
    assert!(matches!(res, Err(UsecaseError::NotFound(_))));
    assert!(h.repos.ratings.finds(ghost.id).await.unwrap().is_empty());
}
