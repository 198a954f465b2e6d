use std::collections::HashSet;

use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::entities::{
    Amenity, AmenityId, Campground, CampgroundId, Comment, CommentId, Date, Notification,
    NotificationId, NotificationKind, NotificationSettings, Profile, Rating, User, UserId,
};

pub mod mock;
pub mod mongo;

pub type Result<T> = ::std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository {
    /// `false` when the id, username or email is already taken.
    async fn insert(&self, item: User) -> Result<bool>;

    async fn find(&self, id: UserId) -> Result<User>;
    async fn finds(&self, query: UserQuery) -> Result<Vec<User>>;

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User>;

    async fn insert_follower(&self, id: UserId, follower: UserId) -> Result<bool>;
    async fn delete_follower(&self, id: UserId, follower: UserId) -> Result<bool>;
}

#[async_trait]
pub trait CampgroundRepository {
    async fn insert(&self, item: Campground) -> Result<bool>;

    async fn find(&self, id: CampgroundId) -> Result<Campground>;
    async fn finds(&self, query: CampgroundQuery) -> Result<Vec<Campground>>;
    /// Ignores `query.page`.
    async fn count(&self, query: CampgroundQuery) -> Result<u64>;

    async fn update(&self, id: CampgroundId, mutation: CampgroundMutation) -> Result<Campground>;

    async fn insert_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool>;
    async fn delete_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool>;

    async fn delete(&self, id: CampgroundId) -> Result<Campground>;
}

/// The fixed catalogue campgrounds pick their amenities from.
#[async_trait]
pub trait AmenityRepository {
    /// Inserts `names` only when the store is empty. Returns how many were
    /// inserted.
    async fn seed(&self, names: &[&str]) -> Result<u64>;

    /// Ordered by name.
    async fn finds(&self) -> Result<Vec<Amenity>>;
}

#[async_trait]
pub trait CommentRepository {
    async fn insert(&self, item: Comment) -> Result<bool>;

    async fn find(&self, id: CommentId) -> Result<Comment>;
    /// Keeps the order of `ids`; ids without a document are skipped.
    async fn finds(&self, ids: &[CommentId]) -> Result<Vec<Comment>>;

    async fn update(&self, id: CommentId, mutation: CommentMutation) -> Result<Comment>;

    async fn insert_like(&self, id: CommentId, like: Profile) -> Result<bool>;
    async fn delete_like(&self, id: CommentId, user_id: UserId) -> Result<bool>;

    async fn delete(&self, id: CommentId) -> Result<Comment>;
    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64>;
}

/// Notifications live in their own collection but are also referenced from the
/// recipient's `notifications` list. Every write here keeps both sides in step
/// within a single atomic operation.
#[async_trait]
pub trait NotificationRepository {
    /// Stores the notification and appends its id to the recipient's list.
    async fn deliver(&self, item: Notification) -> Result<Notification>;

    async fn find(&self, id: NotificationId) -> Result<Notification>;
    async fn finds(&self, query: NotificationQuery) -> Result<Vec<Notification>>;

    /// Follows the recipient's list, dropping ids that do not resolve.
    async fn resolve(&self, recipient: UserId) -> Result<Vec<Notification>>;

    async fn mark(&self, query: NotificationQuery, is_read: bool) -> Result<u64>;

    /// Deletes the matches and pulls their ids from the recipients' lists.
    async fn remove(&self, query: NotificationQuery) -> Result<Vec<Notification>>;

    /// Pulls every id from the recipient's list that is not a live notification
    /// owned by them. Returns the pulled ids.
    async fn reconcile(&self, recipient: UserId) -> Result<Vec<NotificationId>>;
}

#[async_trait]
pub trait RatingRepository {
    /// Keyed by `(author.id, campground_id)`. Returns the stored rating and
    /// whether it was newly inserted.
    async fn upsert(&self, item: Rating) -> Result<(Rating, bool)>;

    async fn finds(&self, campground_id: CampgroundId) -> Result<Vec<Rating>>;

    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64>;
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub ids: Option<HashSet<UserId>>,
    pub follower: Option<UserId>,
}

impl UserQuery {
    pub fn matches(&self, u: &User) -> bool {
        self.ids.as_ref().map(|s| s.contains(&u.id)).unwrap_or(true)
            && self
                .follower
                .map(|f| u.followers.contains(&f))
                .unwrap_or(true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: u64,
    pub limit: u64,
}

impl Paging {
    /// `page` starts at 1. `None` when the page is out of range, including
    /// offsets the stores cannot represent as a signed 64-bit count.
    pub fn new(page: u64, page_size: u64) -> Option<Self> {
        if page_size == 0 || i64::try_from(page_size).is_err() {
            return None;
        }

        let skip = page.checked_sub(1)?.checked_mul(page_size)?;
        if i64::try_from(skip).is_err() {
            return None;
        }

        Some(Self {
            skip,
            limit: page_size,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CampgroundQuery {
    pub name: Option<Regex>,
    pub author: Option<UserId>,
    pub page: Option<Paging>,
}

impl CampgroundQuery {
    pub fn matches(&self, c: &Campground) -> bool {
        self.name.as_ref().map(|r| r.is_match(&c.name)).unwrap_or(true)
            && self.author.map(|a| c.author.id == a).unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationQuery {
    pub ids: Option<HashSet<NotificationId>>,
    pub recipient: Option<UserId>,
    pub kind: Option<NotificationKind>,
    pub actor: Option<UserId>,
    pub campground: Option<CampgroundId>,
    pub comments: Option<HashSet<CommentId>>,
    pub is_comment_like: Option<bool>,
    pub follower: Option<UserId>,
    pub following: Option<UserId>,
}

impl NotificationQuery {
    pub fn matches(&self, n: &Notification) -> bool {
        let NotificationQuery {
            ids,
            recipient,
            kind,
            actor,
            campground,
            comments,
            is_comment_like,
            follower,
            following,
        } = self;

        ids.as_ref().map(|s| s.contains(&n.id)).unwrap_or(true)
            && recipient.map(|r| n.recipient == r).unwrap_or(true)
            && kind.map(|k| n.kind == k).unwrap_or(true)
            && actor.map(|a| n.actor.id == a).unwrap_or(true)
            && campground
                .map(|c| n.campground.as_ref().map(|r| r.id) == Some(c))
                .unwrap_or(true)
            && comments
                .as_ref()
                .map(|s| n.comment_id.map(|c| s.contains(&c)).unwrap_or(false))
                .unwrap_or(true)
            && is_comment_like.map(|l| n.is_comment_like == l).unwrap_or(true)
            && follower
                .map(|f| n.follower.as_ref().map(|r| r.id) == Some(f))
                .unwrap_or(true)
            && following
                .map(|f| n.follower.as_ref().map(|r| r.following_user_id) == Some(f))
                .unwrap_or(true)
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserMutation {
    pub avatar: Option<String>,
    pub settings: Option<NotificationSettings>,
}

#[derive(Debug, Clone, Default)]
pub struct CampgroundMutation {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub amenities: Option<Vec<AmenityId>>,
    pub rating: Option<f64>,
}

/// Setting `text` also marks the comment as edited at `edited`.
#[derive(Debug, Clone)]
pub struct CommentMutation {
    pub text: String,
    pub edited: Date,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("cannot find object.")]
    NotFound,
    #[error("expected unique object, found non-unique objects (matched: {matched})")]
    NoUnique { matched: u32 },
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::entities::{Actor, FollowerRef};

    fn follower_notification(recipient: UserId, follower: UserId) -> Notification {
        Notification {
            id: NotificationId::new(),
            recipient,
            actor: Actor {
                id: follower,
                username: "bob".to_string(),
            },
            kind: NotificationKind::NewFollower,
            campground: None,
            comment_id: None,
            is_comment_like: false,
            follower: Some(FollowerRef {
                id: follower,
                follower_avatar: String::new(),
                following_user_id: recipient,
            }),
            is_read: false,
            created: Utc::now(),
        }
    }

    #[test]
    fn notification_query_matches_follow_pair() {
        let (alice, bob) = (UserId::new(), UserId::new());
        let n = follower_notification(alice, bob);

        let q = NotificationQuery {
            kind: Some(NotificationKind::NewFollower),
            follower: Some(bob),
            following: Some(alice),
            ..Default::default()
        };
        assert!(q.matches(&n));

        let q = NotificationQuery {
            follower: Some(alice),
            following: Some(bob),
            ..Default::default()
        };
        assert!(!q.matches(&n));
    }

    #[test]
    fn notification_query_with_empty_id_set_matches_nothing() {
        let n = follower_notification(UserId::new(), UserId::new());
        let q = NotificationQuery {
            ids: Some(HashSet::new()),
            ..Default::default()
        };
        assert!(!q.matches(&n));
        assert!(NotificationQuery::default().matches(&n));
    }

    #[test]
    fn comment_filter_skips_notifications_without_comment() {
        let n = follower_notification(UserId::new(), UserId::new());
        let q = NotificationQuery {
            comments: Some([CommentId::new()].into_iter().collect()),
            ..Default::default()
        };
        assert!(!q.matches(&n));
    }

    #[test]
    fn paging_starts_at_page_one() {
        assert_eq!(Paging::new(1, 10), Some(Paging { skip: 0, limit: 10 }));
        assert_eq!(Paging::new(3, 5), Some(Paging { skip: 10, limit: 5 }));
        assert_eq!(Paging::new(0, 5), None);
        assert_eq!(Paging::new(2, 0), None);
    }

    #[test]
    fn paging_rejects_overflowing_offsets() {
        assert_eq!(Paging::new(u64::MAX, 2), None);
        assert_eq!(Paging::new(1, u64::MAX), None);
        assert_eq!(Paging::new(3, i64::MAX as u64), None);
        assert_eq!(
            Paging::new(2, 1 << 40),
            Some(Paging {
                skip: 1 << 40,
                limit: 1 << 40
            })
        );
    }
}
