use alloc::sync::Arc;
use std::collections::HashSet;

use chrono::Utc;
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::entities::{
    Actor, Campground, CampgroundId, CampgroundRef, Comment, CommentId, Event, FollowerRef,
    Notification, NotificationId, NotificationKind, User, UserId,
};
use crate::mail::{Email, Mailer};
use crate::repositories::{NotificationQuery, NotificationRepository, UserQuery, UserRepository};

/// Side channels of the social events. Nothing here fails the caller: every
/// failure is logged and dropped.
pub struct Notifier {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub notification_repository: Arc<dyn NotificationRepository + Sync + Send>,
    pub mailer: Arc<dyn Mailer + Sync + Send>,
    pub public_url: String,
}

impl Notifier {
    /// Persists `new` and links it to its recipient in one step.
    #[tracing::instrument(skip(self, new), fields(recipient = %new.recipient, kind = %new.kind))]
    pub async fn create_notification(&self, new: Notification) -> Option<Notification> {
        match self.notification_repository.deliver(new).await {
            Ok(n) => {
                tracing::debug!(id = %n.id, "notification delivered");
                Some(n)
            },
            Err(e) => {
                tracing::warn!("notification was not delivered: {}", e);
                None
            },
        }
    }

    /// Fans out to every follower of the campground's author.
    #[tracing::instrument(skip_all, fields(campground = %campground.id))]
    pub async fn campground_created(&self, campground: &Campground) {
        let author = match self.user_repository.find(campground.author.id).await {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!("cannot load campground author: {}", e);
                return;
            },
        };
        if author.followers.is_empty() {
            return;
        }

        let query = UserQuery {
            ids: Some(author.followers.iter().copied().collect::<HashSet<_>>()),
            ..Default::default()
        };
        let followers = match self.user_repository.finds(query).await {
            Ok(o) => o,
            Err(e) => {
                tracing::warn!("cannot load followers: {}", e);
                return;
            },
        };

        for follower in followers {
            let settings = follower.settings;

            if settings.in_app.allows(Event::NewCampground) {
                self.create_notification(Notification {
                    campground: Some(campground_ref(campground)),
                    ..blank(follower.id, author.actor(), NotificationKind::NewCampground)
                })
                .await;
            }

            if settings.email.allows(Event::NewCampground) {
                let link = format!("{}/campgrounds/{}", self.public_url, campground.id);
                self.send(Email {
                    to: follower.email.clone(),
                    subject: format!("{} created a new campground", author.username),
                    html: format!(
                        "<p>Hi {},</p><p>{} just created <a href=\"{}\">{}</a>.</p>",
                        text(&follower.username),
                        text(&author.username),
                        attr(&link),
                        text(&campground.name)
                    ),
                })
                .await;
            }
        }
    }

    /// Notifies the campground's author, unless they wrote the comment.
    #[tracing::instrument(skip_all, fields(campground = %campground.id, comment = %comment.id))]
    pub async fn comment_created(&self, campground: &Campground, comment: &Comment) {
        if campground.author.id == comment.author.id {
            return;
        }

        let Some(recipient) = self.load(campground.author.id).await else {
            return;
        };
        let settings = recipient.settings;

        if settings.in_app.allows(Event::NewComment) {
            self.create_notification(Notification {
                campground: Some(campground_ref(campground)),
                comment_id: Some(comment.id),
                ..blank(
                    recipient.id,
                    Actor {
                        id: comment.author.id,
                        username: comment.author.username.clone(),
                    },
                    NotificationKind::NewComment,
                )
            })
            .await;
        }

        if settings.email.allows(Event::NewComment) {
            let link = format!("{}/campgrounds/{}", self.public_url, campground.id);
            self.send(Email {
                to: recipient.email.clone(),
                subject: format!("New comment on {}", campground.name),
                html: format!(
                    "<p>Hi {},</p><p>{} commented on <a href=\"{}\">{}</a>:</p>\
                     <blockquote>{}</blockquote>",
                    text(&recipient.username),
                    text(&comment.author.username),
                    attr(&link),
                    text(&campground.name),
                    text(&comment.text)
                ),
            })
            .await;
        }
    }

    /// Notifies the comment's author, unless they liked their own comment.
    #[tracing::instrument(skip_all, fields(comment = %comment.id, liker = %liker.id))]
    pub async fn comment_liked(&self, campground: &Campground, comment: &Comment, liker: &User) {
        if comment.author.id == liker.id {
            return;
        }

        let Some(recipient) = self.load(comment.author.id).await else {
            return;
        };
        let settings = recipient.settings;

        if settings.in_app.allows(Event::NewCommentLike) {
            self.create_notification(Notification {
                campground: Some(campground_ref(campground)),
                comment_id: Some(comment.id),
                is_comment_like: true,
                ..blank(recipient.id, liker.actor(), NotificationKind::NewComment)
            })
            .await;
        }

        if settings.email.allows(Event::NewCommentLike) {
            let link = format!("{}/campgrounds/{}", self.public_url, campground.id);
            self.send(Email {
                to: recipient.email.clone(),
                subject: format!("{} liked your comment", liker.username),
                html: format!(
                    "<p>Hi {},</p><p>{} liked your comment on <a href=\"{}\">{}</a>.</p>",
                    text(&recipient.username),
                    text(&liker.username),
                    attr(&link),
                    text(&campground.name)
                ),
            })
            .await;
        }
    }

    /// `target` is the followed user as read right after the follow.
    #[tracing::instrument(skip_all, fields(target = %target.id, follower = %follower.id))]
    pub async fn follower_added(&self, target: &User, follower: &User) {
        let settings = target.settings;

        if settings.in_app.allows(Event::NewFollower) {
            self.create_notification(Notification {
                follower: Some(FollowerRef {
                    id: follower.id,
                    follower_avatar: follower.avatar.clone(),
                    following_user_id: target.id,
                }),
                ..blank(target.id, follower.actor(), NotificationKind::NewFollower)
            })
            .await;
        }

        if settings.email.allows(Event::NewFollower) {
            let link = format!("{}/users/{}", self.public_url, follower.id);
            self.send(Email {
                to: target.email.clone(),
                subject: format!("{} is now following you", follower.username),
                html: format!(
                    "<p>Hi {},</p><p><a href=\"{}\">{}</a> started following you.</p>",
                    text(&target.username),
                    attr(&link),
                    text(&follower.username)
                ),
            })
            .await;
        }
    }

    /// Drops the follow notification of the pair, then repairs the followed
    /// user's list.
    #[tracing::instrument(skip(self))]
    pub async fn follower_removed(&self, follower: UserId, following: UserId) {
        self.remove(NotificationQuery {
            kind: Some(NotificationKind::NewFollower),
            follower: Some(follower),
            following: Some(following),
            ..Default::default()
        })
        .await;

        self.reconcile(following).await;
    }

    /// Both new-comment and comment-like notifications go.
    #[tracing::instrument(skip(self))]
    pub async fn comment_removed(&self, comment_id: CommentId) {
        self.remove(NotificationQuery {
            comments: Some([comment_id].into_iter().collect()),
            ..Default::default()
        })
        .await;
    }

    #[tracing::instrument(skip(self))]
    pub async fn like_withdrawn(&self, comment_id: CommentId, liker: UserId) {
        self.remove(NotificationQuery {
            comments: Some([comment_id].into_iter().collect()),
            is_comment_like: Some(true),
            actor: Some(liker),
            ..Default::default()
        })
        .await;
    }

    #[tracing::instrument(skip(self, comments))]
    pub async fn campground_removed(&self, campground_id: CampgroundId, comments: &[CommentId]) {
        self.remove(NotificationQuery {
            campground: Some(campground_id),
            ..Default::default()
        })
        .await;

        if !comments.is_empty() {
            self.remove(NotificationQuery {
                comments: Some(comments.iter().copied().collect()),
                ..Default::default()
            })
            .await;
        }
    }

    pub async fn reconcile(&self, user_id: UserId) -> Vec<NotificationId> {
        match self.notification_repository.reconcile(user_id).await {
            Ok(pruned) => {
                if !pruned.is_empty() {
                    tracing::debug!(
                        user = %user_id,
                        count = pruned.len(),
                        "pruned dangling notification ids"
                    );
                }
                pruned
            },
            Err(e) => {
                tracing::warn!(user = %user_id, "reconciliation failed: {}", e);
                vec![]
            },
        }
    }

    async fn remove(&self, query: NotificationQuery) {
        match self.notification_repository.remove(query).await {
            Ok(removed) => tracing::debug!(count = removed.len(), "notifications removed"),
            Err(e) => tracing::warn!("cannot remove notifications: {}", e),
        }
    }

    async fn load(&self, id: UserId) -> Option<User> {
        self.user_repository
            .find(id)
            .await
            .map_err(|e| tracing::warn!(user = %id, "cannot load recipient: {}", e))
            .ok()
    }

    async fn send(&self, email: Email) {
        let to = email.to.clone();
        if let Err(e) = self.mailer.send(email).await {
            tracing::warn!(%to, "email was not sent: {}", e);
        }
    }
}

fn campground_ref(c: &Campground) -> CampgroundRef {
    CampgroundRef {
        id: c.id,
        name: c.name.clone(),
    }
}

fn blank(recipient: UserId, actor: Actor, kind: NotificationKind) -> Notification {
    Notification {
        id: NotificationId::new(),
        recipient,
        actor,
        kind,
        campground: None,
        comment_id: None,
        is_comment_like: false,
        follower: None,
        is_read: false,
        created: Utc::now(),
    }
}
