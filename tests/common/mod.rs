#![allow(dead_code)]

use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use campfire::controllers::AppState;
use campfire::entities::{
    Actor, AmenityId, Campground, Comment, EventToggles, Notification, NotificationId, User, UserId,
};
use campfire::images::ImageHost;
use campfire::mail::{Email, MailError, Mailer};
use campfire::repositories::{
    AmenityRepository, NotificationQuery, NotificationRepository, RepositoryError,
    Result as RepoResult, UserRepository,
};
use campfire::usecases::{campground, comment, user};
use campfire::{app_state, in_memory_repositories, Repositories};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct RecordingMailer(pub Mutex<Vec<Email>>);

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        self.0.lock().await.push(email);
        Ok(())
    }
}

pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _: Email) -> Result<(), MailError> {
        Err(MailError::Rejected { status: 503 })
    }
}

#[derive(Default)]
pub struct RecordingImageHost(pub Mutex<Vec<String>>);

#[async_trait]
impl ImageHost for RecordingImageHost {
    async fn destroy(&self, public_id: &str) -> anyhow::Result<()> {
        self.0.lock().await.push(public_id.to_string());
        Ok(())
    }
}

/// Every write fails; reads see nothing.
pub struct FailingNotifications;

fn down() -> RepositoryError { RepositoryError::Internal(anyhow!("notification store is down")) }

#[async_trait]
impl NotificationRepository for FailingNotifications {
    async fn deliver(&self, _: Notification) -> RepoResult<Notification> { Err(down()) }

    async fn find(&self, _: NotificationId) -> RepoResult<Notification> {
        Err(RepositoryError::NotFound)
    }

    async fn finds(&self, _: NotificationQuery) -> RepoResult<Vec<Notification>> { Ok(vec![]) }

    async fn resolve(&self, _: UserId) -> RepoResult<Vec<Notification>> { Ok(vec![]) }

    async fn mark(&self, _: NotificationQuery, _: bool) -> RepoResult<u64> { Err(down()) }

    async fn remove(&self, _: NotificationQuery) -> RepoResult<Vec<Notification>> { Err(down()) }

    async fn reconcile(&self, _: UserId) -> RepoResult<Vec<NotificationId>> { Err(down()) }
}

pub struct Harness {
    pub state: AppState,
    pub repos: Repositories,
    pub mailer: Arc<RecordingMailer>,
    pub images: Arc<RecordingImageHost>,
}

impl Harness {
    pub fn new() -> Self { Self::with(in_memory_repositories(), None) }

    /// `mailer` replaces the recording one; `emails()` then stays empty.
    pub fn with(repos: Repositories, mailer: Option<Arc<dyn Mailer + Sync + Send>>) -> Self {
        let recording = Arc::new(RecordingMailer::default());
        let images = Arc::new(RecordingImageHost::default());

        let state = app_state(
            repos.clone(),
            mailer.unwrap_or_else(|| recording.clone() as Arc<dyn Mailer + Sync + Send>),
            images.clone(),
            "https://camp.test",
        );

        Self {
            state,
            repos,
            mailer: recording,
            images,
        }
    }

    pub async fn user(&self, name: &str) -> User {
        self.state
            .users
            .register
            .handle(user::register::Input {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                avatar: None,
            })
            .await
            .unwrap()
            .user
    }

    pub async fn settings(&self, user: &User, in_app: bool, email: bool) {
        self.state
            .users
            .edit
            .handle(user::edit::Input {
                user_id: user.id,
                avatar: None,
                in_app: Some(EventToggles::all(in_app)),
                email: Some(EventToggles::all(email)),
            })
            .await
            .unwrap();
    }

    pub async fn follow(&self, follower: &User, target: &User) {
        self.state
            .users
            .follow
            .handle(user::follow::Input {
                follower: follower.id,
                target: target.id,
            })
            .await
            .unwrap();
    }

    pub async fn amenity(&self, name: &str) -> AmenityId {
        self.repos
            .amenities
            .finds()
            .await
            .unwrap()
            .into_iter()
            .find(|a| a.name == name)
            .unwrap()
            .id
    }

    pub async fn campground(&self, author: &User, name: &str) -> Campground {
        self.state
            .campgrounds
            .create
            .handle(campground::create::Input {
                author: Actor {
                    id: author.id,
                    username: author.username.clone(),
                },
                name: name.to_string(),
                price: "12.50".to_string(),
                image: format!("https://img.test/upload/{}.jpg", name),
                location: "Lakeside".to_string(),
                description: "Quiet spot".to_string(),
                amenities: vec![self.amenity("Internet & WiFi").await],
            })
            .await
            .unwrap()
            .campground
    }

    pub async fn comment(&self, campground: &Campground, author: &User, text: &str) -> Comment {
        self.state
            .comments
            .create
            .handle(comment::create::Input {
                campground_id: campground.id,
                author: author.id,
                text: text.to_string(),
            })
            .await
            .unwrap()
            .comment
    }

    pub async fn like(&self, campground: &Campground, comment: &Comment, user: &User) -> bool {
        self.state
            .comments
            .like
            .handle(comment::like::Input {
                campground_id: campground.id,
                comment_id: comment.id,
                user_id: user.id,
            })
            .await
            .unwrap()
            .liked
    }

    /// Notifications reachable from the user's list.
    pub async fn inbox(&self, user: &User) -> Vec<Notification> {
        self.repos.notifications.resolve(user.id).await.unwrap()
    }

    /// The raw id list stored on the user.
    pub async fn stored_list(&self, user: &User) -> Vec<NotificationId> {
        self.repos.users.find(user.id).await.unwrap().notifications
    }

    /// Every stored notification addressed to the user, listed or not.
    pub async fn addressed_to(&self, user: &User) -> Vec<Notification> {
        self.repos
            .notifications
            .finds(NotificationQuery {
                recipient: Some(user.id),
                ..Default::default()
            })
            .await
            .unwrap()
    }

    pub async fn emails_to(&self, user: &User) -> Vec<Email> {
        self.mailer
            .0
            .lock()
            .await
            .iter()
            .filter(|e| e.to == user.email)
            .cloned()
            .collect()
    }
}

pub const FLAG_COMBOS: [(bool, bool); 4] =
    [(false, false), (true, false), (false, true), (true, true)];
