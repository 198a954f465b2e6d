use alloc::sync::Arc;

use crate::controllers::campground::CampgroundController;
use crate::controllers::comment::CommentController;
use crate::controllers::notification::NotificationController;
use crate::controllers::rating::RatingController;
use crate::controllers::user::UserController;
use crate::controllers::AppState;
use crate::entities::{Amenity, Campground, Comment, Rating, User, AMENITY_CATALOGUE};
use crate::images::ImageHost;
use crate::interactors::campground::CampgroundInteractor;
use crate::interactors::comment::CommentInteractor;
use crate::interactors::notification::NotificationInteractor;
use crate::interactors::rating::RatingInteractor;
use crate::interactors::user::UserInteractor;
use crate::mail::Mailer;
use crate::notifier::Notifier;
use crate::repositories::mock::{InMemoryNotificationRepository, InMemoryRepository};
use crate::repositories::mongo::{
    MongoAmenityRepository, MongoCampgroundRepository, MongoCommentRepository,
    MongoNotificationRepository, MongoRatingRepository, MongoUserRepository,
};
use crate::repositories::{
    AmenityRepository, CampgroundRepository, CommentRepository, NotificationRepository,
    RatingRepository, UserRepository,
};

#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository + Sync + Send>,
    pub campgrounds: Arc<dyn CampgroundRepository + Sync + Send>,
    pub comments: Arc<dyn CommentRepository + Sync + Send>,
    pub notifications: Arc<dyn NotificationRepository + Sync + Send>,
    pub ratings: Arc<dyn RatingRepository + Sync + Send>,
    pub amenities: Arc<dyn AmenityRepository + Sync + Send>,
}

pub fn in_memory_repositories() -> Repositories {
    let users = Arc::new(InMemoryRepository::<User>::new());

    Repositories {
        notifications: Arc::new(InMemoryNotificationRepository::new(users.clone())),
        users,
        campgrounds: Arc::new(InMemoryRepository::<Campground>::new()),
        comments: Arc::new(InMemoryRepository::<Comment>::new()),
        ratings: Arc::new(InMemoryRepository::<Rating>::new()),
        amenities: Arc::new(InMemoryRepository::with(
            AMENITY_CATALOGUE.iter().map(|n| Amenity::new(*n)).collect(),
        )),
    }
}

pub async fn mongo_repositories(
    uri_str: impl AsRef<str>,
    db_name: impl AsRef<str>,
) -> ::anyhow::Result<Repositories> {
    let c = ::mongodb::Client::with_uri_str(uri_str).await?;
    let db = c.database(db_name.as_ref());

    let amenities = MongoAmenityRepository::new_with(db.clone()).await?;
    let seeded = amenities.seed(&AMENITY_CATALOGUE).await?;
    if seeded > 0 {
        tracing::info!(count = seeded, "amenity catalogue seeded");
    }

    Ok(Repositories {
        users: Arc::new(MongoUserRepository::new_with(db.clone()).await?),
        campgrounds: Arc::new(MongoCampgroundRepository::new_with(db.clone()).await?),
        comments: Arc::new(MongoCommentRepository::new_with(db.clone()).await?),
        ratings: Arc::new(MongoRatingRepository::new_with(db.clone()).await?),
        amenities: Arc::new(amenities),
        notifications: Arc::new(MongoNotificationRepository::new_with(c, db).await?),
    })
}

pub fn notifier(
    repositories: &Repositories,
    mailer: Arc<dyn Mailer + Sync + Send>,
    public_url: impl Into<String>,
) -> Notifier {
    Notifier {
        user_repository: repositories.users.clone(),
        notification_repository: repositories.notifications.clone(),
        mailer,
        public_url: public_url.into(),
    }
}

pub fn app_state(
    repositories: Repositories,
    mailer: Arc<dyn Mailer + Sync + Send>,
    images: Arc<dyn ImageHost + Sync + Send>,
    public_url: impl Into<String>,
) -> AppState {
    let notifier = Arc::new(notifier(&repositories, mailer, public_url));
    let Repositories {
        users,
        campgrounds,
        comments,
        notifications,
        ratings,
        amenities,
    } = repositories;

    let user = Arc::new(UserInteractor {
        user_repository: users.clone(),
        notifier: notifier.clone(),
    });
    let campground = Arc::new(CampgroundInteractor {
        campground_repository: campgrounds.clone(),
        comment_repository: comments.clone(),
        rating_repository: ratings.clone(),
        amenity_repository: amenities,
        notifier: notifier.clone(),
        image_host: images,
    });
    let comment = Arc::new(CommentInteractor {
        user_repository: users,
        campground_repository: campgrounds.clone(),
        comment_repository: comments,
        notifier,
    });
    let rating = Arc::new(RatingInteractor {
        campground_repository: campgrounds,
        rating_repository: ratings,
    });
    let notification = Arc::new(NotificationInteractor {
        notification_repository: notifications,
    });

    AppState {
        users: Arc::new(UserController {
            register: user.clone(),
            get: user.clone(),
            edit: user.clone(),
            follow: user.clone(),
            unfollow: user,
        }),
        campgrounds: Arc::new(CampgroundController {
            create: campground.clone(),
            get: campground.clone(),
            gets: campground.clone(),
            edit: campground.clone(),
            delete: campground.clone(),
            amenities: campground,
        }),
        comments: Arc::new(CommentController {
            list: comment.clone(),
            create: comment.clone(),
            edit: comment.clone(),
            delete: comment.clone(),
            like: comment,
        }),
        ratings: Arc::new(RatingController { rate: rating }),
        notifications: Arc::new(NotificationController {
            list: notification.clone(),
            mark: notification.clone(),
            remove: notification.clone(),
            reconcile: notification,
        }),
    }
}

pub fn in_memory(
    mailer: Arc<dyn Mailer + Sync + Send>,
    images: Arc<dyn ImageHost + Sync + Send>,
    public_url: impl Into<String>,
) -> AppState {
    app_state(in_memory_repositories(), mailer, images, public_url)
}

pub async fn mongo(
    uri_str: impl AsRef<str>,
    db_name: impl AsRef<str>,
    mailer: Arc<dyn Mailer + Sync + Send>,
    images: Arc<dyn ImageHost + Sync + Send>,
    public_url: impl Into<String>,
) -> ::anyhow::Result<AppState> {
    let repositories = mongo_repositories(uri_str, db_name).await?;

    Ok(app_state(repositories, mailer, images, public_url))
}
