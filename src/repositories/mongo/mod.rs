use std::collections::HashSet;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument, UpdateOptions};
use mongodb::{Client, Collection, Database};
use tracing::Instrument;

use self::converters::{
    convert_404_or, convert_repo_err, format_date, parse_id, to_bool, try_unique_check,
};
use self::helpers::{
    get_all, get_all_with_session, get_set, initialize_coll, make_session, modify_set,
    process_transaction, retry_transient, ModifyOpTy,
};
use self::models::{
    MongoAmenityModel, MongoCampgroundModel, MongoCommentModel, MongoNotificationModel,
    MongoProfileModel, MongoRatingModel, MongoUserModel,
};
use self::type_convert::user_mutation_doc;
use super::{
    AmenityRepository, CampgroundMutation, CampgroundQuery, CampgroundRepository,
    CommentMutation, CommentRepository, NotificationQuery, NotificationRepository,
    RatingRepository, RepositoryError, Result, UserMutation, UserQuery, UserRepository,
};
use crate::entities::{
    Amenity, Campground, CampgroundId, Comment, CommentId, Notification, NotificationId, Profile,
    Rating, User, UserId,
};
use crate::utils::LetChain;

mod converters;
mod helpers;
mod models;
mod type_convert;

const USER_COLL: &str = "users";
const CAMPGROUND_COLL: &str = "campgrounds";
const COMMENT_COLL: &str = "comments";
const NOTIFICATION_COLL: &str = "notifications";
const RATING_COLL: &str = "ratings";
const AMENITY_COLL: &str = "amenities";

fn convert_all<M, T>(models: Vec<M>) -> Result<Vec<T>>
where T: TryFrom<M, Error = RepositoryError> {
    models.into_iter().map(T::try_from).collect()
}

pub struct MongoUserRepository {
    coll: Collection<MongoUserModel>,
}

impl MongoUserRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(USER_COLL, &[&["id"], &["username"], &["email"]], &db).await?;

        let coll = db.collection(USER_COLL);

        Ok(Self { coll })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, item: User) -> Result<bool> {
        let model: MongoUserModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: UserId) -> Result<User> {
        get_set(&self.coll, id.to_string()).await?.try_into()
    }

    async fn finds(&self, query: UserQuery) -> Result<Vec<User>> {
        let query_doc: Document = query.into();

        get_all(&self.coll, query_doc).await?.let_(convert_all)
    }

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User> {
        let mutation_doc = user_mutation_doc(mutation)?;
        if mutation_doc.is_empty() {
            return self.find(id).await;
        }

        self.coll
            .find_one_and_update(
                doc! { "id": id.to_string() },
                doc! { "$set": mutation_doc },
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .instrument(tracing::trace_span!("find_one_and_update"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn insert_follower(&self, id: UserId, follower: UserId) -> Result<bool> {
        modify_set(
            "followers",
            &self.coll,
            id.to_string(),
            follower.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_follower(&self, id: UserId, follower: UserId) -> Result<bool> {
        modify_set(
            "followers",
            &self.coll,
            id.to_string(),
            follower.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }
}

pub struct MongoCampgroundRepository {
    coll: Collection<MongoCampgroundModel>,
}

impl MongoCampgroundRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(CAMPGROUND_COLL, &[&["id"]], &db).await?;

        let coll = db.collection(CAMPGROUND_COLL);

        Ok(Self { coll })
    }
}

#[async_trait]
impl CampgroundRepository for MongoCampgroundRepository {
    async fn insert(&self, item: Campground) -> Result<bool> {
        let model: MongoCampgroundModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: CampgroundId) -> Result<Campground> {
        get_set(&self.coll, id.to_string()).await?.try_into()
    }

    async fn finds(&self, query: CampgroundQuery) -> Result<Vec<Campground>> {
        let query_doc: Document = (&query).into();
        let options: FindOptions = (&query).into();

        self.coll
            .find(query_doc, options)
            .instrument(tracing::trace_span!("find"))
            .await
            .let_(convert_repo_err)?
            .try_collect::<Vec<_>>()
            .await
            .let_(convert_repo_err)?
            .let_(convert_all)
    }

    async fn count(&self, query: CampgroundQuery) -> Result<u64> {
        let query_doc: Document = (&query).into();

        self.coll
            .count_documents(query_doc, None)
            .instrument(tracing::trace_span!("count_documents"))
            .await
            .let_(convert_repo_err)
    }

    async fn update(&self, id: CampgroundId, mutation: CampgroundMutation) -> Result<Campground> {
        let mutation_doc: Document = mutation.into();
        if mutation_doc.is_empty() {
            return self.find(id).await;
        }

        self.coll
            .find_one_and_update(
                doc! { "id": id.to_string() },
                doc! { "$set": mutation_doc },
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .instrument(tracing::trace_span!("find_one_and_update"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn insert_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool> {
        modify_set(
            "comments",
            &self.coll,
            id.to_string(),
            comment_id.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool> {
        modify_set(
            "comments",
            &self.coll,
            id.to_string(),
            comment_id.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }

    async fn delete(&self, id: CampgroundId) -> Result<Campground> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }
}

pub struct MongoCommentRepository {
    coll: Collection<MongoCommentModel>,
}

impl MongoCommentRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(COMMENT_COLL, &[&["id"]], &db).await?;

        let coll = db.collection(COMMENT_COLL);

        Ok(Self { coll })
    }
}

#[async_trait]
impl CommentRepository for MongoCommentRepository {
    async fn insert(&self, item: Comment) -> Result<bool> {
        let model: MongoCommentModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: CommentId) -> Result<Comment> {
        get_set(&self.coll, id.to_string()).await?.try_into()
    }

    async fn finds(&self, ids: &[CommentId]) -> Result<Vec<Comment>> {
        let found: Vec<Comment> = get_all(
            &self.coll,
            doc! { "id": { "$in": ids.iter().map(|i| i.to_string()).collect::<Vec<_>>() } },
        )
        .await?
        .let_(convert_all)?;

        Ok(ids
            .iter()
            .filter_map(|id| found.iter().find(|c| c.id == *id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: CommentId, mutation: CommentMutation) -> Result<Comment> {
        let CommentMutation { text, edited } = mutation;

        self.coll
            .find_one_and_update(
                doc! { "id": id.to_string() },
                doc! { "$set": {
                    "text": text,
                    "edited": format_date(&edited),
                    "is_edited": true,
                } },
                FindOneAndUpdateOptions::builder()
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .instrument(tracing::trace_span!("find_one_and_update"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn insert_like(&self, id: CommentId, like: Profile) -> Result<bool> {
        let user_id = like.id.to_string();
        let like = convert_repo_err(mongodb::bson::to_bson(&MongoProfileModel::from(like)))?;

        let res = self
            .coll
            .update_one(
                doc! { "id": id.to_string(), "likes.id": { "$ne": user_id } },
                doc! { "$push": { "likes": like } },
                None,
            )
            .instrument(tracing::trace_span!("update_one"))
            .await
            .let_(convert_repo_err)?;

        match res.modified_count.let_(to_bool) {
            true => Ok(true),
            false => self.find(id).await.map(|_| false),
        }
    }

    async fn delete_like(&self, id: CommentId, user_id: UserId) -> Result<bool> {
        let res = self
            .coll
            .update_one(
                doc! { "id": id.to_string() },
                doc! { "$pull": { "likes": { "id": user_id.to_string() } } },
                None,
            )
            .instrument(tracing::trace_span!("update_one"))
            .await
            .let_(convert_repo_err)?;

        if !res.matched_count.let_(to_bool) {
            return Err(RepositoryError::NotFound);
        }

        Ok(res.modified_count.let_(to_bool))
    }

    async fn delete(&self, id: CommentId) -> Result<Comment> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64> {
        self.coll
            .delete_many(doc! { "campground_id": campground_id.to_string() }, None)
            .instrument(tracing::trace_span!("delete_many"))
            .await
            .let_(convert_repo_err)
            .map(|r| r.deleted_count)
    }
}

pub struct MongoAmenityRepository {
    coll: Collection<MongoAmenityModel>,
}

impl MongoAmenityRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(AMENITY_COLL, &[&["id"], &["name"]], &db).await?;

        let coll = db.collection(AMENITY_COLL);

        Ok(Self { coll })
    }
}

#[async_trait]
impl AmenityRepository for MongoAmenityRepository {
    async fn seed(&self, names: &[&str]) -> Result<u64> {
        let present = self
            .coll
            .count_documents(doc! {}, None)
            .instrument(tracing::trace_span!("count_documents"))
            .await
            .let_(convert_repo_err)?;
        if present > 0 || names.is_empty() {
            return Ok(0);
        }

        let models = names
            .iter()
            .map(|n| MongoAmenityModel::from(Amenity::new(*n)))
            .collect::<Vec<_>>();

        let res = self
            .coll
            .insert_many(models, None)
            .instrument(tracing::trace_span!("insert_many"))
            .await
            .let_(convert_repo_err)?;

        Ok(res.inserted_ids.len() as u64)
    }

    async fn finds(&self) -> Result<Vec<Amenity>> {
        let options = FindOptions::builder().sort(doc! { "name": 1 }).build();

        self.coll
            .find(doc! {}, options)
            .instrument(tracing::trace_span!("find"))
            .await
            .let_(convert_repo_err)?
            .try_collect::<Vec<_>>()
            .await
            .let_(convert_repo_err)?
            .let_(convert_all)
    }
}

pub struct MongoRatingRepository {
    coll: Collection<MongoRatingModel>,
}

impl MongoRatingRepository {
    pub async fn new_with(db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(RATING_COLL, &[&["id"], &["author.id", "campground_id"]], &db).await?;

        let coll = db.collection(RATING_COLL);

        Ok(Self { coll })
    }
}

#[async_trait]
impl RatingRepository for MongoRatingRepository {
    async fn upsert(&self, item: Rating) -> Result<(Rating, bool)> {
        let model: MongoRatingModel = item.into();
        let key = doc! {
            "author.id": model.author.id.clone(),
            "campground_id": model.campground_id.clone(),
        };

        let res = self
            .coll
            .update_one(
                key.clone(),
                doc! {
                    "$set": {
                        "value": model.value,
                        "updated": model.updated.clone(),
                        "author.username": model.author.username.clone(),
                    },
                    "$setOnInsert": {
                        "id": model.id.clone(),
                        "created": model.created.clone(),
                    },
                },
                UpdateOptions::builder().upsert(true).build(),
            )
            .instrument(tracing::trace_span!("update_one"))
            .await
            .let_(convert_repo_err)?;

        let stored: Rating = self
            .coll
            .find_one(key, None)
            .instrument(tracing::trace_span!("find_one"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()?;

        Ok((stored, res.upserted_id.is_some()))
    }

    async fn finds(&self, campground_id: CampgroundId) -> Result<Vec<Rating>> {
        get_all(&self.coll, doc! { "campground_id": campground_id.to_string() })
            .await?
            .let_(convert_all)
    }

    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64> {
        self.coll
            .delete_many(doc! { "campground_id": campground_id.to_string() }, None)
            .instrument(tracing::trace_span!("delete_many"))
            .await
            .let_(convert_repo_err)
            .map(|r| r.deleted_count)
    }
}

/// Writes to the notification collection and to the recipients' `notifications`
/// arrays always share one transaction.
pub struct MongoNotificationRepository {
    client: Client,
    coll: Collection<MongoNotificationModel>,
    users: Collection<MongoUserModel>,
}

impl MongoNotificationRepository {
    pub async fn new_with(client: Client, db: Database) -> ::anyhow::Result<Self> {
        initialize_coll(NOTIFICATION_COLL, &[&["id"]], &db).await?;

        let coll = db.collection(NOTIFICATION_COLL);
        let users = db.collection(USER_COLL);

        Ok(Self {
            client,
            coll,
            users,
        })
    }
}

#[async_trait]
impl NotificationRepository for MongoNotificationRepository {
    async fn deliver(&self, item: Notification) -> Result<Notification> {
        async fn transaction(
            this: &MongoNotificationRepository,
            model: &MongoNotificationModel,
        ) -> ::mongodb::error::Result<bool> {
            let mut session = make_session(&this.client).await?;

            this.coll
                .insert_one_with_session(model, None, &mut session)
                .instrument(tracing::trace_span!("insert_one_with_session"))
                .await?;

            let pushed = this
                .users
                .update_one_with_session(
                    doc! { "id": model.recipient.clone() },
                    doc! { "$push": { "notifications": model.id.clone() } },
                    None,
                    &mut session,
                )
                .instrument(tracing::trace_span!("update_one_with_session"))
                .await?
                .matched_count
                .let_(to_bool);

            if !pushed {
                session.abort_transaction().await?;
                return Ok(false);
            }

            process_transaction(&mut session).await.map(|_| true)
        }

        let model: MongoNotificationModel = item.clone().into();
        let delivered = retry_transient!(transaction(self, &model).await).let_(convert_repo_err)?;

        match delivered {
            true => Ok(item),
            false => Err(RepositoryError::NotFound),
        }
    }

    async fn find(&self, id: NotificationId) -> Result<Notification> {
        get_set(&self.coll, id.to_string()).await?.try_into()
    }

    async fn finds(&self, query: NotificationQuery) -> Result<Vec<Notification>> {
        let query_doc: Document = query.into();

        get_all(&self.coll, query_doc).await?.let_(convert_all)
    }

    async fn resolve(&self, recipient: UserId) -> Result<Vec<Notification>> {
        let user = get_set(&self.users, recipient.to_string()).await?;

        let found: Vec<Notification> = get_all(
            &self.coll,
            doc! {
                "id": { "$in": user.notifications.clone() },
                "recipient": recipient.to_string(),
            },
        )
        .await?
        .let_(convert_all)?;

        let order = user
            .notifications
            .iter()
            .map(|s| parse_id::<NotificationId>(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(order
            .iter()
            .filter_map(|id| found.iter().find(|n| n.id == *id))
            .cloned()
            .collect())
    }

    async fn mark(&self, query: NotificationQuery, is_read: bool) -> Result<u64> {
        let query_doc: Document = query.into();

        self.coll
            .update_many(query_doc, doc! { "$set": { "is_read": is_read } }, None)
            .instrument(tracing::trace_span!("update_many"))
            .await
            .let_(convert_repo_err)
            .map(|r| r.matched_count)
    }

    async fn remove(&self, query: NotificationQuery) -> Result<Vec<Notification>> {
        async fn transaction(
            this: &MongoNotificationRepository,
            query: &Document,
        ) -> ::mongodb::error::Result<Vec<MongoNotificationModel>> {
            let mut session = make_session(&this.client).await?;

            let found = get_all_with_session(&this.coll, query.clone(), &mut session).await?;
            if found.is_empty() {
                session.abort_transaction().await?;
                return Ok(found);
            }

            let ids = found.iter().map(|m| m.id.clone()).collect::<Vec<_>>();
            let recipients = found
                .iter()
                .map(|m| m.recipient.clone())
                .collect::<HashSet<_>>()
                .into_iter()
                .collect::<Vec<_>>();

            this.coll
                .delete_many_with_session(doc! { "id": { "$in": ids.clone() } }, None, &mut session)
                .instrument(tracing::trace_span!("delete_many_with_session"))
                .await?;

            this.users
                .update_many_with_session(
                    doc! { "id": { "$in": recipients } },
                    doc! { "$pull": { "notifications": { "$in": ids.clone() } } },
                    None,
                    &mut session,
                )
                .instrument(tracing::trace_span!("update_many_with_session"))
                .await?;

            process_transaction(&mut session).await.map(|_| found)
        }

        let query_doc: Document = query.into();

        retry_transient!(transaction(self, &query_doc).await)
            .let_(convert_repo_err)?
            .let_(convert_all)
    }

    async fn reconcile(&self, recipient: UserId) -> Result<Vec<NotificationId>> {
        async fn transaction(
            this: &MongoNotificationRepository,
            recipient: &str,
        ) -> ::mongodb::error::Result<Option<Vec<String>>> {
            let mut session = make_session(&this.client).await?;

            let user = match this
                .users
                .find_one_with_session(doc! { "id": recipient }, None, &mut session)
                .instrument(tracing::trace_span!("find_one_with_session"))
                .await?
            {
                Some(u) => u,
                None => {
                    session.abort_transaction().await?;
                    return Ok(None);
                },
            };

            let live = get_all_with_session(
                &this.coll,
                doc! {
                    "id": { "$in": user.notifications.clone() },
                    "recipient": recipient,
                },
                &mut session,
            )
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect::<HashSet<_>>();

            let stale = user
                .notifications
                .into_iter()
                .filter(|id| !live.contains(id))
                .collect::<Vec<_>>();

            if !stale.is_empty() {
                this.users
                    .update_one_with_session(
                        doc! { "id": recipient },
                        doc! { "$pull": { "notifications": { "$in": stale.clone() } } },
                        None,
                        &mut session,
                    )
                    .instrument(tracing::trace_span!("update_one_with_session"))
                    .await?;
            }

            process_transaction(&mut session).await.map(|_| Some(stale))
        }

        let recipient = recipient.to_string();

        retry_transient!(transaction(self, &recipient).await)
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .iter()
            .map(|s| parse_id(s))
            .collect()
    }
}
