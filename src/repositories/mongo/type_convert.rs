use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;

use super::converters::{convert_repo_err, format_date, parse_date, parse_id, parse_ids};
use super::models::{
    MongoActorModel, MongoAmenityModel, MongoCampgroundModel, MongoCampgroundRefModel,
    MongoCommentModel, MongoFollowerModel, MongoNotificationModel, MongoProfileModel,
    MongoRatingModel, MongoUserModel,
};
use super::{
    CampgroundMutation, CampgroundQuery, NotificationQuery, RepositoryError, Result as RepoResult,
    UserMutation, UserQuery,
};
use crate::entities::{
    Actor, Amenity, Campground, CampgroundRef, Comment, CommentId, FollowerRef, Notification,
    Profile, Rating, User,
};

fn strings<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|i| i.to_string()).collect()
}

impl From<UserQuery> for Document {
    fn from(UserQuery { ids, follower }: UserQuery) -> Self {
        let mut query = doc! {};

        if let Some(set) = ids {
            query.insert("id", doc! { "$in": strings(set) });
        }

        if let Some(f) = follower {
            query.insert("followers", f.to_string());
        }

        query
    }
}

impl From<&CampgroundQuery> for Document {
    fn from(CampgroundQuery { name, author, page: _ }: &CampgroundQuery) -> Self {
        let mut query = doc! {};

        if let Some(r) = name {
            query.insert("name", doc! { "$regex": r.as_str() });
        }

        if let Some(a) = author {
            query.insert("author.id", a.to_string());
        }

        query
    }
}

impl From<&CampgroundQuery> for FindOptions {
    fn from(query: &CampgroundQuery) -> Self {
        match query.page {
            Some(p) => FindOptions::builder()
                .skip(p.skip)
                .limit(i64::try_from(p.limit).unwrap_or(i64::MAX))
                .build(),
            None => FindOptions::default(),
        }
    }
}

impl From<NotificationQuery> for Document {
    fn from(
        NotificationQuery {
            ids,
            recipient,
            kind,
            actor,
            campground,
            comments,
            is_comment_like,
            follower,
            following,
        }: NotificationQuery,
    ) -> Self {
        let mut query = doc! {};

        if let Some(set) = ids {
            query.insert("id", doc! { "$in": strings(set) });
        }
        if let Some(r) = recipient {
            query.insert("recipient", r.to_string());
        }
        if let Some(k) = kind {
            query.insert("kind", k as i32);
        }
        if let Some(a) = actor {
            query.insert("actor.id", a.to_string());
        }
        if let Some(c) = campground {
            query.insert("campground.id", c.to_string());
        }
        if let Some(set) = comments {
            query.insert("comment_id", doc! { "$in": strings(set) });
        }
        if let Some(b) = is_comment_like {
            query.insert("is_comment_like", b);
        }
        if let Some(f) = follower {
            query.insert("follower.id", f.to_string());
        }
        if let Some(f) = following {
            query.insert("follower.following_user_id", f.to_string());
        }

        query
    }
}

pub fn user_mutation_doc(UserMutation { avatar, settings }: UserMutation) -> RepoResult<Document> {
    let mut mutation = doc! {};

    if let Some(val) = avatar {
        mutation.insert("avatar", val);
    }

    if let Some(val) = settings {
        mutation.insert("settings", convert_repo_err(mongodb::bson::to_bson(&val))?);
    }

    Ok(mutation)
}

impl From<CampgroundMutation> for Document {
    fn from(
        CampgroundMutation {
            name,
            price,
            image,
            location,
            description,
            amenities,
            rating,
        }: CampgroundMutation,
    ) -> Self {
        let mut mutation = doc! {};

        if let Some(val) = name {
            mutation.insert("name", val);
        }
        if let Some(val) = price {
            mutation.insert("price", val);
        }
        if let Some(val) = image {
            mutation.insert("image", val);
        }
        if let Some(val) = location {
            mutation.insert("location", val);
        }
        if let Some(val) = description {
            mutation.insert("description", val);
        }
        if let Some(val) = amenities {
            mutation.insert("amenities", strings(val));
        }
        if let Some(val) = rating {
            mutation.insert("rating", val);
        }

        mutation
    }
}

impl From<Actor> for MongoActorModel {
    fn from(Actor { id, username }: Actor) -> Self {
        MongoActorModel {
            id: id.to_string(),
            username,
        }
    }
}
impl TryFrom<MongoActorModel> for Actor {
    type Error = RepositoryError;

    fn try_from(MongoActorModel { id, username }: MongoActorModel) -> RepoResult<Self> {
        Ok(Actor {
            id: parse_id(&id)?,
            username,
        })
    }
}

impl From<Profile> for MongoProfileModel {
    fn from(Profile { id, username, avatar }: Profile) -> Self {
        MongoProfileModel {
            id: id.to_string(),
            username,
            avatar,
        }
    }
}
impl TryFrom<MongoProfileModel> for Profile {
    type Error = RepositoryError;

    fn try_from(MongoProfileModel { id, username, avatar }: MongoProfileModel) -> RepoResult<Self> {
        Ok(Profile {
            id: parse_id(&id)?,
            username,
            avatar,
        })
    }
}

impl From<User> for MongoUserModel {
    fn from(
        User {
            id,
            username,
            email,
            avatar,
            created,
            settings,
            notifications,
            followers,
        }: User,
    ) -> Self {
        MongoUserModel {
            id: id.to_string(),
            username,
            email,
            avatar,
            created: format_date(&created),
            settings,
            notifications: strings(notifications),
            followers: strings(followers),
        }
    }
}
impl TryFrom<MongoUserModel> for User {
    type Error = RepositoryError;

    fn try_from(
        MongoUserModel {
            id,
            username,
            email,
            avatar,
            created,
            settings,
            notifications,
            followers,
        }: MongoUserModel,
    ) -> RepoResult<Self> {
        Ok(User {
            id: parse_id(&id)?,
            username,
            email,
            avatar,
            created: parse_date(&created)?,
            settings,
            notifications: parse_ids(notifications)?,
            followers: parse_ids(followers)?,
        })
    }
}

impl From<Campground> for MongoCampgroundModel {
    fn from(
        Campground {
            id,
            name,
            price,
            image,
            location,
            description,
            author,
            created,
            comments,
            amenities,
            rating,
        }: Campground,
    ) -> Self {
        MongoCampgroundModel {
            id: id.to_string(),
            name,
            price,
            image,
            location,
            description,
            author: author.into(),
            created: format_date(&created),
            comments: strings(comments),
            amenities: strings(amenities),
            rating,
        }
    }
}
impl TryFrom<MongoCampgroundModel> for Campground {
    type Error = RepositoryError;

    fn try_from(
        MongoCampgroundModel {
            id,
            name,
            price,
            image,
            location,
            description,
            author,
            created,
            comments,
            amenities,
            rating,
        }: MongoCampgroundModel,
    ) -> RepoResult<Self> {
        Ok(Campground {
            id: parse_id(&id)?,
            name,
            price,
            image,
            location,
            description,
            author: author.try_into()?,
            created: parse_date(&created)?,
            comments: parse_ids(comments)?,
            amenities: parse_ids(amenities)?,
            rating,
        })
    }
}

impl From<Comment> for MongoCommentModel {
    fn from(
        Comment {
            id,
            campground_id,
            text,
            author,
            created,
            edited,
            is_edited,
            likes,
        }: Comment,
    ) -> Self {
        MongoCommentModel {
            id: id.to_string(),
            campground_id: campground_id.to_string(),
            text,
            author: author.into(),
            created: format_date(&created),
            edited: format_date(&edited),
            is_edited,
            likes: likes.into_iter().map(Into::into).collect(),
        }
    }
}
impl TryFrom<MongoCommentModel> for Comment {
    type Error = RepositoryError;

    fn try_from(
        MongoCommentModel {
            id,
            campground_id,
            text,
            author,
            created,
            edited,
            is_edited,
            likes,
        }: MongoCommentModel,
    ) -> RepoResult<Self> {
        Ok(Comment {
            id: parse_id(&id)?,
            campground_id: parse_id(&campground_id)?,
            text,
            author: author.try_into()?,
            created: parse_date(&created)?,
            edited: parse_date(&edited)?,
            is_edited,
            likes: likes
                .into_iter()
                .map(TryInto::try_into)
                .collect::<RepoResult<_>>()?,
        })
    }
}

impl From<Notification> for MongoNotificationModel {
    fn from(
        Notification {
            id,
            recipient,
            actor,
            kind,
            campground,
            comment_id,
            is_comment_like,
            follower,
            is_read,
            created,
        }: Notification,
    ) -> Self {
        MongoNotificationModel {
            id: id.to_string(),
            recipient: recipient.to_string(),
            actor: actor.into(),
            kind: kind as i32,
            campground: campground.map(|CampgroundRef { id, name }| MongoCampgroundRefModel {
                id: id.to_string(),
                name,
            }),
            comment_id: comment_id.map(|c| c.to_string()),
            is_comment_like,
            follower: follower.map(
                |FollowerRef {
                     id,
                     follower_avatar,
                     following_user_id,
                 }| MongoFollowerModel {
                    id: id.to_string(),
                    follower_avatar,
                    following_user_id: following_user_id.to_string(),
                },
            ),
            is_read,
            created: format_date(&created),
        }
    }
}
impl TryFrom<MongoNotificationModel> for Notification {
    type Error = RepositoryError;

    fn try_from(
        MongoNotificationModel {
            id,
            recipient,
            actor,
            kind,
            campground,
            comment_id,
            is_comment_like,
            follower,
            is_read,
            created,
        }: MongoNotificationModel,
    ) -> RepoResult<Self> {
        let kind = u8::try_from(kind)
            .map_err(|e| RepositoryError::Internal(anyhow::anyhow!(e)))?
            .try_into()
            .map_err(|e: String| RepositoryError::Internal(anyhow::anyhow!(e)))?;

        Ok(Notification {
            id: parse_id(&id)?,
            recipient: parse_id(&recipient)?,
            actor: actor.try_into()?,
            kind,
            campground: match campground {
                Some(MongoCampgroundRefModel { id, name }) => Some(CampgroundRef {
                    id: parse_id(&id)?,
                    name,
                }),
                None => None,
            },
            comment_id: comment_id.as_deref().map(parse_id::<CommentId>).transpose()?,
            is_comment_like,
            follower: match follower {
                Some(MongoFollowerModel {
                    id,
                    follower_avatar,
                    following_user_id,
                }) => Some(FollowerRef {
                    id: parse_id(&id)?,
                    follower_avatar,
                    following_user_id: parse_id(&following_user_id)?,
                }),
                None => None,
            },
            is_read,
            created: parse_date(&created)?,
        })
    }
}

impl From<Rating> for MongoRatingModel {
    fn from(
        Rating {
            id,
            author,
            campground_id,
            value,
            created,
            updated,
        }: Rating,
    ) -> Self {
        MongoRatingModel {
            id: id.to_string(),
            author: author.into(),
            campground_id: campground_id.to_string(),
            value,
            created: format_date(&created),
            updated: format_date(&updated),
        }
    }
}
impl TryFrom<MongoRatingModel> for Rating {
    type Error = RepositoryError;

    fn try_from(
        MongoRatingModel {
            id,
            author,
            campground_id,
            value,
            created,
            updated,
        }: MongoRatingModel,
    ) -> RepoResult<Self> {
        Ok(Rating {
            id: parse_id(&id)?,
            author: author.try_into()?,
            campground_id: parse_id(&campground_id)?,
            value,
            created: parse_date(&created)?,
            updated: parse_date(&updated)?,
        })
    }
}

impl From<Amenity> for MongoAmenityModel {
    fn from(Amenity { id, name }: Amenity) -> Self {
        MongoAmenityModel {
            id: id.to_string(),
            name,
        }
    }
}
impl TryFrom<MongoAmenityModel> for Amenity {
    type Error = RepositoryError;

    fn try_from(MongoAmenityModel { id, name }: MongoAmenityModel) -> RepoResult<Self> {
        Ok(Amenity {
            id: parse_id(&id)?,
            name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{NotificationKind, UserId};

    #[test]
    fn notification_query_uses_stored_field_paths() {
        let (follower, following) = (UserId::new(), UserId::new());
        let q: Document = NotificationQuery {
            kind: Some(NotificationKind::NewFollower),
            follower: Some(follower),
            following: Some(following),
            ..Default::default()
        }
        .into();

        assert_eq!(q.get_i32("kind").unwrap(), 3);
        assert_eq!(q.get_str("follower.id").unwrap(), follower.to_string());
        assert_eq!(
            q.get_str("follower.following_user_id").unwrap(),
            following.to_string()
        );
        assert!(!q.contains_key("recipient"));
    }

    #[test]
    fn comment_ids_become_in_filter() {
        let c = CommentId::new();
        let q: Document = NotificationQuery {
            comments: Some([c].into_iter().collect()),
            ..Default::default()
        }
        .into();

        let ins = q.get_document("comment_id").unwrap().get_array("$in").unwrap();
        assert_eq!(ins.len(), 1);
        assert_eq!(ins[0].as_str().unwrap(), c.to_string());
    }
}
