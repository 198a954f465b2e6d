use std::collections::HashSet;
use std::sync::Arc;

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::Mutex;

use self::helpers::{add_to_set, find_mut, find_ref, take_all, take_unique};
use super::{
    AmenityRepository, CampgroundMutation, CampgroundQuery, CampgroundRepository,
    CommentMutation, CommentRepository, NotificationQuery, NotificationRepository,
    RatingRepository, RepositoryError, Result, UserMutation, UserQuery, UserRepository,
};
use crate::entities::{
    Amenity, Campground, CampgroundId, Comment, CommentId, Notification, NotificationId, Profile,
    Rating, User, UserId,
};

mod helpers;

pub struct InMemoryRepository<T>(Mutex<Vec<T>>);

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self { Self(Mutex::new(vec![])) }

    pub fn with(items: Vec<T>) -> Self { Self(Mutex::new(items)) }
}
impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self { Self::new() }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn insert(&self, item: User) -> Result<bool> {
        let mut guard = self.0.lock().await;

        let taken = guard
            .iter()
            .any(|u| u.id == item.id || u.username == item.username || u.email == item.email);
        if taken {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: UserId) -> Result<User> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.id == id)?.clone())
    }

    async fn finds(&self, query: UserQuery) -> Result<Vec<User>> {
        Ok(self
            .0
            .lock()
            .await
            .iter()
            .filter(|u| query.matches(u))
            .cloned()
            .collect())
    }

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |u| u.id == id)?;

        let UserMutation { avatar, settings } = mutation;
        if let Some(val) = avatar {
            item.avatar = val;
        }
        if let Some(val) = settings {
            item.settings = val;
        }

        Ok(item.clone())
    }

    async fn insert_follower(&self, id: UserId, follower: UserId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |u| u.id == id)?;

        Ok(add_to_set(&mut item.followers, follower))
    }

    async fn delete_follower(&self, id: UserId, follower: UserId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |u| u.id == id)?;

        Ok(!take_all(&mut item.followers, |f| *f == follower).is_empty())
    }
}

#[async_trait]
impl CampgroundRepository for InMemoryRepository<Campground> {
    async fn insert(&self, item: Campground) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|c| c.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: CampgroundId) -> Result<Campground> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |c| c.id == id)?.clone())
    }

    async fn finds(&self, query: CampgroundQuery) -> Result<Vec<Campground>> {
        let guard = self.0.lock().await;
        let matched = guard.iter().filter(|c| query.matches(c)).cloned();

        let res = match query.page {
            Some(p) => matched
                .skip(usize::try_from(p.skip).unwrap_or(usize::MAX))
                .take(usize::try_from(p.limit).unwrap_or(usize::MAX))
                .collect(),
            None => matched.collect(),
        };

        Ok(res)
    }

    async fn count(&self, query: CampgroundQuery) -> Result<u64> {
        let guard = self.0.lock().await;

        Ok(guard.iter().filter(|c| query.matches(c)).count() as u64)
    }

    async fn update(&self, id: CampgroundId, mutation: CampgroundMutation) -> Result<Campground> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        let CampgroundMutation {
            name,
            price,
            image,
            location,
            description,
            amenities,
            rating,
        } = mutation;
        if let Some(val) = name {
            item.name = val;
        }
        if let Some(val) = price {
            item.price = val;
        }
        if let Some(val) = image {
            item.image = val;
        }
        if let Some(val) = location {
            item.location = val;
        }
        if let Some(val) = description {
            item.description = val;
        }
        if let Some(val) = amenities {
            item.amenities = val;
        }
        if let Some(val) = rating {
            item.rating = val;
        }

        Ok(item.clone())
    }

    async fn insert_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        Ok(add_to_set(&mut item.comments, comment_id))
    }

    async fn delete_comment(&self, id: CampgroundId, comment_id: CommentId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        Ok(!take_all(&mut item.comments, |c| *c == comment_id).is_empty())
    }

    async fn delete(&self, id: CampgroundId) -> Result<Campground> {
        let mut guard = self.0.lock().await;

        take_unique(&mut guard, |c| c.id == id)
    }
}

#[async_trait]
impl CommentRepository for InMemoryRepository<Comment> {
    async fn insert(&self, item: Comment) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|c| c.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: CommentId) -> Result<Comment> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |c| c.id == id)?.clone())
    }

    async fn finds(&self, ids: &[CommentId]) -> Result<Vec<Comment>> {
        let guard = self.0.lock().await;

        Ok(ids
            .iter()
            .filter_map(|id| guard.iter().find(|c| c.id == *id))
            .cloned()
            .collect())
    }

    async fn update(&self, id: CommentId, mutation: CommentMutation) -> Result<Comment> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        let CommentMutation { text, edited } = mutation;
        item.text = text;
        item.edited = edited;
        item.is_edited = true;

        Ok(item.clone())
    }

    async fn insert_like(&self, id: CommentId, like: Profile) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        if item.is_liked_by(like.id) {
            return Ok(false);
        }

        item.likes.push(like);
        Ok(true)
    }

    async fn delete_like(&self, id: CommentId, user_id: UserId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |c| c.id == id)?;

        Ok(!take_all(&mut item.likes, |l| l.id == user_id).is_empty())
    }

    async fn delete(&self, id: CommentId) -> Result<Comment> {
        let mut guard = self.0.lock().await;

        take_unique(&mut guard, |c| c.id == id)
    }

    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64> {
        let mut guard = self.0.lock().await;

        Ok(take_all(&mut guard, |c| c.campground_id == campground_id).len() as u64)
    }
}

#[async_trait]
impl RatingRepository for InMemoryRepository<Rating> {
    async fn upsert(&self, item: Rating) -> Result<(Rating, bool)> {
        let mut guard = self.0.lock().await;

        match find_mut(&mut guard, |r| {
            r.author.id == item.author.id && r.campground_id == item.campground_id
        }) {
            Ok(found) => {
                found.value = item.value;
                found.updated = item.updated;
                found.author.username = item.author.username;
                Ok((found.clone(), false))
            },
            Err(RepositoryError::NotFound) => {
                guard.push(item.clone());
                Ok((item, true))
            },
            Err(e) => Err(e),
        }
    }

    async fn finds(&self, campground_id: CampgroundId) -> Result<Vec<Rating>> {
        let guard = self.0.lock().await;

        Ok(guard
            .iter()
            .filter(|r| r.campground_id == campground_id)
            .cloned()
            .collect())
    }

    async fn deletes(&self, campground_id: CampgroundId) -> Result<u64> {
        let mut guard = self.0.lock().await;

        Ok(take_all(&mut guard, |r| r.campground_id == campground_id).len() as u64)
    }
}

#[async_trait]
impl AmenityRepository for InMemoryRepository<Amenity> {
    async fn seed(&self, names: &[&str]) -> Result<u64> {
        let mut guard = self.0.lock().await;
        if !guard.is_empty() {
            return Ok(0);
        }

        guard.extend(names.iter().map(|n| Amenity::new(*n)));
        Ok(guard.len() as u64)
    }

    async fn finds(&self) -> Result<Vec<Amenity>> {
        let mut all = self.0.lock().await.clone();
        all.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(all)
    }
}

/// Shares the user collection so that a notification and the reference to it
/// change under the same pair of locks. Locks are always taken notifications
/// first, users second.
pub struct InMemoryNotificationRepository {
    notifications: Mutex<Vec<Notification>>,
    users: Arc<InMemoryRepository<User>>,
}

impl InMemoryNotificationRepository {
    pub fn new(users: Arc<InMemoryRepository<User>>) -> Self {
        Self {
            notifications: Mutex::new(vec![]),
            users,
        }
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn deliver(&self, item: Notification) -> Result<Notification> {
        let mut notifications = self.notifications.lock().await;
        let mut users = self.users.0.lock().await;

        if notifications.iter().any(|n| n.id == item.id) {
            return Err(RepositoryError::Internal(anyhow!(
                "duplicated notification id: {}",
                item.id
            )));
        }

        let recipient = find_mut(&mut users, |u| u.id == item.recipient)?;
        recipient.notifications.push(item.id);
        notifications.push(item.clone());

        Ok(item)
    }

    async fn find(&self, id: NotificationId) -> Result<Notification> {
        let guard = self.notifications.lock().await;

        Ok(find_ref(&guard, |n| n.id == id)?.clone())
    }

    async fn finds(&self, query: NotificationQuery) -> Result<Vec<Notification>> {
        let guard = self.notifications.lock().await;

        Ok(guard.iter().filter(|n| query.matches(n)).cloned().collect())
    }

    async fn resolve(&self, recipient: UserId) -> Result<Vec<Notification>> {
        let notifications = self.notifications.lock().await;
        let users = self.users.0.lock().await;
        let user = find_ref(&users, |u| u.id == recipient)?;

        Ok(user
            .notifications
            .iter()
            .filter_map(|id| {
                notifications
                    .iter()
                    .find(|n| n.id == *id && n.recipient == recipient)
            })
            .cloned()
            .collect())
    }

    async fn mark(&self, query: NotificationQuery, is_read: bool) -> Result<u64> {
        let mut guard = self.notifications.lock().await;

        let mut matched = 0;
        for n in guard.iter_mut().filter(|n| query.matches(n)) {
            n.is_read = is_read;
            matched += 1;
        }

        Ok(matched)
    }

    async fn remove(&self, query: NotificationQuery) -> Result<Vec<Notification>> {
        let mut notifications = self.notifications.lock().await;
        let mut users = self.users.0.lock().await;

        let removed = take_all(&mut notifications, |n| query.matches(n));
        for n in &removed {
            // a recipient that no longer exists has no list to fix
            if let Ok(u) = find_mut(&mut users, |u| u.id == n.recipient) {
                take_all(&mut u.notifications, |id| *id == n.id);
            }
        }

        Ok(removed)
    }

    async fn reconcile(&self, recipient: UserId) -> Result<Vec<NotificationId>> {
        let notifications = self.notifications.lock().await;
        let mut users = self.users.0.lock().await;
        let user = find_mut(&mut users, |u| u.id == recipient)?;

        let live = notifications
            .iter()
            .filter(|n| n.recipient == recipient)
            .map(|n| n.id)
            .collect::<HashSet<_>>();

        Ok(take_all(&mut user.notifications, |id| !live.contains(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::AMENITY_CATALOGUE;

    #[tokio::test]
    async fn amenities_seed_only_once() {
        let repo = InMemoryRepository::<Amenity>::new();

        assert_eq!(repo.seed(&AMENITY_CATALOGUE).await.unwrap(), 29);
        assert_eq!(repo.seed(&["Sauna"]).await.unwrap(), 0);

        let all = repo.finds().await.unwrap();
        assert_eq!(all.len(), 29);
        assert!(all.iter().all(|a| a.name != "Sauna"));
        assert_eq!(all[0].name, "Barbeque, Fire Rings, Grills");
    }
}
