use alloc::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{required, user_err_fmt};
use crate::entities::{NotificationSettings, User, UserId, DEFAULT_AVATAR};
use crate::notifier::Notifier;
use crate::repositories::{UserMutation, UserRepository};
use crate::usecases::user::{edit, follow, get, register, unfollow};
use crate::usecases::UsecaseError;
use crate::utils::LetChain;

pub struct UserInteractor {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub notifier: Arc<Notifier>,
}

#[async_trait]
impl register::Usecase for UserInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        register::Input {
            username,
            email,
            avatar,
        }: register::Input,
    ) -> Result<register::Output, UsecaseError> {
        let username = required("Username", username)?;
        let email = required("Email", email)?;
        let avatar = avatar
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| DEFAULT_AVATAR.to_string());

        let new_user = User {
            id: UserId::new(),
            username,
            email,
            avatar,
            created: Utc::now(),
            settings: NotificationSettings::default(),
            notifications: vec![],
            followers: vec![],
        };

        let can_insert = self
            .user_repository
            .insert(new_user.clone())
            .await
            .map_err(user_err_fmt)?;
        if !can_insert {
            return Err(UsecaseError::Conflict(
                "A user with the given username or email already exists!".to_string(),
            ));
        }

        tracing::info!(user = %new_user.id, "user registered");
        Ok(register::Output { user: new_user })
    }
}

#[async_trait]
impl get::Usecase for UserInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        get::Input { user_id }: get::Input,
    ) -> Result<get::Output, UsecaseError> {
        self.user_repository
            .find(user_id)
            .await
            .map_err(user_err_fmt)?
            .let_(|user| get::Output { user })
            .let_(Ok)
    }
}

#[async_trait]
impl edit::Usecase for UserInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        edit::Input {
            user_id,
            avatar,
            in_app,
            email,
        }: edit::Input,
    ) -> Result<edit::Output, UsecaseError> {
        let current = self
            .user_repository
            .find(user_id)
            .await
            .map_err(user_err_fmt)?;

        let settings = NotificationSettings {
            in_app: in_app.unwrap_or(current.settings.in_app),
            email: email.unwrap_or(current.settings.email),
        };
        let mutation = UserMutation {
            avatar: avatar.filter(|a| !a.trim().is_empty()),
            settings: Some(settings),
        };
        tracing::trace!("mutation - {:?}", mutation);

        self.user_repository
            .update(user_id, mutation)
            .await
            .map_err(user_err_fmt)?
            .let_(|user| edit::Output { user })
            .let_(Ok)
    }
}

#[async_trait]
impl follow::Usecase for UserInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        follow::Input { follower, target }: follow::Input,
    ) -> Result<follow::Output, UsecaseError> {
        if follower == target {
            return Err(UsecaseError::Validation(
                "You cannot follow yourself!".to_string(),
            ));
        }

        let follower = self
            .user_repository
            .find(follower)
            .await
            .map_err(user_err_fmt)?;

        let added = self
            .user_repository
            .insert_follower(target, follower.id)
            .await
            .map_err(user_err_fmt)?;
        if !added {
            return Err(UsecaseError::Conflict(
                "You are already following this user!".to_string(),
            ));
        }

        let target = self
            .user_repository
            .find(target)
            .await
            .map_err(user_err_fmt)?;

        self.notifier.follower_added(&target, &follower).await;

        tracing::trace!("output - {:?}", target.id);
        Ok(follow::Output { user: target })
    }
}

#[async_trait]
impl unfollow::Usecase for UserInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        unfollow::Input { follower, target }: unfollow::Input,
    ) -> Result<unfollow::Output, UsecaseError> {
        let removed = self
            .user_repository
            .delete_follower(target, follower)
            .await
            .map_err(user_err_fmt)?;
        if !removed {
            return Err(UsecaseError::Validation(
                "You are not following this user!".to_string(),
            ));
        }

        self.notifier.follower_removed(follower, target).await;

        self.user_repository
            .find(target)
            .await
            .map_err(user_err_fmt)?
            .let_(|user| unfollow::Output { user })
            .let_(Ok)
    }
}
