use alloc::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{campground_err_fmt, comment_err_fmt, required, user_err_fmt};
use crate::entities::{Campground, CampgroundId, Comment, CommentId};
use crate::notifier::Notifier;
use crate::repositories::{
    CampgroundRepository, CommentMutation, CommentRepository, RepositoryError, UserRepository,
};
use crate::usecases::comment::{create, delete, edit, like, list};
use crate::usecases::UsecaseError;
use crate::utils::LetChain;

pub struct CommentInteractor {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub campground_repository: Arc<dyn CampgroundRepository + Sync + Send>,
    pub comment_repository: Arc<dyn CommentRepository + Sync + Send>,
    pub notifier: Arc<Notifier>,
}

impl CommentInteractor {
    /// The campground is looked up first, so a missing campground wins over a
    /// missing comment. A comment of another campground counts as missing.
    async fn locate(
        &self,
        campground_id: CampgroundId,
        comment_id: CommentId,
    ) -> Result<(Campground, Comment), UsecaseError> {
        let campground = self
            .campground_repository
            .find(campground_id)
            .await
            .map_err(campground_err_fmt)?;

        let comment = self
            .comment_repository
            .find(comment_id)
            .await
            .map_err(comment_err_fmt)?;
        if comment.campground_id != campground.id {
            return Err(comment_err_fmt(RepositoryError::NotFound));
        }

        Ok((campground, comment))
    }
}

#[async_trait]
impl list::Usecase for CommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        list::Input { campground_id }: list::Input,
    ) -> Result<list::Output, UsecaseError> {
        let campground = self
            .campground_repository
            .find(campground_id)
            .await
            .map_err(campground_err_fmt)?;

        self.comment_repository
            .finds(&campground.comments)
            .await
            .map_err(comment_err_fmt)?
            .let_(|comments| list::Output { comments })
            .let_(Ok)
    }
}

#[async_trait]
impl create::Usecase for CommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        create::Input {
            campground_id,
            author,
            text,
        }: create::Input,
    ) -> Result<create::Output, UsecaseError> {
        let text = required("Text", text)?;

        let campground = self
            .campground_repository
            .find(campground_id)
            .await
            .map_err(campground_err_fmt)?;
        let author = self
            .user_repository
            .find(author)
            .await
            .map_err(user_err_fmt)?;

        let now = Utc::now();
        let new_comment = Comment {
            id: CommentId::new(),
            campground_id,
            text,
            author: author.profile(),
            created: now,
            edited: now,
            is_edited: false,
            likes: vec![],
        };

        let can_insert = self
            .comment_repository
            .insert(new_comment.clone())
            .await
            .map_err(comment_err_fmt)?;
        if !can_insert {
            return Err(UsecaseError::Conflict("Comment id already in use!".to_string()));
        }

        self.campground_repository
            .insert_comment(campground_id, new_comment.id)
            .await
            .map_err(campground_err_fmt)?;

        self.notifier.comment_created(&campground, &new_comment).await;

        tracing::trace!("output - {:?}", new_comment.id);
        Ok(create::Output {
            comment: new_comment,
        })
    }
}

#[async_trait]
impl edit::Usecase for CommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        edit::Input {
            campground_id,
            comment_id,
            requester,
            text,
        }: edit::Input,
    ) -> Result<edit::Output, UsecaseError> {
        let (_, comment) = self.locate(campground_id, comment_id).await?;

        if comment.author.id != requester {
            return Err(UsecaseError::Unauthorized(
                "You are not authorized to edit this comment!".to_string(),
            ));
        }

        let mutation = CommentMutation {
            text: required("Text", text)?,
            edited: Utc::now(),
        };

        self.comment_repository
            .update(comment_id, mutation)
            .await
            .map_err(comment_err_fmt)?
            .let_(|comment| edit::Output { comment })
            .let_(Ok)
    }
}

#[async_trait]
impl delete::Usecase for CommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        delete::Input {
            campground_id,
            comment_id,
            requester,
        }: delete::Input,
    ) -> Result<delete::Output, UsecaseError> {
        let (campground, comment) = self.locate(campground_id, comment_id).await?;

        if comment.author.id != requester && campground.author.id != requester {
            return Err(UsecaseError::Unauthorized(
                "You are not authorized to delete this comment!".to_string(),
            ));
        }

        let comment = self
            .comment_repository
            .delete(comment_id)
            .await
            .map_err(comment_err_fmt)?;

        self.campground_repository
            .delete_comment(campground_id, comment_id)
            .await
            .map_err(campground_err_fmt)?;

        self.notifier.comment_removed(comment_id).await;

        Ok(delete::Output { comment })
    }
}

#[async_trait]
impl like::Usecase for CommentInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        like::Input {
            campground_id,
            comment_id,
            user_id,
        }: like::Input,
    ) -> Result<like::Output, UsecaseError> {
        let (campground, comment) = self.locate(campground_id, comment_id).await?;
        let liker = self
            .user_repository
            .find(user_id)
            .await
            .map_err(user_err_fmt)?;

        let liked = if comment.is_liked_by(liker.id) {
            self.comment_repository
                .delete_like(comment_id, liker.id)
                .await
                .map_err(comment_err_fmt)?;

            self.notifier.like_withdrawn(comment_id, liker.id).await;
            false
        } else {
            let added = self
                .comment_repository
                .insert_like(comment_id, liker.profile())
                .await
                .map_err(comment_err_fmt)?;

            if added {
                self.notifier.comment_liked(&campground, &comment, &liker).await;
            }
            true
        };

        let comment = self
            .comment_repository
            .find(comment_id)
            .await
            .map_err(comment_err_fmt)?;

        tracing::trace!("output - liked: {}", liked);
        Ok(like::Output { comment, liked })
    }
}
