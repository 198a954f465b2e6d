use alloc::sync::Arc;

use async_trait::async_trait;

use super::{notification_err_fmt, user_err_fmt};
use crate::repositories::{NotificationQuery, NotificationRepository};
use crate::usecases::notification::{list, mark, reconcile, remove};
use crate::usecases::UsecaseError;
use crate::utils::{AlsoChain, LetChain};

pub struct NotificationInteractor {
    pub notification_repository: Arc<dyn NotificationRepository + Sync + Send>,
}

#[async_trait]
impl list::Usecase for NotificationInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        list::Input { user_id }: list::Input,
    ) -> Result<list::Output, UsecaseError> {
        self.notification_repository
            .resolve(user_id)
            .await
            .map_err(user_err_fmt)?
            .also_(|ns| ns.sort_by(|a, b| b.created.cmp(&a.created)))
            .let_(|notifications| list::Output { notifications })
            .let_(Ok)
    }
}

#[async_trait]
impl mark::Usecase for NotificationInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        mark::Input {
            user_id,
            ids,
            is_read,
        }: mark::Input,
    ) -> Result<mark::Output, UsecaseError> {
        let query = NotificationQuery {
            ids: Some(ids.into_iter().collect()),
            recipient: Some(user_id),
            ..Default::default()
        };

        self.notification_repository
            .mark(query, is_read)
            .await
            .map_err(notification_err_fmt)?
            .let_(|updated| mark::Output { updated })
            .let_(Ok)
    }
}

#[async_trait]
impl remove::Usecase for NotificationInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        remove::Input { user_id, ids }: remove::Input,
    ) -> Result<remove::Output, UsecaseError> {
        let query = NotificationQuery {
            ids: Some(ids.into_iter().collect()),
            recipient: Some(user_id),
            ..Default::default()
        };

        self.notification_repository
            .remove(query)
            .await
            .map_err(notification_err_fmt)?
            .let_(|removed| remove::Output { removed })
            .let_(Ok)
    }
}

#[async_trait]
impl reconcile::Usecase for NotificationInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        reconcile::Input { user_id }: reconcile::Input,
    ) -> Result<reconcile::Output, UsecaseError> {
        self.notification_repository
            .reconcile(user_id)
            .await
            .map_err(user_err_fmt)?
            .let_(|pruned| reconcile::Output { pruned })
            .let_(Ok)
    }
}
