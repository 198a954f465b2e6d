use alloc::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::{campground_err_fmt, required};
use crate::entities::{AmenityId, Campground, CampgroundId, UserId};
use crate::images::{self, ImageHost};
use crate::notifier::Notifier;
use crate::repositories::{
    AmenityRepository, CampgroundMutation, CampgroundQuery, CampgroundRepository,
    CommentRepository, Paging, RatingRepository,
};
use crate::usecases::campground::{amenities, create, delete, edit, get, gets, CampgroundEdit};
use crate::usecases::UsecaseError;
use crate::utils::{search_regex, LetChain};

pub struct CampgroundInteractor {
    pub campground_repository: Arc<dyn CampgroundRepository + Sync + Send>,
    pub comment_repository: Arc<dyn CommentRepository + Sync + Send>,
    pub rating_repository: Arc<dyn RatingRepository + Sync + Send>,
    pub amenity_repository: Arc<dyn AmenityRepository + Sync + Send>,
    pub notifier: Arc<Notifier>,
    pub image_host: Arc<dyn ImageHost + Sync + Send>,
}

impl CampgroundInteractor {
    async fn authored(
        &self,
        id: CampgroundId,
        requester: UserId,
        action: &str,
    ) -> Result<Campground, UsecaseError> {
        let campground = self
            .campground_repository
            .find(id)
            .await
            .map_err(campground_err_fmt)?;

        if campground.author.id != requester {
            return Err(UsecaseError::Unauthorized(format!(
                "You are not authorized to {} this campground!",
                action
            )));
        }

        Ok(campground)
    }

    /// Deduplicated, in request order. Every id must be in the catalogue.
    async fn checked_amenities(&self, ids: Vec<AmenityId>) -> Result<Vec<AmenityId>, UsecaseError> {
        if ids.is_empty() {
            return Ok(ids);
        }

        let catalogue = self
            .amenity_repository
            .finds()
            .await?
            .into_iter()
            .map(|a| a.id)
            .collect::<Vec<_>>();

        let mut checked: Vec<AmenityId> = vec![];
        for id in ids {
            if !catalogue.contains(&id) {
                return Err(UsecaseError::Validation(
                    "Invalid Amenity requested!".to_string(),
                ));
            }
            if !checked.contains(&id) {
                checked.push(id);
            }
        }

        Ok(checked)
    }
}

#[async_trait]
impl create::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        create::Input {
            author,
            name,
            price,
            image,
            location,
            description,
            amenities,
        }: create::Input,
    ) -> Result<create::Output, UsecaseError> {
        let name = required("Name", name)?;
        let price = validate_price(&price)?;

        let new_campground = Campground {
            id: CampgroundId::new(),
            name,
            price,
            image: image.trim().to_string(),
            location: location.trim().to_string(),
            description: description.trim().to_string(),
            author,
            created: Utc::now(),
            comments: vec![],
            amenities: self.checked_amenities(amenities).await?,
            rating: 0.0,
        };

        let can_insert = self
            .campground_repository
            .insert(new_campground.clone())
            .await
            .map_err(campground_err_fmt)?;
        if !can_insert {
            return Err(UsecaseError::Conflict(
                "Campground id already in use!".to_string(),
            ));
        }

        self.notifier.campground_created(&new_campground).await;

        tracing::trace!("output - {:?}", new_campground.id);
        Ok(create::Output {
            campground: new_campground,
        })
    }
}

#[async_trait]
impl get::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        get::Input { campground_id }: get::Input,
    ) -> Result<get::Output, UsecaseError> {
        self.campground_repository
            .find(campground_id)
            .await
            .map_err(campground_err_fmt)?
            .let_(|campground| get::Output { campground })
            .let_(Ok)
    }
}

#[async_trait]
impl gets::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        gets::Input {
            search,
            page,
            page_size,
        }: gets::Input,
    ) -> Result<gets::Output, UsecaseError> {
        let page = match page_size {
            None => None,
            Some(size) => Paging::new(page.unwrap_or(1), size)
                .ok_or_else(|| UsecaseError::Validation("Invalid page requested!".to_string()))?
                .let_(Some),
        };

        let query = CampgroundQuery {
            name: search.as_deref().and_then(search_regex),
            page,
            ..Default::default()
        };
        tracing::trace!("query - {:?}", query);

        let total = self
            .campground_repository
            .count(query.clone())
            .await
            .map_err(campground_err_fmt)?;
        let campgrounds = self
            .campground_repository
            .finds(query)
            .await
            .map_err(campground_err_fmt)?;

        Ok(gets::Output { campgrounds, total })
    }
}

#[async_trait]
impl edit::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        edit::Input {
            campground_id,
            requester,
            mutation,
        }: edit::Input,
    ) -> Result<edit::Output, UsecaseError> {
        self.authored(campground_id, requester, "edit").await?;

        let CampgroundEdit {
            name,
            price,
            image,
            location,
            description,
            amenities,
        } = mutation;

        let name = name.map(|n| required("Name", n)).transpose()?;
        let price = price.map(|p| validate_price(&p)).transpose()?;
        let amenities = match amenities {
            Some(ids) => Some(self.checked_amenities(ids).await?),
            None => None,
        };

        let mutation = CampgroundMutation {
            name,
            price,
            image: image.map(|s| s.trim().to_string()),
            location: location.map(|s| s.trim().to_string()),
            description: description.map(|s| s.trim().to_string()),
            amenities,
            rating: None,
        };

        self.campground_repository
            .update(campground_id, mutation)
            .await
            .map_err(campground_err_fmt)?
            .let_(|campground| edit::Output { campground })
            .let_(Ok)
    }
}

#[async_trait]
impl delete::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        delete::Input {
            campground_id,
            requester,
        }: delete::Input,
    ) -> Result<delete::Output, UsecaseError> {
        self.authored(campground_id, requester, "delete").await?;

        let campground = self
            .campground_repository
            .delete(campground_id)
            .await
            .map_err(campground_err_fmt)?;

        match self.comment_repository.deletes(campground_id).await {
            Ok(n) => tracing::debug!(count = n, "comments removed"),
            Err(e) => tracing::warn!("cannot remove comments: {}", e),
        }
        match self.rating_repository.deletes(campground_id).await {
            Ok(n) => tracing::debug!(count = n, "ratings removed"),
            Err(e) => tracing::warn!("cannot remove ratings: {}", e),
        }

        self.notifier
            .campground_removed(campground_id, &campground.comments)
            .await;

        if let Some(public_id) = images::public_id(&campground.image) {
            if let Err(e) = self.image_host.destroy(public_id).await {
                tracing::warn!(public_id, "cannot release image: {}", e);
            }
        }

        Ok(delete::Output { campground })
    }
}

#[async_trait]
impl amenities::Usecase for CampgroundInteractor {
    #[tracing::instrument(skip_all)]
    async fn handle(&self, _: amenities::Input) -> Result<amenities::Output, UsecaseError> {
        self.amenity_repository
            .finds()
            .await?
            .let_(|amenities| amenities::Output { amenities })
            .let_(Ok)
    }
}

/// Trimmed decimal string of a finite, non-negative amount.
fn validate_price(price: &str) -> Result<String, UsecaseError> {
    let price = price.trim();
    match price.parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => Ok(price.to_string()),
        _ => Err(UsecaseError::Validation(
            "Price must be a non-negative number!".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_must_be_non_negative_number() {
        assert_eq!(validate_price(" 12.50 ").unwrap(), "12.50");
        assert_eq!(validate_price("0").unwrap(), "0");
        assert!(validate_price("-1").is_err());
        assert!(validate_price("free").is_err());
        assert!(validate_price("inf").is_err());
    }
}
