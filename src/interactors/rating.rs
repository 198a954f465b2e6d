use alloc::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;

use super::campground_err_fmt;
use crate::entities::{Rating, RatingId};
use crate::repositories::{CampgroundMutation, CampgroundRepository, RatingRepository};
use crate::usecases::rating::rate;
use crate::usecases::UsecaseError;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

pub struct RatingInteractor {
    pub campground_repository: Arc<dyn CampgroundRepository + Sync + Send>,
    pub rating_repository: Arc<dyn RatingRepository + Sync + Send>,
}

#[async_trait]
impl rate::Usecase for RatingInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(
        &self,
        rate::Input {
            campground_id,
            author,
            rating,
        }: rate::Input,
    ) -> Result<rate::Output, UsecaseError> {
        let value = parse_rating(&rating)?;

        self.campground_repository
            .find(campground_id)
            .await
            .map_err(campground_err_fmt)?;

        let now = Utc::now();
        let (rating, created) = self
            .rating_repository
            .upsert(Rating {
                id: RatingId::new(),
                author,
                campground_id,
                value,
                created: now,
                updated: now,
            })
            .await?;

        let values = self
            .rating_repository
            .finds(campground_id)
            .await?
            .into_iter()
            .map(|r| r.value)
            .collect::<Vec<_>>();
        let average = aggregate(&values);

        self.campground_repository
            .update(
                campground_id,
                CampgroundMutation {
                    rating: Some(average),
                    ..Default::default()
                },
            )
            .await
            .map_err(campground_err_fmt)?;

        let displayed = display(average);
        tracing::trace!("output - created: {}, displayed: {}", created, displayed);
        Ok(rate::Output {
            rating,
            created,
            displayed,
        })
    }
}

/// Accepts a JSON number or a numeric string within `MIN_RATING..=MAX_RATING`.
pub fn parse_rating(raw: &Value) -> Result<f64, UsecaseError> {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() && (MIN_RATING..=MAX_RATING).contains(&v) => Ok(v),
        Some(v) if v.is_finite() => Err(UsecaseError::Validation(format!(
            "Rating must be between {} and {}!",
            MIN_RATING, MAX_RATING
        ))),
        _ => Err(UsecaseError::Validation(
            "Rating must be a number!".to_string(),
        )),
    }
}

/// Mean rounded to the nearest half; `0.0` without ratings.
pub fn aggregate(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 2.0).round() / 2.0
}

pub fn display(rating: f64) -> String { format!("{:.1}", rating) }

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn aggregate_rounds_to_half() {
        assert_eq!(display(aggregate(&[3.0, 4.0, 5.0])), "4.0");
        assert_eq!(display(aggregate(&[3.0, 4.0])), "3.5");
        assert_eq!(aggregate(&[4.0, 4.0, 5.0]), 4.5);
        assert_eq!(aggregate(&[1.0, 1.0, 2.0]), 1.5);
        assert_eq!(aggregate(&[]), 0.0);
    }

    #[test]
    fn rating_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_rating(&json!(4)).unwrap(), 4.0);
        assert_eq!(parse_rating(&json!("2.5")).unwrap(), 2.5);
        assert_eq!(parse_rating(&json!(" 5 ")).unwrap(), 5.0);
    }

    #[test]
    fn rating_rejects_out_of_range_and_non_numeric() {
        let rejected = [
            json!(6),
            json!(0),
            json!(-1),
            json!("abc"),
            json!("NaN"),
            json!(null),
            json!([3]),
        ];
        for raw in rejected {
            assert!(
                matches!(parse_rating(&raw), Err(UsecaseError::Validation(_))),
                "{} accepted",
                raw
            );
        }
    }
}
