use anyhow::anyhow;
use chrono::{DateTime, Utc};
use mongodb::error::{ErrorKind, Result as MongoResult, WriteFailure};

use super::{RepositoryError, Result as RepoResult};
use crate::entities::Date;

pub fn convert_repo_err<T, E>(result: Result<T, E>) -> RepoResult<T>
where E: Sync + Send + ::std::error::Error + 'static {
    result.map_err(|e| RepositoryError::Internal(anyhow!(e)))
}

/// `Ok(false)` on a duplicate key error.
pub fn try_unique_check<T>(result: MongoResult<T>) -> RepoResult<bool> {
    let e = match result {
        Ok(_) => return Ok(true),
        Err(e) => e,
    };

    match e.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(w)) if w.code == 11000 => Ok(false),
        _ => Err(RepositoryError::Internal(anyhow!(e))),
    }
}

pub fn convert_404_or<T>(option: Option<T>) -> RepoResult<T> {
    match option {
        Some(t) => Ok(t),
        None => Err(RepositoryError::NotFound),
    }
}

/// For counts of single-document operations.
pub fn to_bool<N>(number: N) -> bool
where N: ::core::convert::TryInto<i8> + ::core::fmt::Debug + Clone {
    match match ::core::convert::TryInto::<i8>::try_into(number.clone()) {
        Ok(n) => n,
        Err(_) => unreachable!("expected 0 or 1, found: {:?}", number),
    } {
        0 => false,
        1 => true,
        n => unreachable!("expected 0 or 1, found: {}", n),
    }
}

pub fn parse_id<I>(raw: &str) -> RepoResult<I>
where
    I: ::core::str::FromStr,
    I::Err: ::std::error::Error + Sync + Send + 'static,
{
    raw.parse::<I>()
        .map_err(|e| RepositoryError::Internal(anyhow!("malformed stored id `{}`: {}", raw, e)))
}

pub fn parse_ids<I>(raw: Vec<String>) -> RepoResult<Vec<I>>
where
    I: ::core::str::FromStr,
    I::Err: ::std::error::Error + Sync + Send + 'static,
{
    raw.iter().map(|s| parse_id(s)).collect()
}

pub fn parse_date(raw: &str) -> RepoResult<Date> {
    DateTime::parse_from_rfc3339(raw)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Internal(anyhow!("malformed stored date `{}`: {}", raw, e)))
}

pub fn format_date(date: &Date) -> String { date.to_rfc3339() }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserId;

    #[test]
    fn dates_survive_storage_format() {
        let now = Utc::now();
        assert_eq!(parse_date(&format_date(&now)).unwrap(), now);
    }

    #[test]
    fn malformed_ids_are_internal_errors() {
        assert!(matches!(
            parse_id::<UserId>("not-a-uuid"),
            Err(RepositoryError::Internal(_))
        ));
    }
}
