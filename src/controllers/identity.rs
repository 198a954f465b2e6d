use core::str::FromStr;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::ApiError;
use crate::entities::{Actor, UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USERNAME_HEADER: &str = "x-username";

/// The caller as verified by the upstream auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub username: String,
}

impl Identity {
    pub fn actor(&self) -> Actor {
        Actor {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where S: Send + Sync
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let id = header(USER_ID_HEADER)
            .and_then(|v| v.parse::<UserId>().ok())
            .ok_or(ApiError::Unauthenticated)?;
        let username = header(USERNAME_HEADER)
            .ok_or(ApiError::Unauthenticated)?
            .to_string();

        Ok(Identity { id, username })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    Campground,
    Comment,
    User,
    Notification,
    Amenity,
}

impl IdKind {
    fn message(self) -> &'static str {
        match self {
            IdKind::Campground => "Invalid Campground requested!",
            IdKind::Comment => "Invalid Comment requested!",
            IdKind::User => "Invalid User requested!",
            IdKind::Notification => "Invalid Notification requested!",
            IdKind::Amenity => "Invalid Amenity requested!",
        }
    }
}

/// Malformed ids are rejected before any lookup.
pub fn parse_id<I: FromStr>(kind: IdKind, raw: &str) -> Result<I, ApiError> {
    raw.parse::<I>().map_err(|_| {
        tracing::debug!(raw, ?kind, "malformed id");
        ApiError::InvalidId(kind.message().to_string())
    })
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;
    use crate::entities::CampgroundId;

    #[test]
    fn malformed_ids_carry_kind_message() {
        let e = parse_id::<CampgroundId>(IdKind::Campground, "5f2b9c0e").unwrap_err();
        assert_eq!(e.to_string(), "Invalid Campground requested!");

        let id = CampgroundId::new();
        assert_eq!(
            parse_id::<CampgroundId>(IdKind::Campground, &id.to_string()).unwrap(),
            id
        );
    }

    #[tokio::test]
    async fn identity_requires_both_headers() {
        let id = UserId::new();

        let (mut parts, _) = Request::builder()
            .header(USER_ID_HEADER, id.to_string())
            .header(USERNAME_HEADER, "alice")
            .body(())
            .unwrap()
            .into_parts();
        let identity = Identity::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.username, "alice");

        let (mut parts, _) = Request::builder()
            .header(USER_ID_HEADER, "not-a-uuid")
            .header(USERNAME_HEADER, "alice")
            .body(())
            .unwrap()
            .into_parts();
        assert!(matches!(
            Identity::from_request_parts(&mut parts, &()).await,
            Err(ApiError::Unauthenticated)
        ));

        let (mut parts, _) = Request::builder()
            .header(USER_ID_HEADER, id.to_string())
            .body(())
            .unwrap()
            .into_parts();
        assert!(Identity::from_request_parts(&mut parts, &()).await.is_err());
    }
}
