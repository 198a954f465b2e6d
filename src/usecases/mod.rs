use thiserror::Error;

use crate::repositories::RepositoryError;

macro_rules! usecase {
    ($n:ident : { $( $i:tt )* } => { $( $o:tt )* }) => {
        pub mod $n {
            #[allow(unused_imports)]
            use crate::entities;

            #[::async_trait::async_trait]
            pub trait Usecase {
                async fn handle(
                    &self,
                    data: Input,
                ) -> ::core::result::Result<Output, $crate::usecases::UsecaseError>;
            }

            #[derive(Debug, Clone)]
            pub struct Input { $( $i )* }

            #[derive(Debug, Clone)]
            pub struct Output { $( $o )* }
        }
    };
}

pub mod campground;
pub mod comment;
pub mod notification;
pub mod rating;
pub mod user;

/// Failures of the primary operation. Secondary effects never surface here.
#[derive(Debug, Error)]
pub enum UsecaseError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}
