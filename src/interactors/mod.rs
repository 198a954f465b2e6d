pub mod campground;
pub mod comment;
pub mod notification;
pub mod rating;
pub mod user;

use crate::repositories::RepositoryError;
use crate::usecases::UsecaseError;

fn user_err_fmt(e: RepositoryError) -> UsecaseError {
    match e {
        RepositoryError::NotFound => UsecaseError::NotFound("User not found!".to_string()),
        e => e.into(),
    }
}

fn campground_err_fmt(e: RepositoryError) -> UsecaseError {
    match e {
        RepositoryError::NotFound => UsecaseError::NotFound("Campground not found!".to_string()),
        e => e.into(),
    }
}

fn comment_err_fmt(e: RepositoryError) -> UsecaseError {
    match e {
        RepositoryError::NotFound => UsecaseError::NotFound("Comment not found!".to_string()),
        e => e.into(),
    }
}

fn notification_err_fmt(e: RepositoryError) -> UsecaseError {
    match e {
        RepositoryError::NotFound => {
            UsecaseError::NotFound("Notification not found!".to_string())
        },
        e => e.into(),
    }
}

/// Trimmed, or a validation error naming `field` when blank.
fn required(field: &str, value: String) -> Result<String, UsecaseError> {
    let value = value.trim();
    match value.is_empty() {
        true => Err(UsecaseError::Validation(format!("{} is required!", field))),
        false => Ok(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("Text", "  hi ".to_string()).unwrap(), "hi");
        assert!(matches!(
            required("Text", " \n".to_string()),
            Err(UsecaseError::Validation(m)) if m == "Text is required!"
        ));
    }

    #[test]
    fn not_found_is_named_per_aggregate() {
        assert!(matches!(
            campground_err_fmt(RepositoryError::NotFound),
            UsecaseError::NotFound(m) if m == "Campground not found!"
        ));
        assert!(matches!(
            user_err_fmt(RepositoryError::NoUnique { matched: 2 }),
            UsecaseError::Repository(_)
        ));
    }
}
