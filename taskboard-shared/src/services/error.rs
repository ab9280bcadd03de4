/// Errors raised by the services layer
///
/// The API maps each variant onto an HTTP status; see the API crate's
/// `error` module.

use crate::auth::password::PasswordError;
use crate::patch::NullNotAllowed;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Target or referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Caller may not act on this record
    #[error("{0}")]
    AccessDenied(String),

    /// Deletion blocked because tasks still reference the entity
    #[error("{0}")]
    AssociatedEntityExists(String),

    /// Input rejected by a business rule
    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Login failed; deliberately does not say which part was wrong
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{entity} with id {id} not found"))
    }
}

impl From<NullNotAllowed> for ServiceError {
    fn from(err: NullNotAllowed) -> Self {
        ServiceError::Validation {
            field: err.field,
            message: "must not be null".to_string(),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("Label", 7);
        assert_eq!(err.to_string(), "Label with id 7 not found");
    }

    #[test]
    fn test_null_not_allowed_becomes_validation() {
        let err = ServiceError::from(NullNotAllowed { field: "title" });
        match err {
            ServiceError::Validation { field, message } => {
                assert_eq!(field, "title");
                assert_eq!(message, "must not be null");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
