use thiserror::Error;

use crate::actor_framework::FrameworkError;

/// Errors that can occur during user directory operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(String),
    #[error("User already exists: {0}")]
    AlreadyExists(String),
    #[error("User validation error: {0}")]
    ValidationError(String),
    #[error("Email atau password salah")]
    InvalidCredentials,
    #[error("Not allowed: {0}")]
    Forbidden(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for UserError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => UserError::NotFound(id),
            FrameworkError::Conflict(email) => UserError::AlreadyExists(email),
            FrameworkError::Rejected(reason) => UserError::ValidationError(reason),
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                UserError::ActorCommunicationError(err.to_string())
            }
        }
    }
}
