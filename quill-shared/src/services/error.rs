/// Service-level error type
///
/// Each variant corresponds to one class of failure a client can observe.
/// Store, hashing and token errors are folded into these variants here so
/// services can use `?` throughout.

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::store::StoreError;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Missing, blank or malformed input
    #[error("{0}")]
    Validation(String),

    /// The requested record does not exist or is not visible
    #[error("{0}")]
    NotFound(String),

    /// Bad credentials or caller not permitted
    #[error("{0}")]
    Auth(String),

    /// A uniqueness rule rejected the write
    #[error("{0}")]
    Conflict(String),

    /// Storage or runtime failure; detail is for logs only
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { constraint } => {
                ServiceError::Conflict(format!("Duplicate value violates {}", constraint))
            }
            StoreError::Database(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<JwtError> for ServiceError {
    fn from(err: JwtError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ServiceError {
    fn from(err: tokio::task::JoinError) -> Self {
        ServiceError::Internal(format!("Blocking task failed: {}", err))
    }
}
