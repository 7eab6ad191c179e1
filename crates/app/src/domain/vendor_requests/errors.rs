//! Vendor requests service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

/// Failures raised by a [`crate::domain::vendor_requests::store::RequestStore`].
#[derive(Debug, Error)]
pub enum RequestStoreError {
    #[error("a pending request already exists")]
    DuplicatePending,

    #[error("related resource not found")]
    InvalidReference,

    #[error("request storage unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<Error> for RequestStoreError {
    fn from(error: Error) -> Self {
        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::DuplicatePending,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(_) | None => Self::Unavailable(Box::new(error)),
        }
    }
}

#[derive(Debug, Error)]
pub enum VendorRequestsError {
    #[error("vendor request not found")]
    NotFound,

    #[error("vendor request already processed")]
    AlreadyProcessed,

    #[error("a pending vendor request already exists for this user")]
    AlreadyPending,

    #[error("requesting user not found")]
    UserNotFound,

    #[error("request storage failed")]
    Store(#[source] RequestStoreError),
}

impl From<RequestStoreError> for VendorRequestsError {
    fn from(error: RequestStoreError) -> Self {
        match error {
            RequestStoreError::DuplicatePending => Self::AlreadyPending,
            RequestStoreError::InvalidReference => Self::UserNotFound,
            error => Self::Store(error),
        }
    }
}
