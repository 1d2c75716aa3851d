//! Core use-case services.
//!
//! # Responsibility
//! - Run every use-case as one load-mutate-save cycle over a `RecordStore`.
//! - Translate storage failures into the stable service error taxonomy.
//!
//! # Invariants
//! - Services never bypass the store's write lock for mutations.
//! - Every error carries a stable `ErrorKind` and a human-readable message.

use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod auth_service;
pub mod college_service;
pub mod password;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Stable error classification surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateUser,
    InvalidCredentials,
    InvalidSession,
    NotFound,
    StorageFailure,
    Internal,
}

impl ErrorKind {
    /// Stable machine-readable code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::DuplicateUser => "duplicate_user",
            Self::InvalidCredentials => "invalid_credentials",
            Self::InvalidSession => "invalid_session",
            Self::NotFound => "not_found",
            Self::StorageFailure => "storage_failure",
            Self::Internal => "internal",
        }
    }

    /// HTTP-equivalent status class.
    pub fn status_code(self) -> u16 {
        match self {
            Self::InvalidInput | Self::DuplicateUser => 400,
            Self::InvalidCredentials | Self::InvalidSession => 401,
            Self::NotFound => 404,
            Self::StorageFailure | Self::Internal => 500,
        }
    }
}

/// Service error for authentication and college directory use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// A required field is missing or blank.
    InvalidInput(String),
    /// A student with this email is already registered.
    DuplicateUser,
    /// Unknown email, wrong password, or wrong administrator pair.
    InvalidCredentials,
    /// Token is unknown, revoked, expired, or its student is gone.
    InvalidSession,
    /// Referenced college or nested index does not exist.
    NotFound(String),
    /// Persistence-layer failure.
    Storage(StoreError),
    /// Server-side fault outside storage, e.g. the password hasher failing.
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::DuplicateUser => ErrorKind::DuplicateUser,
            Self::InvalidCredentials => ErrorKind::InvalidCredentials,
            Self::InvalidSession => ErrorKind::InvalidSession,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Storage(_) => ErrorKind::StorageFailure,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub(crate) fn missing(fields: &str) -> Self {
        Self::InvalidInput(format!("missing fields: {fields}"))
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput(message) => write!(f, "{message}"),
            Self::DuplicateUser => write!(f, "user already exists"),
            Self::InvalidCredentials => write!(f, "invalid login"),
            Self::InvalidSession => write!(f, "invalid session"),
            Self::NotFound(what) => write!(f, "{what} not found"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Internal(message) => write!(f, "internal error: {message}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

/// Returns the trimmed value when present and non-blank.
pub(crate) fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{required, ErrorKind, ServiceError};

    #[test]
    fn error_kinds_map_to_status_classes() {
        assert_eq!(ServiceError::missing("name").status_code(), 400);
        assert_eq!(ServiceError::DuplicateUser.status_code(), 400);
        assert_eq!(ServiceError::InvalidCredentials.status_code(), 401);
        assert_eq!(ServiceError::InvalidSession.status_code(), 401);
        assert_eq!(
            ServiceError::NotFound("college".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(ErrorKind::StorageFailure.status_code(), 500);
        assert_eq!(ErrorKind::DuplicateUser.as_str(), "duplicate_user");
    }

    #[test]
    fn hashing_faults_are_server_side() {
        let err = ServiceError::Internal("password could not be hashed".to_string());
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.status_code(), 500);
        assert_eq!(err.kind().as_str(), "internal");
    }

    #[test]
    fn required_treats_blank_as_missing() {
        assert_eq!(required(Some("  ann ")), Some("ann"));
        assert_eq!(required(Some("   ")), None);
        assert_eq!(required(None), None);
    }
}
