//! Service error taxonomy.
//!
//! Every operation exposed by the resolver and the booking coordinator fails
//! with one of three kinds. Transport layers map them to their own status
//! codes.

use crate::domain::{InvalidId, TimeError};
use crate::store::StoreError;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors returned across the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// Malformed caller input
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A referenced train, station or ticket does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Persistence failure or inconsistent stored data
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Shorthand for a missing entity.
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{entity} {id} not found"))
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::MissingReference { entity, id } => ServiceError::not_found(entity, id),
            StoreError::InvalidRoute { .. } => ServiceError::InvalidArgument(e.to_string()),
            StoreError::Unavailable(_) => ServiceError::Internal(e.to_string()),
        }
    }
}

impl From<TimeError> for ServiceError {
    fn from(e: TimeError) -> Self {
        ServiceError::InvalidArgument(e.to_string())
    }
}

impl From<InvalidId> for ServiceError {
    fn from(e: InvalidId) -> Self {
        ServiceError::InvalidArgument(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_calendar_date;

    #[test]
    fn store_errors_map_to_kinds() {
        let err: ServiceError = StoreError::missing("station", "X").into();
        assert_eq!(err, ServiceError::NotFound("station X not found".into()));

        let err: ServiceError = StoreError::Unavailable("down".into()).into();
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn parse_errors_are_invalid_argument() {
        let err: ServiceError = parse_calendar_date("x").unwrap_err().into();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));
    }

    #[test]
    fn error_display() {
        assert_eq!(
            ServiceError::not_found("ticket", "abc").to_string(),
            "not found: ticket abc not found"
        );
    }
}
