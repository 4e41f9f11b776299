//! Store error types.

use crate::domain::{RouteError, TrainId};

/// Errors from schedule, ticket and directory storage.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A referenced entity was absent when the write was applied
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: &'static str, id: String },

    /// A submitted route broke a timetable rule
    #[error("invalid route for train {train}: {source}")]
    InvalidRoute {
        train: TrainId,
        #[source]
        source: RouteError,
    },

    /// Backing store failed or could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn missing(entity: &'static str, id: impl ToString) -> Self {
        StoreError::MissingReference {
            entity,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::missing("train", "T9");
        assert_eq!(err.to_string(), "train T9 does not exist");

        let err = StoreError::InvalidRoute {
            train: TrainId::parse("T1").unwrap(),
            source: RouteError::Empty,
        };
        assert_eq!(
            err.to_string(),
            "invalid route for train T1: route must have at least one stop"
        );

        let err = StoreError::Unavailable("connection reset".into());
        assert_eq!(err.to_string(), "store unavailable: connection reset");
    }
}
