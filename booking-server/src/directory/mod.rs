//! Station & Train Directory.
//!
//! The directory is the authority on which stations, trains and users exist
//! and what they are called. The journey resolver and the booking
//! coordinator only read from it.

mod cache;

use std::future::Future;

use crate::domain::{StationId, TrainId, UserId};
use crate::store::StoreError;

pub use cache::{CacheConfig, CachedDirectory};

/// Read access to station, train and user identities.
///
/// Implementations must be shareable across request tasks.
pub trait Directory: Send + Sync {
    /// Whether a station with this id exists.
    fn station_exists(&self, id: &StationId)
    -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Display name of a station, `None` if it does not exist.
    fn station_name(
        &self,
        id: &StationId,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Whether a train with this id exists.
    fn train_exists(&self, id: &TrainId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Display name of a train, `None` if it does not exist.
    fn train_name(
        &self,
        id: &TrainId,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Display name of a booking user, `None` if unknown.
    fn user_name(
        &self,
        id: &UserId,
    ) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;
}
