//! Schedule Store and Ticket Ledger.
//!
//! These traits are the persistence seam of the service. The resolver and
//! the booking coordinator are generic over them, so tests can substitute
//! mocks and deployments can substitute a database-backed implementation.
//! `MemoryStore` implements both, together with the `Directory`.

mod error;
mod memory;
mod seed;

use std::future::Future;

use chrono::NaiveDate;

use crate::domain::{
    CandidateRun, NewTicket, PageWindow, ScheduleStop, StationId, StopId, Ticket, TicketId,
    TicketUpdate, TrainId, UserId,
};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use seed::{SeedError, SeedFile, SeedSummary, apply_seed, load_seed};

/// Predicate shared by the candidate-run page and count queries.
///
/// A pair of stops matches when both belong to the same train, the first is
/// at the departure station and the second at the arrival station, the
/// arrival stop comes later in the route, and the departure stop's weekday
/// equals the requested weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunQuery {
    pub departure_station_id: StationId,
    pub arrival_station_id: StationId,
    /// 0 = Sunday.
    pub day_of_week: u32,
}

impl RunQuery {
    /// Whether a departure/arrival stop pair satisfies the query.
    pub fn matches(&self, departure: &ScheduleStop, arrival: &ScheduleStop) -> bool {
        departure.train_id == arrival.train_id
            && departure.station_id == self.departure_station_id
            && arrival.station_id == self.arrival_station_id
            && departure.sequence < arrival.sequence
            && departure.weekday() == self.day_of_week
            && departure.departure.is_some()
            && arrival.arrival.is_some()
    }
}

/// Read access to train schedules.
pub trait ScheduleStore: Send + Sync {
    /// A single stop by id.
    fn stop(&self, id: StopId)
    -> impl Future<Output = Result<Option<ScheduleStop>, StoreError>> + Send;

    /// A train's stops, ordered by sequence number ascending.
    fn stops_for_train(
        &self,
        train: &TrainId,
    ) -> impl Future<Output = Result<Vec<ScheduleStop>, StoreError>> + Send;

    /// Stops at a station, ordered by departure time ascending; stops with
    /// no departure time come last.
    fn stops_for_station(
        &self,
        station: &StationId,
    ) -> impl Future<Output = Result<Vec<ScheduleStop>, StoreError>> + Send;

    /// A train's stops at one station, ordered by sequence number.
    fn stops_for_train_at_station(
        &self,
        train: &TrainId,
        station: &StationId,
    ) -> impl Future<Output = Result<Vec<ScheduleStop>, StoreError>> + Send;

    /// One page of every stored stop, ordered by stop id.
    fn all_stops(
        &self,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<ScheduleStop>, StoreError>> + Send;

    /// Total number of stored stops.
    fn count_stops(&self) -> impl Future<Output = Result<u64, StoreError>> + Send;

    /// One page of matching runs, ordered by departure time of day.
    fn candidate_runs(
        &self,
        query: &RunQuery,
        window: PageWindow,
    ) -> impl Future<Output = Result<Vec<CandidateRun>, StoreError>> + Send;

    /// Total number of matching runs under the same predicate.
    fn count_candidate_runs(
        &self,
        query: &RunQuery,
    ) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Storage for booked tickets.
pub trait TicketLedger: Send + Sync {
    /// Record a ticket, assigning its id and booking timestamp.
    ///
    /// Fails with [`StoreError::MissingReference`] if the train or either
    /// station no longer exists at the moment of insertion.
    fn insert(&self, ticket: NewTicket) -> impl Future<Output = Result<Ticket, StoreError>> + Send;

    /// A ticket by id.
    fn ticket(&self, id: TicketId)
    -> impl Future<Output = Result<Option<Ticket>, StoreError>> + Send;

    /// Tickets on a train for one journey date, ordered by seat number.
    fn tickets_for_train_and_date(
        &self,
        train: &TrainId,
        date: NaiveDate,
    ) -> impl Future<Output = Result<Vec<Ticket>, StoreError>> + Send;

    /// A user's tickets, ordered by booking time.
    fn tickets_for_user(
        &self,
        user: &UserId,
    ) -> impl Future<Output = Result<Vec<Ticket>, StoreError>> + Send;

    /// Apply a partial update; `None` if the ticket does not exist.
    fn update(
        &self,
        id: TicketId,
        update: &TicketUpdate,
    ) -> impl Future<Output = Result<Option<Ticket>, StoreError>> + Send;

    /// Remove a ticket, returning it; `None` if it did not exist.
    fn delete(&self, id: TicketId)
    -> impl Future<Output = Result<Option<Ticket>, StoreError>> + Send;
}
