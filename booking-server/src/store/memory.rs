//! In-memory backend.
//!
//! Holds the directory, the weekly schedules and the ticket ledger behind a
//! single lock. Useful for development, tests, and seeding from a JSON file.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use crate::directory::Directory;
use crate::domain::{
    CandidateRun, NewTicket, PageWindow, Route, ScheduleStop, StationId, StopId, Ticket,
    TicketId, TicketUpdate, TrainId, UserId,
};

use super::error::StoreError;
use super::{RunQuery, ScheduleStore, TicketLedger};

/// Shared in-memory store.
///
/// Cloning is cheap and every clone sees the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    stations: HashMap<StationId, String>,
    trains: HashMap<TrainId, String>,
    users: HashMap<UserId, String>,
    stops: BTreeMap<StopId, ScheduleStop>,
    next_stop_id: u64,
    /// Insertion order is preserved; it breaks booking-time ties.
    tickets: Vec<Ticket>,
}

impl Tables {
    /// All stop pairs matching the query, in page order.
    ///
    /// Both the page and the count query go through here, so they can never
    /// disagree about which runs exist.
    fn matching_runs(&self, query: &RunQuery) -> Vec<CandidateRun> {
        let arrivals: Vec<&ScheduleStop> = self
            .stops
            .values()
            .filter(|s| s.station_id == query.arrival_station_id)
            .collect();

        let mut runs: Vec<CandidateRun> = self
            .stops
            .values()
            .filter(|s| s.station_id == query.departure_station_id)
            .flat_map(|dep| {
                arrivals
                    .iter()
                    .filter(move |arr| query.matches(dep, arr))
                    .filter_map(move |arr| CandidateRun::new(dep.clone(), (*arr).clone()))
            })
            .collect();

        runs.sort_by(|a, b| {
            a.departure
                .departure
                .cmp(&b.departure.departure)
                .then_with(|| a.train_id.cmp(&b.train_id))
                .then_with(|| a.departure.sequence.cmp(&b.departure.sequence))
                .then_with(|| a.arrival.sequence.cmp(&b.arrival.sequence))
        });
        runs
    }

    fn check_reference<K, V>(map: &HashMap<K, V>, key: &K, entity: &'static str) -> Result<(), StoreError>
    where
        K: std::hash::Hash + Eq + std::fmt::Display,
    {
        if map.contains_key(key) {
            Ok(())
        } else {
            Err(StoreError::missing(entity, key))
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or rename a station.
    pub async fn add_station(&self, id: StationId, name: impl Into<String>) {
        self.tables.write().await.stations.insert(id, name.into());
    }

    /// Add or rename a train.
    pub async fn add_train(&self, id: TrainId, name: impl Into<String>) {
        self.tables.write().await.trains.insert(id, name.into());
    }

    /// Add or rename a booking user.
    pub async fn add_user(&self, id: UserId, name: impl Into<String>) {
        self.tables.write().await.users.insert(id, name.into());
    }

    /// Remove a station together with every stop that calls there.
    ///
    /// Returns false if the station did not exist. Tickets are kept.
    pub async fn remove_station(&self, id: &StationId) -> bool {
        let mut tables = self.tables.write().await;
        let existed = tables.stations.remove(id).is_some();
        tables.stops.retain(|_, stop| &stop.station_id != id);
        existed
    }

    /// Remove a train together with its route.
    ///
    /// Returns false if the train did not exist. Tickets are kept.
    pub async fn remove_train(&self, id: &TrainId) -> bool {
        let mut tables = self.tables.write().await;
        let existed = tables.trains.remove(id).is_some();
        tables.stops.retain(|_, stop| &stop.train_id != id);
        existed
    }

    /// Register a train's route, replacing any previous one.
    ///
    /// The train and every station on the route must already exist.
    pub async fn insert_route(&self, route: Route) -> Result<Vec<ScheduleStop>, StoreError> {
        let mut tables = self.tables.write().await;

        Tables::check_reference(&tables.trains, route.train_id(), "train")?;
        for stop in route.stops() {
            Tables::check_reference(&tables.stations, &stop.station_id, "station")?;
        }

        let train_id = route.train_id().clone();
        tables.stops.retain(|_, stop| stop.train_id != train_id);

        let mut next = tables.next_stop_id;
        let stops = route.into_stops(|| {
            next += 1;
            StopId(next)
        });
        tables.next_stop_id = next;

        for stop in &stops {
            tables.stops.insert(stop.id, stop.clone());
        }
        Ok(stops)
    }

    /// Number of stored tickets.
    pub async fn ticket_count(&self) -> usize {
        self.tables.read().await.tickets.len()
    }
}

impl Directory for MemoryStore {
    async fn station_exists(&self, id: &StationId) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.stations.contains_key(id))
    }

    async fn station_name(&self, id: &StationId) -> Result<Option<String>, StoreError> {
        Ok(self.tables.read().await.stations.get(id).cloned())
    }

    async fn train_exists(&self, id: &TrainId) -> Result<bool, StoreError> {
        Ok(self.tables.read().await.trains.contains_key(id))
    }

    async fn train_name(&self, id: &TrainId) -> Result<Option<String>, StoreError> {
        Ok(self.tables.read().await.trains.get(id).cloned())
    }

    async fn user_name(&self, id: &UserId) -> Result<Option<String>, StoreError> {
        Ok(self.tables.read().await.users.get(id).cloned())
    }
}

impl ScheduleStore for MemoryStore {
    async fn stop(&self, id: StopId) -> Result<Option<ScheduleStop>, StoreError> {
        Ok(self.tables.read().await.stops.get(&id).cloned())
    }

    async fn stops_for_train(&self, train: &TrainId) -> Result<Vec<ScheduleStop>, StoreError> {
        let tables = self.tables.read().await;
        let mut stops: Vec<ScheduleStop> = tables
            .stops
            .values()
            .filter(|s| &s.train_id == train)
            .cloned()
            .collect();
        stops.sort_by_key(|s| s.sequence);
        Ok(stops)
    }

    async fn stops_for_station(
        &self,
        station: &StationId,
    ) -> Result<Vec<ScheduleStop>, StoreError> {
        let tables = self.tables.read().await;
        let mut stops: Vec<ScheduleStop> = tables
            .stops
            .values()
            .filter(|s| &s.station_id == station)
            .cloned()
            .collect();
        // Terminating stops have no departure and sort after everything else.
        stops.sort_by(|a, b| {
            (a.departure.is_none(), a.departure, &a.train_id, a.sequence).cmp(&(
                b.departure.is_none(),
                b.departure,
                &b.train_id,
                b.sequence,
            ))
        });
        Ok(stops)
    }

    async fn stops_for_train_at_station(
        &self,
        train: &TrainId,
        station: &StationId,
    ) -> Result<Vec<ScheduleStop>, StoreError> {
        let tables = self.tables.read().await;
        let mut stops: Vec<ScheduleStop> = tables
            .stops
            .values()
            .filter(|s| &s.train_id == train && &s.station_id == station)
            .cloned()
            .collect();
        stops.sort_by_key(|s| s.sequence);
        Ok(stops)
    }

    async fn all_stops(&self, window: PageWindow) -> Result<Vec<ScheduleStop>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .stops
            .values()
            .skip(window.offset)
            .take(window.limit)
            .cloned()
            .collect())
    }

    async fn count_stops(&self) -> Result<u64, StoreError> {
        Ok(self.tables.read().await.stops.len() as u64)
    }

    async fn candidate_runs(
        &self,
        query: &RunQuery,
        window: PageWindow,
    ) -> Result<Vec<CandidateRun>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .matching_runs(query)
            .into_iter()
            .skip(window.offset)
            .take(window.limit)
            .collect())
    }

    async fn count_candidate_runs(&self, query: &RunQuery) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.matching_runs(query).len() as u64)
    }
}

impl TicketLedger for MemoryStore {
    async fn insert(&self, ticket: NewTicket) -> Result<Ticket, StoreError> {
        let mut tables = self.tables.write().await;

        // Checked under the write lock, so a concurrent removal cannot slip in
        // between this check and the insert.
        Tables::check_reference(&tables.trains, &ticket.train_id, "train")?;
        Tables::check_reference(&tables.stations, &ticket.departure_station_id, "station")?;
        Tables::check_reference(&tables.stations, &ticket.destination_station_id, "station")?;

        let ticket = ticket.into_ticket(TicketId::new(), Utc::now());
        tables.tickets.push(ticket.clone());
        Ok(ticket)
    }

    async fn ticket(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tickets.iter().find(|t| t.id == id).cloned())
    }

    async fn tickets_for_train_and_date(
        &self,
        train: &TrainId,
        date: NaiveDate,
    ) -> Result<Vec<Ticket>, StoreError> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .iter()
            .filter(|t| &t.train_id == train && t.journey_date == date)
            .cloned()
            .collect();
        tickets.sort_by(|a, b| a.seat_no.cmp(&b.seat_no));
        Ok(tickets)
    }

    async fn tickets_for_user(&self, user: &UserId) -> Result<Vec<Ticket>, StoreError> {
        let tables = self.tables.read().await;
        let mut tickets: Vec<Ticket> = tables
            .tickets
            .iter()
            .filter(|t| &t.user_id == user)
            .cloned()
            .collect();
        tickets.sort_by_key(|t| t.booked_at);
        Ok(tickets)
    }

    async fn update(
        &self,
        id: TicketId,
        update: &TicketUpdate,
    ) -> Result<Option<Ticket>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.tickets.iter_mut().find(|t| t.id == id).map(|t| {
            update.apply(t);
            t.clone()
        }))
    }

    async fn delete(&self, id: TicketId) -> Result<Option<Ticket>, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(idx) = tables.tickets.iter().position(|t| t.id == id) else {
            return Ok(None);
        };
        Ok(Some(tables.tickets.remove(idx)))
    }
}
