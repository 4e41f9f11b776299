//! Journey Resolver.
//!
//! Answers "which trains run from A to B on this date?". Timetables are
//! stored as a weekly pattern, so the work splits in two:
//!
//! 1. The schedule store matches stop pairs by weekday, over integers.
//! 2. The resolver turns each match back into concrete calendar dates.
//!
//! The resolver also serves plain timetable lookups by train, station and
//! stop.

mod config;


use chrono::{Duration, NaiveDate};
use futures::future::try_join_all;
use tracing::debug;

use crate::directory::Directory;
use crate::domain::{
    CandidateRun, Journey, Page, PageRequest, Pagination, ScheduleStop, StationId, StopId,
    TrainId, day_of_week, parse_calendar_date,
};
use crate::error::{ServiceError, ServiceResult};
use crate::store::{RunQuery, ScheduleStore};

pub use config::{PAGE_SIZE_LIMIT, SearchConfig};

/// Request for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyQuery {
    pub departure_station_id: StationId,
    pub arrival_station_id: StationId,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub travel_date: String,
    /// 1-based; clamped to at least 1.
    pub page: Option<i64>,
    /// Clamped to `1..=max_page_size`.
    pub page_size: Option<i64>,
}

/// Station names shared by every journey on a page.
struct Endpoints {
    departure_name: String,
    arrival_name: String,
}

/// Journey resolver over a directory and a schedule store.
pub struct JourneyResolver<D, S> {
    directory: D,
    schedules: S,
    config: SearchConfig,
}

impl<D: Directory, S: ScheduleStore> JourneyResolver<D, S> {
    /// Create a new resolver.
    pub fn new(directory: D, schedules: S, config: SearchConfig) -> Self {
        Self {
            directory,
            schedules,
            config,
        }
    }

    /// Find the trains running between two stations on a date.
    ///
    /// Either the whole page is assembled or the call fails.
    pub async fn find_journeys(&self, query: &JourneyQuery) -> ServiceResult<Page<Journey>> {
        let (departure_exists, arrival_exists) = tokio::try_join!(
            self.directory.station_exists(&query.departure_station_id),
            self.directory.station_exists(&query.arrival_station_id),
        )?;
        if !departure_exists {
            debug!(station = %query.departure_station_id, "departure station not found");
            return Err(ServiceError::not_found("station", &query.departure_station_id));
        }
        if !arrival_exists {
            debug!(station = %query.arrival_station_id, "arrival station not found");
            return Err(ServiceError::not_found("station", &query.arrival_station_id));
        }

        let travel_date = parse_calendar_date(&query.travel_date)?;
        let weekday = day_of_week(travel_date);

        let request = PageRequest::clamped(
            query.page.unwrap_or(1),
            query
                .page_size
                .unwrap_or_else(|| i64::from(self.config.default_page_size)),
            self.config.max_page_size,
        );

        let run_query = RunQuery {
            departure_station_id: query.departure_station_id.clone(),
            arrival_station_id: query.arrival_station_id.clone(),
            day_of_week: weekday,
        };
        let (runs, total) = tokio::try_join!(
            self.schedules.candidate_runs(&run_query, request.window()),
            self.schedules.count_candidate_runs(&run_query),
        )?;

        let items = if runs.is_empty() {
            Vec::new()
        } else {
            self.assemble(query, travel_date, weekday, runs).await?
        };

        debug!(
            from = %query.departure_station_id,
            to = %query.arrival_station_id,
            %travel_date,
            weekday,
            page = request.page(),
            page_size = request.page_size(),
            returned = items.len(),
            total,
            "journey search complete"
        );

        Ok(Page {
            items,
            pagination: Pagination::new(request, total),
        })
    }

    /// Attach names and calendar dates to one page of runs.
    async fn assemble(
        &self,
        query: &JourneyQuery,
        travel_date: NaiveDate,
        weekday: u32,
        runs: Vec<CandidateRun>,
    ) -> ServiceResult<Vec<Journey>> {
        let (departure_name, arrival_name) = tokio::try_join!(
            self.directory.station_name(&query.departure_station_id),
            self.directory.station_name(&query.arrival_station_id),
        )?;
        let endpoints = Endpoints {
            departure_name: departure_name
                .ok_or_else(|| ServiceError::not_found("station", &query.departure_station_id))?,
            arrival_name: arrival_name
                .ok_or_else(|| ServiceError::not_found("station", &query.arrival_station_id))?,
        };

        let train_names =
            try_join_all(runs.iter().map(|run| self.directory.train_name(&run.train_id))).await?;

        runs.into_iter()
            .zip(train_names)
            .map(|(run, train_name)| {
                let train_name =
                    train_name.ok_or_else(|| ServiceError::not_found("train", &run.train_id))?;
                resolve_run(run, train_name, &endpoints, travel_date, weekday)
            })
            .collect()
    }

    /// A train's full timetable, in route order.
    pub async fn train_timetable(&self, train: &TrainId) -> ServiceResult<Vec<ScheduleStop>> {
        if !self.directory.train_exists(train).await? {
            return Err(ServiceError::not_found("train", train));
        }
        let stops = self.schedules.stops_for_train(train).await?;
        debug!(train = %train, stops = stops.len(), "train timetable");
        Ok(stops)
    }

    /// Every stop at a station, by departure time.
    pub async fn station_timetable(&self, station: &StationId) -> ServiceResult<Vec<ScheduleStop>> {
        if !self.directory.station_exists(station).await? {
            return Err(ServiceError::not_found("station", station));
        }
        let stops = self.schedules.stops_for_station(station).await?;
        debug!(station = %station, stops = stops.len(), "station timetable");
        Ok(stops)
    }

    /// The calls a train makes at one station, in route order.
    pub async fn train_stops_at_station(
        &self,
        train: &TrainId,
        station: &StationId,
    ) -> ServiceResult<Vec<ScheduleStop>> {
        let (train_exists, station_exists) = tokio::try_join!(
            self.directory.train_exists(train),
            self.directory.station_exists(station),
        )?;
        if !train_exists {
            return Err(ServiceError::not_found("train", train));
        }
        if !station_exists {
            return Err(ServiceError::not_found("station", station));
        }
        Ok(self
            .schedules
            .stops_for_train_at_station(train, station)
            .await?)
    }

    /// Every stored stop, one page at a time.
    ///
    /// Paging values are clamped the same way as for journey search.
    pub async fn schedules(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> ServiceResult<Page<ScheduleStop>> {
        let request = PageRequest::clamped(
            page.unwrap_or(1),
            page_size.unwrap_or_else(|| i64::from(self.config.default_page_size)),
            self.config.max_page_size,
        );
        let (items, total) = tokio::try_join!(
            self.schedules.all_stops(request.window()),
            self.schedules.count_stops(),
        )?;
        debug!(
            page = request.page(),
            returned = items.len(),
            total,
            "schedule listing"
        );
        Ok(Page {
            items,
            pagination: Pagination::new(request, total),
        })
    }

    /// A single schedule stop.
    pub async fn stop(&self, id: StopId) -> ServiceResult<ScheduleStop> {
        self.schedules
            .stop(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("schedule stop", id))
    }
}

/// Place a weekly run onto the calendar.
///
/// The departure date is the travel date shifted by the departure stop's
/// day offset relative to the requested weekday. A matched run only shifts
/// for offsets of 7 or more, by whole weeks. The arrival date adds the
/// day-offset span of the run.
fn resolve_run(
    run: CandidateRun,
    train_name: String,
    endpoints: &Endpoints,
    travel_date: NaiveDate,
    weekday: u32,
) -> ServiceResult<Journey> {
    let departure_time = run.departure.departure.ok_or_else(|| {
        ServiceError::Internal(format!("stop {} has no departure time", run.departure.id))
    })?;
    let arrival_time = run.arrival.arrival.ok_or_else(|| {
        ServiceError::Internal(format!("stop {} has no arrival time", run.arrival.id))
    })?;

    let shift = i64::from(run.departure.day_offset) - i64::from(weekday);
    let span = i64::from(run.arrival.day_offset) - i64::from(run.departure.day_offset);

    let departure_date = shift_date(travel_date, shift)?;
    let arrival_date = shift_date(departure_date, span)?;

    Ok(Journey {
        train_id: run.train_id,
        train_name,
        departure_station_id: run.departure.station_id,
        departure_station_name: endpoints.departure_name.clone(),
        arrival_station_id: run.arrival.station_id,
        arrival_station_name: endpoints.arrival_name.clone(),
        departure_date,
        departure_time,
        arrival_date,
        arrival_time,
        travel_duration: run.travel_duration,
    })
}

fn shift_date(date: NaiveDate, days: i64) -> ServiceResult<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
        .ok_or_else(|| ServiceError::Internal(format!("date {date} out of range")))
}
