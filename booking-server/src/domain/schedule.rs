//! Weekly timetable types.
//!
//! A train's schedule is an ordered list of stops. Each stop carries
//! time-of-day values plus a day-offset from the train's nominal weekly start,
//! which is how a route that departs on one calendar day and arrives on a
//! later one is expressed.

use chrono::{Duration, NaiveTime};
use serde::Serialize;

use super::ids::{StationId, StopId, TrainId};
use super::time::{DAYS_PER_WEEK, elapsed_since_start};

/// A train's scheduled presence at one station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleStop {
    /// Store-assigned identity.
    pub id: StopId,
    pub train_id: TrainId,
    pub station_id: StationId,
    /// Position along the route; strictly increasing per train.
    pub sequence: u32,
    /// Absent only on the route's first stop.
    pub arrival: Option<NaiveTime>,
    /// Absent only on the route's last stop.
    pub departure: Option<NaiveTime>,
    /// Days after the train's nominal weekly start.
    pub day_offset: u32,
    pub is_start: bool,
    pub is_end: bool,
}

impl ScheduleStop {
    /// Weekday this stop falls on, 0 = Sunday.
    pub fn weekday(&self) -> u32 {
        self.day_offset % DAYS_PER_WEEK
    }

    /// Arrival as elapsed time since the train's nominal start.
    pub fn elapsed_arrival(&self) -> Option<Duration> {
        self.arrival
            .map(|time| elapsed_since_start(self.day_offset, time))
    }

    /// Departure as elapsed time since the train's nominal start.
    pub fn elapsed_departure(&self) -> Option<Duration> {
        self.departure
            .map(|time| elapsed_since_start(self.day_offset, time))
    }
}

/// One stop of a route as submitted for registration.
///
/// Identity and the start/end flags are assigned when the route is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopSpec {
    pub station_id: StationId,
    pub sequence: u32,
    pub arrival: Option<NaiveTime>,
    pub departure: Option<NaiveTime>,
    pub day_offset: u32,
}

impl StopSpec {
    fn elapsed_arrival(&self) -> Option<Duration> {
        self.arrival
            .map(|time| elapsed_since_start(self.day_offset, time))
    }

    fn elapsed_departure(&self) -> Option<Duration> {
        self.departure
            .map(|time| elapsed_since_start(self.day_offset, time))
    }
}

/// A schedule rule violated by a submitted route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// Route has no stops
    #[error("route must have at least one stop")]
    Empty,

    /// Sequence numbers must strictly increase along the route
    #[error("stop sequence {sequence} does not follow the previous stop")]
    SequenceNotIncreasing { sequence: u32 },

    /// Only the first stop may omit its arrival time
    #[error("stop {sequence} has no arrival time but is not the first stop")]
    MissingArrival { sequence: u32 },

    /// Only the last stop may omit its departure time
    #[error("stop {sequence} has no departure time but is not the last stop")]
    MissingDeparture { sequence: u32 },

    /// A stop's departure precedes its own arrival
    #[error("stop {sequence} departs before it arrives")]
    DepartsBeforeArrival { sequence: u32 },

    /// Day-offsets must not decrease along the route
    #[error("stop {sequence} has a smaller day offset than the previous stop")]
    DayOffsetDecreasing { sequence: u32 },

    /// A stop is reached no later than the previous stop departs
    #[error("stop {sequence} is not reached after the previous stop departs")]
    NotChronological { sequence: u32 },
}

/// A validated route for one train.
///
/// Construction checks every ordering rule of the weekly timetable, so a
/// stored route can be trusted by the journey search.
///
/// # Examples
///
/// ```
/// use booking_server::domain::{Route, StationId, StopSpec, TrainId, parse_time_of_day};
///
/// let stop = |station: &str, sequence, arr: Option<&str>, dep: Option<&str>, day_offset| StopSpec {
///     station_id: StationId::parse(station).unwrap(),
///     sequence,
///     arrival: arr.map(|t| parse_time_of_day(t).unwrap()),
///     departure: dep.map(|t| parse_time_of_day(t).unwrap()),
///     day_offset,
/// };
///
/// // Overnight: departs 22:00 on day 0, arrives 06:00 on day 1.
/// let route = Route::new(
///     TrainId::parse("T1").unwrap(),
///     vec![
///         stop("A", 1, None, Some("22:00"), 0),
///         stop("B", 2, Some("06:00"), None, 1),
///     ],
/// );
/// assert!(route.is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    train_id: TrainId,
    stops: Vec<StopSpec>,
}

impl Route {
    /// Validate and build a route.
    pub fn new(train_id: TrainId, stops: Vec<StopSpec>) -> Result<Self, RouteError> {
        if stops.is_empty() {
            return Err(RouteError::Empty);
        }

        let last = stops.len() - 1;
        for (idx, stop) in stops.iter().enumerate() {
            let sequence = stop.sequence;

            if stop.arrival.is_none() && idx != 0 {
                return Err(RouteError::MissingArrival { sequence });
            }
            if stop.departure.is_none() && idx != last {
                return Err(RouteError::MissingDeparture { sequence });
            }
            if let (Some(arr), Some(dep)) = (stop.elapsed_arrival(), stop.elapsed_departure())
                && dep < arr
            {
                return Err(RouteError::DepartsBeforeArrival { sequence });
            }

            let Some(prev) = idx.checked_sub(1).map(|p| &stops[p]) else {
                continue;
            };

            if sequence <= prev.sequence {
                return Err(RouteError::SequenceNotIncreasing { sequence });
            }
            if stop.day_offset < prev.day_offset {
                return Err(RouteError::DayOffsetDecreasing { sequence });
            }

            // Both are present: prev is not last and stop is not first.
            if let (Some(left), Some(reached)) = (prev.elapsed_departure(), stop.elapsed_arrival())
                && reached <= left
            {
                return Err(RouteError::NotChronological { sequence });
            }
        }

        Ok(Self { train_id, stops })
    }

    /// The train this route belongs to.
    pub fn train_id(&self) -> &TrainId {
        &self.train_id
    }

    /// Stops in route order.
    pub fn stops(&self) -> &[StopSpec] {
        &self.stops
    }

    /// Materialise stored stops, assigning identities in route order.
    pub fn into_stops(self, mut next_id: impl FnMut() -> StopId) -> Vec<ScheduleStop> {
        let last = self.stops.len().saturating_sub(1);
        let train_id = self.train_id;
        self.stops
            .into_iter()
            .enumerate()
            .map(|(idx, spec)| ScheduleStop {
                id: next_id(),
                train_id: train_id.clone(),
                station_id: spec.station_id,
                sequence: spec.sequence,
                arrival: spec.arrival,
                departure: spec.departure,
                day_offset: spec.day_offset,
                is_start: idx == 0,
                is_end: idx == last,
            })
            .collect()
    }
}

/// A train that calls at the departure station and later at the arrival
/// station, with the elapsed travel time between the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRun {
    pub train_id: TrainId,
    pub departure: ScheduleStop,
    pub arrival: ScheduleStop,
    /// Elapsed time from departure to arrival, across day boundaries.
    pub travel_duration: Duration,
}

impl CandidateRun {
    /// Pair two stops of the same train.
    ///
    /// Returns `None` unless both stops belong to the same train, the
    /// arrival stop is later in the route, and the needed times are present.
    pub fn new(departure: ScheduleStop, arrival: ScheduleStop) -> Option<Self> {
        if departure.train_id != arrival.train_id || departure.sequence >= arrival.sequence {
            return None;
        }
        let travel_duration = arrival.elapsed_arrival()? - departure.elapsed_departure()?;
        Some(Self {
            train_id: departure.train_id.clone(),
            departure,
            arrival,
            travel_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_time_of_day;

    fn spec(
        station: &str,
        sequence: u32,
        arr: Option<&str>,
        dep: Option<&str>,
        day_offset: u32,
    ) -> StopSpec {
        StopSpec {
            station_id: StationId::parse(station).unwrap(),
            sequence,
            arrival: arr.map(|t| parse_time_of_day(t).unwrap()),
            departure: dep.map(|t| parse_time_of_day(t).unwrap()),
            day_offset,
        }
    }

    fn train() -> TrainId {
        TrainId::parse("T1").unwrap()
    }

    fn counter() -> impl FnMut() -> StopId {
        let mut n = 0;
        move || {
            n += 1;
            StopId(n)
        }
    }

    #[test]
    fn valid_route_sets_flags() {
        let route = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 0),
                spec("B", 2, Some("09:00"), Some("09:05"), 0),
                spec("C", 3, Some("11:00"), None, 0),
            ],
        )
        .unwrap();

        let stops = route.into_stops(counter());
        assert_eq!(stops.len(), 3);
        assert!(stops[0].is_start && !stops[0].is_end);
        assert!(!stops[1].is_start && !stops[1].is_end);
        assert!(!stops[2].is_start && stops[2].is_end);
        assert_eq!(stops[2].id, StopId(3));
    }

    #[test]
    fn single_stop_is_start_and_end() {
        let route = Route::new(train(), vec![spec("A", 1, None, None, 0)]).unwrap();
        let stops = route.into_stops(counter());
        assert!(stops[0].is_start && stops[0].is_end);
    }

    #[test]
    fn reject_empty_route() {
        assert_eq!(Route::new(train(), vec![]), Err(RouteError::Empty));
    }

    #[test]
    fn reject_non_increasing_sequence() {
        let err = Route::new(
            train(),
            vec![
                spec("A", 2, None, Some("08:00"), 0),
                spec("B", 2, Some("09:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::SequenceNotIncreasing { sequence: 2 });
    }

    #[test]
    fn reject_missing_arrival_mid_route() {
        let err = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 0),
                spec("B", 2, None, Some("09:00"), 0),
                spec("C", 3, Some("10:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::MissingArrival { sequence: 2 });
    }

    #[test]
    fn reject_missing_departure_mid_route() {
        let err = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 0),
                spec("B", 2, Some("09:00"), None, 0),
                spec("C", 3, Some("10:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::MissingDeparture { sequence: 2 });
    }

    #[test]
    fn reject_departure_before_arrival() {
        let err = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 0),
                spec("B", 2, Some("09:00"), Some("08:30"), 0),
                spec("C", 3, Some("10:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::DepartsBeforeArrival { sequence: 2 });
    }

    #[test]
    fn reject_decreasing_day_offset() {
        let err = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 1),
                spec("B", 2, Some("09:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::DayOffsetDecreasing { sequence: 2 });
    }

    #[test]
    fn reject_time_going_backwards_same_day() {
        // 06:00 on the same day offset is before the 22:00 departure.
        let err = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("22:00"), 0),
                spec("B", 2, Some("06:00"), None, 0),
            ],
        )
        .unwrap_err();
        assert_eq!(err, RouteError::NotChronological { sequence: 2 });
    }

    #[test]
    fn accept_overnight_with_day_offset() {
        assert!(
            Route::new(
                train(),
                vec![
                    spec("A", 1, None, Some("22:00"), 0),
                    spec("B", 2, Some("06:00"), None, 1),
                ],
            )
            .is_ok()
        );
    }

    #[test]
    fn weekday_wraps_after_six() {
        let stops = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("22:00"), 6),
                spec("B", 2, Some("06:00"), None, 7),
            ],
        )
        .unwrap()
        .into_stops(counter());
        assert_eq!(stops[0].weekday(), 6);
        assert_eq!(stops[1].weekday(), 0);
    }

    #[test]
    fn candidate_run_duration_spans_days() {
        let stops = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("22:00"), 0),
                spec("B", 2, Some("06:30"), None, 1),
            ],
        )
        .unwrap()
        .into_stops(counter());

        let run = CandidateRun::new(stops[0].clone(), stops[1].clone()).unwrap();
        assert_eq!(run.travel_duration, Duration::minutes(8 * 60 + 30));
    }

    #[test]
    fn candidate_run_requires_later_stop() {
        let stops = Route::new(
            train(),
            vec![
                spec("A", 1, None, Some("08:00"), 0),
                spec("B", 2, Some("09:00"), None, 0),
            ],
        )
        .unwrap()
        .into_stops(counter());

        assert!(CandidateRun::new(stops[1].clone(), stops[0].clone()).is_none());
        assert!(CandidateRun::new(stops[0].clone(), stops[0].clone()).is_none());
    }

    #[test]
    fn error_display() {
        assert_eq!(
            RouteError::NotChronological { sequence: 4 }.to_string(),
            "stop 4 is not reached after the previous stop departs"
        );
        assert_eq!(RouteError::Empty.to_string(), "route must have at least one stop");
    }
}
