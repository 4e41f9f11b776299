//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::booking::BookingRequest;
use crate::domain::{
    InvalidId, Journey, Page, Pagination, ScheduleStop, StationId, TicketUpdate, TrainId,
    UserId, format_elapsed,
};
use crate::resolver::JourneyQuery;

/// Request to find journeys between two stations.
#[derive(Debug, Clone, Deserialize)]
pub struct FindJourneysRequest {
    pub departure_station_id: String,
    pub arrival_station_id: String,

    /// `YYYY-MM-DD` or `DD/MM/YYYY`
    pub travel_date: String,

    /// 1-based page number (defaults to 1)
    pub page: Option<i64>,

    /// Page size (defaults to the configured default)
    pub limit: Option<i64>,
}

impl TryFrom<FindJourneysRequest> for JourneyQuery {
    type Error = InvalidId;

    fn try_from(req: FindJourneysRequest) -> Result<Self, Self::Error> {
        Ok(JourneyQuery {
            departure_station_id: StationId::parse(&req.departure_station_id)?,
            arrival_station_id: StationId::parse(&req.arrival_station_id)?,
            travel_date: req.travel_date,
            page: req.page,
            page_size: req.limit,
        })
    }
}

/// A journey in search results.
#[derive(Debug, Clone, Serialize)]
pub struct JourneyResult {
    pub train_id: String,
    pub train_name: String,
    pub departure_station_id: String,
    pub departure_station_name: String,
    pub arrival_station_id: String,
    pub arrival_station_name: String,

    /// `YYYY-MM-DD`
    pub departure_date: String,

    /// `HH:MM:SS`
    pub departure_time: String,

    /// `YYYY-MM-DD`
    pub arrival_date: String,

    /// `HH:MM:SS`
    pub arrival_time: String,

    /// Elapsed travel time as `HH:MM:SS`; hours may exceed 24
    pub travel_duration: String,

    /// Elapsed travel time in whole minutes
    pub duration_mins: i64,
}

impl From<Journey> for JourneyResult {
    fn from(j: Journey) -> Self {
        Self {
            train_id: j.train_id.to_string(),
            train_name: j.train_name,
            departure_station_id: j.departure_station_id.to_string(),
            departure_station_name: j.departure_station_name,
            arrival_station_id: j.arrival_station_id.to_string(),
            arrival_station_name: j.arrival_station_name,
            departure_date: j.departure_date.format("%Y-%m-%d").to_string(),
            departure_time: j.departure_time.format("%H:%M:%S").to_string(),
            arrival_date: j.arrival_date.format("%Y-%m-%d").to_string(),
            arrival_time: j.arrival_time.format("%H:%M:%S").to_string(),
            travel_duration: format_elapsed(j.travel_duration),
            duration_mins: j.travel_duration.num_minutes(),
        }
    }
}

/// Response for journey search.
#[derive(Debug, Clone, Serialize)]
pub struct FindJourneysResponse {
    pub items: Vec<JourneyResult>,
    pub pagination: Pagination,
}

impl From<Page<Journey>> for FindJourneysResponse {
    fn from(page: Page<Journey>) -> Self {
        Self {
            items: page.items.into_iter().map(JourneyResult::from).collect(),
            pagination: page.pagination,
        }
    }
}

/// Query string for the schedule listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// One page of schedule stops.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduleStop>,
    pub pagination: Pagination,
}

impl From<Page<ScheduleStop>> for ScheduleListResponse {
    fn from(page: Page<ScheduleStop>) -> Self {
        Self {
            items: page.items,
            pagination: page.pagination,
        }
    }
}

/// Request to book a ticket.
#[derive(Debug, Clone, Deserialize)]
pub struct BookTicketRequest {
    pub train_id: String,
    pub departure_station_id: String,
    pub destination_station_id: String,
    pub user_id: String,
    pub seat_no: String,

    /// `YYYY-MM-DD` or `DD/MM/YYYY`
    pub journey_date: String,

    /// Scheduled departure at the departure station, `HH:MM[:SS]`
    pub journey_start_at: String,

    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub group_id: Option<String>,
}

impl TryFrom<BookTicketRequest> for BookingRequest {
    type Error = InvalidId;

    fn try_from(req: BookTicketRequest) -> Result<Self, Self::Error> {
        Ok(BookingRequest {
            train_id: TrainId::parse(&req.train_id)?,
            departure_station_id: StationId::parse(&req.departure_station_id)?,
            destination_station_id: StationId::parse(&req.destination_station_id)?,
            user_id: UserId::parse(&req.user_id)?,
            seat_no: req.seat_no,
            journey_date: req.journey_date,
            journey_start_at: req.journey_start_at,
            passenger_name: req.passenger_name,
            passenger_age: req.passenger_age,
            passenger_gender: req.passenger_gender,
            group_id: req.group_id,
        })
    }
}

/// Request for the seats booked on a train on one date.
#[derive(Debug, Clone, Deserialize)]
pub struct SeatsRequest {
    pub train_id: String,

    /// `YYYY-MM-DD`, `DD/MM/YYYY` or `YYYY/MM/DD`
    pub date: String,
}

/// Partial update of passenger details.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicketRequest {
    pub passenger_name: Option<String>,
    pub passenger_age: Option<u8>,
    pub passenger_gender: Option<String>,
}

impl From<UpdateTicketRequest> for TicketUpdate {
    fn from(req: UpdateTicketRequest) -> Self {
        Self {
            passenger_name: req.passenger_name,
            passenger_age: req.passenger_age,
            passenger_gender: req.passenger_gender,
        }
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, NaiveTime};

    #[test]
    fn journey_result_formatting() {
        let journey = Journey {
            train_id: TrainId::parse("12952").unwrap(),
            train_name: "Rajdhani Express".to_string(),
            departure_station_id: StationId::parse("NDLS").unwrap(),
            departure_station_name: "New Delhi".to_string(),
            arrival_station_id: StationId::parse("BCT").unwrap(),
            arrival_station_name: "Mumbai Central".to_string(),
            departure_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            departure_time: NaiveTime::from_hms_opt(16, 55, 0).unwrap(),
            arrival_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            arrival_time: NaiveTime::from_hms_opt(8, 35, 0).unwrap(),
            travel_duration: Duration::minutes(940),
        };

        let result = JourneyResult::from(journey);
        assert_eq!(result.departure_date, "2024-03-10");
        assert_eq!(result.arrival_date, "2024-03-11");
        assert_eq!(result.departure_time, "16:55:00");
        assert_eq!(result.travel_duration, "15:40:00");
        assert_eq!(result.duration_mins, 940);
    }

    #[test]
    fn find_request_uses_limit_as_page_size() {
        let req: FindJourneysRequest = serde_json::from_str(
            r#"{"departure_station_id":"A","arrival_station_id":"B","travel_date":"2024-03-10","limit":5}"#,
        )
        .unwrap();
        let query = JourneyQuery::try_from(req).unwrap();
        assert_eq!(query.page, None);
        assert_eq!(query.page_size, Some(5));
    }

    #[test]
    fn blank_ids_rejected() {
        let req: FindJourneysRequest = serde_json::from_str(
            r#"{"departure_station_id":" ","arrival_station_id":"B","travel_date":"2024-03-10"}"#,
        )
        .unwrap();
        assert!(JourneyQuery::try_from(req).is_err());
    }

    #[test]
    fn update_request_fields_optional() {
        let req: UpdateTicketRequest = serde_json::from_str(r#"{"passenger_age":30}"#).unwrap();
        let update = TicketUpdate::from(req);
        assert_eq!(update.passenger_age, Some(30));
        assert!(update.passenger_name.is_none());

        let empty: UpdateTicketRequest = serde_json::from_str("{}").unwrap();
        assert!(TicketUpdate::from(empty).is_empty());
    }
}
