//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::booking::BookingRequest;
use crate::domain::{
    BookedSeat, InvalidId, ScheduleStop, StationId, StopId, Ticket, TicketId, TrainId,
    UserId, UserTicket,
};
use crate::error::ServiceError;
use crate::resolver::JourneyQuery;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/train-schedule", get(list_schedules))
        .route("/api/train-schedule/find", post(find_journeys))
        .route("/api/train-schedule/train/:train_id", get(train_timetable))
        .route(
            "/api/train-schedule/train/:train_id/station/:station_id",
            get(train_stops_at_station),
        )
        .route("/api/train-schedule/station/:station_id", get(station_timetable))
        .route("/api/train-schedule/stop/:stop_id", get(schedule_stop))
        .route("/api/ticket", post(book_ticket))
        .route("/api/ticket/get", post(seats_for_train))
        .route("/api/ticket/user/:user_id", get(user_tickets))
        .route(
            "/api/ticket/:ticket_id",
            get(get_ticket).patch(update_ticket).delete(delete_ticket),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Find trains between two stations on a date.
async fn find_journeys(
    State(state): State<AppState>,
    Json(req): Json<FindJourneysRequest>,
) -> Result<Json<FindJourneysResponse>, AppError> {
    let query = JourneyQuery::try_from(req)?;
    let page = state.resolver.find_journeys(&query).await?;
    Ok(Json(page.into()))
}

/// Every stored stop, paged.
async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<ScheduleListResponse>, AppError> {
    let page = state.resolver.schedules(query.page, query.limit).await?;
    Ok(Json(page.into()))
}

/// A train's stops in route order.
async fn train_timetable(
    State(state): State<AppState>,
    Path(train_id): Path<String>,
) -> Result<Json<Vec<ScheduleStop>>, AppError> {
    let train = TrainId::parse(&train_id)?;
    Ok(Json(state.resolver.train_timetable(&train).await?))
}

/// Stops at a station by departure time.
async fn station_timetable(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<Vec<ScheduleStop>>, AppError> {
    let station = StationId::parse(&station_id)?;
    Ok(Json(state.resolver.station_timetable(&station).await?))
}

/// A train's calls at one station.
async fn train_stops_at_station(
    State(state): State<AppState>,
    Path((train_id, station_id)): Path<(String, String)>,
) -> Result<Json<Vec<ScheduleStop>>, AppError> {
    let train = TrainId::parse(&train_id)?;
    let station = StationId::parse(&station_id)?;
    Ok(Json(
        state
            .resolver
            .train_stops_at_station(&train, &station)
            .await?,
    ))
}

/// One schedule stop.
async fn schedule_stop(
    State(state): State<AppState>,
    Path(stop_id): Path<u64>,
) -> Result<Json<ScheduleStop>, AppError> {
    Ok(Json(state.resolver.stop(StopId(stop_id)).await?))
}

/// Book a ticket.
async fn book_ticket(
    State(state): State<AppState>,
    Json(req): Json<BookTicketRequest>,
) -> Result<(StatusCode, Json<Ticket>), AppError> {
    let request = BookingRequest::try_from(req)?;
    let ticket = state.booking.book_ticket(request).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Seats booked on a train for a date.
async fn seats_for_train(
    State(state): State<AppState>,
    Json(req): Json<SeatsRequest>,
) -> Result<Json<Vec<BookedSeat>>, AppError> {
    let train = TrainId::parse(&req.train_id)?;
    Ok(Json(
        state
            .booking
            .seats_for_train_and_date(&train, &req.date)
            .await?,
    ))
}

/// A user's tickets.
async fn user_tickets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<UserTicket>>, AppError> {
    let user = UserId::parse(&user_id)?;
    Ok(Json(state.booking.tickets_for_user(&user).await?))
}

async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let id = TicketId::parse(&ticket_id)?;
    Ok(Json(state.booking.ticket(id).await?))
}

async fn update_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<Json<Ticket>, AppError> {
    let id = TicketId::parse(&ticket_id)?;
    Ok(Json(state.booking.update_ticket(id, &req.into()).await?))
}

async fn delete_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> Result<Json<Ticket>, AppError> {
    let id = TicketId::parse(&ticket_id)?;
    Ok(Json(state.booking.delete_ticket(id).await?))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::InvalidArgument(message) => AppError::BadRequest { message },
            ServiceError::NotFound(message) => AppError::NotFound { message },
            ServiceError::Internal(message) => AppError::Internal { message },
        }
    }
}

impl From<InvalidId> for AppError {
    fn from(e: InvalidId) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            debug!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
