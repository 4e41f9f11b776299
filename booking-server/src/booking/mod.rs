//! Booking Coordinator.
//!
//! Validates the train and stations a booking refers to, normalises the
//! journey date, and records the ticket. Also owns lookup, partial update
//! and deletion of existing tickets.


use futures::future::try_join_all;
use tracing::debug;

use crate::directory::Directory;
use crate::domain::{
    BookedSeat, NewTicket, StationId, Ticket, TicketId, TicketUpdate, TrainId, UserId,
    UserTicket, parse_calendar_date, parse_time_of_day,
};
use crate::error::{ServiceError, ServiceResult};
use crate::store::TicketLedger;

/// A request to book one seat for one passenger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub train_id: TrainId,
    pub departure_station_id: StationId,
    pub destination_station_id: StationId,
    pub user_id: UserId,
    pub seat_no: String,
    /// `YYYY-MM-DD` or `DD/MM/YYYY`.
    pub journey_date: String,
    /// `HH:MM` or `HH:MM:SS`.
    pub journey_start_at: String,
    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub group_id: Option<String>,
}

/// Booking coordinator over a directory and a ticket ledger.
pub struct BookingCoordinator<D, L> {
    directory: D,
    ledger: L,
}

impl<D: Directory, L: TicketLedger> BookingCoordinator<D, L> {
    /// Create a new coordinator.
    pub fn new(directory: D, ledger: L) -> Self {
        Self { directory, ledger }
    }

    /// Book a ticket.
    ///
    /// The train is checked first, then the departure station, then the
    /// destination station; the first missing one is reported and nothing
    /// is written.
    pub async fn book_ticket(&self, request: BookingRequest) -> ServiceResult<Ticket> {
        let (train, departure, destination) = tokio::join!(
            self.directory.train_exists(&request.train_id),
            self.directory.station_exists(&request.departure_station_id),
            self.directory.station_exists(&request.destination_station_id),
        );
        if !train? {
            debug!(train = %request.train_id, "booking rejected: unknown train");
            return Err(ServiceError::not_found("train", &request.train_id));
        }
        if !departure? {
            debug!(station = %request.departure_station_id, "booking rejected: unknown departure station");
            return Err(ServiceError::not_found("station", &request.departure_station_id));
        }
        if !destination? {
            debug!(station = %request.destination_station_id, "booking rejected: unknown destination station");
            return Err(ServiceError::not_found("station", &request.destination_station_id));
        }

        let journey_date = parse_calendar_date(&request.journey_date)?;
        let journey_start_at = parse_time_of_day(&request.journey_start_at)?;

        let ticket = self
            .ledger
            .insert(NewTicket {
                train_id: request.train_id,
                departure_station_id: request.departure_station_id,
                destination_station_id: request.destination_station_id,
                user_id: request.user_id,
                seat_no: request.seat_no,
                passenger_name: request.passenger_name,
                passenger_age: request.passenger_age,
                passenger_gender: request.passenger_gender,
                group_id: request.group_id,
                journey_date,
                journey_start_at,
            })
            .await?;

        debug!(
            ticket = %ticket.id,
            train = %ticket.train_id,
            seat = %ticket.seat_no,
            date = %ticket.journey_date,
            "ticket booked"
        );
        Ok(ticket)
    }

    /// Seats taken on a train for one journey date, by seat number.
    pub async fn seats_for_train_and_date(
        &self,
        train: &TrainId,
        date: &str,
    ) -> ServiceResult<Vec<BookedSeat>> {
        if !self.directory.train_exists(train).await? {
            return Err(ServiceError::not_found("train", train));
        }
        let date = parse_calendar_date(date)?;

        let tickets = self.ledger.tickets_for_train_and_date(train, date).await?;
        let user_names =
            try_join_all(tickets.iter().map(|t| self.directory.user_name(&t.user_id))).await?;

        debug!(train = %train, %date, seats = tickets.len(), "seat lookup");
        Ok(tickets
            .into_iter()
            .zip(user_names)
            .map(|(ticket, user_name)| BookedSeat {
                seat_no: ticket.seat_no,
                journey_start_at: ticket.journey_start_at,
                user_id: ticket.user_id,
                user_name,
            })
            .collect())
    }

    /// A user's tickets, oldest booking first.
    pub async fn tickets_for_user(&self, user: &UserId) -> ServiceResult<Vec<UserTicket>> {
        let tickets = self.ledger.tickets_for_user(user).await?;
        let train_names =
            try_join_all(tickets.iter().map(|t| self.directory.train_name(&t.train_id))).await?;

        debug!(user = %user, tickets = tickets.len(), "user tickets");
        Ok(tickets
            .into_iter()
            .zip(train_names)
            .map(|(ticket, train_name)| UserTicket::new(ticket, train_name))
            .collect())
    }

    /// A ticket by id.
    pub async fn ticket(&self, id: TicketId) -> ServiceResult<Ticket> {
        self.ledger
            .ticket(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("ticket", id))
    }

    /// Change passenger details on a ticket.
    ///
    /// At least one field must be present.
    pub async fn update_ticket(&self, id: TicketId, update: &TicketUpdate) -> ServiceResult<Ticket> {
        if update.is_empty() {
            return Err(ServiceError::InvalidArgument(
                "update must set passenger_name, passenger_age or passenger_gender".to_string(),
            ));
        }

        let ticket = self
            .ledger
            .update(id, update)
            .await?
            .ok_or_else(|| ServiceError::not_found("ticket", id))?;
        debug!(ticket = %id, "ticket updated");
        Ok(ticket)
    }

    /// Cancel a ticket, returning what was removed.
    pub async fn delete_ticket(&self, id: TicketId) -> ServiceResult<Ticket> {
        let ticket = self
            .ledger
            .delete(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("ticket", id))?;
        debug!(ticket = %id, "ticket deleted");
        Ok(ticket)
    }
}
