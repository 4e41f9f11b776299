//! Ticket types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;

use super::ids::{StationId, TicketId, TrainId, UserId};

/// A booked seat for one passenger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ticket {
    pub id: TicketId,
    pub train_id: TrainId,
    pub departure_station_id: StationId,
    pub destination_station_id: StationId,
    pub user_id: UserId,
    /// Free text; not checked against a seat map.
    pub seat_no: String,
    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub group_id: Option<String>,
    /// Calendar date of the departure station's stop.
    pub journey_date: NaiveDate,
    /// Scheduled departure time at the departure station.
    pub journey_start_at: NaiveTime,
    /// Set once at creation.
    pub booked_at: DateTime<Utc>,
}

/// A ticket ready to be recorded, before the ledger assigns identity and
/// booking time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub train_id: TrainId,
    pub departure_station_id: StationId,
    pub destination_station_id: StationId,
    pub user_id: UserId,
    pub seat_no: String,
    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub group_id: Option<String>,
    pub journey_date: NaiveDate,
    pub journey_start_at: NaiveTime,
}

impl NewTicket {
    /// Attach identity and booking time.
    pub fn into_ticket(self, id: TicketId, booked_at: DateTime<Utc>) -> Ticket {
        Ticket {
            id,
            train_id: self.train_id,
            departure_station_id: self.departure_station_id,
            destination_station_id: self.destination_station_id,
            user_id: self.user_id,
            seat_no: self.seat_no,
            passenger_name: self.passenger_name,
            passenger_age: self.passenger_age,
            passenger_gender: self.passenger_gender,
            group_id: self.group_id,
            journey_date: self.journey_date,
            journey_start_at: self.journey_start_at,
            booked_at,
        }
    }
}

/// Partial update of passenger details.
///
/// Only these three fields are mutable after booking.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketUpdate {
    pub passenger_name: Option<String>,
    pub passenger_age: Option<u8>,
    pub passenger_gender: Option<String>,
}

impl TicketUpdate {
    /// Returns true if no field would change.
    pub fn is_empty(&self) -> bool {
        self.passenger_name.is_none()
            && self.passenger_age.is_none()
            && self.passenger_gender.is_none()
    }

    /// Apply the present fields to a ticket.
    pub fn apply(&self, ticket: &mut Ticket) {
        if let Some(name) = &self.passenger_name {
            ticket.passenger_name.clone_from(name);
        }
        if let Some(age) = self.passenger_age {
            ticket.passenger_age = age;
        }
        if let Some(gender) = &self.passenger_gender {
            ticket.passenger_gender.clone_from(gender);
        }
    }
}

/// A taken seat on a train for one date, with the booking user's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookedSeat {
    pub seat_no: String,
    pub journey_start_at: NaiveTime,
    pub user_id: UserId,
    /// `None` if the user is unknown to the directory.
    pub user_name: Option<String>,
}

/// A user's ticket with the train's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserTicket {
    pub ticket_id: TicketId,
    pub train_id: TrainId,
    /// `None` if the train has since left the directory.
    pub train_name: Option<String>,
    pub seat_no: String,
    pub journey_date: NaiveDate,
    pub journey_start_at: NaiveTime,
    pub passenger_name: String,
    pub passenger_age: u8,
    pub passenger_gender: String,
    pub group_id: Option<String>,
    pub booked_at: DateTime<Utc>,
}

impl UserTicket {
    /// Join a ticket with its train name.
    pub fn new(ticket: Ticket, train_name: Option<String>) -> Self {
        Self {
            ticket_id: ticket.id,
            train_id: ticket.train_id,
            train_name,
            seat_no: ticket.seat_no,
            journey_date: ticket.journey_date,
            journey_start_at: ticket.journey_start_at,
            passenger_name: ticket.passenger_name,
            passenger_age: ticket.passenger_age,
            passenger_gender: ticket.passenger_gender,
            group_id: ticket.group_id,
            booked_at: ticket.booked_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticket() -> Ticket {
        NewTicket {
            train_id: TrainId::parse("T1").unwrap(),
            departure_station_id: StationId::parse("A").unwrap(),
            destination_station_id: StationId::parse("B").unwrap(),
            user_id: UserId::parse("U1").unwrap(),
            seat_no: "S1-12".to_string(),
            passenger_name: "Asha".to_string(),
            passenger_age: 31,
            passenger_gender: "F".to_string(),
            group_id: None,
            journey_date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            journey_start_at: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        }
        .into_ticket(TicketId::new(), Utc::now())
    }

    #[test]
    fn empty_update() {
        assert!(TicketUpdate::default().is_empty());
        let update = TicketUpdate {
            passenger_age: Some(40),
            ..TicketUpdate::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn apply_only_present_fields() {
        let mut t = ticket();
        let update = TicketUpdate {
            passenger_name: Some("Asha R".to_string()),
            ..TicketUpdate::default()
        };
        update.apply(&mut t);
        assert_eq!(t.passenger_name, "Asha R");
        assert_eq!(t.passenger_age, 31);
        assert_eq!(t.passenger_gender, "F");
    }

    #[test]
    fn apply_is_idempotent() {
        let mut once = ticket();
        let update = TicketUpdate {
            passenger_name: Some("B".to_string()),
            passenger_age: Some(9),
            passenger_gender: Some("M".to_string()),
        };
        update.apply(&mut once);
        let mut twice = once.clone();
        update.apply(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn serialises_normalised_date() {
        let json = serde_json::to_value(ticket()).unwrap();
        assert_eq!(json["journey_date"], "2024-03-10");
        assert_eq!(json["journey_start_at"], "22:00:00");
    }
}
