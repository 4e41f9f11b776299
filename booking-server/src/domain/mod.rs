//! Domain types for the ticketing service.
//!
//! This module contains validated value types for stations, trains, weekly
//! schedules, journeys and tickets. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod ids;
mod journey;
mod schedule;
mod ticket;
mod time;

pub use ids::{InvalidId, StationId, StopId, TicketId, TrainId, UserId};
pub use journey::{Journey, Page, PageRequest, PageWindow, Pagination};
pub use schedule::{CandidateRun, Route, RouteError, ScheduleStop, StopSpec};
pub use ticket::{BookedSeat, NewTicket, Ticket, TicketUpdate, UserTicket};
pub use time::{
    DAYS_PER_WEEK, TimeError, day_of_week, elapsed_since_start, format_elapsed,
    parse_calendar_date, parse_time_of_day,
};
