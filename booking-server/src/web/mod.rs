//! Web layer for the booking service.
//!
//! Exposes journey search, timetables and ticket management as JSON
//! endpoints.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, ServerDirectory};
