//! Railway ticketing service.
//!
//! Resolves which trains connect two stations on a calendar date from
//! weekly timetables, and books, updates and cancels tickets against them.

pub mod booking;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;
pub mod resolver;
pub mod store;
pub mod web;
