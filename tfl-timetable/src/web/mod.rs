//! Web layer for the timetable service.
//!
//! Provides a station search page, timetable pages and their JSON/plain
//! text equivalents.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, DEFAULT_DEMO_STATION, DEFAULT_MODE};
pub use templates::*;
