//! TfL line timetable server.
//!
//! Resolves a station name into the (line, platform) pairs that serve it
//! and renders TfL line timetables as fixed-width text grids.

pub mod config;
pub mod resolve;
pub mod tfl;
pub mod timetable;
pub mod web;
