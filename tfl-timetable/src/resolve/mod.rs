//! Station and line resolution.
//!
//! Turns a free-text station name into concrete (line, platform) pairs
//! that a timetable can be requested for. TfL models stations as a tree:
//! a hub owns stop areas and platforms, and only platforms carry lines.
//! The resolver walks that tree and never reports a hub identifier.

mod batch;
mod error;
mod resolver;
mod tree;

pub use batch::{ALTERNATE_SENTINEL_ID, SENTINEL_ID, fetch_stop_points, pad_singleton};
pub use error::ResolveError;
pub use resolver::{LineAttachment, StopResolver};
pub use tree::{HUB_PREFIX, MAX_TREE_DEPTH, PLATFORM_PREFIX, is_hub, is_platform};
