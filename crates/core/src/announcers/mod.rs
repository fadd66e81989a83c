//! Publishing validated outcomes downstream.
//!
//! Both sinks here also implement [`Tracker`](crate::tracker::Tracker), so a
//! single destination can carry announcements and status records.

mod json_lines;
mod log;
mod traits;

pub use json_lines::JsonLinesAnnouncer;
pub use log::LogAnnouncer;
pub use traits::Announcer;
