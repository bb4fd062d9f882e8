//! `shiftgrid-api` — the schedule server as seen by the grid editor.
//!
//! [`ScheduleApi`] is the seam: the editor only ever talks to the trait, the
//! reqwest-backed [`HttpScheduleApi`] is the production implementation and
//! tests substitute their own.

pub mod api;
pub mod error;
pub mod http;

pub use api::ScheduleApi;
pub use error::ApiError;
pub use http::HttpScheduleApi;
