//! Spin sessions
//!
//! Filtering the catalog into wheel items, running the two wheels as one
//! spin, and keeping the recent results.

pub mod filters;
pub mod history;
pub mod orchestrator;

pub use filters::{Filters, cycle_value, difficulty_values, playstyle_values};
pub use history::{History, SpinRecord};
pub use orchestrator::{DualWheelSession, SessionEvent, SessionPhase, WheelKind};
