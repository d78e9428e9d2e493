//! Application model
//!
//! Everything the terminal UI reads and every command it can issue.

pub mod browser;
pub mod state;

pub use browser::{BrowserRow, BrowserState, BrowserTab, SortKey};
pub use state::{LogMessage, MessageKind, Notice, Randomizer, View};
