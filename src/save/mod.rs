//! Persistence
//!
//! User preferences stored under the platform data directory.

pub mod prefs;

pub use prefs::{
    Favorite, Preferences, PrefsError,
    load_preferences, save_preferences, prefs_path,
};
