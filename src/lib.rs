//! Buildwheel - spin a wheel for your next ARPG character
//!
//! A class wheel picks the class, then a build wheel picks one of that
//! class's builds. Either wheel can be locked or filtered.

pub mod wheel;
pub mod catalog;
pub mod config;
pub mod session;
pub mod randomizer;
pub mod ui;
pub mod audio;
pub mod save;

// Re-export commonly used types
pub use catalog::{BuildEntry, Catalog, ClassEntry, GameCatalog};
pub use config::RandomizerConfig;
pub use randomizer::{Randomizer, View};
pub use session::{DualWheelSession, SessionEvent, SessionPhase};
pub use wheel::{SpinAnimator, WheelGeometry, WheelItem};
