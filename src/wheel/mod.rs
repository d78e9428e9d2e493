//! Wheel engine
//!
//! Geometry, spin resolution, easing, tick scheduling and the per-wheel
//! spin state machine.

pub mod animator;
pub mod easing;
pub mod error;
pub mod geometry;
pub mod item;
pub mod resolver;
pub mod ticks;
pub mod timer;

pub use animator::{AnimatorSettings, SpinAnimator, SpinState, WheelEvent};
pub use error::SpinError;
pub use geometry::{LabelPlacement, Sector, WheelGeometry};
pub use item::WheelItem;
pub use resolver::{resolve_spin, SpinResolution, SpinTuning};
pub use ticks::{TickSchedule, TickTuning};
pub use timer::{TimerId, TimerQueue};
