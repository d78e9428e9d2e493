//! UI widgets

pub mod wheel;

pub use wheel::WheelWidget;
