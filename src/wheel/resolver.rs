//! Spin resolution
//!
//! Picks the winning sector and the rotation needed to land on it. The
//! outcome is fixed here; the animator only plays it back.

use std::ops::RangeInclusive;

use rand::Rng;

use super::geometry::{normalize_degrees, WheelGeometry};

/// Tunables that shape a spin without affecting its outcome
#[derive(Debug, Clone, PartialEq)]
pub struct SpinTuning {
    /// Whole extra turns added for effect
    pub full_turns: RangeInclusive<u32>,
    /// Total jitter span as a fraction of one sector, centered on the
    /// sector midpoint. Must stay below 1.0 so the pointer never crosses
    /// into a neighbouring sector.
    pub jitter_fraction: f64,
}

impl Default for SpinTuning {
    fn default() -> Self {
        Self {
            full_turns: 3..=5,
            jitter_fraction: 0.4,
        }
    }
}

/// A resolved spin: which item wins and how far to turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinResolution {
    /// Index of the winning item
    pub index: usize,
    pub full_turns: u32,
    /// Forward rotation from the current resting angle to the winning
    /// sector's midpoint, in [0, 360)
    pub angular_delta: f64,
    /// Offset from the exact midpoint
    pub jitter: f64,
}

impl SpinResolution {
    /// Rotation to add to the wheel's cumulative rotation
    pub fn total_delta(&self) -> f64 {
        self.full_turns as f64 * 360.0 + self.angular_delta + self.jitter
    }
}

/// Resolve a spin for a wheel of `item_count` items currently rotated by
/// `current_rotation` degrees. Returns `None` for an empty wheel.
pub fn resolve_spin<R: Rng + ?Sized>(
    current_rotation: f64,
    item_count: usize,
    tuning: &SpinTuning,
    rng: &mut R,
) -> Option<SpinResolution> {
    let geometry = WheelGeometry::new(item_count)?;

    // The only draw that decides the outcome
    let index = rng.gen_range(0..item_count);

    let (min_turns, max_turns) = turn_bounds(&tuning.full_turns);
    let full_turns = rng.gen_range(min_turns..=max_turns);

    let target = geometry.resting_angle(index);
    let current = normalize_degrees(current_rotation);
    let angular_delta = normalize_degrees(target - current);

    let fraction = tuning.jitter_fraction.clamp(0.0, MAX_JITTER_FRACTION);
    let jitter = (rng.gen::<f64>() - 0.5) * geometry.sector_angle() * fraction;

    Some(SpinResolution {
        index,
        full_turns,
        angular_delta,
        jitter,
    })
}

/// Upper bound for the jitter fraction. Anything at or above 1.0 could push
/// the pointer over a sector boundary.
pub const MAX_JITTER_FRACTION: f64 = 0.95;

/// At least one full turn so every delta is strictly positive
fn turn_bounds(range: &RangeInclusive<u32>) -> (u32, u32) {
    let min = (*range.start()).max(1);
    let max = (*range.end()).max(min);
    (min, max)
}
