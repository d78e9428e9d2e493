//! Spin animator
//!
//! Drives one wheel through `Idle -> Spinning -> Idle`. A spin is resolved
//! up front, then played back over a fixed duration while a tick schedule
//! runs alongside. The landing event fires exactly once per accepted spin
//! and never before the duration has elapsed.

use std::time::Duration;

use rand::Rng;

use super::easing::SPIN_EASING;
use super::error::SpinError;
use super::item::WheelItem;
use super::resolver::{resolve_spin, SpinTuning};
use super::ticks::{TickSchedule, TickTuning};
use super::timer::TimerQueue;

/// Default length of one spin animation
pub const DEFAULT_SPIN_DURATION: Duration = Duration::from_millis(4000);

/// Observable outcome of advancing a wheel
#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    /// A feedback pulse; safe to ignore
    Tick { index: usize, of: usize },
    /// The spin finished on this item
    Landed(WheelItem),
}

/// Per-wheel state that outlives individual spins
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpinState {
    /// Cumulative rotation in degrees; only grows until reset
    pub rotation: f64,
    pub is_spinning: bool,
    /// Outcome of the most recently completed spin
    pub last_selected: Option<WheelItem>,
}

/// Pending timer payloads, tagged with the spin they belong to
#[derive(Debug, Clone, Copy, PartialEq)]
enum SpinTimer {
    Tick { generation: u64, index: usize, of: usize },
    Land { generation: u64 },
}

/// The spin currently being played back
#[derive(Debug, Clone)]
struct ActiveSpin {
    generation: u64,
    started_at: Duration,
    from: f64,
    to: f64,
    outcome: WheelItem,
}

/// Timing knobs for one wheel
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatorSettings {
    pub duration: Duration,
    pub spin: SpinTuning,
    pub ticks: TickTuning,
}

impl Default for AnimatorSettings {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SPIN_DURATION,
            spin: SpinTuning::default(),
            ticks: TickTuning::default(),
        }
    }
}

/// A single wheel and its spin state machine
#[derive(Debug, Clone)]
pub struct SpinAnimator {
    /// Used in log lines
    name: &'static str,
    items: Vec<WheelItem>,
    state: SpinState,
    active: Option<ActiveSpin>,
    timers: TimerQueue<SpinTimer>,
    /// Bumped on every spin and reset; stale timers carry an older value
    generation: u64,
    settings: AnimatorSettings,
}

impl SpinAnimator {
    pub fn new(name: &'static str, settings: AnimatorSettings) -> Self {
        Self {
            name,
            items: Vec::new(),
            state: SpinState::default(),
            active: None,
            timers: TimerQueue::new(),
            generation: 0,
            settings,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn items(&self) -> &[WheelItem] {
        &self.items
    }

    pub fn state(&self) -> &SpinState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        self.state.is_spinning
    }

    pub fn last_selected(&self) -> Option<&WheelItem> {
        self.state.last_selected.as_ref()
    }

    pub fn settings(&self) -> &AnimatorSettings {
        &self.settings
    }

    /// Replace the item list. Refused mid-spin: the list a spin resolved
    /// against must stay put until it lands.
    pub fn set_items(&mut self, items: Vec<WheelItem>) -> Result<(), SpinError> {
        if self.state.is_spinning {
            return Err(SpinError::AlreadySpinning);
        }
        self.items = items;
        Ok(())
    }

    /// Start a spin. Returns the index of the resolved item, or `None` when
    /// the wheel is busy or empty.
    pub fn spin<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        if self.state.is_spinning {
            log::debug!("{} wheel: spin ignored, already spinning", self.name);
            return None;
        }
        let resolution = match resolve_spin(self.state.rotation, self.items.len(), &self.settings.spin, rng) {
            Some(resolution) => resolution,
            None => {
                log::debug!("{} wheel: spin ignored, no items", self.name);
                return None;
            }
        };

        let outcome = self.items[resolution.index].clone();
        let from = self.state.rotation;
        let to = from + resolution.total_delta();

        self.generation += 1;
        let generation = self.generation;

        self.state.is_spinning = true;
        self.state.last_selected = None;
        self.state.rotation = to;

        // Every timer of a previous spin is gone by now, but clear anyway so
        // a wheel can never hold two landing timers.
        self.timers.cancel_all();
        let schedule = TickSchedule::generate(self.settings.duration, &self.settings.ticks, rng);
        let of = schedule.len();
        for (index, offset) in schedule.offsets().iter().enumerate() {
            self.timers.schedule_in(*offset, SpinTimer::Tick { generation, index, of });
        }
        self.timers.schedule_in(self.settings.duration, SpinTimer::Land { generation });

        log::debug!(
            "{} wheel: spinning to {} ({} turns, {:.1}° + {:.1}° jitter, {} ticks)",
            self.name,
            outcome.name,
            resolution.full_turns,
            resolution.angular_delta,
            resolution.jitter,
            of
        );

        self.active = Some(ActiveSpin {
            generation,
            started_at: self.timers.now(),
            from,
            to,
            outcome,
        });
        Some(resolution.index)
    }

    /// Advance virtual time and collect whatever fired
    pub fn update(&mut self, delta: Duration) -> Vec<WheelEvent> {
        let mut events = Vec::new();
        self.timers.advance(delta);

        while let Some(timer) = self.timers.pop_due() {
            let current = self.active.as_ref().map(|spin| spin.generation);
            match timer {
                SpinTimer::Tick { generation, index, of } if current == Some(generation) => {
                    events.push(WheelEvent::Tick { index, of });
                }
                SpinTimer::Land { generation } if current == Some(generation) => {
                    if let Some(item) = self.finish() {
                        events.push(WheelEvent::Landed(item));
                    }
                }
                stale => {
                    log::debug!("{} wheel: discarded stale timer {:?}", self.name, stale);
                }
            }
        }
        events
    }

    /// Terminal transition of the active spin
    fn finish(&mut self) -> Option<WheelItem> {
        let spin = self.active.take()?;
        // Nothing of this spin may fire after it lands
        self.timers.cancel_all();
        self.state.is_spinning = false;
        self.state.last_selected = Some(spin.outcome.clone());
        log::debug!("{} wheel: landed on {}", self.name, spin.outcome.name);
        Some(spin.outcome)
    }

    /// Abort any spin and return to a freshly created state. Produces no
    /// landing event.
    pub fn reset(&mut self) {
        self.timers.cancel_all();
        if self.active.take().is_some() {
            log::debug!("{} wheel: spin aborted by reset", self.name);
        }
        self.generation += 1;
        self.state = SpinState::default();
    }

    /// Rotation to draw right now, following the easing curve mid-spin
    pub fn displayed_rotation(&self) -> f64 {
        match &self.active {
            Some(spin) => {
                let elapsed = self.timers.now().saturating_sub(spin.started_at);
                let progress = elapsed.as_secs_f64() / self.settings.duration.as_secs_f64().max(f64::EPSILON);
                spin.from + (spin.to - spin.from) * SPIN_EASING.ease(progress)
            }
            None => self.state.rotation,
        }
    }

    /// Fraction of the current spin elapsed, `None` when idle
    pub fn progress(&self) -> Option<f64> {
        self.active.as_ref().map(|spin| {
            let elapsed = self.timers.now().saturating_sub(spin.started_at);
            (elapsed.as_secs_f64() / self.settings.duration.as_secs_f64().max(f64::EPSILON)).min(1.0)
        })
    }

    /// Timers still pending for the current spin
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }
}
