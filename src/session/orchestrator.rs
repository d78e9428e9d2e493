//! Dual-wheel session
//!
//! Composes the class wheel and the build wheel into one spin: the class
//! wheel runs first, and once it lands the build wheel spins over that
//! class's builds after a short pause. Either wheel can be locked to a
//! fixed item, which skips its animation.
//!
//! The session is the only writer of the selected class and build. While a
//! session spin is in flight every filter, lock and game change is refused,
//! so the item list a wheel resolved against stays put until it lands.

use std::mem;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::catalog::GameCatalog;
use crate::config::RandomizerConfig;
use crate::wheel::{SpinAnimator, SpinError, TimerId, TimerQueue, WheelEvent, WheelItem};

use super::filters::{build_item, class_item, Filters};
use super::history::{History, SpinRecord};

/// Which of the two wheels an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelKind {
    Class,
    Build,
}

/// Where a session spin currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    ClassSpinning,
    /// Class chosen, build wheel about to start
    BetweenWheels,
    BuildSpinning,
}

/// Observable results of advancing a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Started { class_locked: bool, build_locked: bool },
    Tick { wheel: WheelKind },
    ClassSelected { item: WheelItem, locked: bool },
    BuildSelected { item: WheelItem, locked: bool },
    Finished(SpinRecord),
    /// The build stage found nothing to spin; the session ended early
    Aborted(SpinError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SessionTimer {
    StartBuildSpin { generation: u64 },
}

pub struct DualWheelSession {
    game: GameCatalog,
    filters: Filters,
    class_wheel: SpinAnimator,
    build_wheel: SpinAnimator,
    timers: TimerQueue<SessionTimer>,
    /// Pending start of the build wheel, between the two spins
    build_timer: Option<TimerId>,
    /// Bumped per session spin and on reset
    generation: u64,
    phase: SessionPhase,
    locked_class: Option<WheelItem>,
    locked_build: Option<WheelItem>,
    selected_class: Option<WheelItem>,
    selected_build: Option<WheelItem>,
    /// Events raised outside `update`, handed out by the next `update`
    outbox: Vec<SessionEvent>,
    history: History,
    inter_wheel_delay: Duration,
    rng: StdRng,
}

impl DualWheelSession {
    pub fn new(game: GameCatalog, config: &RandomizerConfig) -> Self {
        Self::with_rng(game, config, StdRng::from_entropy())
    }

    /// Create with a fixed random source
    pub fn with_rng(game: GameCatalog, config: &RandomizerConfig, rng: StdRng) -> Self {
        let settings = config.animator_settings();
        let mut session = Self {
            game,
            filters: Filters::default(),
            class_wheel: SpinAnimator::new("class", settings.clone()),
            build_wheel: SpinAnimator::new("build", settings),
            timers: TimerQueue::new(),
            build_timer: None,
            generation: 0,
            phase: SessionPhase::Idle,
            locked_class: None,
            locked_build: None,
            selected_class: None,
            selected_build: None,
            outbox: Vec::new(),
            history: History::new(config.history_limit),
            inter_wheel_delay: config.inter_wheel_delay(),
            rng,
        };
        session.refresh_wheels();
        session
    }

    // === Accessors ===

    pub fn game(&self) -> &GameCatalog {
        &self.game
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn class_wheel(&self) -> &SpinAnimator {
        &self.class_wheel
    }

    pub fn build_wheel(&self) -> &SpinAnimator {
        &self.build_wheel
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_spinning(&self) -> bool {
        self.phase != SessionPhase::Idle
    }

    pub fn locked_class(&self) -> Option<&WheelItem> {
        self.locked_class.as_ref()
    }

    pub fn locked_build(&self) -> Option<&WheelItem> {
        self.locked_build.as_ref()
    }

    pub fn selected_class(&self) -> Option<&WheelItem> {
        self.selected_class.as_ref()
    }

    pub fn selected_build(&self) -> Option<&WheelItem> {
        self.selected_build.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    // === Spinning ===

    /// Start a session spin. Validates everything before touching state, so
    /// a refused request leaves the session exactly as it was.
    pub fn request_spin(&mut self) -> Result<(), SpinError> {
        if self.is_spinning() {
            return Err(SpinError::AlreadySpinning);
        }
        if self.locked_class.is_some() && self.locked_build.is_some() {
            return Err(SpinError::AllLocked);
        }

        let class_candidates = self.class_candidates();
        if class_candidates.is_empty() {
            return Err(SpinError::NothingToSpin);
        }
        if self.locked_class.is_none() {
            self.class_wheel.set_items(class_candidates)?;
        }

        self.generation += 1;
        self.cancel_build_timer();
        self.selected_class = None;
        self.selected_build = None;
        self.outbox.push(SessionEvent::Started {
            class_locked: self.locked_class.is_some(),
            build_locked: self.locked_build.is_some(),
        });

        if let Some(locked) = self.locked_class.clone() {
            log::info!("Session spin with class locked to {}", locked.name);
            self.selected_class = Some(locked.clone());
            self.outbox.push(SessionEvent::ClassSelected { item: locked.clone(), locked: true });
            let mut events = Vec::new();
            self.start_build_spin(&locked.id, &mut events);
            self.outbox.extend(events);
            return Ok(());
        }

        if self.class_wheel.spin(&mut self.rng).is_none() {
            self.outbox.clear();
            return Err(SpinError::NothingToSpin);
        }
        self.phase = SessionPhase::ClassSpinning;
        log::info!("Session spin started ({} classes)", self.class_wheel.items().len());
        Ok(())
    }

    /// Advance both wheels and the inter-wheel timer by one frame
    pub fn update(&mut self, delta: Duration) -> Vec<SessionEvent> {
        let mut events = mem::take(&mut self.outbox);
        // Timers set while the wheels update count from the end of this frame
        self.timers.advance(delta);

        for event in self.class_wheel.update(delta) {
            match event {
                WheelEvent::Tick { .. } => events.push(SessionEvent::Tick { wheel: WheelKind::Class }),
                WheelEvent::Landed(item) => self.on_class_landed(item, &mut events),
            }
        }

        for event in self.build_wheel.update(delta) {
            match event {
                WheelEvent::Tick { .. } => events.push(SessionEvent::Tick { wheel: WheelKind::Build }),
                WheelEvent::Landed(item) => {
                    if self.phase == SessionPhase::BuildSpinning {
                        self.finish(item, false, &mut events);
                    }
                }
            }
        }

        while let Some(timer) = self.timers.pop_due() {
            match timer {
                SessionTimer::StartBuildSpin { generation }
                    if generation == self.generation && self.phase == SessionPhase::BetweenWheels =>
                {
                    self.build_timer = None;
                    if let Some(class) = self.selected_class.clone() {
                        self.start_build_spin(&class.id, &mut events);
                    }
                }
                stale => log::debug!("Session: discarded stale timer {:?}", stale),
            }
        }

        events
    }

    fn on_class_landed(&mut self, item: WheelItem, events: &mut Vec<SessionEvent>) {
        if self.phase != SessionPhase::ClassSpinning {
            return;
        }
        log::debug!("Session: class landed on {}", item.name);
        self.selected_class = Some(item.clone());
        events.push(SessionEvent::ClassSelected { item, locked: false });

        if let Some(locked) = self.locked_build.clone() {
            self.finish(locked, true, events);
            return;
        }

        self.phase = SessionPhase::BetweenWheels;
        let id = self
            .timers
            .schedule_in(self.inter_wheel_delay, SessionTimer::StartBuildSpin { generation: self.generation });
        self.build_timer = Some(id);
    }

    fn cancel_build_timer(&mut self) {
        if let Some(id) = self.build_timer.take() {
            if self.timers.cancel(id) {
                log::debug!("Session: pending build spin cancelled");
            }
        }
    }

    fn start_build_spin(&mut self, class_id: &str, events: &mut Vec<SessionEvent>) {
        let items = self.filters.build_items(&self.game, class_id);
        let started = self.build_wheel.set_items(items).is_ok() && self.build_wheel.spin(&mut self.rng).is_some();
        if started {
            self.phase = SessionPhase::BuildSpinning;
            log::debug!("Session: build wheel spinning over {} builds", self.build_wheel.items().len());
        } else {
            log::warn!("Session: no builds to spin for {}", class_id);
            self.phase = SessionPhase::Idle;
            events.push(SessionEvent::Aborted(SpinError::NothingToSpin));
        }
    }

    fn finish(&mut self, build: WheelItem, locked: bool, events: &mut Vec<SessionEvent>) {
        self.phase = SessionPhase::Idle;
        let class = match self.selected_class.clone() {
            Some(class) => class,
            None => {
                log::warn!("Session: build {} landed without a selected class, result dropped", build.name);
                return;
            }
        };
        self.selected_build = Some(build.clone());
        events.push(SessionEvent::BuildSelected { item: build.clone(), locked });

        let record = SpinRecord {
            game_id: self.game.id.clone(),
            class_id: class.id,
            class_name: class.name,
            build_id: build.id,
            build_name: build.name,
            class_locked: self.locked_class.is_some(),
            build_locked: locked,
        };
        log::info!("Session result: {}", record.label());
        self.history.push(record.clone());
        events.push(SessionEvent::Finished(record));
    }

    /// Items the class wheel may land on for the next spin
    fn class_candidates(&self) -> Vec<WheelItem> {
        let eligible = self.filters.class_items(&self.game);
        if let Some(locked) = &self.locked_class {
            return eligible.into_iter().filter(|c| c.id == locked.id).collect();
        }
        match &self.locked_build {
            Some(build) => eligible
                .into_iter()
                .filter(|c| {
                    self.filters
                        .build_items(&self.game, &c.id)
                        .iter()
                        .any(|b| b.id == build.id)
                })
                .collect(),
            None => eligible,
        }
    }

    /// Recompute what the idle wheels display
    fn refresh_wheels(&mut self) {
        if self.is_spinning() {
            return;
        }
        let class_items = match &self.locked_class {
            Some(locked) => vec![locked.clone()],
            None => self.class_candidates(),
        };
        let build_items = match (&self.locked_build, &self.selected_class) {
            (Some(locked), _) => vec![locked.clone()],
            (None, Some(class)) => self.filters.build_items(&self.game, &class.id),
            (None, None) => self.filters.all_build_items(&self.game),
        };
        // Neither wheel spins while the session is idle
        if let Err(e) = self.class_wheel.set_items(class_items) {
            log::debug!("Session: class wheel not refreshed: {}", e);
        }
        if let Err(e) = self.build_wheel.set_items(build_items) {
            log::debug!("Session: build wheel not refreshed: {}", e);
        }
    }

    // === State changes (idle only) ===

    fn ensure_idle(&self) -> Result<(), SpinError> {
        if self.is_spinning() {
            log::debug!("Session: change refused while spinning");
            return Err(SpinError::SessionBusy);
        }
        Ok(())
    }

    /// Drop the shown result and recompute the wheels after a change
    fn selection_changed(&mut self) {
        self.selected_class = None;
        self.selected_build = None;
        self.refresh_wheels();
    }

    /// Returns true when the class is now excluded
    pub fn toggle_class_excluded(&mut self, class_id: &str) -> Result<bool, SpinError> {
        self.ensure_idle()?;
        if self.game.class(class_id).is_none() {
            return Err(SpinError::UnknownItem { kind: "class", id: class_id.to_string() });
        }
        let excluded = self.filters.toggle_class(class_id);
        self.selection_changed();
        Ok(excluded)
    }

    /// Returns true when the build is now excluded
    pub fn toggle_build_excluded(&mut self, build_id: &str) -> Result<bool, SpinError> {
        self.ensure_idle()?;
        if self.game.find_build(build_id).is_none() {
            return Err(SpinError::UnknownItem { kind: "build", id: build_id.to_string() });
        }
        let excluded = self.filters.toggle_build(build_id);
        self.selection_changed();
        Ok(excluded)
    }

    pub fn set_difficulty(&mut self, difficulty: Option<String>) -> Result<(), SpinError> {
        self.ensure_idle()?;
        self.filters.difficulty = difficulty;
        self.selection_changed();
        Ok(())
    }

    pub fn set_playstyle(&mut self, playstyle: Option<String>) -> Result<(), SpinError> {
        self.ensure_idle()?;
        self.filters.playstyle = playstyle;
        self.selection_changed();
        Ok(())
    }

    pub fn lock_class(&mut self, class_id: &str) -> Result<(), SpinError> {
        self.ensure_idle()?;
        let class = self
            .game
            .class(class_id)
            .ok_or_else(|| SpinError::UnknownItem { kind: "class", id: class_id.to_string() })?;
        log::debug!("Session: class locked to {}", class.name);
        self.locked_class = Some(class_item(class));
        self.selection_changed();
        Ok(())
    }

    pub fn unlock_class(&mut self) -> Result<(), SpinError> {
        self.ensure_idle()?;
        self.locked_class = None;
        self.selection_changed();
        Ok(())
    }

    pub fn lock_build(&mut self, build_id: &str) -> Result<(), SpinError> {
        self.ensure_idle()?;
        let (class, build) = self
            .game
            .find_build(build_id)
            .ok_or_else(|| SpinError::UnknownItem { kind: "build", id: build_id.to_string() })?;
        log::debug!("Session: build locked to {}", build.name);
        self.locked_build = Some(build_item(class, build));
        self.selection_changed();
        Ok(())
    }

    pub fn unlock_build(&mut self) -> Result<(), SpinError> {
        self.ensure_idle()?;
        self.locked_build = None;
        self.selection_changed();
        Ok(())
    }

    /// Switch to another game. Filters, locks, selections and both wheels
    /// start over; history is kept.
    pub fn set_game(&mut self, game: GameCatalog) -> Result<(), SpinError> {
        self.ensure_idle()?;
        log::info!("Session: switched to {}", game.name);
        self.game = game;
        self.reset();
        Ok(())
    }

    /// Abort any spin and return to defaults. Safe at any time; pending
    /// ticks, landings and the inter-wheel timer are all dropped.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.cancel_build_timer();
        self.class_wheel.reset();
        self.build_wheel.reset();
        self.outbox.clear();
        self.phase = SessionPhase::Idle;
        self.filters = Filters::default();
        self.locked_class = None;
        self.locked_build = None;
        self.selected_class = None;
        self.selected_build = None;
        self.refresh_wheels();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BuildEntry, ClassEntry};

    const FRAME: Duration = Duration::from_millis(16);

    fn make_game() -> GameCatalog {
        let class = |id: &str, builds: &[&str]| ClassEntry {
            id: id.into(),
            name: id.to_uppercase(),
            color: None,
            base_class: None,
            skills: builds.iter().map(|b| BuildEntry::new(*b, b.to_uppercase())).collect(),
        };
        GameCatalog {
            id: "test".into(),
            name: "Test".into(),
            classes: vec![
                class("mage", &["fireball", "frostbolt", "arcane"]),
                class("rogue", &["stab", "poison"]),
                class("paladin", &["smite", "shield", "consecrate", "judgment"]),
            ],
        }
    }

    fn session(seed: u64) -> DualWheelSession {
        DualWheelSession::with_rng(make_game(), &RandomizerConfig::default(), StdRng::seed_from_u64(seed))
    }

    /// Step frames until the session finishes, collecting every event
    fn run_to_end(session: &mut DualWheelSession) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for _ in 0..2000 {
            events.extend(session.update(FRAME));
            if !session.is_spinning() {
                events.extend(session.update(FRAME));
                break;
            }
        }
        events
    }

    fn finished(events: &[SessionEvent]) -> Vec<&SpinRecord> {
        events
            .iter()
            .filter_map(|e| match e {
                SessionEvent::Finished(record) => Some(record),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_build_always_belongs_to_class() {
        for seed in 0..40 {
            let mut s = session(seed);
            s.request_spin().unwrap();
            let events = run_to_end(&mut s);

            let records = finished(&events);
            assert_eq!(records.len(), 1);
            let game = make_game();
            let class = game.class(&records[0].class_id).unwrap();
            assert!(class.build(&records[0].build_id).is_some(), "seed {}", seed);
            assert_eq!(s.selected_build().and_then(|b| b.class_id.clone()), Some(class.id.clone()));
        }
    }

    #[test]
    fn test_build_wheel_waits_for_class_wheel() {
        let mut s = session(7);
        s.request_spin().unwrap();
        let mut class_landed_at = None;
        let mut build_started_at = None;
        let mut elapsed = Duration::ZERO;

        for _ in 0..1000 {
            let events = s.update(FRAME);
            elapsed += FRAME;
            if events.iter().any(|e| matches!(e, SessionEvent::ClassSelected { .. })) {
                class_landed_at = Some(elapsed);
                assert!(!s.build_wheel().is_spinning());
            }
            if build_started_at.is_none() && s.build_wheel().is_spinning() {
                build_started_at = Some(elapsed);
            }
            if !s.is_spinning() {
                break;
            }
        }

        let landed = class_landed_at.unwrap();
        let started = build_started_at.unwrap();
        assert!(landed >= Duration::from_millis(4000));
        assert!(started >= landed + Duration::from_millis(100));
    }

    #[test]
    fn test_inter_wheel_delay_survives_long_frame() {
        let mut s = session(7);
        s.request_spin().unwrap();

        // One stalled frame covering the whole class spin
        let events = s.update(Duration::from_millis(4000));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::ClassSelected { .. })));
        assert_eq!(s.phase(), SessionPhase::BetweenWheels);
        assert!(!s.build_wheel().is_spinning());

        s.update(Duration::from_millis(99));
        assert!(!s.build_wheel().is_spinning());
        s.update(Duration::from_millis(1));
        assert!(s.build_wheel().is_spinning());
        assert_eq!(s.phase(), SessionPhase::BuildSpinning);
    }

    #[test]
    fn test_class_lock_skips_class_wheel() {
        let mut s = session(3);
        s.lock_class("rogue").unwrap();
        let rotation_before = s.class_wheel().state().rotation;

        s.request_spin().unwrap();
        assert_eq!(s.selected_class().map(|c| c.id.as_str()), Some("rogue"));
        assert_eq!(s.phase(), SessionPhase::BuildSpinning);

        let events = run_to_end(&mut s);
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Tick { wheel: WheelKind::Class })));
        assert!(events.iter().any(|e| matches!(e, SessionEvent::ClassSelected { locked: true, .. })));
        assert_eq!(s.class_wheel().state().rotation, rotation_before);

        let record = finished(&events)[0];
        assert_eq!(record.class_id, "rogue");
        assert!(["stab", "poison"].contains(&record.build_id.as_str()));
        assert!(record.class_locked);
    }

    #[test]
    fn test_build_lock_finalizes_after_class() {
        let mut s = session(11);
        s.lock_build("shield").unwrap();
        assert_eq!(s.class_wheel().items().len(), 1);

        s.request_spin().unwrap();
        let events = run_to_end(&mut s);
        assert!(!events.iter().any(|e| matches!(e, SessionEvent::Tick { wheel: WheelKind::Build })));

        let record = finished(&events)[0];
        assert_eq!(record.class_id, "paladin");
        assert_eq!(record.build_id, "shield");
        assert!(record.build_locked);
    }

    #[test]
    fn test_both_locked_rejected() {
        let mut s = session(1);
        s.lock_class("mage").unwrap();
        s.lock_build("fireball").unwrap();
        assert_eq!(s.request_spin(), Err(SpinError::AllLocked));
        assert!(!s.is_spinning());
    }

    #[test]
    fn test_nothing_to_spin() {
        let mut s = session(1);
        for class in ["mage", "rogue", "paladin"] {
            s.toggle_class_excluded(class).unwrap();
        }
        assert_eq!(s.request_spin(), Err(SpinError::NothingToSpin));
        assert!(s.update(FRAME).is_empty());

        let mut s = session(1);
        s.toggle_class_excluded("rogue").unwrap();
        s.lock_build("stab").unwrap();
        assert_eq!(s.request_spin(), Err(SpinError::NothingToSpin));
    }

    #[test]
    fn test_changes_blocked_while_spinning() {
        let mut s = session(5);
        s.request_spin().unwrap();
        let items_before = s.class_wheel().items().to_vec();

        assert_eq!(s.request_spin(), Err(SpinError::AlreadySpinning));
        assert_eq!(s.toggle_class_excluded("mage"), Err(SpinError::SessionBusy));
        assert_eq!(s.set_difficulty(Some("Easy".into())), Err(SpinError::SessionBusy));
        assert_eq!(s.lock_class("mage"), Err(SpinError::SessionBusy));
        assert_eq!(s.set_game(make_game()), Err(SpinError::SessionBusy));
        assert_eq!(s.class_wheel().items(), items_before.as_slice());

        run_to_end(&mut s);
        assert_eq!(s.toggle_class_excluded("mage"), Ok(true));
        assert!(s.selected_class().is_none());
    }

    #[test]
    fn test_reset_cancels_everything() {
        let mut s = session(9);
        s.request_spin().unwrap();
        s.update(Duration::from_millis(100));
        s.reset();

        let mut events = Vec::new();
        for _ in 0..600 {
            events.extend(s.update(FRAME));
        }
        assert!(events.is_empty());
        assert!(s.selected_class().is_none());
        assert_eq!(s.class_wheel().state().rotation, 0.0);
        assert!(s.history().is_empty());
    }

    #[test]
    fn test_reset_between_wheels_drops_build_spin() {
        let mut s = session(13);
        s.request_spin().unwrap();
        for _ in 0..1000 {
            s.update(FRAME);
            if s.phase() == SessionPhase::BetweenWheels {
                break;
            }
        }
        assert_eq!(s.phase(), SessionPhase::BetweenWheels);
        s.reset();
        assert!(s.build_timer.is_none());
        assert_eq!(s.timers.pending(), 0);
        for _ in 0..20 {
            assert!(s.update(FRAME).is_empty());
        }
        assert!(!s.build_wheel().is_spinning());
    }

    #[test]
    fn test_build_without_class_records_nothing() {
        let mut s = session(5);
        let mut events = Vec::new();
        s.finish(WheelItem::new("whirlwind", "Whirlwind"), false, &mut events);
        assert!(events.is_empty());
        assert!(s.selected_build().is_none());
        assert!(s.history().is_empty());
        assert_eq!(s.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_history_capped() {
        let config = RandomizerConfig { history_limit: 2, ..RandomizerConfig::default() };
        let mut s = DualWheelSession::with_rng(make_game(), &config, StdRng::seed_from_u64(2));
        for _ in 0..3 {
            s.request_spin().unwrap();
            run_to_end(&mut s);
        }
        assert_eq!(s.history().len(), 2);
    }

    #[test]
    fn test_unknown_items() {
        let mut s = session(1);
        assert!(matches!(s.lock_class("bard"), Err(SpinError::UnknownItem { kind: "class", .. })));
        assert!(matches!(s.toggle_build_excluded("lute"), Err(SpinError::UnknownItem { kind: "build", .. })));
    }

    #[test]
    fn test_idle_build_wheel_display() {
        let mut s = session(4);
        assert_eq!(s.build_wheel().items().len(), 9);
        s.toggle_build_excluded("smite").unwrap();
        assert_eq!(s.build_wheel().items().len(), 8);

        s.request_spin().unwrap();
        run_to_end(&mut s);
        let class = s.selected_class().unwrap().id.clone();
        assert!(s.build_wheel().items().iter().all(|b| b.class_id.as_deref() == Some(class.as_str())));
    }
}
