//! Randomizer state
//!
//! The application model behind the terminal UI. It owns the catalog, the
//! dual-wheel session, the persisted preferences and audio, and turns user
//! commands into session requests. Refused requests surface as a notice.

use std::fmt::Display;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::audio::{AudioManager, SoundId};
use crate::catalog::{Catalog, CatalogError, CatalogLoader, GameCatalog};
use crate::config::RandomizerConfig;
use crate::save::{Favorite, Preferences, load_preferences, save_preferences};
use crate::session::{
    DualWheelSession, SessionEvent, SpinRecord, cycle_value, difficulty_values, playstyle_values,
};

use super::browser::BrowserState;

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Wheels,
    Browser,
    Quit,
}

/// A blocking message the user has to dismiss
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub title: String,
    pub text: String,
}

/// A line in the status log
#[derive(Debug, Clone)]
pub struct LogMessage {
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Result,
    Warning,
}

const MAX_MESSAGES: usize = 50;

pub struct Randomizer {
    view: View,
    catalog: Catalog,
    config: RandomizerConfig,
    session: DualWheelSession,
    prefs: Preferences,
    audio: AudioManager,
    notice: Option<Notice>,
    messages: Vec<LogMessage>,
    browser: BrowserState,
    /// Write preferences to disk on change
    persist_prefs: bool,
}

impl Randomizer {
    /// Load config, catalog, preferences and audio from their usual places
    pub fn new() -> Result<Self, CatalogError> {
        let config = RandomizerConfig::load();
        let catalog = CatalogLoader::new().into_catalog();
        let prefs = load_preferences();
        let audio = AudioManager::new(prefs.sound_enabled);
        let mut randomizer = Self::with_parts(catalog, config, prefs, audio, StdRng::from_entropy())?;
        randomizer.persist_prefs = true;
        Ok(randomizer)
    }

    /// Assemble from explicit parts. Preferences are kept in memory only.
    pub fn with_parts(
        catalog: Catalog,
        config: RandomizerConfig,
        prefs: Preferences,
        audio: AudioManager,
        rng: StdRng,
    ) -> Result<Self, CatalogError> {
        let game = catalog
            .game(&config.default_game)
            .or_else(|| catalog.games.first())
            .cloned()
            .ok_or(CatalogError::Empty)?;
        if game.id != config.default_game {
            log::warn!("Default game {} not in catalog, using {}", config.default_game, game.id);
        }

        let session = DualWheelSession::with_rng(game, &config, rng);
        let mut audio = audio;
        audio.set_enabled(prefs.sound_enabled);
        audio.set_master_volume(config.volume);

        Ok(Self {
            view: View::Wheels,
            catalog,
            config,
            session,
            prefs,
            audio,
            notice: None,
            messages: Vec::new(),
            browser: BrowserState::default(),
            persist_prefs: false,
        })
    }

    // === Accessors ===

    pub fn view(&self) -> View {
        self.view
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn game(&self) -> &GameCatalog {
        self.session.game()
    }

    pub fn config(&self) -> &RandomizerConfig {
        &self.config
    }

    pub fn session(&self) -> &DualWheelSession {
        &self.session
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn messages(&self) -> &[LogMessage] {
        &self.messages
    }

    pub fn browser(&self) -> &BrowserState {
        &self.browser
    }

    pub fn sound_enabled(&self) -> bool {
        self.prefs.sound_enabled
    }

    pub fn should_quit(&self) -> bool {
        self.view == View::Quit
    }

    pub fn play_sound(&mut self, sound_id: SoundId) {
        self.audio.play(sound_id);
    }

    pub fn add_message(&mut self, text: impl Into<String>, kind: MessageKind) {
        self.messages.push(LogMessage { text: text.into(), kind });
        if self.messages.len() > MAX_MESSAGES {
            self.messages.remove(0);
        }
    }

    /// Show a blocking notice
    pub fn show_notice(&mut self, title: impl Into<String>, text: impl Into<String>) {
        let notice = Notice { title: title.into(), text: text.into() };
        log::debug!("Notice: {} - {}", notice.title, notice.text);
        self.notice = Some(notice);
        self.audio.play(SoundId::Error);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Report a refused command. Returns the value on success.
    fn check<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.show_notice("Not now", e.to_string());
                None
            }
        }
    }

    // === Frame update ===

    /// Advance the session and turn its events into feedback
    pub fn update(&mut self, delta: Duration) {
        for event in self.session.update(delta) {
            match event {
                SessionEvent::Started { .. } => self.audio.play(SoundId::SpinStart),
                SessionEvent::Tick { .. } => self.audio.play(SoundId::Tick),
                SessionEvent::ClassSelected { item, locked } => {
                    if !locked {
                        self.audio.play(SoundId::ClassLanded);
                    }
                    self.add_message(format!("Class: {}", item.name), MessageKind::Info);
                }
                SessionEvent::BuildSelected { .. } => self.audio.play(SoundId::BuildLanded),
                SessionEvent::Finished(record) => {
                    self.add_message(format!("Result: {}", record.label()), MessageKind::Result);
                }
                SessionEvent::Aborted(e) => {
                    self.add_message(e.to_string(), MessageKind::Warning);
                    self.show_notice("Spin stopped", e.to_string());
                }
            }
        }
    }

    // === Commands ===

    pub fn spin(&mut self) {
        let result = self.session.request_spin();
        if self.check(result).is_some() {
            log::debug!("Spin accepted");
        }
    }

    pub fn toggle_class_excluded(&mut self, class_id: &str) {
        let result = self.session.toggle_class_excluded(class_id);
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuSelect);
        }
    }

    pub fn toggle_build_excluded(&mut self, build_id: &str) {
        let result = self.session.toggle_build_excluded(build_id);
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuSelect);
        }
    }

    pub fn cycle_difficulty(&mut self) {
        let values = difficulty_values(self.game());
        let next = cycle_value(self.session.filters().difficulty.as_deref(), &values);
        let result = self.session.set_difficulty(next);
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuMove);
        }
    }

    pub fn cycle_playstyle(&mut self) {
        let values = playstyle_values(self.game());
        let next = cycle_value(self.session.filters().playstyle.as_deref(), &values);
        let result = self.session.set_playstyle(next);
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuMove);
        }
    }

    /// Lock the wheel to this class, or unlock it if already locked to it
    pub fn toggle_class_lock(&mut self, class_id: &str) {
        let already = self.session.locked_class().is_some_and(|c| c.id == class_id);
        let result = if already {
            self.session.unlock_class()
        } else {
            self.session.lock_class(class_id)
        };
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuSelect);
        }
    }

    /// Lock the wheel to this build, or unlock it if already locked to it
    pub fn toggle_build_lock(&mut self, build_id: &str) {
        let already = self.session.locked_build().is_some_and(|b| b.id == build_id);
        let result = if already {
            self.session.unlock_build()
        } else {
            self.session.lock_build(build_id)
        };
        if self.check(result).is_some() {
            self.audio.play(SoundId::MenuSelect);
        }
    }

    /// Switch game; filters, locks and wheels start over
    pub fn switch_game(&mut self, game_id: &str) {
        let game = match self.catalog.game(game_id) {
            Some(game) => game.clone(),
            None => {
                let e = CatalogError::UnknownGame(game_id.to_string());
                self.show_notice("Unknown game", e.to_string());
                return;
            }
        };
        let result = self.session.set_game(game);
        if self.check(result).is_some() {
            self.browser = BrowserState::default();
            let name = self.game().name.clone();
            self.add_message(format!("Switched to {}", name), MessageKind::Info);
            self.audio.play(SoundId::MenuSelect);
        }
    }

    /// Cycle to the next game in the catalog
    pub fn next_game(&mut self) {
        let count = self.catalog.games.len();
        if count < 2 {
            return;
        }
        let current = self.catalog.index_of(&self.game().id).unwrap_or(0);
        let next_id = self.catalog.games[(current + 1) % count].id.clone();
        self.switch_game(&next_id);
    }

    /// Clear filters, locks and selections of the current game
    pub fn reset(&mut self) {
        self.session.reset();
        self.add_message("Reset", MessageKind::Info);
    }

    /// The favorite matching the latest result, if a result is shown
    pub fn current_favorite(&self) -> Option<Favorite> {
        if self.session.is_spinning() {
            return None;
        }
        let class = self.session.selected_class()?;
        let build = self.session.selected_build()?;
        Some(Favorite {
            game_id: self.game().id.clone(),
            class_id: class.id.clone(),
            build_id: build.id.clone(),
            class_name: class.name.clone(),
            build_name: build.name.clone(),
        })
    }

    pub fn toggle_favorite(&mut self) {
        let favorite = match self.current_favorite() {
            Some(f) => f,
            None => {
                self.show_notice("No result", "Spin the wheels before saving a favorite");
                return;
            }
        };
        let label = format!("{} / {}", favorite.class_name, favorite.build_name);
        if self.prefs.toggle_favorite(favorite) {
            self.add_message(format!("Favorited {}", label), MessageKind::Info);
        } else {
            self.add_message(format!("Removed favorite {}", label), MessageKind::Info);
        }
        self.audio.play(SoundId::MenuSelect);
        self.save_prefs();
    }

    pub fn toggle_sound(&mut self) {
        self.prefs.sound_enabled = !self.prefs.sound_enabled;
        self.audio.set_enabled(self.prefs.sound_enabled);
        let state = if self.prefs.sound_enabled { "on" } else { "off" };
        self.add_message(format!("Sound {}", state), MessageKind::Info);
        self.save_prefs();
    }

    fn save_prefs(&mut self) {
        if !self.persist_prefs {
            return;
        }
        if let Err(e) = save_preferences(&self.prefs) {
            log::warn!("Failed to save preferences: {}", e);
            self.add_message("Could not save preferences", MessageKind::Warning);
        }
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Wheels => View::Browser,
            View::Browser | View::Quit => View::Wheels,
        };
        self.audio.play(SoundId::MenuMove);
    }

    pub fn browser_mut(&mut self) -> &mut BrowserState {
        &mut self.browser
    }

    pub fn cycle_browser_source(&mut self) {
        let game = self.session.game().clone();
        self.browser.cycle_source(&game);
    }

    pub fn cycle_browser_class(&mut self) {
        let game = self.session.game().clone();
        self.browser.cycle_class(&game);
    }

    pub fn cycle_browser_tier(&mut self) {
        let game = self.session.game().clone();
        self.browser.cycle_tier(&game);
    }

    pub fn latest_result(&self) -> Option<&SpinRecord> {
        self.session.history().latest()
    }

    pub fn quit(&mut self) {
        log::info!("Quitting");
        self.view = View::Quit;
    }
}
