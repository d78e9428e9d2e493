//! Persisted user preferences
//!
//! Sound toggle and favorite class/build pairs. Read once at startup and
//! written on every change; the last write wins.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current preferences version for compatibility
const PREFS_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PrefsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A favorited class and build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    pub game_id: String,
    pub class_id: String,
    pub build_id: String,
    pub class_name: String,
    pub build_name: String,
}

impl Favorite {
    pub fn same_pair(&self, other: &Favorite) -> bool {
        self.game_id == other.game_id && self.class_id == other.class_id && self.build_id == other.build_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub version: u32,
    pub sound_enabled: bool,
    pub favorites: Vec<Favorite>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFS_VERSION,
            sound_enabled: true,
            favorites: Vec::new(),
        }
    }
}

impl Preferences {
    pub fn is_favorite(&self, favorite: &Favorite) -> bool {
        self.favorites.iter().any(|f| f.same_pair(favorite))
    }

    /// Add or remove a favorite. Returns true when it is now a favorite.
    pub fn toggle_favorite(&mut self, favorite: Favorite) -> bool {
        match self.favorites.iter().position(|f| f.same_pair(&favorite)) {
            Some(index) => {
                self.favorites.remove(index);
                false
            }
            None => {
                self.favorites.push(favorite);
                true
            }
        }
    }

    pub fn favorites_for<'a>(&'a self, game_id: &'a str) -> impl Iterator<Item = &'a Favorite> + 'a {
        self.favorites.iter().filter(move |f| f.game_id == game_id)
    }
}

// ============================================================================
// Storage
// ============================================================================

/// Where preferences live
pub fn prefs_path() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "buildwheel", "Buildwheel") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("preferences.json");
        path
    } else {
        PathBuf::from("./preferences.json")
    }
}

/// Load preferences from the default location
pub fn load_preferences() -> Preferences {
    load_preferences_from(&prefs_path())
}

/// Load preferences, falling back to defaults on any error
pub fn load_preferences_from(path: &Path) -> Preferences {
    if !path.exists() {
        log::info!("No preferences at {:?}, using defaults", path);
        return Preferences::default();
    }

    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str(&data) {
            Ok(prefs) => {
                log::info!("Preferences loaded from {:?}", path);
                prefs
            }
            Err(e) => {
                log::warn!("Failed to parse preferences: {}, using defaults", e);
                Preferences::default()
            }
        },
        Err(e) => {
            log::warn!("Failed to read preferences: {}, using defaults", e);
            Preferences::default()
        }
    }
}

pub fn save_preferences(prefs: &Preferences) -> Result<(), PrefsError> {
    save_preferences_to(prefs, &prefs_path())
}

pub fn save_preferences_to(prefs: &Preferences, path: &Path) -> Result<(), PrefsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(prefs)?;
    fs::write(path, json)?;
    log::debug!("Preferences saved to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite(build: &str) -> Favorite {
        Favorite {
            game_id: "diablo4".into(),
            class_id: "barbarian".into(),
            build_id: build.into(),
            class_name: "Barbarian".into(),
            build_name: build.into(),
        }
    }

    #[test]
    fn test_toggle_favorite() {
        let mut prefs = Preferences::default();
        assert!(prefs.toggle_favorite(favorite("hota-barb")));
        assert!(prefs.is_favorite(&favorite("hota-barb")));
        assert_eq!(prefs.favorites_for("diablo4").count(), 1);
        assert_eq!(prefs.favorites_for("poe1").count(), 0);

        assert!(!prefs.toggle_favorite(favorite("hota-barb")));
        assert!(prefs.favorites.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir()
            .join(format!("buildwheel-prefs-{}", std::process::id()))
            .join("preferences.json");

        let mut prefs = Preferences::default();
        prefs.sound_enabled = false;
        prefs.toggle_favorite(favorite("rend-barb"));
        save_preferences_to(&prefs, &path).unwrap();

        assert_eq!(load_preferences_from(&path), prefs);

        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_preferences_from(&path), Preferences::default());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_fields_default() {
        let prefs: Preferences = serde_json::from_str(r#"{"sound_enabled": false}"#).unwrap();
        assert!(!prefs.sound_enabled);
        assert_eq!(prefs.version, PREFS_VERSION);
        assert!(prefs.favorites.is_empty());
    }
}
