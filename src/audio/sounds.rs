//! Sound definitions
//!
//! Every sound the randomizer can play, and where its file lives.

use std::path::Path;

/// Sound event identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundId {
    /// One pulse while a wheel spins
    Tick,
    /// A session spin was accepted
    SpinStart,
    ClassLanded,
    /// The build wheel (and so the session) finished
    BuildLanded,
    MenuMove,
    MenuSelect,
    /// A command was refused
    Error,
}

impl SoundId {
    pub const ALL: [SoundId; 7] = [
        SoundId::Tick,
        SoundId::SpinStart,
        SoundId::ClassLanded,
        SoundId::BuildLanded,
        SoundId::MenuMove,
        SoundId::MenuSelect,
        SoundId::Error,
    ];

    pub fn file_path(&self) -> &'static str {
        match self {
            SoundId::Tick => "assets/sounds/wheel/tick.ogg",
            SoundId::SpinStart => "assets/sounds/wheel/spin_start.ogg",
            SoundId::ClassLanded => "assets/sounds/wheel/class_landed.ogg",
            SoundId::BuildLanded => "assets/sounds/wheel/build_landed.ogg",
            SoundId::MenuMove => "assets/sounds/ui/move.ogg",
            SoundId::MenuSelect => "assets/sounds/ui/select.ogg",
            SoundId::Error => "assets/sounds/ui/error.ogg",
        }
    }

    /// Default volume (0.0 - 1.0)
    pub fn default_volume(&self) -> f64 {
        match self {
            // Ticks come in bursts of 20-30
            SoundId::Tick => 0.3,
            SoundId::MenuMove => 0.4,
            SoundId::MenuSelect | SoundId::SpinStart => 0.5,
            SoundId::ClassLanded => 0.6,
            SoundId::BuildLanded => 0.8,
            SoundId::Error => 0.6,
        }
    }

    pub fn exists(&self) -> bool {
        Path::new(self.file_path()).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_paths_unique_and_volumes_in_range() {
        let paths: HashSet<_> = SoundId::ALL.iter().map(|s| s.file_path()).collect();
        assert_eq!(paths.len(), SoundId::ALL.len());
        for sound in SoundId::ALL {
            let v = sound.default_volume();
            assert!((0.0..=1.0).contains(&v));
        }
    }
}
