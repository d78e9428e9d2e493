//! Audio manager using Kira
//!
//! Plays feedback sounds. Without an output device or sound files every
//! call is a quiet no-op.

use std::collections::HashMap;
use std::path::Path;

use kira::{
    manager::{AudioManager as KiraManager, AudioManagerSettings, backend::DefaultBackend},
    sound::static_sound::{StaticSoundData, StaticSoundSettings},
    Volume,
};

use super::sounds::SoundId;

pub struct AudioManager {
    manager: Option<KiraManager>,
    sounds: HashMap<SoundId, StaticSoundData>,
    /// Files that failed to load; not retried every tick
    missing: Vec<SoundId>,
    master_volume: f64,
    enabled: bool,
}

impl AudioManager {
    /// Open the default output device and preload every sound
    pub fn new(enabled: bool) -> Self {
        let manager = match KiraManager::<DefaultBackend>::new(AudioManagerSettings::default()) {
            Ok(m) => {
                log::info!("Audio manager initialized");
                Some(m)
            }
            Err(e) => {
                log::warn!("Failed to initialize audio manager: {}. Audio disabled.", e);
                None
            }
        };

        let mut audio = Self {
            manager,
            sounds: HashMap::new(),
            missing: Vec::new(),
            master_volume: 1.0,
            enabled,
        };
        if audio.manager.is_some() {
            for sound_id in SoundId::ALL {
                if let Err(e) = audio.load_sound(sound_id) {
                    log::debug!("Could not preload sound {:?}: {}", sound_id, e);
                }
            }
        }
        audio
    }

    /// A manager that never touches an audio device
    pub fn silent() -> Self {
        Self {
            manager: None,
            sounds: HashMap::new(),
            missing: Vec::new(),
            master_volume: 1.0,
            enabled: false,
        }
    }

    fn load_sound(&mut self, sound_id: SoundId) -> Result<(), String> {
        if self.sounds.contains_key(&sound_id) {
            return Ok(());
        }

        let path = sound_id.file_path();
        if !Path::new(path).exists() {
            self.missing.push(sound_id);
            return Err(format!("Sound file not found: {}", path));
        }

        match StaticSoundData::from_file(path) {
            Ok(data) => {
                self.sounds.insert(sound_id, data);
                Ok(())
            }
            Err(e) => {
                self.missing.push(sound_id);
                Err(format!("Failed to load sound {}: {:?}", path, e))
            }
        }
    }

    pub fn play(&mut self, sound_id: SoundId) {
        if !self.enabled || self.manager.is_none() || self.missing.contains(&sound_id) {
            return;
        }
        if let Err(e) = self.load_sound(sound_id) {
            log::debug!("Cannot play sound {:?}: {}", sound_id, e);
            return;
        }

        let sound_data = match self.sounds.get(&sound_id) {
            Some(data) => data.clone(),
            None => return,
        };

        let volume = sound_id.default_volume() * self.master_volume;
        let settings = StaticSoundSettings::new().volume(Volume::Amplitude(volume));

        if let Some(manager) = &mut self.manager {
            if let Err(e) = manager.play(sound_data.with_settings(settings)) {
                log::debug!("Failed to play sound {:?}: {:?}", sound_id, e);
            }
        }
    }

    pub fn set_master_volume(&mut self, volume: f64) {
        self.master_volume = volume.clamp(0.0, 1.0);
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Sound requested by the user, regardless of device availability
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_available(&self) -> bool {
        self.manager.is_some()
    }
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_manager_is_noop() {
        let mut audio = AudioManager::silent();
        assert!(!audio.is_available());
        audio.set_enabled(true);
        audio.play(SoundId::Tick);
        assert!(audio.is_enabled());
    }
}
