//! Game settings and preferences
//!
//! Persisted separately from the shop profile, as one JSON value.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    /// Maximum live particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 100,
            QualityPreset::Medium => 300,
            QualityPreset::High => 800,
        }
    }

    /// Whether to draw the background grid
    pub fn grid_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Hit and pickup particles
    pub particles: bool,
    /// Ask the announcer for commentary
    pub commentary: bool,
    /// Show the on-screen joysticks
    pub touch_controls: bool,
    /// Show FPS counter
    pub show_fps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            commentary: true,
            touch_controls: false,
            show_fps: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    pub const STORAGE_KEY: &'static str = "brawl_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    pub fn load_from(store: &impl KeyValueStore) -> Self {
        match persistence::load_json(store, Self::STORAGE_KEY) {
            Some(settings) => {
                log::info!("Loaded settings");
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, store: &mut impl KeyValueStore) {
        persistence::save_json(store, Self::STORAGE_KEY, self);
        log::info!("Settings saved");
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        Self::load_from(&persistence::LocalStorage)
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        self.save_to(&mut persistence::LocalStorage);
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_particle_caps() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).max_particles(), 100);
        assert_eq!(Settings::default().max_particles(), 300);
        assert_eq!(Settings::from_preset(QualityPreset::High).max_particles(), 800);

        let off = Settings {
            particles: false,
            ..Settings::default()
        };
        assert_eq!(off.max_particles(), 0);
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            quality: QualityPreset::High,
            touch_controls: true,
            ..Settings::default()
        };
        settings.save_to(&mut store);
        assert_eq!(Settings::load_from(&store), settings);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let mut store = MemoryStore::new();
        store.set(Settings::STORAGE_KEY, r#"{"quality":"Low"}"#);
        let settings = Settings::load_from(&store);
        assert_eq!(settings.quality, QualityPreset::Low);
        assert!(settings.particles);
        assert!(settings.commentary);
    }
}
