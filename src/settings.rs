//! Menu selection and player preferences
//!
//! Persisted separately from high scores in LocalStorage so the menu reopens
//! on the last operation played.

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TABLE;
use crate::problems::{Difficulty, GeneratorConfig, OperationType};

/// Player settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Session ===
    pub operation: OperationType,
    /// Times/division table, 0 for mixed
    pub table: u32,
    pub difficulty: Difficulty,

    // === Audio ===
    pub muted: bool,

    // === Accessibility ===
    /// Skip hit flashes and monster shake
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            operation: OperationType::Addition,
            table: 0,
            difficulty: Difficulty::Easy,

            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Settings matching a generator configuration
    pub fn from_config(config: &GeneratorConfig) -> Self {
        Self {
            operation: config.operation,
            table: config.table.unwrap_or(0),
            difficulty: config.difficulty,
            ..Self::default()
        }
    }

    /// Generator configuration for the next session
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig::new(self.operation, self.table, self.difficulty)
    }

    /// Apply a menu selection. Tables outside 1..=12 fall back to mixed.
    pub fn select(&mut self, operation: OperationType, table: u32, difficulty: Difficulty) {
        self.operation = operation;
        self.table = if table <= MAX_TABLE { table } else { 0 };
        self.difficulty = difficulty;
    }

    /// Flip the mute preference, returning the new value
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "math_battle_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native ({})", Self::STORAGE_KEY);
    }
}
