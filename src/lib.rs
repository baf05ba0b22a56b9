//! Math Battle - answer arithmetic problems to defeat monsters
//!
//! Core modules:
//! - `problems`: Problem generation, duplicate suppression and answer scoring
//! - `battle`: Session state machine (health, levels, clocks, power-ups)
//! - `tuning`: Data-driven game balance
//! - `settings`: Persisted menu selection
//! - `audio`: Sound cues for battle events
//! - `highscores`: Local leaderboard of finished sessions
//! - `web`: wasm-bindgen facade for the browser shell

pub mod audio;
pub mod battle;
pub mod highscores;
pub mod problems;
pub mod settings;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use battle::{BattleController, BattleError, BattleEvent, BattlePhase, BattleState};
pub use highscores::HighScores;
pub use problems::{Difficulty, GeneratorConfig, OperationType, Problem, ProblemGenerator};
pub use settings::Settings;
pub use tuning::Rules;

/// Game configuration constants
pub mod consts {
    /// Problems remembered for duplicate suppression
    pub const HISTORY_CAPACITY: usize = 20;
    /// Generation attempts before a duplicate is accepted anyway
    pub const MAX_GENERATION_ATTEMPTS: u32 = 10;
    /// Highest selectable times/division table
    pub const MAX_TABLE: u32 = 12;

    /// Damage dealt by any correct answer
    pub const BASE_DAMAGE: u32 = 10;
    /// Answers faster than this (seconds) earn +1 damage per second saved
    pub const SPEED_BONUS_WINDOW_SECS: f64 = 5.0;

    /// Hero health
    pub const HERO_MAX_HEALTH: u32 = 50;
    /// Session clock (2 minutes)
    pub const SESSION_SECONDS: u32 = 120;
    /// Per-question clock
    pub const QUESTION_SECONDS: u32 = 10;
    /// Hero damage for a wrong answer
    pub const WRONG_ANSWER_PENALTY: u32 = 5;
    /// Hero damage when the question clock runs out
    pub const TIMEOUT_PENALTY: u32 = 2;

    /// Streak length that triggers a critical hit
    pub const CRITICAL_STREAK: u32 = 3;
    pub const CRITICAL_MULTIPLIER: u32 = 3;
    pub const DOUBLE_DAMAGE_MULTIPLIER: u32 = 2;

    /// Monster health = base + level * per_level, doubled on boss levels
    pub const MONSTER_BASE_HEALTH: u32 = 20;
    pub const MONSTER_HEALTH_PER_LEVEL: u32 = 10;
    pub const BOSS_HEALTH_MULTIPLIER: u32 = 2;
    /// Every Nth level is a boss level
    pub const BOSS_INTERVAL: u32 = 5;

    /// Chance of a power-up appearing at a non-boss level start
    pub const POWER_UP_CHANCE: f64 = 0.2;
    /// Problems a power-up survives before vanishing
    pub const POWER_UP_LIFETIME: u32 = 3;
    pub const POTION_HEAL: u32 = 20;
    pub const TIME_BONUS_SECONDS: u32 = 30;
    /// Ground-plane distance at which the hero picks up a power-up
    pub const PICKUP_RADIUS: f32 = 2.0;

    /// Pause between a monster falling and the next level (ms)
    pub const LEVEL_TRANSITION_DELAY_MS: u32 = 1500;

    /// Session clock turns red at or below this
    pub const SESSION_WARNING_SECONDS: u32 = 30;
    /// Question clock turns red at or below this
    pub const QUESTION_WARNING_SECONDS: u32 = 5;
}
