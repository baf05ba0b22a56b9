//! Battle session state
//!
//! One `BattleState` exists per session and only the controller mutates it.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timer::Countdown;
use crate::problems::OperationType;
use crate::tuning::Rules;

/// Where a spawned power-up floats in the scene
pub const POWER_UP_POSITION: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Boss monsters are drawn this much larger
pub const BOSS_SCALE: f32 = 1.5;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    /// Operation/difficulty selection, no session running
    #[default]
    Menu,
    /// A problem is on screen and answers are accepted
    InLevel,
    /// Monster defeated, waiting for the next level to start
    LevelTransition,
    /// Session ended; only restart or return-to-menu are accepted
    GameOver,
}

/// Why the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    HeroDefeated,
    TimeUp,
}

/// Shown on the game over screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalScore {
    pub level: u32,
    /// Correct answers this session
    pub score: u32,
    pub reason: GameOverReason,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerUpKind {
    /// Restores health; also absorbs one wrong answer
    Health,
    /// Doubles the next correct answer's damage
    Damage,
    /// Adds time to the session clock
    Time,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Health, PowerUpKind::Damage, PowerUpKind::Time];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerUpKind::Health => "health",
            PowerUpKind::Damage => "damage",
            PowerUpKind::Time => "time",
        }
    }

    /// Orb colour (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Health => 0xff0000,
            PowerUpKind::Damage => 0xffcc00,
            PowerUpKind::Time => 0x00ccff,
        }
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// An active power-up. Absent (`None` in the state) once used or expired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Problems left before it vanishes
    pub remaining_problems: u32,
    /// World position for pickup checks
    pub position: Vec3,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, lifetime: u32) -> Self {
        Self {
            kind,
            remaining_problems: lifetime,
            position: POWER_UP_POSITION,
        }
    }
}

/// Cosmetic monster identity for the current level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterKind {
    pub theme: OperationType,
    pub boss: bool,
}

impl MonsterKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R, boss: bool) -> Self {
        let theme = OperationType::ALL[rng.random_range(0..OperationType::ALL.len())];
        Self { theme, boss }
    }

    /// Body colour (0xRRGGBB)
    pub fn color(&self) -> u32 {
        match self.theme {
            OperationType::Addition => 0xff0000,
            OperationType::Subtraction => 0x0000ff,
            OperationType::Multiplication => 0x9900cc,
            OperationType::Division => 0x00cc00,
        }
    }

    pub fn scale(&self) -> f32 {
        if self.boss { BOSS_SCALE } else { 1.0 }
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleState {
    pub phase: BattlePhase,
    /// Current level (1-based)
    pub level: u32,
    pub boss: bool,
    pub hero_health: u32,
    pub hero_max_health: u32,
    pub monster_health: u32,
    pub monster_max_health: u32,
    pub monster: MonsterKind,
    /// Session clock
    pub session_clock: Countdown,
    /// Per-problem clock
    pub question_clock: Countdown,
    /// Correct answers this session (the final score)
    pub correct_answers: u32,
    /// Unbroken correct answers; resets on a critical hit
    pub consecutive_correct: u32,
    pub power_up: Option<PowerUp>,
    /// Set when the session ends
    pub final_score: Option<FinalScore>,
}

impl BattleState {
    pub fn new(rules: &Rules) -> Self {
        Self {
            phase: BattlePhase::Menu,
            level: 1,
            boss: false,
            hero_health: rules.hero_max_health,
            hero_max_health: rules.hero_max_health,
            monster_health: 0,
            monster_max_health: 0,
            monster: MonsterKind {
                theme: OperationType::Addition,
                boss: false,
            },
            session_clock: Countdown::new(rules.session_seconds),
            question_clock: Countdown::new(rules.question_seconds),
            correct_answers: 0,
            consecutive_correct: 0,
            power_up: None,
            final_score: None,
        }
    }

    /// Seconds left in the session
    pub fn time_remaining(&self) -> u32 {
        self.session_clock.remaining()
    }

    /// Seconds left for the current problem
    pub fn question_time_remaining(&self) -> u32 {
        self.question_clock.remaining()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == BattlePhase::GameOver
    }

    pub fn is_game_started(&self) -> bool {
        self.phase != BattlePhase::Menu
    }

    /// Remove health from the hero, flooring at zero. Returns true if this
    /// knocked the hero out.
    pub fn damage_hero(&mut self, amount: u32) -> bool {
        self.hero_health = self.hero_health.saturating_sub(amount);
        self.hero_health == 0
    }

    pub fn heal_hero(&mut self, amount: u32) {
        self.hero_health = self.hero_health.saturating_add(amount).min(self.hero_max_health);
    }

    /// Remove health from the monster, flooring at zero. Returns true if this
    /// defeated it.
    pub fn damage_monster(&mut self, amount: u32) -> bool {
        self.monster_health = self.monster_health.saturating_sub(amount);
        self.monster_health == 0
    }
}
