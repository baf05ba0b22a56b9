//! State-change notifications for the presentation layer
//!
//! The controller queues these as it mutates state; the shell drains and
//! renders them in order.

use serde::{Deserialize, Serialize};

use super::state::{FinalScore, MonsterKind, PowerUpKind};
use crate::problems::{Difficulty, OperationType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BattleEvent {
    SessionStarted {
        operation: OperationType,
        table: Option<u32>,
        difficulty: Difficulty,
    },
    LevelStarted {
        level: u32,
        boss: bool,
        monster: MonsterKind,
        monster_max_health: u32,
    },
    ProblemIssued {
        text: String,
    },
    HealthChanged {
        hero_health: u32,
        hero_max_health: u32,
        monster_health: u32,
        monster_max_health: u32,
    },
    SessionClock {
        remaining: u32,
    },
    QuestionClock {
        remaining: u32,
    },
    Correct {
        message: String,
        damage: u32,
        critical: bool,
        double_damage: bool,
    },
    Incorrect {
        correct_answer: i64,
        potion_used: bool,
    },
    TooSlow {
        penalty: u32,
    },
    PowerUpSpawned {
        power_up: PowerUpKind,
    },
    /// `amount` is health restored or seconds added (0 for damage)
    PowerUpCollected {
        power_up: PowerUpKind,
        amount: u32,
    },
    PowerUpExpired {
        power_up: PowerUpKind,
    },
    MonsterDefeated {
        next_level: u32,
        delay_ms: u32,
    },
    GameOver {
        final_score: FinalScore,
    },
    ReturnedToMenu,
}

impl BattleEvent {
    /// Encode for a JS consumer
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
