//! Display formatting for the HUD
//!
//! Pure helpers; the shell decides where the strings go.

use super::events::BattleEvent;
use super::state::PowerUpKind;
use crate::consts::{QUESTION_WARNING_SECONDS, SESSION_WARNING_SECONDS};

/// Session clock as `M:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Health bar width in percent (0 when `max` is 0)
pub fn health_percent(health: u32, max: u32) -> f32 {
    if max == 0 {
        return 0.0;
    }
    health as f32 / max as f32 * 100.0
}

/// `current/max` text under a health bar
pub fn health_text(health: u32, max: u32) -> String {
    format!("{}/{}", health, max)
}

/// Level number with a boss marker
pub fn level_label(level: u32, boss: bool) -> String {
    if boss {
        format!("{} (BOSS)", level)
    } else {
        level.to_string()
    }
}

pub fn session_warning(remaining: u32) -> bool {
    remaining <= SESSION_WARNING_SECONDS
}

pub fn question_warning(remaining: u32) -> bool {
    remaining <= QUESTION_WARNING_SECONDS
}

impl BattleEvent {
    /// Message-line text for events that show one
    pub fn banner(&self) -> Option<String> {
        match self {
            BattleEvent::Correct {
                message,
                critical,
                double_damage,
                ..
            } => {
                let suffix = if *critical {
                    " (CRITICAL HIT!)"
                } else if *double_damage {
                    " (DOUBLE DAMAGE!)"
                } else {
                    ""
                };
                Some(format!("{}{}", message, suffix))
            }
            BattleEvent::Incorrect {
                correct_answer,
                potion_used,
            } => {
                let mut text = format!("WRONG! The answer is {}", correct_answer);
                if *potion_used {
                    text.push_str(" (HEALTH POTION USED!)");
                }
                Some(text)
            }
            BattleEvent::TooSlow { penalty } => Some(format!("TOO SLOW! -{} HP", penalty)),
            BattleEvent::PowerUpSpawned { power_up } => {
                Some(format!("A {} power-up has appeared!", power_up.as_str()))
            }
            BattleEvent::PowerUpCollected { power_up, amount } => match power_up {
                PowerUpKind::Health => Some(format!("HEALTH POTION USED! +{} HP", amount)),
                PowerUpKind::Time => Some(format!("TIME FREEZE ACTIVATED! +{} SECONDS", amount)),
                PowerUpKind::Damage => None,
            },
            _ => None,
        }
    }
}
