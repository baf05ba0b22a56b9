//! Data-driven game balance
//!
//! Every number the battle controller uses lives in `Rules`, so a shell can
//! load alternative balance from JSON without touching the code.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Balance rules for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    // === Hero ===
    pub hero_max_health: u32,
    pub wrong_answer_penalty: u32,
    pub timeout_penalty: u32,

    // === Clocks ===
    pub session_seconds: u32,
    pub question_seconds: u32,
    /// Pause between a defeated monster and the next level
    pub transition_delay_ms: u32,

    // === Monster ===
    pub monster_base_health: u32,
    pub monster_health_per_level: u32,
    pub boss_health_multiplier: u32,
    pub boss_interval: u32,

    // === Damage ===
    pub critical_streak: u32,
    pub critical_multiplier: u32,
    pub double_damage_multiplier: u32,

    // === Power-ups ===
    /// 0.0 - 1.0
    pub power_up_chance: f64,
    pub power_up_lifetime: u32,
    pub potion_heal: u32,
    pub time_bonus_seconds: u32,
    pub pickup_radius: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            hero_max_health: HERO_MAX_HEALTH,
            wrong_answer_penalty: WRONG_ANSWER_PENALTY,
            timeout_penalty: TIMEOUT_PENALTY,

            session_seconds: SESSION_SECONDS,
            question_seconds: QUESTION_SECONDS,
            transition_delay_ms: LEVEL_TRANSITION_DELAY_MS,

            monster_base_health: MONSTER_BASE_HEALTH,
            monster_health_per_level: MONSTER_HEALTH_PER_LEVEL,
            boss_health_multiplier: BOSS_HEALTH_MULTIPLIER,
            boss_interval: BOSS_INTERVAL,

            critical_streak: CRITICAL_STREAK,
            critical_multiplier: CRITICAL_MULTIPLIER,
            double_damage_multiplier: DOUBLE_DAMAGE_MULTIPLIER,

            power_up_chance: POWER_UP_CHANCE,
            power_up_lifetime: POWER_UP_LIFETIME,
            potion_heal: POTION_HEAL,
            time_bonus_seconds: TIME_BONUS_SECONDS,
            pickup_radius: PICKUP_RADIUS,
        }
    }
}

impl Rules {
    /// Parse rules from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let rules: Rules = serde_json::from_str(json)?;
        Ok(rules.sanitized())
    }

    /// Clamp values that would break the state machine
    pub fn sanitized(mut self) -> Self {
        self.hero_max_health = self.hero_max_health.max(1);
        self.question_seconds = self.question_seconds.max(1);
        self.boss_interval = self.boss_interval.max(1);
        self.critical_streak = self.critical_streak.max(1);
        self.power_up_chance = self.power_up_chance.clamp(0.0, 1.0);
        self.power_up_lifetime = self.power_up_lifetime.max(1);
        self
    }

    /// Every `boss_interval`th level is a boss
    pub fn is_boss_level(&self, level: u32) -> bool {
        level > 0 && level % self.boss_interval == 0
    }

    /// Monster health for a level (doubled on bosses), saturating at `u32::MAX`
    pub fn monster_max_health(&self, level: u32) -> u32 {
        let base = self
            .monster_base_health
            .saturating_add(level.saturating_mul(self.monster_health_per_level));
        if self.is_boss_level(level) {
            base.saturating_mul(self.boss_health_multiplier)
        } else {
            base
        }
    }
}
