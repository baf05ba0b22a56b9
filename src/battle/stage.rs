//! Scene queries the controller needs from the presentation layer

use glam::{Vec2, Vec3};

/// Hero's resting spot in the arena
pub const HERO_POSITION: Vec3 = Vec3::new(-3.0, 0.0, 0.0);

/// Implemented by whatever draws the battle
pub trait Stage {
    /// Current hero world position
    fn hero_position(&self) -> Vec3;

    /// Ground-plane (x/z) proximity check used for power-up pickup
    fn hero_near(&self, target: Vec3, radius: f32) -> bool {
        let hero = self.hero_position();
        Vec2::new(hero.x - target.x, hero.z - target.z).length() < radius
    }
}

/// Stage whose hero never moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedStage {
    pub hero: Vec3,
}

impl Default for FixedStage {
    fn default() -> Self {
        Self {
            hero: HERO_POSITION,
        }
    }
}

impl Stage for FixedStage {
    fn hero_position(&self) -> Vec3 {
        self.hero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::POWER_UP_POSITION;

    #[test]
    fn test_default_hero_out_of_reach() {
        let stage = FixedStage::default();
        assert!(!stage.hero_near(POWER_UP_POSITION, 2.0));
    }

    #[test]
    fn test_height_is_ignored() {
        let stage = FixedStage {
            hero: Vec3::new(0.5, -4.0, 0.5),
        };
        assert!(stage.hero_near(POWER_UP_POSITION, 2.0));
    }
}
