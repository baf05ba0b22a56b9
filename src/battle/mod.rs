//! Battle session
//!
//! The controller owns the state, the problem generator and the clocks. Shells
//! feed it answers, clock ticks and the end of level transitions, then drain
//! the queued events to update whatever they draw.

pub mod controller;
pub mod error;
pub mod events;
pub mod hud;
pub mod stage;
pub mod state;
pub mod timer;

pub use controller::{AnswerOutcome, BattleController};
pub use error::{BattleError, Result};
pub use events::BattleEvent;
pub use stage::{FixedStage, Stage};
pub use state::{
    BattlePhase, BattleState, FinalScore, GameOverReason, MonsterKind, PowerUp, PowerUpKind,
};
pub use timer::Countdown;
