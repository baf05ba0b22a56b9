//! Errors returned by battle operations

use thiserror::Error;

use super::state::BattlePhase;

/// Recoverable failures of controller operations. None of them change state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BattleError {
    #[error("answer is empty")]
    EmptyInput,

    #[error("answer is not a number: {0:?}")]
    NotANumber(String),

    #[error("cannot {action} while in {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: BattlePhase,
    },
}

impl BattleError {
    /// Input errors mean "re-prompt", not "something broke"
    pub fn is_input_error(&self) -> bool {
        matches!(self, BattleError::EmptyInput | BattleError::NotANumber(_))
    }
}

pub type Result<T> = std::result::Result<T, BattleError>;
