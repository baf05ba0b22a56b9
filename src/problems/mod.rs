//! Problem generation and scoring
//!
//! Everything here is a pure function of its inputs plus a seeded RNG:
//! - No battle state (level and config arrive as parameters)
//! - Timestamps are supplied by the caller
//! - Duplicate suppression is best effort over a fixed window

pub mod generator;
pub mod history;
pub mod scoring;
pub mod types;

pub use generator::{ProblemGenerator, generate_problem};
pub use history::ProblemHistory;
pub use scoring::{
    AnswerCheck, ParsedAnswer, calculate_damage, encouraging_message, parse_answer,
};
pub use types::{Difficulty, GeneratorConfig, OperationType, Operator, Problem};
