//! Problem generation
//!
//! Operand ranges grow with the level and are capped per difficulty. Each
//! operation has its own curve; see the `*_bounds` functions.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::history::ProblemHistory;
use super::scoring::{self, AnswerCheck};
use super::types::{Difficulty, GeneratorConfig, OperationType, Operator, Problem};
use crate::consts::MAX_GENERATION_ATTEMPTS;

/// Chance that hard subtraction past level 3 drops the `num2 <= num1` rule
pub const NEGATIVE_SUBTRACTION_CHANCE: f64 = 0.3;
/// Hard subtraction can go negative only after this level
pub const NEGATIVE_SUBTRACTION_MIN_LEVEL: u32 = 3;

/// Largest operand for addition
pub fn addition_max(level: u32, difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => (3 + level / 2).min(5),
        Difficulty::Medium => (10 + level * 5).min(50),
        Difficulty::Hard => (20 + level * 10).min(100),
    }
}

/// Largest minuend for subtraction
pub fn subtraction_max(level: u32, difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => (3 + level / 2).min(5),
        Difficulty::Medium => (15 + level * 5).min(50),
        Difficulty::Hard => (25 + level * 10).min(100),
    }
}

/// (largest table, largest multiplier) for multiplication
pub fn multiplication_bounds(level: u32, difficulty: Difficulty) -> (u32, u32) {
    match difficulty {
        Difficulty::Easy => (2, (2 + level / 2).min(5)),
        Difficulty::Medium => ((level + 2).min(10), (5 + level).min(12)),
        Difficulty::Hard => ((level + 3).min(12), 12),
    }
}

/// (largest divisor, largest quotient) for division
pub fn division_bounds(level: u32, difficulty: Difficulty) -> (u32, u32) {
    match difficulty {
        Difficulty::Easy => (2, (2 + level / 2).min(3)),
        Difficulty::Medium => ((level + 2).min(10), (5 + level).min(12)),
        Difficulty::Hard => ((level + 3).min(12), 12),
    }
}

fn roll<R: Rng + ?Sized>(rng: &mut R, max: u32) -> u32 {
    rng.random_range(1..=max.max(1))
}

fn addition<R: Rng + ?Sized>(level: u32, config: &GeneratorConfig, rng: &mut R) -> Problem {
    let max = addition_max(level, config.difficulty);
    let num1 = roll(rng, max);
    let num2 = roll(rng, max);
    Problem::new(num1, num2, Operator::Add, i64::from(num1) + i64::from(num2))
}

fn subtraction<R: Rng + ?Sized>(level: u32, config: &GeneratorConfig, rng: &mut R) -> Problem {
    let max = subtraction_max(level, config.difficulty);
    let num1 = roll(rng, max);

    // Hard mode occasionally lets the answer go negative
    let unconstrained = config.difficulty == Difficulty::Hard
        && level > NEGATIVE_SUBTRACTION_MIN_LEVEL
        && rng.random_bool(NEGATIVE_SUBTRACTION_CHANCE);
    let num2 = if unconstrained {
        roll(rng, max)
    } else {
        roll(rng, num1)
    };

    Problem::new(num1, num2, Operator::Subtract, i64::from(num1) - i64::from(num2))
}

fn multiplication<R: Rng + ?Sized>(level: u32, config: &GeneratorConfig, rng: &mut R) -> Problem {
    let (max_table, max_multiplier) = multiplication_bounds(level, config.difficulty);
    let num1 = match config.specific_table() {
        Some(table) => table,
        None => roll(rng, max_table),
    };
    let num2 = roll(rng, max_multiplier);
    Problem::new(num1, num2, Operator::Multiply, i64::from(num1) * i64::from(num2))
}

fn division<R: Rng + ?Sized>(level: u32, config: &GeneratorConfig, rng: &mut R) -> Problem {
    let (max_divisor, max_quotient) = division_bounds(level, config.difficulty);
    let divisor = match config.specific_table() {
        Some(table) => table,
        None => roll(rng, max_divisor),
    };
    // Dividend is built from the quotient so the result is always whole
    let quotient = roll(rng, max_quotient);
    Problem::new(quotient * divisor, divisor, Operator::Divide, i64::from(quotient))
}

/// Produce one candidate without consulting history
pub fn generate_candidate<R: Rng + ?Sized>(
    level: u32,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Problem {
    match config.operation {
        OperationType::Addition => addition(level, config, rng),
        OperationType::Subtraction => subtraction(level, config, rng),
        OperationType::Multiplication => multiplication(level, config, rng),
        OperationType::Division => division(level, config, rng),
    }
}

/// Generate a problem, retrying while it (or its mirror) is in `history`.
///
/// After `MAX_GENERATION_ATTEMPTS` the last candidate is kept even if it is a
/// repeat. The accepted problem is recorded in `history`. Returns the problem
/// and the number of attempts used.
pub fn generate_problem<R: Rng + ?Sized>(
    level: u32,
    config: &GeneratorConfig,
    history: &mut ProblemHistory,
    rng: &mut R,
) -> (Problem, u32) {
    let mut attempts = 0;
    let problem = loop {
        let candidate = generate_candidate(level, config, rng);
        attempts += 1;
        if !history.contains(&candidate) || attempts >= MAX_GENERATION_ATTEMPTS {
            break candidate;
        }
    };

    if attempts >= MAX_GENERATION_ATTEMPTS && history.contains(&problem) {
        log::debug!(
            "Accepting repeat {} after {} attempts",
            problem.display_text,
            attempts
        );
    }

    history.record(&problem);
    (problem, attempts)
}

/// Stateful generator: config, history, the active problem and its start time
#[derive(Debug, Clone)]
pub struct ProblemGenerator {
    config: GeneratorConfig,
    history: ProblemHistory,
    current: Option<Problem>,
    /// Caller clock (ms) when `current` was generated
    started_at_ms: f64,
    rng: Pcg32,
}

impl ProblemGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            config: GeneratorConfig::default(),
            history: ProblemHistory::new(),
            current: None,
            started_at_ms: 0.0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Select operation, table and difficulty for the session
    pub fn set_config(&mut self, config: GeneratorConfig) {
        log::info!(
            "Generator set to {} (table {:?}, {})",
            config.operation.as_str(),
            config.table,
            config.difficulty.as_str()
        );
        self.config = config;
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn history(&self) -> &ProblemHistory {
        &self.history
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.current.as_ref()
    }

    /// Time (ms) the active problem was generated
    pub fn started_at_ms(&self) -> f64 {
        self.started_at_ms
    }

    /// Generate the next problem for `level`, stamped at `now_ms`
    pub fn generate_problem(&mut self, level: u32, now_ms: f64) -> &Problem {
        let (problem, _attempts) =
            generate_problem(level, &self.config, &mut self.history, &mut self.rng);
        self.started_at_ms = now_ms;
        self.current.insert(problem)
    }

    /// Compare an answer with the active problem. Fails closed with no problem;
    /// an answer of `None` is always wrong.
    pub fn check_answer(&self, answer: impl Into<Option<i64>>, now_ms: f64) -> AnswerCheck {
        let answer = answer.into();
        let Some(problem) = &self.current else {
            return AnswerCheck::no_problem();
        };

        AnswerCheck {
            is_correct: answer == Some(problem.answer),
            time_taken: ((now_ms - self.started_at_ms) / 1000.0).max(0.0),
            correct_answer: Some(problem.answer),
        }
    }

    /// Random cheer for a correct answer
    pub fn encouraging_message(&mut self) -> &'static str {
        scoring::encouraging_message(&mut self.rng)
    }
}
