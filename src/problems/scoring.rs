//! Answer checking and damage scoring

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{BASE_DAMAGE, SPEED_BONUS_WINDOW_SECS};

/// Shown after a correct answer
pub const ENCOURAGING_MESSAGES: [&str; 10] = [
    "GREAT JOB!",
    "AWESOME!",
    "EXCELLENT!",
    "PERFECT!",
    "AMAZING!",
    "SUPER!",
    "FANTASTIC!",
    "BRILLIANT!",
    "INCREDIBLE!",
    "YOU'RE A MATH WIZARD!",
];

/// Result of checking one answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerCheck {
    pub is_correct: bool,
    /// Seconds between problem generation and the answer
    pub time_taken: f64,
    /// None when there was no problem to check against
    pub correct_answer: Option<i64>,
}

impl AnswerCheck {
    /// Fail-closed result used when no problem is active
    pub fn no_problem() -> Self {
        Self {
            is_correct: false,
            time_taken: 0.0,
            correct_answer: None,
        }
    }
}

/// A numeric answer as typed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedAnswer {
    /// Leading integer of the text (`"7.9"` and `"1e3"` give 7 and 1)
    Integer(i64),
    /// Numeric text with no leading integer, such as `"Infinity"` or `".5"`.
    /// Never matches a problem.
    NoInteger,
}

impl ParsedAnswer {
    /// Value compared against the problem's answer
    pub fn value(&self) -> Option<i64> {
        match self {
            ParsedAnswer::Integer(value) => Some(*value),
            ParsedAnswer::NoInteger => None,
        }
    }
}

/// True if the whole text reads as a number (decimal, exponent or
/// `Infinity`); NaN and trailing junk do not
fn is_numeric(text: &str) -> bool {
    let unsigned = text.trim_start_matches(['+', '-']);
    if unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity") {
        return unsigned == "Infinity" && text.len() - unsigned.len() <= 1;
    }
    text.parse::<f64>().is_ok_and(|v| !v.is_nan())
}

/// Optional sign followed by the leading run of digits
fn leading_integer(text: &str) -> Option<i64> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let magnitude: i64 = rest[..digits].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse raw answer text.
///
/// Returns None for empty or non-numeric input. Numeric input is scored by
/// its leading integer, so `"7.9"` answers 7 and `"1e3"` answers 1.
pub fn parse_answer(raw: &str) -> Option<ParsedAnswer> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !is_numeric(trimmed) {
        return None;
    }
    Some(match leading_integer(trimmed) {
        Some(value) => ParsedAnswer::Integer(value),
        None => ParsedAnswer::NoInteger,
    })
}

/// Damage for an answer: 0 if wrong, otherwise 10 plus one per whole second
/// under 5 (at most 15)
pub fn calculate_damage(is_correct: bool, time_taken: f64) -> u32 {
    if !is_correct {
        return 0;
    }

    let mut damage = BASE_DAMAGE;
    if time_taken < SPEED_BONUS_WINDOW_SECS {
        let saved = (SPEED_BONUS_WINDOW_SECS - time_taken.max(0.0)).floor();
        damage += saved.clamp(0.0, SPEED_BONUS_WINDOW_SECS) as u32;
    }
    damage
}

/// Pick a random cheer for a correct answer
pub fn encouraging_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ENCOURAGING_MESSAGES[rng.random_range(0..ENCOURAGING_MESSAGES.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_damage_wrong_answer_is_zero() {
        assert_eq!(calculate_damage(false, 0.0), 0);
        assert_eq!(calculate_damage(false, 1.5), 0);
        assert_eq!(calculate_damage(false, 60.0), 0);
    }

    #[test]
    fn test_damage_speed_bonus() {
        assert_eq!(calculate_damage(true, 0.0), 15);
        assert_eq!(calculate_damage(true, 0.4), 14);
        assert_eq!(calculate_damage(true, 2.0), 13);
        assert_eq!(calculate_damage(true, 4.99), 10);
        assert_eq!(calculate_damage(true, 5.0), 10);
        assert_eq!(calculate_damage(true, 9.0), 10);
    }

    #[test]
    fn test_parse_answer() {
        use ParsedAnswer::*;
        assert_eq!(parse_answer(" 42 "), Some(Integer(42)));
        assert_eq!(parse_answer("-3"), Some(Integer(-3)));
        assert_eq!(parse_answer("+8"), Some(Integer(8)));
        assert_eq!(parse_answer("7.9"), Some(Integer(7)));
        assert_eq!(parse_answer("-0.5"), Some(Integer(0)));
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("   "), None);
        assert_eq!(parse_answer("12abc"), None);
        assert_eq!(parse_answer("NaN"), None);
        assert_eq!(parse_answer("inf"), None);
    }

    #[test]
    fn test_parse_answer_uses_leading_integer() {
        use ParsedAnswer::*;
        assert_eq!(parse_answer("1e3"), Some(Integer(1)));
        assert_eq!(parse_answer("12e-1"), Some(Integer(12)));
        assert_eq!(parse_answer("Infinity"), Some(NoInteger));
        assert_eq!(parse_answer("-Infinity"), Some(NoInteger));
        assert_eq!(parse_answer(".5"), Some(NoInteger));
        assert_eq!(parse_answer("99999999999999999999"), Some(NoInteger));
        assert_eq!(parse_answer("infinity"), None);
        assert_eq!(parse_answer(".5").and_then(|a| a.value()), None);
        assert_eq!(parse_answer("4").and_then(|a| a.value()), Some(4));
    }

    #[test]
    fn test_encouraging_message_from_fixed_set() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let msg = encouraging_message(&mut rng);
            assert!(ENCOURAGING_MESSAGES.contains(&msg));
        }
    }

    #[test]
    fn test_no_problem_fails_closed() {
        let check = AnswerCheck::no_problem();
        assert!(!check.is_correct);
        assert_eq!(check.time_taken, 0.0);
        assert_eq!(check.correct_answer, None);
    }
}
