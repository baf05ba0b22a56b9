//! Problem and generator configuration types

use serde::{Deserialize, Serialize};

use crate::consts::MAX_TABLE;

/// Arithmetic operator shown in a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Symbol used in display text
    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Whether `a op b` and `b op a` are the same problem for history purposes
    pub fn is_commutative(&self) -> bool {
        matches!(self, Operator::Add | Operator::Multiply)
    }

    /// Evaluate `a op b` (integer division; None on division by zero)
    pub fn apply(&self, a: u32, b: u32) -> Option<i64> {
        let (a, b) = (i64::from(a), i64::from(b));
        match self {
            Operator::Add => Some(a + b),
            Operator::Subtract => Some(a - b),
            Operator::Multiply => Some(a * b),
            Operator::Divide => a.checked_div(b),
        }
    }
}

/// Which kind of problems a session practises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    #[default]
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl OperationType {
    pub const ALL: [OperationType; 4] = [
        OperationType::Addition,
        OperationType::Subtraction,
        OperationType::Multiplication,
        OperationType::Division,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Addition => "addition",
            OperationType::Subtraction => "subtraction",
            OperationType::Multiplication => "multiplication",
            OperationType::Division => "division",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "addition" | "add" | "+" => Some(OperationType::Addition),
            "subtraction" | "sub" | "-" => Some(OperationType::Subtraction),
            "multiplication" | "mul" | "times" | "×" => Some(OperationType::Multiplication),
            "division" | "div" | "÷" => Some(OperationType::Division),
            _ => None,
        }
    }

    pub fn operator(&self) -> Operator {
        match self {
            OperationType::Addition => Operator::Add,
            OperationType::Subtraction => Operator::Subtract,
            OperationType::Multiplication => Operator::Multiply,
            OperationType::Division => Operator::Divide,
        }
    }

    /// Only multiplication and division can be pinned to one table
    pub fn supports_table(&self) -> bool {
        matches!(self, OperationType::Multiplication | OperationType::Division)
    }
}

/// Difficulty selected in the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Generator settings for one session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub operation: OperationType,
    /// Fixed operand for × and ÷ practice (None = all tables)
    pub table: Option<u32>,
    pub difficulty: Difficulty,
}

impl GeneratorConfig {
    /// Build a config; a `table` of 0 means "all tables", larger tables clamp to the 12s
    pub fn new(operation: OperationType, table: u32, difficulty: Difficulty) -> Self {
        Self {
            operation,
            table: (table > 0).then_some(table.min(MAX_TABLE)),
            difficulty,
        }
    }

    /// Table used for generation, ignoring tables on + and -
    pub fn specific_table(&self) -> Option<u32> {
        if self.operation.supports_table() {
            self.table
        } else {
            None
        }
    }
}

/// A generated problem. Never mutated; the next problem replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub num1: u32,
    pub num2: u32,
    pub operator: Operator,
    pub answer: i64,
    pub display_text: String,
    /// Division only; the wired generator never produces remainders
    pub has_remainder: bool,
}

impl Problem {
    pub(crate) fn new(num1: u32, num2: u32, operator: Operator, answer: i64) -> Self {
        Self {
            num1,
            num2,
            operator,
            answer,
            display_text: format!("{} {} {} = ?", num1, operator.symbol(), num2),
            has_remainder: false,
        }
    }

    /// History key for this problem
    pub fn key(&self) -> (u32, u32, Operator) {
        (self.num1, self.num2, self.operator)
    }
}
