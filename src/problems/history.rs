//! Recently presented problems
//!
//! A fixed-size FIFO used to avoid repeating a problem (or its commutative
//! mirror) too soon.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::types::{Operator, Problem};
use crate::consts::HISTORY_CAPACITY;

/// One remembered problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub num1: u32,
    pub num2: u32,
    pub operator: Operator,
}

impl HistoryEntry {
    /// Same problem, or its mirror for + and ×
    fn matches(&self, num1: u32, num2: u32, operator: Operator) -> bool {
        if self.operator != operator {
            return false;
        }
        if self.num1 == num1 && self.num2 == num2 {
            return true;
        }
        operator.is_commutative() && self.num1 == num2 && self.num2 == num1
    }
}

/// Last N problems, oldest first
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for ProblemHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl ProblemHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// True if the problem or its commutative mirror was presented recently
    pub fn contains(&self, problem: &Problem) -> bool {
        let (num1, num2, operator) = problem.key();
        self.entries.iter().any(|e| e.matches(num1, num2, operator))
    }

    /// Remember a problem, evicting the oldest entry past capacity
    pub fn record(&mut self, problem: &Problem) {
        let (num1, num2, operator) = problem.key();
        self.entries.push_back(HistoryEntry {
            num1,
            num2,
            operator,
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
