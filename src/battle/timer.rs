//! Whole-second countdown clocks
//!
//! The shell owns the real 1 Hz interval; a `Countdown` only tracks the
//! remaining seconds and whether it is currently running.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Countdown {
    remaining: u32,
    running: bool,
}

impl Countdown {
    /// A stopped clock showing `seconds`
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            running: false,
        }
    }

    /// Reset to `seconds` and run
    pub fn start(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn add(&mut self, seconds: u32) {
        self.remaining = self.remaining.saturating_add(seconds);
    }

    /// Advance one second. Returns true when this tick reached zero; the
    /// clock stops itself at that point.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            return true;
        }
        false
    }
}
