//! Battle state machine
//!
//! Drives one session: issues problems, applies answers and clock expiries to
//! the state, and queues `BattleEvent`s for the presentation layer.
//!
//! Phase transitions:
//! - `Menu` -> `InLevel` via `start`
//! - `InLevel` -> `LevelTransition` when the monster falls
//! - `LevelTransition` -> `InLevel` via `finish_transition`
//! - any running phase -> `GameOver` on hero defeat or session expiry
//! - `GameOver` -> `InLevel` via `restart`, anything but `Menu` -> `Menu` via
//!   `return_to_menu`

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::error::{BattleError, Result};
use super::events::BattleEvent;
use super::stage::{FixedStage, Stage};
use super::state::{
    BattlePhase, BattleState, FinalScore, GameOverReason, MonsterKind, PowerUp, PowerUpKind,
};
use crate::problems::{
    AnswerCheck, GeneratorConfig, Problem, ProblemGenerator, calculate_damage, parse_answer,
};
use crate::tuning::Rules;

/// Seed offset so the controller and generator draw from different streams
const CONTROLLER_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// What happened to one submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub correct_answer: Option<i64>,
    pub time_taken: f64,
    /// Damage dealt to the monster (0 when wrong)
    pub damage: u32,
    pub critical: bool,
    pub double_damage: bool,
    /// A health power-up absorbed a wrong answer
    pub potion_used: bool,
}

impl AnswerOutcome {
    fn from_check(check: &AnswerCheck) -> Self {
        Self {
            correct: check.is_correct,
            correct_answer: check.correct_answer,
            time_taken: check.time_taken,
            damage: 0,
            critical: false,
            double_damage: false,
            potion_used: false,
        }
    }
}

/// Owns and drives a battle session
pub struct BattleController<S: Stage = FixedStage> {
    state: BattleState,
    rules: Rules,
    generator: ProblemGenerator,
    rng: Pcg32,
    stage: S,
    events: Vec<BattleEvent>,
}

impl BattleController<FixedStage> {
    /// Controller with default rules and a stationary hero
    pub fn new(seed: u64) -> Self {
        Self::with_rules(seed, Rules::default())
    }

    pub fn with_rules(seed: u64, rules: Rules) -> Self {
        Self::with_stage(seed, rules, FixedStage::default())
    }
}

impl<S: Stage> BattleController<S> {
    pub fn with_stage(seed: u64, rules: Rules, stage: S) -> Self {
        Self {
            state: BattleState::new(&rules),
            generator: ProblemGenerator::new(seed),
            rng: Pcg32::seed_from_u64(seed ^ CONTROLLER_STREAM),
            rules,
            stage,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> BattlePhase {
        self.state.phase
    }

    pub fn generator(&self) -> &ProblemGenerator {
        &self.generator
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.generator.current_problem()
    }

    pub fn final_score(&self) -> Option<FinalScore> {
        self.state.final_score
    }

    pub fn stage(&self) -> &S {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut S {
        &mut self.stage
    }

    /// Events queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[BattleEvent] {
        &self.events
    }

    fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    fn require(&self, action: &'static str, allowed: &[BattlePhase]) -> Result<()> {
        if allowed.contains(&self.state.phase) {
            Ok(())
        } else {
            Err(BattleError::InvalidPhase {
                action,
                phase: self.state.phase,
            })
        }
    }

    /// Leave the menu and begin a session with `config`
    pub fn start(&mut self, config: GeneratorConfig, now_ms: f64) -> Result<()> {
        self.require("start", &[BattlePhase::Menu])?;
        self.generator.set_config(config);
        self.push(BattleEvent::SessionStarted {
            operation: config.operation,
            table: config.specific_table(),
            difficulty: config.difficulty,
        });
        self.begin_session(now_ms);
        Ok(())
    }

    /// Play again with the same operation and difficulty
    pub fn restart(&mut self, now_ms: f64) -> Result<()> {
        self.require("restart", &[BattlePhase::GameOver])?;
        self.begin_session(now_ms);
        Ok(())
    }

    /// Abandon the session
    pub fn return_to_menu(&mut self) -> Result<()> {
        self.require(
            "return to menu",
            &[
                BattlePhase::InLevel,
                BattlePhase::LevelTransition,
                BattlePhase::GameOver,
            ],
        )?;
        self.state = BattleState::new(&self.rules);
        self.push(BattleEvent::ReturnedToMenu);
        log::info!("Returned to menu");
        Ok(())
    }

    fn begin_session(&mut self, now_ms: f64) {
        self.state = BattleState::new(&self.rules);
        self.state.session_clock.start(self.rules.session_seconds);
        self.push(BattleEvent::SessionClock {
            remaining: self.state.time_remaining(),
        });
        log::info!(
            "Session started: {} ({}), {}s",
            self.generator.config().operation.as_str(),
            self.generator.config().difficulty.as_str(),
            self.rules.session_seconds
        );
        self.start_level(now_ms);
    }

    fn start_level(&mut self, now_ms: f64) {
        let level = self.state.level;
        let boss = self.rules.is_boss_level(level);

        self.state.phase = BattlePhase::InLevel;
        self.state.boss = boss;
        self.state.monster_max_health = self.rules.monster_max_health(level);
        self.state.monster_health = self.state.monster_max_health;
        self.state.monster = MonsterKind::random(&mut self.rng, boss);

        log::info!(
            "Level {} started (boss: {}, monster hp {})",
            level,
            boss,
            self.state.monster_max_health
        );
        self.push(BattleEvent::LevelStarted {
            level,
            boss,
            monster: self.state.monster,
            monster_max_health: self.state.monster_max_health,
        });
        self.push_health();
        self.issue_problem(now_ms);

        if !boss && self.rng.random::<f64>() < self.rules.power_up_chance {
            let kind = PowerUpKind::random(&mut self.rng);
            self.state.power_up = Some(PowerUp::new(kind, self.rules.power_up_lifetime));
            log::info!("{} power-up spawned", kind.as_str());
            self.push(BattleEvent::PowerUpSpawned { power_up: kind });
        }
    }

    fn issue_problem(&mut self, now_ms: f64) {
        let text = self
            .generator
            .generate_problem(self.state.level, now_ms)
            .display_text
            .clone();
        self.state.question_clock.start(self.rules.question_seconds);
        self.push(BattleEvent::ProblemIssued { text });
        self.push(BattleEvent::QuestionClock {
            remaining: self.state.question_time_remaining(),
        });
    }

    fn push_health(&mut self) {
        self.push(BattleEvent::HealthChanged {
            hero_health: self.state.hero_health,
            hero_max_health: self.state.hero_max_health,
            monster_health: self.state.monster_health,
            monster_max_health: self.state.monster_max_health,
        });
    }

    /// Answer the current problem.
    ///
    /// Empty or non-numeric input is rejected without touching any state, so
    /// the shell can simply re-prompt.
    pub fn submit_answer(&mut self, raw: &str, now_ms: f64) -> Result<AnswerOutcome> {
        self.require("submit an answer", &[BattlePhase::InLevel])?;

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BattleError::EmptyInput);
        }
        let answer =
            parse_answer(trimmed).ok_or_else(|| BattleError::NotANumber(trimmed.to_string()))?;

        // A late clock expiry must not also penalise this problem
        self.state.question_clock.stop();

        let check = self.generator.check_answer(answer.value(), now_ms);
        log::debug!(
            "Answer {:?} (expected {:?}) correct={} in {:.2}s",
            answer,
            check.correct_answer,
            check.is_correct,
            check.time_taken
        );

        let mut outcome = AnswerOutcome::from_check(&check);
        if check.is_correct {
            self.resolve_correct(&check, &mut outcome);
        } else {
            self.resolve_wrong(&check, &mut outcome);
        }
        self.push_health();

        if self.state.phase == BattlePhase::InLevel {
            self.issue_problem(now_ms);
            self.age_power_up();
        }

        Ok(outcome)
    }

    fn resolve_correct(&mut self, check: &AnswerCheck, outcome: &mut AnswerOutcome) {
        self.state.consecutive_correct += 1;
        self.state.correct_answers += 1;

        let mut damage = calculate_damage(true, check.time_taken);
        log::debug!("Base damage {}", damage);

        if matches!(self.state.power_up, Some(p) if p.kind == PowerUpKind::Damage) {
            damage = damage.saturating_mul(self.rules.double_damage_multiplier);
            outcome.double_damage = true;
            self.collect_power_up();
        }

        if self.state.consecutive_correct >= self.rules.critical_streak {
            damage = damage.saturating_mul(self.rules.critical_multiplier);
            outcome.critical = true;
            self.state.consecutive_correct = 0;
        }

        outcome.damage = damage;
        let defeated = self.state.damage_monster(damage);
        let message = self.generator.encouraging_message().to_string();
        self.push(BattleEvent::Correct {
            message,
            damage,
            critical: outcome.critical,
            double_damage: outcome.double_damage,
        });

        let within_reach = self.state.power_up.is_some_and(|p| {
            p.kind != PowerUpKind::Damage
                && self.stage.hero_near(p.position, self.rules.pickup_radius)
        });
        if within_reach {
            self.collect_power_up();
        }

        if defeated {
            self.monster_defeated();
        }
    }

    fn resolve_wrong(&mut self, check: &AnswerCheck, outcome: &mut AnswerOutcome) {
        self.state.consecutive_correct = 0;
        let correct_answer = check.correct_answer.unwrap_or_default();

        if matches!(self.state.power_up, Some(p) if p.kind == PowerUpKind::Health) {
            outcome.potion_used = true;
            self.push(BattleEvent::Incorrect {
                correct_answer,
                potion_used: true,
            });
            self.collect_power_up();
            return;
        }

        self.push(BattleEvent::Incorrect {
            correct_answer,
            potion_used: false,
        });
        if self.state.damage_hero(self.rules.wrong_answer_penalty) {
            self.game_over(GameOverReason::HeroDefeated);
        }
    }

    /// Apply and remove the active power-up
    fn collect_power_up(&mut self) {
        let Some(power_up) = self.state.power_up.take() else {
            return;
        };

        let amount = match power_up.kind {
            PowerUpKind::Health => {
                self.state.heal_hero(self.rules.potion_heal);
                self.rules.potion_heal
            }
            PowerUpKind::Time => {
                self.state.session_clock.add(self.rules.time_bonus_seconds);
                self.push(BattleEvent::SessionClock {
                    remaining: self.state.time_remaining(),
                });
                self.rules.time_bonus_seconds
            }
            // Applied by the damage pipeline
            PowerUpKind::Damage => 0,
        };

        log::info!("{} power-up collected", power_up.kind.as_str());
        self.push(BattleEvent::PowerUpCollected {
            power_up: power_up.kind,
            amount,
        });
    }

    /// Count one problem off the power-up's lifetime
    fn age_power_up(&mut self) {
        let Some(power_up) = self.state.power_up.as_mut() else {
            return;
        };
        power_up.remaining_problems = power_up.remaining_problems.saturating_sub(1);
        if power_up.remaining_problems == 0 {
            let kind = power_up.kind;
            self.state.power_up = None;
            log::debug!("{} power-up expired", kind.as_str());
            self.push(BattleEvent::PowerUpExpired { power_up: kind });
        }
    }

    fn monster_defeated(&mut self) {
        self.state.question_clock.stop();
        self.state.level += 1;
        self.state.phase = BattlePhase::LevelTransition;
        log::info!("Monster defeated, advancing to level {}", self.state.level);
        self.push(BattleEvent::MonsterDefeated {
            next_level: self.state.level,
            delay_ms: self.rules.transition_delay_ms,
        });
    }

    /// Start the next level once the transition delay has elapsed
    pub fn finish_transition(&mut self, now_ms: f64) -> Result<()> {
        self.require("finish the level transition", &[BattlePhase::LevelTransition])?;
        self.start_level(now_ms);
        Ok(())
    }

    fn game_over(&mut self, reason: GameOverReason) {
        self.state.phase = BattlePhase::GameOver;
        self.state.session_clock.stop();
        self.state.question_clock.stop();

        let final_score = FinalScore {
            level: self.state.level,
            score: self.state.correct_answers,
            reason,
        };
        self.state.final_score = Some(final_score);
        log::info!(
            "Game over ({:?}): level {}, {} correct",
            reason,
            final_score.level,
            final_score.score
        );
        self.push(BattleEvent::GameOver { final_score });
    }

    /// One beat of the 1 Hz session clock
    pub fn session_tick(&mut self) {
        if !self.state.session_clock.is_running() {
            return;
        }
        let expired = self.state.session_clock.tick();
        self.push(BattleEvent::SessionClock {
            remaining: self.state.time_remaining(),
        });
        if expired {
            self.game_over(GameOverReason::TimeUp);
        }
    }

    /// One beat of the 1 Hz question clock
    pub fn question_tick(&mut self, now_ms: f64) {
        if !self.state.question_clock.is_running() {
            return;
        }
        let expired = self.state.question_clock.tick();
        self.push(BattleEvent::QuestionClock {
            remaining: self.state.question_time_remaining(),
        });
        if expired {
            self.question_time_up(now_ms);
        }
    }

    fn question_time_up(&mut self, now_ms: f64) {
        let penalty = self.rules.timeout_penalty;
        let knocked_out = self.state.damage_hero(penalty);
        self.push(BattleEvent::TooSlow { penalty });
        self.push_health();

        if knocked_out {
            self.game_over(GameOverReason::HeroDefeated);
        } else {
            self.issue_problem(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::POWER_UP_POSITION;
    use crate::problems::{Difficulty, OperationType};

    /// Rules with power-up spawning turned off so tests control them
    fn quiet_rules() -> Rules {
        Rules {
            power_up_chance: 0.0,
            ..Rules::default()
        }
    }

    fn started(operation: OperationType, difficulty: Difficulty) -> BattleController {
        let mut ctl = BattleController::with_rules(42, quiet_rules());
        ctl.start(GeneratorConfig::new(operation, 0, difficulty), 0.0)
            .expect("start from menu");
        ctl
    }

    fn answer<S: Stage>(ctl: &BattleController<S>) -> i64 {
        ctl.current_problem().expect("active problem").answer
    }

    /// Submit the right answer `secs` seconds after the problem appeared
    fn answer_after<S: Stage>(ctl: &mut BattleController<S>, secs: f64) -> AnswerOutcome {
        let now = ctl.generator().started_at_ms() + secs * 1000.0;
        let text = answer(ctl).to_string();
        ctl.submit_answer(&text, now).expect("accepted answer")
    }

    fn answer_wrong<S: Stage>(ctl: &mut BattleController<S>) -> AnswerOutcome {
        let now = ctl.generator().started_at_ms() + 6000.0;
        let text = (answer(ctl) + 1).to_string();
        ctl.submit_answer(&text, now).expect("accepted answer")
    }

    #[test]
    fn test_start_sets_up_first_level() {
        let ctl = started(OperationType::Addition, Difficulty::Easy);
        let state = ctl.state();
        assert_eq!(state.phase, BattlePhase::InLevel);
        assert_eq!(state.level, 1);
        assert_eq!(state.hero_health, 50);
        assert_eq!(state.monster_max_health, 30);
        assert_eq!(state.monster_health, 30);
        assert_eq!(state.time_remaining(), 120);
        assert_eq!(state.question_time_remaining(), 10);
        assert!(state.session_clock.is_running());
        assert!(state.question_clock.is_running());

        let p = ctl.current_problem().expect("problem");
        assert!((1..=5).contains(&p.num1));
        assert!((1..=5).contains(&p.num2));
    }

    #[test]
    fn test_fast_correct_answer_damages_monster() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        let outcome = answer_after(&mut ctl, 2.0);

        assert!(outcome.correct);
        assert_eq!(outcome.damage, 13);
        assert_eq!(ctl.state().monster_health, 17);
        assert_eq!(ctl.state().correct_answers, 1);
        assert_eq!(ctl.state().consecutive_correct, 1);
    }

    #[test]
    fn test_third_in_a_row_is_critical() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        assert_eq!(answer_after(&mut ctl, 6.0).damage, 10);
        assert_eq!(answer_after(&mut ctl, 6.0).damage, 10);
        assert_eq!(ctl.state().consecutive_correct, 2);

        let third = answer_after(&mut ctl, 6.0);
        assert!(third.critical);
        assert_eq!(third.damage, 30);
        assert_eq!(ctl.state().consecutive_correct, 0);
        assert_eq!(ctl.state().correct_answers, 3);
    }

    #[test]
    fn test_double_damage_stacks_with_critical() {
        let mut ctl = started(OperationType::Multiplication, Difficulty::Medium);
        ctl.state.monster_health = 1000;
        ctl.state.monster_max_health = 1000;
        ctl.state.consecutive_correct = 2;
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Damage, 3));

        let outcome = answer_after(&mut ctl, 6.0);
        assert!(outcome.double_damage);
        assert!(outcome.critical);
        assert_eq!(outcome.damage, 60);
        assert_eq!(ctl.state().monster_health, 940);
        assert!(ctl.state().power_up.is_none());
    }

    #[test]
    fn test_extreme_rules_saturate_instead_of_overflowing() {
        let rules = Rules::from_json(
            r#"{"critical_multiplier": 4294967295, "double_damage_multiplier": 4294967295,
                "monster_health_per_level": 4294967295, "power_up_chance": 0.0}"#,
        )
        .expect("valid json");
        let mut ctl = BattleController::with_rules(8, rules);
        ctl.start(GeneratorConfig::default(), 0.0).expect("start");
        assert_eq!(ctl.state().monster_max_health, u32::MAX);

        assert_eq!(answer_after(&mut ctl, 6.0).damage, 10);
        assert_eq!(answer_after(&mut ctl, 6.0).damage, 10);
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Damage, 3));
        let third = answer_after(&mut ctl, 6.0);
        assert!(third.critical);
        assert_eq!(third.damage, u32::MAX);
        assert_eq!(ctl.phase(), BattlePhase::LevelTransition);

        // Next level's health curve saturates too
        ctl.finish_transition(30_000.0).expect("transition");
        assert_eq!(ctl.state().monster_health, u32::MAX);
    }

    #[test]
    fn test_wrong_answer_knocks_out_weak_hero() {
        let mut ctl = started(OperationType::Subtraction, Difficulty::Easy);
        ctl.state.hero_health = 3;
        ctl.drain_events();

        let outcome = answer_wrong(&mut ctl);
        assert!(!outcome.correct);
        assert_eq!(ctl.state().hero_health, 0);
        assert_eq!(ctl.phase(), BattlePhase::GameOver);
        assert!(!ctl.state().session_clock.is_running());
        assert!(!ctl.state().question_clock.is_running());

        let final_score = ctl.final_score().expect("final score");
        assert_eq!(final_score.level, 1);
        assert_eq!(final_score.score, 0);
        assert_eq!(final_score.reason, GameOverReason::HeroDefeated);

        // No new problem after the game ends
        let events = ctl.drain_events();
        assert!(!events.iter().any(|e| matches!(e, BattleEvent::ProblemIssued { .. })));
    }

    #[test]
    fn test_wrong_answer_resets_streak_and_costs_five() {
        let mut ctl = started(OperationType::Addition, Difficulty::Medium);
        ctl.state.consecutive_correct = 2;
        answer_wrong(&mut ctl);
        assert_eq!(ctl.state().consecutive_correct, 0);
        assert_eq!(ctl.state().hero_health, 45);
        assert_eq!(ctl.phase(), BattlePhase::InLevel);
    }

    #[test]
    fn test_overkill_clamps_and_starts_transition() {
        let mut ctl = started(OperationType::Division, Difficulty::Hard);
        ctl.state.monster_health = 8;

        let outcome = answer_after(&mut ctl, 7.0);
        assert_eq!(outcome.damage, 10);
        assert_eq!(ctl.state().monster_health, 0);
        assert_eq!(ctl.phase(), BattlePhase::LevelTransition);
        assert_eq!(ctl.state().level, 2);
        assert!(!ctl.state().question_clock.is_running());

        // Answers are not accepted between levels
        let err = ctl.submit_answer("1", 20_000.0).unwrap_err();
        assert!(matches!(err, BattleError::InvalidPhase { .. }));

        ctl.finish_transition(20_000.0).expect("transition");
        assert_eq!(ctl.phase(), BattlePhase::InLevel);
        assert_eq!(ctl.state().monster_max_health, 40);
        assert_eq!(ctl.state().monster_health, 40);
        assert_eq!(ctl.state().question_time_remaining(), 10);
    }

    #[test]
    fn test_question_timeout_penalises_and_reissues() {
        let mut ctl = started(OperationType::Addition, Difficulty::Hard);
        ctl.drain_events();

        for second in 1..=10 {
            ctl.question_tick(second as f64 * 1000.0);
        }

        assert_eq!(ctl.state().hero_health, 48);
        assert_eq!(ctl.state().question_time_remaining(), 10);
        assert!(ctl.state().question_clock.is_running());
        assert_eq!(ctl.generator().started_at_ms(), 10_000.0);

        let events = ctl.drain_events();
        assert!(events.contains(&BattleEvent::TooSlow { penalty: 2 }));
        assert!(matches!(
            events.iter().rev().nth(1),
            Some(BattleEvent::ProblemIssued { .. })
        ));
    }

    #[test]
    fn test_question_timeout_can_end_game() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.state.hero_health = 2;
        for second in 1..=10 {
            ctl.question_tick(second as f64 * 1000.0);
        }
        assert_eq!(ctl.state().hero_health, 0);
        assert_eq!(ctl.phase(), BattlePhase::GameOver);
    }

    #[test]
    fn test_submit_stops_question_clock_first() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        for second in 1..=9 {
            ctl.question_tick(second as f64 * 1000.0);
        }
        assert_eq!(ctl.state().question_time_remaining(), 1);

        answer_wrong(&mut ctl);
        ctl.question_tick(10_000.0);

        // Only the wrong-answer penalty applied; the clock restarted
        assert_eq!(ctl.state().hero_health, 45);
        assert_eq!(ctl.state().question_time_remaining(), 9);
    }

    #[test]
    fn test_bad_input_changes_nothing() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.question_tick(1000.0);
        let before = ctl.state().clone();
        let problem = ctl.current_problem().cloned();

        assert_eq!(ctl.submit_answer("   ", 2000.0), Err(BattleError::EmptyInput));
        let err = ctl.submit_answer("seven", 2000.0).unwrap_err();
        assert_eq!(err, BattleError::NotANumber("seven".to_string()));
        assert!(err.is_input_error());

        assert_eq!(ctl.state().question_clock, before.question_clock);
        assert_eq!(ctl.state().hero_health, before.hero_health);
        assert_eq!(ctl.state().correct_answers, before.correct_answers);
        assert_eq!(ctl.current_problem().cloned(), problem);
    }

    #[test]
    fn test_numeric_text_without_integer_is_wrong() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        let outcome = ctl.submit_answer("Infinity", 6000.0).expect("numeric text");
        assert!(!outcome.correct);
        assert_eq!(ctl.state().hero_health, 45);

        // Exponent notation is scored by its leading digits
        let expected = answer(&ctl);
        let outcome = ctl
            .submit_answer(&format!("{}e1", expected), 12_000.0)
            .expect("numeric text");
        assert!(outcome.correct);
    }

    #[test]
    fn test_health_potion_absorbs_wrong_answer() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.state.hero_health = 20;
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Health, 3));

        let outcome = answer_wrong(&mut ctl);
        assert!(outcome.potion_used);
        assert_eq!(ctl.state().hero_health, 40);
        assert!(ctl.state().power_up.is_none());
    }

    #[test]
    fn test_power_up_expires_after_three_problems() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Time, 3));
        ctl.drain_events();

        answer_wrong(&mut ctl);
        answer_wrong(&mut ctl);
        assert_eq!(ctl.state().power_up.map(|p| p.remaining_problems), Some(1));
        answer_wrong(&mut ctl);
        assert!(ctl.state().power_up.is_none());

        let events = ctl.drain_events();
        assert!(events.contains(&BattleEvent::PowerUpExpired {
            power_up: PowerUpKind::Time
        }));
    }

    #[test]
    fn test_nearby_power_up_is_collected() {
        let stage = FixedStage {
            hero: POWER_UP_POSITION,
        };
        let mut ctl = BattleController::with_stage(7, quiet_rules(), stage);
        ctl.start(GeneratorConfig::default(), 0.0).expect("start");
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Time, 3));

        answer_after(&mut ctl, 6.0);
        assert!(ctl.state().power_up.is_none());
        assert_eq!(ctl.state().time_remaining(), 150);
    }

    #[test]
    fn test_distant_power_up_stays() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.state.power_up = Some(PowerUp::new(PowerUpKind::Health, 3));
        answer_after(&mut ctl, 6.0);
        assert_eq!(ctl.state().power_up.map(|p| p.remaining_problems), Some(2));
    }

    #[test]
    fn test_session_expiry_ends_game() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        for _ in 0..119 {
            ctl.session_tick();
        }
        assert_eq!(ctl.phase(), BattlePhase::InLevel);
        ctl.session_tick();

        assert_eq!(ctl.phase(), BattlePhase::GameOver);
        assert_eq!(ctl.state().time_remaining(), 0);
        assert_eq!(
            ctl.final_score().map(|s| s.reason),
            Some(GameOverReason::TimeUp)
        );

        // Frozen clocks ignore further ticks
        ctl.session_tick();
        ctl.question_tick(200_000.0);
        assert_eq!(ctl.state().hero_health, 50);
    }

    #[test]
    fn test_session_expiry_during_transition() {
        let mut ctl = started(OperationType::Addition, Difficulty::Easy);
        ctl.state.monster_health = 1;
        answer_after(&mut ctl, 6.0);
        assert_eq!(ctl.phase(), BattlePhase::LevelTransition);

        for _ in 0..120 {
            ctl.session_tick();
        }
        assert_eq!(ctl.phase(), BattlePhase::GameOver);
        assert_eq!(ctl.final_score().map(|s| s.level), Some(2));
        assert!(ctl.finish_transition(130_000.0).is_err());
    }

    #[test]
    fn test_boss_level_has_double_health_and_no_power_up() {
        let rules = Rules {
            power_up_chance: 1.0,
            ..Rules::default()
        };
        let mut ctl = BattleController::with_rules(3, rules);
        ctl.start(GeneratorConfig::default(), 0.0).expect("start");
        assert!(ctl.state().power_up.is_some());

        ctl.state.power_up = None;
        ctl.state.level = 4;
        ctl.state.monster_health = 1;
        answer_after(&mut ctl, 6.0);
        ctl.finish_transition(10_000.0).expect("transition");

        assert_eq!(ctl.state().level, 5);
        assert!(ctl.state().boss);
        assert!(ctl.state().monster.boss);
        assert_eq!(ctl.state().monster_max_health, 140);
        assert!(ctl.state().power_up.is_none());
    }

    #[test]
    fn test_restart_and_menu_transitions() {
        let mut ctl = started(OperationType::Multiplication, Difficulty::Hard);
        assert!(ctl.restart(0.0).is_err());
        assert!(ctl.start(GeneratorConfig::default(), 0.0).is_err());

        answer_after(&mut ctl, 1.0);
        ctl.state.hero_health = 1;
        answer_wrong(&mut ctl);
        assert_eq!(ctl.phase(), BattlePhase::GameOver);
        assert_eq!(ctl.final_score().map(|s| s.score), Some(1));

        ctl.restart(50_000.0).expect("restart");
        assert_eq!(ctl.phase(), BattlePhase::InLevel);
        assert_eq!(ctl.state().level, 1);
        assert_eq!(ctl.state().hero_health, 50);
        assert_eq!(ctl.state().correct_answers, 0);
        assert_eq!(ctl.state().time_remaining(), 120);
        assert_eq!(ctl.generator().config().operation, OperationType::Multiplication);

        ctl.return_to_menu().expect("menu");
        assert_eq!(ctl.phase(), BattlePhase::Menu);
        assert!(!ctl.state().is_game_started());
        assert!(ctl.return_to_menu().is_err());
        assert!(ctl.submit_answer("3", 0.0).is_err());
    }

    #[test]
    fn test_events_describe_level_start() {
        let ctl = started(OperationType::Addition, Difficulty::Easy);
        let events = ctl.pending_events();
        assert!(matches!(events[0], BattleEvent::SessionStarted { .. }));
        assert!(events.iter().any(|e| matches!(
            e,
            BattleEvent::LevelStarted {
                level: 1,
                boss: false,
                monster_max_health: 30,
                ..
            }
        )));
        assert!(events.iter().any(|e| matches!(e, BattleEvent::ProblemIssued { .. })));
    }
}
