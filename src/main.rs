//! Math Battle entry point
//!
//! On the web the library's `web` module is the entry point. Natively this
//! runs a console session: problems print to stdout, answers come from stdin
//! and the clocks catch up on wall time between answers.

#[cfg(not(target_arch = "wasm32"))]
mod console {
    use std::io::{self, BufRead, Write};
    use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

    use math_battle::battle::hud;
    use math_battle::{
        BattleController, BattleEvent, BattlePhase, Difficulty, HighScores, OperationType, Settings,
    };

    /// Wall clock measured from session start, ticked in whole seconds
    struct Clock {
        origin: Instant,
        ticks_applied: u64,
    }

    impl Clock {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                ticks_applied: 0,
            }
        }

        fn now_ms(&self) -> f64 {
            self.origin.elapsed().as_secs_f64() * 1000.0
        }

        /// Apply every 1 Hz tick that elapsed since the last call
        fn catch_up(&mut self, controller: &mut BattleController) {
            let elapsed = self.origin.elapsed().as_secs();
            while self.ticks_applied < elapsed {
                self.ticks_applied += 1;
                controller.session_tick();
                controller.question_tick(self.ticks_applied as f64 * 1000.0);
            }
        }
    }

    fn seed() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    /// `math-battle [operation] [difficulty] [table]`
    fn apply_args(settings: &mut Settings) {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let operation = args
            .first()
            .and_then(|s| OperationType::from_str(s))
            .unwrap_or(settings.operation);
        let difficulty = args
            .get(1)
            .and_then(|s| Difficulty::from_str(s))
            .unwrap_or(settings.difficulty);
        let table = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(settings.table);
        settings.select(operation, table, difficulty);
    }

    /// What became of a typed line
    #[derive(Debug, PartialEq)]
    enum Submission {
        Scored,
        /// The question clock ran out and a new problem replaced the one shown
        Stale,
        NotANumber,
        Ignored,
    }

    /// Score `line` against the problem on screen. Events must have been
    /// drained when that problem was printed, so any queued `ProblemIssued`
    /// means the player never saw the current one.
    fn submit_line(controller: &mut BattleController, line: &str, now_ms: f64) -> Submission {
        if controller.phase() != BattlePhase::InLevel {
            return Submission::Ignored;
        }
        let reissued = controller
            .pending_events()
            .iter()
            .any(|e| matches!(e, BattleEvent::ProblemIssued { .. }));
        if reissued {
            return Submission::Stale;
        }
        match controller.submit_answer(line, now_ms) {
            Ok(_) => Submission::Scored,
            Err(err) if err.is_input_error() => Submission::NotANumber,
            Err(err) => {
                log::warn!("{}", err);
                Submission::Ignored
            }
        }
    }

    /// Print banners and problems; returns the pending transition delay if a
    /// monster fell
    fn show_events(controller: &mut BattleController) -> Option<u32> {
        let mut transition = None;
        for event in controller.drain_events() {
            if let Some(banner) = event.banner() {
                println!("  >> {}", banner);
            }
            match event {
                BattleEvent::LevelStarted {
                    level,
                    boss,
                    monster_max_health,
                    ..
                } => {
                    println!();
                    println!(
                        "=== Level {} === monster HP {}",
                        hud::level_label(level, boss),
                        monster_max_health
                    );
                }
                BattleEvent::MonsterDefeated { delay_ms, .. } => {
                    println!("  >> Monster defeated!");
                    transition = Some(delay_ms);
                }
                _ => {}
            }
        }
        transition
    }

    fn print_hud(controller: &BattleController) {
        let state = controller.state();
        let session = state.time_remaining();
        let question = state.question_time_remaining();
        println!(
            "[hero {}] [monster {}] [time {}{}] [question {}s{}]",
            hud::health_text(state.hero_health, state.hero_max_health),
            hud::health_text(state.monster_health, state.monster_max_health),
            hud::format_clock(session),
            if hud::session_warning(session) { "!" } else { "" },
            question,
            if hud::question_warning(question) { "!" } else { "" },
        );
        if let Some(problem) = controller.current_problem() {
            print!("{} ", problem.display_text);
            let _ = io::stdout().flush();
        }
    }

    fn finish_game(controller: &BattleController, high_scores: &mut HighScores) {
        let Some(final_score) = controller.final_score() else {
            return;
        };
        println!();
        println!("GAME OVER ({:?})", final_score.reason);
        println!(
            "Level reached: {}  Correct answers: {}",
            final_score.level, final_score.score
        );

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) =
            high_scores.add_score(&final_score, controller.generator().config(), timestamp)
        {
            println!("New high score! Rank #{}", rank);
            high_scores.save();
        }
    }

    pub fn run() -> io::Result<()> {
        let mut settings = Settings::load();
        apply_args(&mut settings);
        settings.save();

        let mut high_scores = HighScores::load();
        let mut controller = BattleController::new(seed());
        let mut clock = Clock::new();

        if let Err(err) = controller.start(settings.generator_config(), clock.now_ms()) {
            log::error!("Could not start: {}", err);
            return Ok(());
        }
        println!("Math Battle! Type answers and press Enter, 'q' to quit.");

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            if let Some(delay_ms) = show_events(&mut controller) {
                std::thread::sleep(Duration::from_millis(delay_ms as u64));
                clock.catch_up(&mut controller);
                if controller.phase() == BattlePhase::LevelTransition {
                    if let Err(err) = controller.finish_transition(clock.now_ms()) {
                        log::warn!("{}", err);
                    }
                }
                continue;
            }

            if controller.phase() == BattlePhase::GameOver {
                finish_game(&controller, &mut high_scores);
                print!("Play again? (y/n) ");
                io::stdout().flush()?;
                match lines.next().transpose()? {
                    Some(line) if line.trim().eq_ignore_ascii_case("y") => {
                        clock = Clock::new();
                        if let Err(err) = controller.restart(clock.now_ms()) {
                            log::warn!("{}", err);
                            break;
                        }
                        continue;
                    }
                    _ => break,
                }
            }

            print_hud(&controller);
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            if line.trim().eq_ignore_ascii_case("q") {
                break;
            }

            clock.catch_up(&mut controller);
            match submit_line(&mut controller, &line, clock.now_ms()) {
                Submission::Stale => println!("  >> Time ran out on that one!"),
                Submission::NotANumber => println!("  >> Please type a number"),
                Submission::Scored | Submission::Ignored => {}
            }
        }

        println!("Thanks for playing!");
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Math Battle (console) starting...");

    if let Err(err) = console::run() {
        log::error!("Console session failed: {}", err);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `math_battle::web::init`
}
