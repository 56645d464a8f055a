//! Ledge Runner entry point
//!
//! Native builds run a headless session driven by a simple autopilot: one
//! run, a restart, a second run, then quit. Usage:
//!
//! ```text
//! ledge-runner [tuning.json] [seed]
//! ```
//!
//! The high score file defaults to `ledge_runner_highscore.json` and can be
//! moved with `LEDGE_RUNNER_SCORES`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use ledge_runner::highscores::FileStore;
    use ledge_runner::platform::{FrameDriver, HeadlessFactory, LogPresenter};
    use ledge_runner::sim::{GameEvent, SessionContext, SessionController};
    use ledge_runner::{RunnerError, Tuning};

    /// Host frame time the loop pretends to render at
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up on a run after this many seconds of game time
    const MAX_RUN_SECONDS: f32 = 120.0;
    /// How far ahead the autopilot looks for obstacles
    const OBSTACLE_LOOKAHEAD: f32 = 1.2;
    /// How far ahead the autopilot checks for ground
    const EDGE_LOOKAHEAD: f32 = 0.4;

    /// Decide whether to jump this frame
    fn autopilot(ctx: &SessionContext) -> bool {
        let player = &ctx.player;
        if !player.is_grounded || player.is_dead {
            return false;
        }
        let bounds = player.bounds();
        let front = bounds.right();

        let obstacle_ahead = ctx.level.obstacles().iter().any(|o| {
            o.bounds.left() > bounds.left()
                && o.bounds.left() - front < OBSTACLE_LOOKAHEAD
                && o.bounds.bottom() < bounds.top()
        });

        let probe_x = front + EDGE_LOOKAHEAD;
        let ground_ahead = ctx.level.platforms().iter().any(|p| {
            probe_x > p.bounds.left()
                && probe_x < p.bounds.right()
                && (p.bounds.top() - bounds.bottom()).abs() < 0.5
        });

        obstacle_ahead || !ground_ahead
    }

    pub fn run() -> Result<(), RunnerError> {
        ledge_runner::init_logging();
        log::info!("Ledge Runner (headless) starting...");

        let mut args = std::env::args().skip(1);
        let tuning = match args.next() {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(0x1ed9e);

        let scores_path = std::env::var("LEDGE_RUNNER_SCORES")
            .unwrap_or_else(|_| "ledge_runner_highscore.json".to_string());
        let store = FileStore::open(scores_path)?;

        let mut session = SessionController::new(tuning, seed, store, HeadlessFactory::new());
        session.start_game();
        let mut driver = FrameDriver::new(session);
        let mut presenter = LogPresenter::default();
        let mut run_time = 0.0;

        while !driver.session().quit_requested() {
            if driver.session().context().is_some_and(autopilot) {
                driver.press_jump();
            }

            let events = driver.frame(FRAME_DT, &mut presenter);
            run_time += FRAME_DT;

            let over = events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }));
            if over || run_time > MAX_RUN_SECONDS {
                if !over {
                    log::info!("Run still alive after {:.0}s, stopping", run_time);
                }
                let session = driver.session();
                let view = session.view();
                log::info!(
                    "Run {} finished: score {}, high score {}, {} entities spawned",
                    session.runs(),
                    view.score,
                    view.high_score,
                    session.factory().spawned
                );
                if session.runs() < 2 {
                    driver.request_restart();
                } else {
                    driver.request_quit();
                }
                run_time = 0.0;
            }
        }

        log::info!("Best score: {}", driver.session().state().high_score);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = headless::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web builds start from `ledge_runner::web::start`
}
