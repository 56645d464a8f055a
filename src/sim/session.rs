//! Session controller
//!
//! Idle → Active → GameOver, with Restart going back through Idle against a
//! freshly allocated world. Owns score, the difficulty ramp and the
//! collaborators (high score store, entity factory).

use super::state::{GameEvent, SessionContext, SessionPhase, SessionState, SessionView};
use super::tick::{TickInput, tick};
use crate::error::RunnerError;
use crate::highscores::HighScoreStore;
use crate::platform::EntityFactory;
use crate::tuning::Tuning;

pub struct SessionController<S: HighScoreStore, F: EntityFactory> {
    tuning: Tuning,
    store: S,
    factory: F,
    phase: SessionPhase,
    state: SessionState,
    /// World of the current run (None while Idle)
    ctx: Option<SessionContext>,
    /// Seconds until the next difficulty step
    ramp_timer: f32,
    base_seed: u64,
    runs: u64,
    quit_requested: bool,
}

impl<S: HighScoreStore, F: EntityFactory> SessionController<S, F> {
    pub fn new(tuning: Tuning, seed: u64, store: S, factory: F) -> Self {
        let tuning = tuning.sanitized();
        let state = SessionState::new(&tuning, store.high_score());
        let ramp_timer = state.current_spawn_delay;
        Self {
            tuning,
            store,
            factory,
            phase: SessionPhase::Idle,
            state,
            ctx: None,
            ramp_timer,
            base_seed: seed,
            runs: 0,
            quit_requested: false,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn context(&self) -> Option<&SessionContext> {
        self.ctx.as_ref()
    }

    pub fn context_mut(&mut self) -> Option<&mut SessionContext> {
        self.ctx.as_mut()
    }

    /// World and factory together, for placing entities by hand
    pub fn world_mut(&mut self) -> Option<(&mut SessionContext, &mut F)> {
        self.ctx.as_mut().map(|ctx| (ctx, &mut self.factory))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Host should terminate once this is set
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Runs started so far
    pub fn runs(&self) -> u64 {
        self.runs
    }

    /// Snapshot for presentation
    pub fn view(&self) -> SessionView {
        SessionView {
            phase: self.phase,
            score: self.state.score,
            high_score: self.state.high_score,
            is_active: self.state.is_active,
            speed: self.state.current_speed,
            player_position: self.ctx.as_ref().map(|c| c.player.position),
        }
    }

    /// Idle → Active: allocate a fresh world and reset score and difficulty
    pub fn start_game(&mut self) {
        if self.phase != SessionPhase::Idle {
            log::warn!("start_game ignored while {:?}", self.phase);
            return;
        }

        let seed = self.base_seed.wrapping_add(self.runs);
        self.runs += 1;

        let mut ctx = SessionContext::new(&self.tuning, seed, &mut self.factory);
        self.state = SessionState::new(&self.tuning, self.store.high_score());
        self.state.is_active = true;
        ctx.player.set_movement_speed(self.state.current_speed);
        self.ctx = Some(ctx);

        self.ramp_timer = self.state.current_spawn_delay;
        self.phase = SessionPhase::Active;
        log::info!(
            "Run {} started (seed {}, high score {})",
            self.runs,
            seed,
            self.state.high_score
        );
    }

    /// Advance one fixed step
    ///
    /// Handles the quit/restart commands, steps the world while Active and
    /// applies score, game over and difficulty consequences. Returns every
    /// event produced, for presentation.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Vec<GameEvent> {
        if input.quit {
            self.quit_game();
            return Vec::new();
        }
        if input.restart {
            self.restart_game();
        }
        if self.phase != SessionPhase::Active {
            return Vec::new();
        }

        let Some(ctx) = self.ctx.as_mut() else {
            log::warn!("{}", RunnerError::MissingReference("session world"));
            return Vec::new();
        };
        let mut events = tick(ctx, input, dt, &mut self.factory);

        // Score and death both apply when they land on the same tick
        let scored = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Score { .. }))
            .count();
        let died = events.contains(&GameEvent::Death);

        for _ in 0..scored {
            events.extend(self.add_score());
        }
        if died {
            events.extend(self.game_over());
        } else {
            events.extend(self.advance_ramp(dt));
        }

        events
    }

    /// Count one point, raising and persisting the high score when beaten
    pub fn add_score(&mut self) -> Option<GameEvent> {
        self.state.score = self.state.score.saturating_add(1);
        if self.state.score > self.state.high_score {
            self.state.high_score = self.state.score;
            self.store.set_high_score(self.state.high_score);
            return Some(GameEvent::NewHighScore(self.state.high_score));
        }
        None
    }

    /// One difficulty step: shorter delay, faster player
    pub fn advance_difficulty(&mut self) -> GameEvent {
        let d = &self.tuning.difficulty;
        self.state.current_spawn_delay =
            (self.state.current_spawn_delay - d.spawn_delay_decay).max(d.min_spawn_delay);
        self.state.current_speed = (self.state.current_speed + d.speed_increase).min(d.max_speed);

        if let Some(ctx) = self.ctx.as_mut() {
            ctx.player.set_movement_speed(self.state.current_speed);
        }
        log::debug!(
            "difficulty: speed {:.2}, delay {:.3}",
            self.state.current_speed,
            self.state.current_spawn_delay
        );
        GameEvent::DifficultyIncreased {
            speed: self.state.current_speed,
            spawn_delay: self.state.current_spawn_delay,
        }
    }

    /// Count down the ramp timer; steps when it expires, then waits the new delay
    fn advance_ramp(&mut self, dt: f32) -> Option<GameEvent> {
        self.ramp_timer -= dt;
        if self.ramp_timer > 0.0 {
            return None;
        }
        let event = self.advance_difficulty();
        self.ramp_timer = self.state.current_spawn_delay;
        Some(event)
    }

    /// Active → GameOver. Freezes the world and stops the ramp.
    pub fn game_over(&mut self) -> Option<GameEvent> {
        if self.phase != SessionPhase::Active {
            return None;
        }
        self.state.is_active = false;
        self.phase = SessionPhase::GameOver;
        log::info!(
            "Game over: score {}, high score {}",
            self.state.score,
            self.state.high_score
        );
        Some(GameEvent::GameOver {
            score: self.state.score,
            high_score: self.state.high_score,
        })
    }

    /// Drop the current world and start again from Idle
    pub fn restart_game(&mut self) {
        self.teardown();
        self.phase = SessionPhase::Idle;
        log::info!("Restarting");
        self.start_game();
    }

    /// Tear everything down and flag the host to terminate
    pub fn quit_game(&mut self) {
        self.teardown();
        self.phase = SessionPhase::Idle;
        self.quit_requested = true;
        log::info!("Quit requested");
    }

    fn teardown(&mut self) {
        if let Some(ctx) = self.ctx.take() {
            ctx.teardown(&mut self.factory);
        }
        self.state.is_active = false;
    }
}
