//! Host frame loop
//!
//! Turns variable host frames into fixed session ticks and owns the one-shot
//! commands between them. The native binary and the web export both drive
//! the session through this.

use super::time::FixedStep;
use super::{EntityFactory, Presenter, present_tick};
use crate::highscores::HighScoreStore;
use crate::sim::{GameEvent, SessionController, TickInput};

pub struct FrameDriver<S: HighScoreStore, F: EntityFactory> {
    session: SessionController<S, F>,
    clock: FixedStep,
    input: TickInput,
}

impl<S: HighScoreStore, F: EntityFactory> FrameDriver<S, F> {
    pub fn new(session: SessionController<S, F>) -> Self {
        Self {
            session,
            clock: FixedStep::default(),
            input: TickInput::default(),
        }
    }

    pub fn session(&self) -> &SessionController<S, F> {
        &self.session
    }

    /// Fraction of a step not yet simulated, for render interpolation
    pub fn alpha(&self) -> f32 {
        self.clock.alpha()
    }

    /// Jump pressed (key, touch or click). Consumed by the next tick.
    pub fn press_jump(&mut self) {
        self.input.jump = true;
    }

    /// Restart on the next tick; partial frame time is discarded
    pub fn request_restart(&mut self) {
        self.input.restart = true;
        self.clock.reset();
    }

    pub fn request_quit(&mut self) {
        self.input.quit = true;
    }

    /// Feed one host frame. Returns every event the ticks produced.
    pub fn frame(&mut self, frame_dt: f32, presenter: &mut impl Presenter) -> Vec<GameEvent> {
        let mut events = Vec::new();
        // Commands must not wait on a frame too short for a step
        let pending = self.input.restart || self.input.quit;
        let steps = self.clock.advance(frame_dt).max(u32::from(pending));

        for _ in 0..steps {
            let tick_events = self.session.tick(&self.input, self.clock.step);
            present_tick(presenter, &self.session.view(), &tick_events);
            events.extend(tick_events);

            // One-shot inputs
            self.input = TickInput::default();
            if self.session.quit_requested() {
                break;
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::highscores::MemoryStore;
    use crate::platform::{HeadlessFactory, LogPresenter};
    use crate::sim::SessionPhase;
    use crate::tuning::Tuning;

    fn driver() -> FrameDriver<MemoryStore, HeadlessFactory> {
        let mut session =
            SessionController::new(Tuning::default(), 5, MemoryStore::default(), HeadlessFactory::new());
        session.start_game();
        FrameDriver::new(session)
    }

    #[test]
    fn test_frame_runs_whole_ticks() {
        let mut d = driver();
        let mut presenter = LogPresenter::default();
        d.frame(SIM_DT * 3.5, &mut presenter);
        assert_eq!(d.session().context().unwrap().time_ticks, 3);
        assert!((d.alpha() - 0.5).abs() < 1e-3);
        d.frame(SIM_DT * 0.6, &mut presenter);
        assert_eq!(d.session().context().unwrap().time_ticks, 4);
    }

    #[test]
    fn test_jump_press_is_one_shot() {
        let mut d = driver();
        let mut presenter = LogPresenter::default();
        // Settle onto the starter platform
        for _ in 0..35 {
            d.frame(1.0 / 60.0, &mut presenter);
        }
        assert!(d.session().context().unwrap().player.is_grounded);
        d.press_jump();
        let events = d.frame(1.0 / 60.0, &mut presenter);
        assert_eq!(events.iter().filter(|e| **e == GameEvent::Jump).count(), 1);
        assert!(!d.input.jump);
    }

    #[test]
    fn test_restart_applies_even_on_a_short_frame() {
        let mut d = driver();
        let mut presenter = LogPresenter::default();
        d.frame(0.5, &mut presenter);
        d.request_restart();
        d.frame(0.0, &mut presenter);
        assert_eq!(d.session().runs(), 2);
        assert_eq!(d.session().phase(), SessionPhase::Active);
        assert_eq!(d.session().context().unwrap().time_ticks, 1);
    }

    #[test]
    fn test_quit_stops_ticking() {
        let mut d = driver();
        let mut presenter = LogPresenter::default();
        d.request_quit();
        let events = d.frame(1.0 / 30.0, &mut presenter);
        assert!(events.is_empty());
        assert!(d.session().quit_requested());
        assert!(d.session().context().is_none());
    }
}
