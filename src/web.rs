//! Browser entry point
//!
//! The page owns rendering and input; it calls `frame` from
//! `requestAnimationFrame` and reads positions back for drawing.

use wasm_bindgen::prelude::*;

use crate::highscores::LocalStorageStore;
use crate::platform::{FrameDriver, HeadlessFactory, LogPresenter};
use crate::sim::{SessionController, WorldEntity};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    crate::init_logging();
    log::info!("Ledge Runner (web) ready");
}

/// Flatten entities to `[x, y, w, h, ...]` for the page to draw
fn rects(entities: &[WorldEntity]) -> Vec<f32> {
    entities
        .iter()
        .flat_map(|e| {
            let size = e.bounds.size();
            [e.bounds.center.x, e.bounds.center.y, size.x, size.y]
        })
        .collect()
}

#[wasm_bindgen]
pub struct WebRunner {
    driver: FrameDriver<LocalStorageStore, HeadlessFactory>,
    presenter: LogPresenter,
}

#[wasm_bindgen]
impl WebRunner {
    /// Start a session. `tuning_json` may override any part of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: f64, tuning_json: Option<String>) -> WebRunner {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring tuning: {}", e);
                Tuning::default()
            }),
            None => Tuning::default(),
        };
        let mut session =
            SessionController::new(tuning, seed as u64, LocalStorageStore::load(), HeadlessFactory::new());
        session.start_game();
        WebRunner {
            driver: FrameDriver::new(session),
            presenter: LogPresenter::default(),
        }
    }

    /// Advance by one animation frame (seconds)
    pub fn frame(&mut self, dt: f32) {
        self.driver.frame(dt, &mut self.presenter);
    }

    /// Interpolation factor between the last two ticks
    pub fn alpha(&self) -> f32 {
        self.driver.alpha()
    }

    pub fn jump(&mut self) {
        self.driver.press_jump();
    }

    pub fn restart(&mut self) {
        self.driver.request_restart();
    }

    pub fn quit(&mut self) {
        self.driver.request_quit();
    }

    pub fn score(&self) -> u32 {
        self.driver.session().view().score
    }

    pub fn high_score(&self) -> u32 {
        self.driver.session().view().high_score
    }

    pub fn is_active(&self) -> bool {
        self.driver.session().view().is_active
    }

    pub fn quit_requested(&self) -> bool {
        self.driver.session().quit_requested()
    }

    /// `[x, y]` of the player, empty while no run exists
    pub fn player(&self) -> Vec<f32> {
        self.driver
            .session()
            .view()
            .player_position
            .map(|p| vec![p.x, p.y])
            .unwrap_or_default()
    }

    /// `[x, y]` of the camera centre, empty while no run exists
    pub fn camera(&self) -> Vec<f32> {
        self.driver
            .session()
            .context()
            .map(|ctx| {
                let c = ctx.camera.center();
                vec![c.x, c.y]
            })
            .unwrap_or_default()
    }

    pub fn platforms(&self) -> Vec<f32> {
        self.driver
            .session()
            .context()
            .map(|ctx| rects(ctx.level.platforms()))
            .unwrap_or_default()
    }

    pub fn obstacles(&self) -> Vec<f32> {
        self.driver
            .session()
            .context()
            .map(|ctx| rects(ctx.level.obstacles()))
            .unwrap_or_default()
    }

    pub fn collectibles(&self) -> Vec<f32> {
        self.driver
            .session()
            .context()
            .map(|ctx| rects(ctx.level.collectibles()))
            .unwrap_or_default()
    }
}
