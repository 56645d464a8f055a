//! Platform abstraction layer
//!
//! The simulation never touches assets, rendering or audio directly. It talks
//! to the host through these seams:
//! - Entity factory (spawn/destroy visual instances)
//! - Presentation (read-only session view plus gameplay events)
//! - Time (fixed-step clock) and the host frame driver

pub mod driver;
pub mod time;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{EntityKind, GameEvent, SessionView};

pub use driver::FrameDriver;
pub use time::FixedStep;

/// Opaque handle to a host-side entity instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityHandle(pub u64);

/// Creates and destroys host-side instances for world entities
pub trait EntityFactory {
    fn spawn(&mut self, kind: EntityKind, position: Vec2, scale: Vec2) -> EntityHandle;
    fn destroy(&mut self, handle: EntityHandle);
}

/// Factory with no backing assets; just tracks which handles are alive
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    next: u64,
    live: Vec<(EntityHandle, EntityKind)>,
    /// Total spawns since creation
    pub spawned: u64,
    /// Total destroys since creation
    pub destroyed: u64,
}

impl HeadlessFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

impl EntityFactory for HeadlessFactory {
    fn spawn(&mut self, kind: EntityKind, _position: Vec2, _scale: Vec2) -> EntityHandle {
        self.next += 1;
        let handle = EntityHandle(self.next);
        self.live.push((handle, kind));
        self.spawned += 1;
        handle
    }

    fn destroy(&mut self, handle: EntityHandle) {
        if let Some(i) = self.live.iter().position(|(h, _)| *h == handle) {
            self.live.swap_remove(i);
            self.destroyed += 1;
        } else {
            log::warn!("destroy called on unknown handle {:?}", handle);
        }
    }
}

/// Receives display state and gameplay events. Must not block.
pub trait Presenter {
    /// Called once per simulated tick with the current session view
    fn present(&mut self, view: &SessionView);
    /// Called for every event a tick produced (jump/death sounds, animations)
    fn on_event(&mut self, event: &GameEvent);
}

/// Presenter that writes events to the log
#[derive(Debug, Default)]
pub struct LogPresenter {
    last_score: Option<u32>,
}

impl Presenter for LogPresenter {
    fn present(&mut self, view: &SessionView) {
        if self.last_score != Some(view.score) {
            log::debug!("score {} (best {})", view.score, view.high_score);
            self.last_score = Some(view.score);
        }
    }

    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Jump => log::trace!("jump"),
            GameEvent::Death => log::info!("player died"),
            GameEvent::GameOver { score, high_score } => {
                log::info!("Game over - score {} / high score {}", score, high_score)
            }
            GameEvent::NewHighScore(score) => log::info!("New high score: {}", score),
            other => log::debug!("{:?}", other),
        }
    }
}

/// Forward one tick's view and events to a presenter
pub fn present_tick(presenter: &mut impl Presenter, view: &SessionView, events: &[GameEvent]) {
    for event in events {
        presenter.on_event(event);
    }
    presenter.present(view);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_factory_tracks_live_handles() {
        let mut factory = HeadlessFactory::new();
        let a = factory.spawn(EntityKind::Platform, Vec2::ZERO, Vec2::ONE);
        let b = factory.spawn(EntityKind::Obstacle, Vec2::ZERO, Vec2::ONE);
        assert_ne!(a, b);
        assert_eq!(factory.live_count(), 2);

        factory.destroy(a);
        assert_eq!(factory.live_count(), 1);
        assert_eq!(factory.spawned, 2);
        assert_eq!(factory.destroyed, 1);

        // Unknown handle is ignored
        factory.destroy(a);
        assert_eq!(factory.destroyed, 1);
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<GameEvent>,
        views: u32,
    }

    impl Presenter for Recorder {
        fn present(&mut self, _view: &SessionView) {
            self.views += 1;
        }

        fn on_event(&mut self, event: &GameEvent) {
            self.events.push(*event);
        }
    }

    #[test]
    fn test_present_tick_forwards_events_then_view() {
        let view = SessionView {
            phase: crate::sim::SessionPhase::Active,
            score: 1,
            high_score: 4,
            is_active: true,
            speed: 5.0,
            player_position: Some(Vec2::ZERO),
        };
        let mut recorder = Recorder::default();
        present_tick(&mut recorder, &view, &[GameEvent::Jump, GameEvent::Death]);
        present_tick(&mut recorder, &view, &[]);

        assert_eq!(recorder.events, vec![GameEvent::Jump, GameEvent::Death]);
        assert_eq!(recorder.views, 2);
    }
}
