//! Session state and core simulation types
//!
//! Everything one run owns lives in `SessionContext`; restarting drops it and
//! builds a fresh one.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::camera::ChaseCamera;
use super::death_zone::DeathZone;
use super::level::LevelStream;
use super::player::PlayerBody;
use super::shape::Aabb;
use crate::platform::{EntityFactory, EntityHandle};
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No world allocated, waiting for StartGame
    Idle,
    /// Active gameplay
    Active,
    /// Run ended, world frozen
    GameOver,
}

/// Stable identifier for a world entity (never reused within a run)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// World entity types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Platform,
    Obstacle,
    Collectible,
}

/// A platform, obstacle or collectible owned by the level stream
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub handle: EntityHandle,
    pub bounds: Aabb,
    /// Platform an obstacle sits on (position only, not ownership)
    #[serde(default)]
    pub anchor: Option<EntityId>,
}

impl WorldEntity {
    pub fn position(&self) -> Vec2 {
        self.bounds.center
    }

    /// Platform width / obstacle width / collectible diameter
    pub fn width(&self) -> f32 {
        self.bounds.size().x
    }

    /// Right edge; the entity is behind the player once this passes the cleanup line
    pub fn trailing_edge(&self) -> f32 {
        self.bounds.right()
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player left the ground under its own power
    Jump,
    /// Player touched a collectible
    Score { collectible: EntityId },
    /// Player died (emitted exactly once per run)
    Death,
    /// Difficulty ramp advanced
    DifficultyIncreased { speed: f32, spawn_delay: f32 },
    /// Score passed the stored high score
    NewHighScore(u32),
    /// Session ended
    GameOver { score: u32, high_score: u32 },
}

/// Score and difficulty bookkeeping for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub score: u32,
    pub high_score: u32,
    /// Forward speed pushed into the player, within [initial, max]
    pub current_speed: f32,
    /// Seconds between difficulty steps, within [min, initial], never increases
    pub current_spawn_delay: f32,
    pub is_active: bool,
}

impl SessionState {
    pub fn new(tuning: &Tuning, high_score: u32) -> Self {
        Self {
            score: 0,
            high_score,
            current_speed: tuning.player.movement_speed,
            current_spawn_delay: tuning.difficulty.initial_spawn_delay,
            is_active: false,
        }
    }
}

/// Read-only snapshot handed to presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub phase: SessionPhase,
    pub score: u32,
    pub high_score: u32,
    pub is_active: bool,
    pub speed: f32,
    pub player_position: Option<Vec2>,
}

/// The world of one run
#[derive(Debug)]
pub struct SessionContext {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: PlayerBody,
    pub level: LevelStream,
    pub camera: ChaseCamera,
    pub death_zone: DeathZone,
}

impl SessionContext {
    /// Allocate a fresh world and stream in the starting level
    pub fn new(tuning: &Tuning, seed: u64, factory: &mut impl EntityFactory) -> Self {
        let player = PlayerBody::new(&tuning.player);
        let mut level = LevelStream::new(tuning.level.clone(), seed);
        level.bootstrap(factory);
        let camera = ChaseCamera::new(tuning.camera.clone(), Some(player.position));
        let mut death_zone = DeathZone::new(tuning.death_zone.clone());
        death_zone.update(Some(&camera));

        Self {
            seed,
            time_ticks: 0,
            player,
            level,
            camera,
            death_zone,
        }
    }

    /// Release every host-side instance this world spawned
    pub fn teardown(mut self, factory: &mut impl EntityFactory) {
        self.level.clear(factory);
    }
}
