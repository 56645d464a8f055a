//! Data-driven game balance
//!
//! Every knob the simulation reads lives here. Values load from JSON with
//! per-field defaults, and `sanitized()` clamps anything out of range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::RunnerError;

/// Player physics and input windows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Vertical velocity set on jump (units/s)
    pub jump_force: f32,
    /// Base forward speed (units/s)
    pub movement_speed: f32,
    /// Terminal fall speed (units/s, positive)
    pub max_fall_speed: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Radius of the ground probe circle
    pub ground_check_radius: f32,
    /// Ground probe sits this far below the body centre
    pub ground_offset: f32,
    /// Grace window after leaving the ground (seconds)
    pub coyote_time: f32,
    /// Grace window before landing (seconds)
    pub jump_buffer_time: f32,
    pub half_extents: Vec2,
    pub spawn: Vec2,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            jump_force: 10.0,
            movement_speed: 5.0,
            max_fall_speed: 15.0,
            gravity: GRAVITY,
            ground_check_radius: 0.2,
            ground_offset: 0.5,
            coyote_time: 0.1,
            jump_buffer_time: 0.1,
            half_extents: PLAYER_HALF_EXTENTS,
            spawn: Vec2::ZERO,
        }
    }
}

/// Where collectibles go when a platform rolls one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectiblePlacement {
    /// One collectible floating above the new platform
    #[default]
    AbovePlatform,
    /// A row of collectibles spread across the gap before the new platform
    AcrossGap,
}

/// Procedural level generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelTuning {
    /// Nominal platform width; actual widths are drawn from ±20% of this
    pub base_width: f32,
    pub min_gap: f32,
    pub max_gap: f32,
    /// Range for platform centre Y
    pub min_height: f32,
    pub max_height: f32,
    pub platform_thickness: f32,
    /// Probability (0-1) that a platform carries an obstacle
    pub obstacle_chance: f32,
    /// Probability (0-1) that a platform rolls collectibles
    pub collectible_chance: f32,
    pub collectible_placement: CollectiblePlacement,
    pub obstacle_half_extents: Vec2,
    /// Obstacle centre height above the platform surface
    pub obstacle_offset: f32,
    pub collectible_radius: f32,
    /// Collectible height above the platform surface
    pub collectible_height: f32,
    /// Keep generating until the frontier is this far past the camera edge
    pub lookahead_margin: f32,
    /// Entities trailing further than this behind the player are reclaimed (negative)
    pub cleanup_distance: f32,
    /// Centre of the wide platform under the spawn point
    pub starter_position: Vec2,
    pub starter_width: f32,
    /// Platforms generated (obstacle-free) at session start
    pub initial_platform_count: u32,
}

impl Default for LevelTuning {
    fn default() -> Self {
        Self {
            base_width: 3.0,
            min_gap: 2.0,
            max_gap: 4.0,
            min_height: -3.0,
            max_height: -1.0,
            platform_thickness: PLATFORM_THICKNESS,
            obstacle_chance: 0.5,
            collectible_chance: 0.3,
            collectible_placement: CollectiblePlacement::AbovePlatform,
            obstacle_half_extents: OBSTACLE_HALF_EXTENTS,
            obstacle_offset: 0.5,
            collectible_radius: COLLECTIBLE_RADIUS,
            collectible_height: 1.5,
            lookahead_margin: 10.0,
            cleanup_distance: -20.0,
            starter_position: Vec2::new(0.0, -2.0),
            starter_width: 6.0,
            initial_platform_count: 5,
        }
    }
}

impl LevelTuning {
    /// Clamp into legal ranges; every sampled range ends up non-empty
    pub fn sanitized(mut self) -> Self {
        self.base_width = self.base_width.max(0.1);
        self.min_gap = self.min_gap.max(0.0);
        self.max_gap = self.max_gap.max(self.min_gap);
        self.max_height = self.max_height.max(self.min_height);
        self.platform_thickness = self.platform_thickness.max(0.01);
        self.obstacle_chance = self.obstacle_chance.clamp(0.0, 1.0);
        self.collectible_chance = self.collectible_chance.clamp(0.0, 1.0);
        self.obstacle_half_extents = self.obstacle_half_extents.max(Vec2::splat(0.01));
        self.obstacle_offset = self.obstacle_offset.max(0.0);
        self.collectible_radius = self.collectible_radius.max(0.01);
        self.collectible_height = self.collectible_height.max(0.0);
        self.lookahead_margin = self.lookahead_margin.max(0.0);
        self.cleanup_distance = self.cleanup_distance.min(0.0);
        self.starter_width = self.starter_width.max(0.1);
        self
    }
}

/// Camera vertical behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VerticalFollow {
    /// Camera Y pinned to this value
    Fixed(f32),
    /// Camera Y tracks player Y + offset.y
    FollowPlayer,
}

/// Camera smoothing policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FollowPolicy {
    /// Critically damped spring (frame-rate independent)
    SmoothDamp { smooth_time: f32 },
    /// Move a fixed fraction of the remaining distance each tick.
    /// Frame-rate sensitive when dt varies.
    Lerp { fraction: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Lead distance (x) and height (y) relative to the player
    pub offset: Vec2,
    /// Pinned depth axis
    pub depth: f32,
    pub vertical: VerticalFollow,
    /// Lowest camera Y under `FollowPlayer`; keeps the death zone reachable
    pub min_y: f32,
    pub policy: FollowPolicy,
    /// Half the visible world area around the camera position
    pub view_half_extents: Vec2,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            offset: Vec2::new(2.0, 1.0),
            depth: -10.0,
            vertical: VerticalFollow::Fixed(0.0),
            min_y: 0.0,
            policy: FollowPolicy::SmoothDamp { smooth_time: 0.125 },
            view_half_extents: Vec2::new(8.9, 5.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeathZoneTuning {
    /// Distance of the zone centre below the bottom edge of the view
    pub offset_below_camera: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for DeathZoneTuning {
    fn default() -> Self {
        Self {
            offset_below_camera: 5.0,
            width: 100.0,
            height: 1.0,
        }
    }
}

/// Difficulty ramp cadence and limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    /// Speed added per ramp step
    pub speed_increase: f32,
    pub max_speed: f32,
    /// Seconds before the first ramp step
    pub initial_spawn_delay: f32,
    pub min_spawn_delay: f32,
    /// Delay removed per ramp step
    pub spawn_delay_decay: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            speed_increase: 0.1,
            max_speed: 15.0,
            initial_spawn_delay: 2.0,
            min_spawn_delay: 0.8,
            spawn_delay_decay: 0.01,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub level: LevelTuning,
    pub camera: CameraTuning,
    pub death_zone: DeathZoneTuning,
    pub difficulty: DifficultyTuning,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, RunnerError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, RunnerError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp every field into its legal range
    pub fn sanitized(mut self) -> Self {
        let p = &mut self.player;
        p.jump_force = p.jump_force.max(0.0);
        p.movement_speed = p.movement_speed.max(0.0);
        p.max_fall_speed = p.max_fall_speed.max(0.0);
        p.gravity = p.gravity.max(0.0);
        p.ground_check_radius = p.ground_check_radius.max(0.0);
        p.coyote_time = p.coyote_time.max(0.0);
        p.jump_buffer_time = p.jump_buffer_time.max(0.0);
        p.half_extents = p.half_extents.max(Vec2::splat(0.01));

        self.level = self.level.sanitized();

        let c = &mut self.camera;
        c.policy = match c.policy {
            FollowPolicy::SmoothDamp { smooth_time } => FollowPolicy::SmoothDamp {
                smooth_time: smooth_time.max(1e-4),
            },
            FollowPolicy::Lerp { fraction } => FollowPolicy::Lerp {
                fraction: fraction.clamp(0.0, 1.0),
            },
        };
        c.view_half_extents = c.view_half_extents.max(Vec2::ZERO);

        let z = &mut self.death_zone;
        z.width = z.width.max(0.0);
        z.height = z.height.max(0.0);

        let d = &mut self.difficulty;
        d.speed_increase = d.speed_increase.max(0.0);
        d.max_speed = d.max_speed.max(self.player.movement_speed);
        d.min_spawn_delay = d.min_spawn_delay.max(0.0);
        d.initial_spawn_delay = d.initial_spawn_delay.max(d.min_spawn_delay);
        d.spawn_delay_decay = d.spawn_delay_decay.max(0.0);

        self
    }
}
