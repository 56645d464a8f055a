//! Player body: gravity, jump windows, forward drive and contact checks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{circle_aabb_overlap, first_landing};
use super::level::LevelStream;
use super::shape::Aabb;
use super::state::GameEvent;
use crate::countdown;
use crate::tuning::PlayerTuning;

/// The player's body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub is_grounded: bool,
    pub is_dead: bool,
    /// Counts down from `coyote_time` while airborne
    pub coyote_timer: f32,
    /// Counts down from `jump_buffer_time` after a jump request
    pub jump_buffer_timer: f32,
    movement_speed: f32,
    tuning: PlayerTuning,
}

impl PlayerBody {
    pub fn new(tuning: &PlayerTuning) -> Self {
        Self {
            position: tuning.spawn,
            velocity: Vec2::ZERO,
            is_grounded: false,
            is_dead: false,
            coyote_timer: 0.0,
            jump_buffer_timer: 0.0,
            movement_speed: tuning.movement_speed.max(0.0),
            tuning: tuning.clone(),
        }
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// Set forward speed (negative values clamp to zero)
    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed.max(0.0);
    }

    /// Collision box
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.tuning.half_extents)
    }

    /// Centre of the ground probe circle
    pub fn ground_probe(&self) -> Vec2 {
        self.position - Vec2::new(0.0, self.tuning.ground_offset)
    }

    /// Advance one step
    ///
    /// Returns the Jump/Score/Death events raised this step. Collectibles are
    /// reported, not removed; the caller retires them through the level.
    pub fn tick(&mut self, dt: f32, jump_requested: bool, level: &LevelStream) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_dead {
            return events;
        }

        let probe = self.ground_probe();
        let radius = self.tuning.ground_check_radius;
        self.is_grounded = level
            .platforms()
            .iter()
            .any(|p| circle_aabb_overlap(probe, radius, &p.bounds));

        self.coyote_timer = if self.is_grounded {
            self.tuning.coyote_time
        } else {
            countdown(self.coyote_timer, dt)
        };

        self.jump_buffer_timer = if jump_requested {
            self.tuning.jump_buffer_time
        } else {
            countdown(self.jump_buffer_timer, dt)
        };

        if self.jump_buffer_timer > 0.0 && self.coyote_timer > 0.0 {
            self.velocity.y = self.tuning.jump_force;
            self.jump_buffer_timer = 0.0;
            self.coyote_timer = 0.0;
            events.push(GameEvent::Jump);
        }

        self.velocity.y -= self.tuning.gravity * dt;
        self.velocity.y = self.velocity.y.max(-self.tuning.max_fall_speed);

        // Never decelerates horizontally
        self.velocity.x = self.movement_speed;

        let before = self.bounds();
        self.position += self.velocity * dt;

        if self.velocity.y <= 0.0 {
            let after = self.bounds();
            if let Some(top) = first_landing(&before, &after, level.platforms().iter().map(|p| &p.bounds)) {
                self.position.y = top + self.tuning.half_extents.y;
                self.velocity.y = 0.0;
            }
        }

        let body = self.bounds();
        if level.obstacles().iter().any(|o| o.bounds.overlaps(&body)) {
            events.extend(self.die());
        }

        // Scored even on the tick the player dies
        for c in level.collectibles() {
            if circle_aabb_overlap(c.position(), c.bounds.half.x, &body) {
                events.push(GameEvent::Score { collectible: c.id });
            }
        }

        events
    }

    /// Kill the player. Only the first call has any effect.
    pub fn die(&mut self) -> Option<GameEvent> {
        if self.is_dead {
            self.velocity = Vec2::ZERO;
            return None;
        }
        self.is_dead = true;
        self.velocity = Vec2::ZERO;
        log::info!(
            "Player died at ({:.2}, {:.2})",
            self.position.x,
            self.position.y
        );
        Some(GameEvent::Death)
    }
}
