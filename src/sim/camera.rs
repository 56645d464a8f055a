//! Chase camera
//!
//! Tracks the player with a constant lead. The only state beyond the
//! position is the spring velocity used by `FollowPolicy::SmoothDamp`.

use glam::{Vec2, Vec3};

use super::shape::Aabb;
use crate::error::RunnerError;
use crate::tuning::{CameraTuning, FollowPolicy, VerticalFollow};

/// Critically damped spring step toward `target` (no overshoot)
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    // Clamp if we passed the target this step
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

#[derive(Debug, Clone)]
pub struct ChaseCamera {
    /// World position; z is pinned to the configured depth
    pub position: Vec3,
    velocity: Vec2,
    tuning: CameraTuning,
    warned_missing_target: bool,
}

impl ChaseCamera {
    /// Create a camera already framing `target` (or the origin without one)
    pub fn new(tuning: CameraTuning, target: Option<Vec2>) -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, tuning.depth),
            velocity: Vec2::ZERO,
            tuning,
            warned_missing_target: false,
        };
        let start = match target {
            Some(target) => camera.desired(target),
            None => camera.desired(Vec2::ZERO) - camera.tuning.offset * Vec2::X,
        };
        camera.position = start.extend(camera.tuning.depth);
        camera
    }

    /// Where the camera wants to be for a given player position
    pub fn desired(&self, target: Vec2) -> Vec2 {
        let y = match self.tuning.vertical {
            VerticalFollow::Fixed(y) => y,
            VerticalFollow::FollowPlayer => (target.y + self.tuning.offset.y).max(self.tuning.min_y),
        };
        Vec2::new(target.x + self.tuning.offset.x, y)
    }

    /// Move toward the target. Without a target the camera holds still.
    pub fn tick(&mut self, target: Option<Vec2>, dt: f32) {
        let Some(target) = target else {
            if !self.warned_missing_target {
                log::warn!("{}", RunnerError::MissingReference("camera target"));
                self.warned_missing_target = true;
            }
            return;
        };

        let goal = self.desired(target);
        let current = self.position.truncate();
        let next = match self.tuning.policy {
            FollowPolicy::SmoothDamp { smooth_time } => Vec2::new(
                smooth_damp(current.x, goal.x, &mut self.velocity.x, smooth_time, dt),
                smooth_damp(current.y, goal.y, &mut self.velocity.y, smooth_time, dt),
            ),
            FollowPolicy::Lerp { fraction } => current.lerp(goal, fraction),
        };
        self.position = next.extend(self.tuning.depth);
    }

    pub fn center(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Visible world rectangle
    pub fn view(&self) -> Aabb {
        Aabb::new(self.center(), self.tuning.view_half_extents)
    }

    pub fn right_edge(&self) -> f32 {
        self.view().right()
    }

    pub fn bottom_edge(&self) -> f32 {
        self.view().bottom()
    }
}
