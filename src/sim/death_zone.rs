//! Kill band below the camera
//!
//! Recomputed from the camera every tick; it has no motion of its own.

use glam::Vec2;

use super::camera::ChaseCamera;
use super::shape::Aabb;
use crate::error::RunnerError;
use crate::tuning::DeathZoneTuning;

#[derive(Debug, Clone)]
pub struct DeathZone {
    pub bounds: Aabb,
    tuning: DeathZoneTuning,
    warned_missing_camera: bool,
}

impl DeathZone {
    pub fn new(tuning: DeathZoneTuning) -> Self {
        let bounds = Aabb::from_size(Vec2::ZERO, Vec2::new(tuning.width, tuning.height));
        Self {
            bounds,
            tuning,
            warned_missing_camera: false,
        }
    }

    /// Centre the band under the camera: `offset_below_camera` below the view's bottom edge
    pub fn update(&mut self, camera: Option<&ChaseCamera>) {
        let Some(camera) = camera else {
            if !self.warned_missing_camera {
                log::warn!("{}", RunnerError::MissingReference("death zone camera"));
                self.warned_missing_camera = true;
            }
            return;
        };
        let center = Vec2::new(
            camera.center().x,
            camera.bottom_edge() - self.tuning.offset_below_camera,
        );
        self.bounds = Aabb::from_size(center, Vec2::new(self.tuning.width, self.tuning.height));
    }

    /// Check if a body has entered the band
    pub fn contains(&self, body: &Aabb) -> bool {
        self.bounds.overlaps(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::CameraTuning;

    #[test]
    fn test_follows_camera() {
        let camera = ChaseCamera::new(CameraTuning::default(), Some(Vec2::new(40.0, 0.0)));
        let mut zone = DeathZone::new(DeathZoneTuning::default());
        zone.update(Some(&camera));

        // Camera at (42, 0), view bottom at -5, zone 5 below that
        assert_eq!(zone.bounds.center, Vec2::new(42.0, -10.0));
        assert_eq!(zone.bounds.size(), Vec2::new(100.0, 1.0));
    }

    #[test]
    fn test_contains_body_inside_band() {
        let camera = ChaseCamera::new(CameraTuning::default(), Some(Vec2::ZERO));
        let mut zone = DeathZone::new(DeathZoneTuning::default());
        zone.update(Some(&camera));

        let falling = Aabb::new(Vec2::new(3.0, -9.8), Vec2::splat(0.5));
        let safe = Aabb::new(Vec2::new(3.0, -2.0), Vec2::splat(0.5));
        assert!(zone.contains(&falling));
        assert!(!zone.contains(&safe));
    }

    #[test]
    fn test_missing_camera_keeps_last_bounds() {
        let camera = ChaseCamera::new(CameraTuning::default(), Some(Vec2::ZERO));
        let mut zone = DeathZone::new(DeathZoneTuning::default());
        zone.update(Some(&camera));
        let before = zone.bounds;
        zone.update(None);
        assert_eq!(zone.bounds, before);
    }
}
