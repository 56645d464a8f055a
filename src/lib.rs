//! Ledge Runner - core of a 2D endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, level streaming, camera, session)
//! - `platform`: Collaborator interfaces (entity factory, presentation) and fixed-step clock
//! - `highscores`: High score persistence
//! - `tuning`: Data-driven game balance
//! - `web`: Browser entry point (wasm32 only)

pub mod error;
pub mod highscores;
pub mod platform;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use error::RunnerError;
pub use highscores::{HighScoreStore, MemoryStore};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will try to catch up on (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration (units/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Player collision box half extents
    pub const PLAYER_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.5);

    /// Platform slab thickness
    pub const PLATFORM_THICKNESS: f32 = 0.5;
    /// Obstacle collision box half extents
    pub const OBSTACLE_HALF_EXTENTS: Vec2 = Vec2::new(0.5, 0.5);
    /// Collectible pickup radius
    pub const COLLECTIBLE_RADIUS: f32 = 0.3;

    /// Spacing between collectibles laid across a gap
    pub const GAP_COLLECTIBLE_SPACING: f32 = 1.5;
    /// Narrowest gap that gets collectibles in `AcrossGap` placement
    pub const GAP_COLLECTIBLE_MIN_WIDTH: f32 = 2.0;
}

/// Decrement a countdown timer, flooring at zero
#[inline]
pub fn countdown(timer: f32, dt: f32) -> f32 {
    (timer - dt).max(0.0)
}

/// Install the platform logger (env_logger natively, console on the web).
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    #[cfg(target_arch = "wasm32")]
    {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = env_logger::try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_floors_at_zero() {
        assert_eq!(countdown(0.1, 0.25), 0.0);
        assert_eq!(countdown(0.0, 0.5), 0.0);
        assert!((countdown(0.5, 0.25) - 0.25).abs() < f32::EPSILON);
    }
}
