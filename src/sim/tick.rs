//! Fixed timestep world step
//!
//! Player → level → camera → death zone, in that order, once per tick.

use super::state::{GameEvent, SessionContext};
use crate::platform::EntityFactory;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump pressed this frame (key, touch or click)
    pub jump: bool,
    /// Restart the session
    pub restart: bool,
    /// Quit the application
    pub quit: bool,
}

/// Advance the world by one fixed timestep
///
/// Returns the Jump/Score/Death events raised. Picked-up collectibles are
/// retired here; score and game-over consequences belong to the session.
pub fn tick(
    ctx: &mut SessionContext,
    input: &TickInput,
    dt: f32,
    factory: &mut impl EntityFactory,
) -> Vec<GameEvent> {
    ctx.time_ticks += 1;

    let mut events = ctx.player.tick(dt, input.jump, &ctx.level);
    for event in &events {
        if let GameEvent::Score { collectible } = event {
            ctx.level.collect(*collectible, factory);
        }
    }

    let camera_right = ctx.camera.right_edge();
    ctx.level.tick(ctx.player.position.x, camera_right, factory);

    ctx.camera.tick(Some(ctx.player.position), dt);
    ctx.death_zone.update(Some(&ctx.camera));

    if ctx.death_zone.contains(&ctx.player.bounds()) {
        events.extend(ctx.player.die());
    }

    events
}
