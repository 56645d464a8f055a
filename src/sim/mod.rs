//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies beyond the entity factory seam

pub mod camera;
pub mod collision;
pub mod death_zone;
pub mod level;
pub mod player;
pub mod session;
pub mod shape;
pub mod state;
pub mod tick;

pub use camera::{ChaseCamera, smooth_damp};
pub use collision::{circle_aabb_overlap, first_landing, resolve_landing};
pub use death_zone::DeathZone;
pub use level::LevelStream;
pub use player::PlayerBody;
pub use session::SessionController;
pub use shape::Aabb;
pub use state::{
    EntityId, EntityKind, GameEvent, SessionContext, SessionPhase, SessionState, SessionView,
    WorldEntity,
};
pub use tick::{TickInput, tick};
