//! Collision queries for the runner
//!
//! Three questions get asked every tick: is the ground probe touching a
//! platform, did the body fall onto a platform surface, and does the body
//! overlap a hazard or pickup.

use glam::Vec2;

use super::shape::Aabb;

/// How far above a surface a body may start the tick and still land on it
pub const LANDING_TOLERANCE: f32 = 1e-3;

/// Check if a circle overlaps a box
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    let closest = aabb.closest_point(center);
    (center - closest).length_squared() < radius * radius
}

/// Resolve a body falling onto a one-way platform surface
///
/// Returns the surface Y the body should rest on if, this step, its bottom
/// edge crossed the platform top from above while overlapping it
/// horizontally. Bodies rising through a platform from below pass through.
pub fn resolve_landing(prev: &Aabb, next: &Aabb, platform: &Aabb) -> Option<f32> {
    let top = platform.top();
    let was_above = prev.bottom() >= top - LANDING_TOLERANCE;
    let now_below = next.bottom() < top;

    if was_above && now_below && next.overlaps_x(platform) {
        Some(top)
    } else {
        None
    }
}

/// Find the highest surface a falling body lands on, if any
pub fn first_landing<'a>(
    prev: &Aabb,
    next: &Aabb,
    platforms: impl IntoIterator<Item = &'a Aabb>,
) -> Option<f32> {
    platforms
        .into_iter()
        .filter_map(|p| resolve_landing(prev, next, p))
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
}
