//! Procedural level streaming
//!
//! Platforms are laid left to right from a single frontier: the right edge
//! of the newest platform. Each new platform starts one random gap past the
//! frontier, so platforms never overlap and the frontier only moves forward.
//! Everything that falls far enough behind the player is handed back to the
//! entity factory.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::shape::Aabb;
use super::state::{EntityId, EntityKind, WorldEntity};
use crate::consts::{GAP_COLLECTIBLE_MIN_WIDTH, GAP_COLLECTIBLE_SPACING};
use crate::platform::EntityFactory;
use crate::tuning::{CollectiblePlacement, LevelTuning};

/// Owns every live platform, obstacle and collectible
#[derive(Debug)]
pub struct LevelStream {
    tuning: LevelTuning,
    rng: Pcg32,
    /// Creation order, oldest first
    platforms: Vec<WorldEntity>,
    obstacles: Vec<WorldEntity>,
    collectibles: Vec<WorldEntity>,
    /// Right edge of the newest platform
    frontier: f32,
    /// Top surface of the newest platform
    last_top: f32,
    next_id: u32,
}

impl LevelStream {
    /// Out-of-range tuning is clamped, never rejected
    pub fn new(tuning: LevelTuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let frontier = tuning.starter_position.x;
        let last_top = tuning.starter_position.y + tuning.platform_thickness / 2.0;
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            platforms: Vec::new(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            frontier,
            last_top,
            next_id: 1,
        }
    }

    pub fn platforms(&self) -> &[WorldEntity] {
        &self.platforms
    }

    pub fn obstacles(&self) -> &[WorldEntity] {
        &self.obstacles
    }

    pub fn collectibles(&self) -> &[WorldEntity] {
        &self.collectibles
    }

    /// Right edge of the most recently generated platform
    pub fn frontier(&self) -> f32 {
        self.frontier
    }

    pub fn live_count(&self) -> usize {
        self.platforms.len() + self.obstacles.len() + self.collectibles.len()
    }

    pub fn tuning(&self) -> &LevelTuning {
        &self.tuning
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn spawn(
        &mut self,
        kind: EntityKind,
        bounds: Aabb,
        anchor: Option<EntityId>,
        factory: &mut impl EntityFactory,
    ) -> WorldEntity {
        let handle = factory.spawn(kind, bounds.center, bounds.size());
        WorldEntity {
            id: self.next_entity_id(),
            kind,
            handle,
            bounds,
            anchor,
        }
    }

    /// Place a platform of the given width centred at `center`
    pub fn spawn_platform(
        &mut self,
        center: Vec2,
        width: f32,
        factory: &mut impl EntityFactory,
    ) -> EntityId {
        let size = Vec2::new(width, self.tuning.platform_thickness);
        let entity = self.spawn(EntityKind::Platform, Aabb::from_size(center, size), None, factory);
        self.frontier = self.frontier.max(entity.bounds.right());
        self.last_top = entity.bounds.top();
        let id = entity.id;
        self.platforms.push(entity);
        id
    }

    /// Place an obstacle centred at `center`, optionally noting the platform it sits on
    pub fn spawn_obstacle(
        &mut self,
        center: Vec2,
        anchor: Option<EntityId>,
        factory: &mut impl EntityFactory,
    ) -> EntityId {
        let bounds = Aabb::new(center, self.tuning.obstacle_half_extents);
        let entity = self.spawn(EntityKind::Obstacle, bounds, anchor, factory);
        let id = entity.id;
        self.obstacles.push(entity);
        id
    }

    pub fn spawn_collectible(&mut self, center: Vec2, factory: &mut impl EntityFactory) -> EntityId {
        let bounds = Aabb::new(center, Vec2::splat(self.tuning.collectible_radius));
        let entity = self.spawn(EntityKind::Collectible, bounds, None, factory);
        let id = entity.id;
        self.collectibles.push(entity);
        id
    }

    /// Lay the starter platform under the spawn point and pre-fill the
    /// initial reach. The initial batch never carries obstacles.
    pub fn bootstrap(&mut self, factory: &mut impl EntityFactory) {
        let start = self.tuning.starter_position;
        let width = self.tuning.starter_width;
        self.spawn_platform(start, width, factory);

        for _ in 0..self.tuning.initial_platform_count {
            self.generate_next(false, factory);
        }
        log::info!(
            "Level bootstrapped: {} platforms, frontier at {:.2}",
            self.platforms.len(),
            self.frontier
        );
    }

    /// Generate ahead of the camera, then reclaim what the player left behind
    pub fn tick(&mut self, player_x: f32, camera_right_x: f32, factory: &mut impl EntityFactory) {
        self.generate_ahead(camera_right_x, factory);
        self.cleanup(player_x, factory);
    }

    /// Generate platforms until the frontier clears the camera edge plus the lookahead margin
    pub fn generate_ahead(&mut self, camera_right_x: f32, factory: &mut impl EntityFactory) -> u32 {
        let target = camera_right_x + self.tuning.lookahead_margin;
        let mut count = 0;
        while self.frontier < target {
            self.generate_next(true, factory);
            count += 1;
        }
        count
    }

    /// Synthesize one platform past the frontier, with optional obstacle and collectibles
    pub fn generate_next(&mut self, allow_obstacles: bool, factory: &mut impl EntityFactory) -> EntityId {
        let t = &self.tuning;
        let (base, min_gap, max_gap) = (t.base_width, t.min_gap, t.max_gap);
        let (min_y, max_y) = (t.min_height, t.max_height);
        let (obstacle_chance, collectible_chance) = (t.obstacle_chance, t.collectible_chance);

        let width = self.rng.random_range(base * 0.8..=base * 1.2);
        let gap = self.rng.random_range(min_gap..=max_gap);
        let y = self.rng.random_range(min_y..=max_y);
        // Rolled even when suppressed so the layout does not depend on it
        let obstacle_roll = self.rng.random_bool(obstacle_chance as f64);
        let collectible_roll = self.rng.random_bool(collectible_chance as f64);

        let gap_start = self.frontier;
        let prev_top = self.last_top;
        let left = gap_start + gap;
        let id = self.spawn_platform(Vec2::new(left + width / 2.0, y), width, factory);
        // Exact even when spawn_platform rounds the box edges
        self.frontier = left + width;
        let top = self.last_top;

        if allow_obstacles && obstacle_roll {
            // Middle band only, leaves runway at both ends
            let x = left + width * self.rng.random_range(0.3..=0.7);
            let center = Vec2::new(x, top + self.tuning.obstacle_offset);
            self.spawn_obstacle(center, Some(id), factory);
        }

        if collectible_roll {
            match self.tuning.collectible_placement {
                CollectiblePlacement::AbovePlatform => {
                    let center = Vec2::new(left + width / 2.0, top + self.tuning.collectible_height);
                    self.spawn_collectible(center, factory);
                }
                CollectiblePlacement::AcrossGap => {
                    self.place_gap_collectibles(gap_start, gap, prev_top.max(top), factory);
                }
            }
        }

        log::debug!(
            "platform {:?}: x {:.2}..{:.2} gap {:.2} y {:.2}",
            id,
            left,
            self.frontier,
            gap,
            y
        );
        id
    }

    /// Spread a row of collectibles across a gap, each at a random height
    fn place_gap_collectibles(
        &mut self,
        gap_start: f32,
        gap: f32,
        surface: f32,
        factory: &mut impl EntityFactory,
    ) {
        if gap < GAP_COLLECTIBLE_MIN_WIDTH {
            return;
        }
        let count = (gap / GAP_COLLECTIBLE_SPACING).floor() as u32;
        let h = self.tuning.collectible_height;
        for i in 0..count {
            let x = gap_start + gap * (i + 1) as f32 / (count + 1) as f32;
            let y = surface + self.rng.random_range(h * 0.5..=h * 1.5);
            self.spawn_collectible(Vec2::new(x, y), factory);
        }
    }

    /// Destroy every entity whose trailing edge is left of `player_x + cleanup_distance`.
    /// Returns how many were removed.
    pub fn cleanup(&mut self, player_x: f32, factory: &mut impl EntityFactory) -> usize {
        let cleanup_x = player_x + self.tuning.cleanup_distance;
        let mut removed = 0;

        for list in [&mut self.platforms, &mut self.obstacles, &mut self.collectibles] {
            list.retain(|e| {
                let behind = e.trailing_edge() < cleanup_x;
                if behind {
                    factory.destroy(e.handle);
                    removed += 1;
                }
                !behind
            });
        }

        if removed > 0 {
            log::debug!("cleanup behind x={:.2}: removed {}", cleanup_x, removed);
        }
        removed
    }

    /// Retire a collectible the player picked up. Returns false if it was already gone.
    pub fn collect(&mut self, id: EntityId, factory: &mut impl EntityFactory) -> bool {
        match self.collectibles.iter().position(|c| c.id == id) {
            Some(i) => {
                let entity = self.collectibles.remove(i);
                factory.destroy(entity.handle);
                true
            }
            None => false,
        }
    }

    /// Destroy everything (session teardown)
    pub fn clear(&mut self, factory: &mut impl EntityFactory) {
        for list in [&mut self.platforms, &mut self.obstacles, &mut self.collectibles] {
            for entity in list.drain(..) {
                factory.destroy(entity.handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::HeadlessFactory;
    use proptest::prelude::*;

    fn stream(seed: u64) -> LevelStream {
        LevelStream::new(LevelTuning::default(), seed)
    }

    #[test]
    fn test_bootstrap_is_safe_start() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(42);
        level.bootstrap(&mut factory);

        let t = LevelTuning::default();
        assert_eq!(level.platforms().len(), 1 + t.initial_platform_count as usize);
        assert!(level.obstacles().is_empty());

        let starter = &level.platforms()[0];
        assert_eq!(starter.position(), t.starter_position);
        assert_eq!(starter.width(), t.starter_width);
        assert_eq!(factory.live_count(), level.live_count());
    }

    #[test]
    fn test_frontier_is_sum_of_widths_and_gaps() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(1234);
        level.bootstrap(&mut factory);

        let t = LevelTuning::default();
        let mut expected = level.frontier();
        for _ in 0..50 {
            let before = level.frontier();
            let id = level.generate_next(true, &mut factory);
            let p = level.platforms().iter().find(|p| p.id == id).unwrap();

            let gap = p.bounds.left() - before;
            let width = p.width();
            assert!(gap >= t.min_gap - 1e-3 && gap <= t.max_gap + 1e-3);
            assert!(width >= t.base_width * 0.8 - 1e-3 && width <= t.base_width * 1.2 + 1e-3);

            expected += gap + width;
            assert!(level.frontier() > before);
        }
        assert!((level.frontier() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_fixed_gap_closed_form() {
        let tuning = LevelTuning {
            min_gap: 3.0,
            max_gap: 3.0,
            initial_platform_count: 0,
            ..Default::default()
        };
        let mut factory = HeadlessFactory::new();
        let mut level = LevelStream::new(tuning.clone(), 9);
        level.bootstrap(&mut factory);
        let start = level.frontier();
        assert_eq!(start, tuning.starter_position.x + tuning.starter_width / 2.0);

        let n = 20;
        for _ in 0..n {
            level.generate_next(false, &mut factory);
        }
        let widths: f32 = level.platforms()[1..].iter().map(|p| p.width()).sum();
        let expected = start + widths + n as f32 * 3.0;
        assert!((level.frontier() - expected).abs() < 1e-2);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let mut fa = HeadlessFactory::new();
        let mut fb = HeadlessFactory::new();
        let mut a = stream(77);
        let mut b = stream(77);
        a.bootstrap(&mut fa);
        b.bootstrap(&mut fb);
        a.generate_ahead(200.0, &mut fa);
        b.generate_ahead(200.0, &mut fb);

        assert_eq!(a.platforms().len(), b.platforms().len());
        for (pa, pb) in a.platforms().iter().zip(b.platforms()) {
            assert_eq!(pa.bounds, pb.bounds);
        }
        assert_eq!(a.obstacles().len(), b.obstacles().len());
        assert_eq!(a.collectibles().len(), b.collectibles().len());
    }

    #[test]
    fn test_generate_ahead_reaches_lookahead() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(5);
        level.bootstrap(&mut factory);
        let made = level.generate_ahead(100.0, &mut factory);
        assert!(made > 0);
        assert!(level.frontier() >= 100.0 + level.tuning().lookahead_margin);
        // Already far enough ahead
        assert_eq!(level.generate_ahead(100.0, &mut factory), 0);
    }

    #[test]
    fn test_obstacles_stay_in_middle_band() {
        let tuning = LevelTuning {
            obstacle_chance: 1.0,
            ..Default::default()
        };
        let mut factory = HeadlessFactory::new();
        let mut level = LevelStream::new(tuning, 3);
        level.bootstrap(&mut factory);
        level.generate_ahead(300.0, &mut factory);

        assert!(!level.obstacles().is_empty());
        for o in level.obstacles() {
            let anchor = o.anchor.expect("obstacle anchored to a platform");
            let p = level.platforms().iter().find(|p| p.id == anchor).unwrap();
            let rel = (o.position().x - p.bounds.left()) / p.width();
            assert!((0.3 - 1e-4..=0.7 + 1e-4).contains(&rel), "rel {rel}");
            assert!((o.bounds.bottom() - p.bounds.top()).abs() < 1e-4);
        }
    }

    #[test]
    fn test_gap_collectibles_evenly_spaced() {
        let tuning = LevelTuning {
            collectible_chance: 1.0,
            collectible_placement: CollectiblePlacement::AcrossGap,
            min_gap: 4.5,
            max_gap: 4.5,
            initial_platform_count: 0,
            ..Default::default()
        };
        let mut factory = HeadlessFactory::new();
        let mut level = LevelStream::new(tuning, 11);
        level.bootstrap(&mut factory);
        let gap_start = level.frontier();
        level.generate_next(false, &mut factory);

        // floor(4.5 / 1.5) = 3, at 1/4, 2/4, 3/4 of the gap
        let xs: Vec<f32> = level.collectibles().iter().map(|c| c.position().x).collect();
        assert_eq!(xs.len(), 3);
        for (i, x) in xs.iter().enumerate() {
            let expected = gap_start + 4.5 * (i + 1) as f32 / 4.0;
            assert!((x - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_narrow_gap_gets_no_collectibles() {
        let tuning = LevelTuning {
            collectible_chance: 1.0,
            collectible_placement: CollectiblePlacement::AcrossGap,
            min_gap: 1.5,
            max_gap: 1.5,
            initial_platform_count: 0,
            ..Default::default()
        };
        let mut factory = HeadlessFactory::new();
        let mut level = LevelStream::new(tuning, 11);
        level.bootstrap(&mut factory);
        level.generate_next(false, &mut factory);
        assert!(level.collectibles().is_empty());
    }

    #[test]
    fn test_out_of_range_tuning_is_clamped_not_fatal() {
        // Raw tuning, never passed through Tuning::sanitized
        let tuning = LevelTuning {
            collectible_chance: 1.0,
            collectible_placement: CollectiblePlacement::AcrossGap,
            collectible_height: -1.0,
            obstacle_offset: -2.0,
            min_gap: 5.0,
            max_gap: 1.0,
            min_height: 0.0,
            max_height: -4.0,
            initial_platform_count: 2,
            ..Default::default()
        };
        let mut factory = HeadlessFactory::new();
        let mut level = LevelStream::new(tuning, 21);
        level.bootstrap(&mut factory);

        let t = level.tuning();
        assert_eq!(t.collectible_height, 0.0);
        assert_eq!(t.obstacle_offset, 0.0);
        assert_eq!(t.max_gap, 5.0);
        assert_eq!(t.max_height, 0.0);
        // Two 5.0 gaps, three collectibles each
        assert_eq!(level.collectibles().len(), 6);
        assert_eq!(factory.live_count(), level.live_count());
    }

    #[test]
    fn test_cleanup_boundary_is_strict() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(1);
        // cleanup_distance = -20, player at 30 => cleanup line at x = 10
        let on_line = level.spawn_platform(Vec2::new(8.0, 0.0), 4.0, &mut factory); // right edge 10
        let behind = level.spawn_platform(Vec2::new(7.0, 0.0), 4.0, &mut factory); // right edge 9
        let coin = level.spawn_collectible(Vec2::new(9.5, 1.0), &mut factory); // right edge 9.8

        let removed = level.cleanup(30.0, &mut factory);
        assert_eq!(removed, 2);
        let ids: Vec<_> = level.platforms().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![on_line]);
        assert!(!ids.contains(&behind));
        assert!(level.collectibles().iter().all(|c| c.id != coin));
        assert_eq!(factory.live_count(), 1);
    }

    #[test]
    fn test_cleanup_removes_consecutive_entries() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(1);
        for i in 0..5 {
            level.spawn_obstacle(Vec2::new(i as f32, 0.0), None, &mut factory);
        }
        level.spawn_obstacle(Vec2::new(100.0, 0.0), None, &mut factory);
        assert_eq!(level.cleanup(50.0, &mut factory), 5);
        assert_eq!(level.obstacles().len(), 1);
    }

    #[test]
    fn test_collect_destroys_once() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(1);
        let coin = level.spawn_collectible(Vec2::ZERO, &mut factory);
        assert!(level.collect(coin, &mut factory));
        assert!(!level.collect(coin, &mut factory));
        assert_eq!(factory.live_count(), 0);
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut factory = HeadlessFactory::new();
        let mut level = stream(8);
        level.bootstrap(&mut factory);
        level.generate_ahead(80.0, &mut factory);
        level.clear(&mut factory);
        assert_eq!(level.live_count(), 0);
        assert_eq!(factory.live_count(), 0);
    }

    proptest! {
        #[test]
        fn prop_frontier_never_decreases(seed in any::<u64>(), steps in prop::collection::vec(0.0f32..5.0, 1..60)) {
            let mut factory = HeadlessFactory::new();
            let mut level = LevelStream::new(LevelTuning::default(), seed);
            level.bootstrap(&mut factory);

            let mut player_x = 0.0;
            let mut last = level.frontier();
            for step in steps {
                player_x += step;
                level.tick(player_x, player_x + 9.0, &mut factory);
                prop_assert!(level.frontier() >= last);
                last = level.frontier();
                prop_assert_eq!(factory.live_count(), level.live_count());
            }
        }

        #[test]
        fn prop_cleanup_keeps_everything_at_or_ahead_of_line(seed in any::<u64>(), player_x in 0.0f32..200.0) {
            let mut factory = HeadlessFactory::new();
            let mut level = LevelStream::new(LevelTuning::default(), seed);
            level.bootstrap(&mut factory);
            level.generate_ahead(220.0, &mut factory);
            let before: Vec<_> = level.platforms().iter().map(|p| (p.id, p.trailing_edge())).collect();

            level.cleanup(player_x, &mut factory);
            let line = player_x + level.tuning().cleanup_distance;
            for (id, edge) in before {
                let kept = level.platforms().iter().any(|p| p.id == id);
                prop_assert_eq!(kept, edge >= line);
            }
        }
    }
}
