//! Incremental level generation.

use std::ops::Range;

use bevy_ecs::{entity::Entity, resource::Resource};
use glam::Vec2;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constants::{rescue, world};
use crate::geometry::Aabb;
use crate::level::random::SeededRandom;

/// A building standing on the floor. Never changes once generated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingSpec {
    pub left_x: f32,
    pub width: f32,
    pub height: f32,
}

impl BuildingSpec {
    pub fn right_x(&self) -> f32 {
        self.left_x + self.width
    }

    pub fn center_x(&self) -> f32 {
        self.left_x + self.width / 2.0
    }

    pub fn top_y(&self, floor_y: f32) -> f32 {
        floor_y - self.height
    }

    /// Short buildings are holes: they need a crane to get across.
    pub fn is_hole(&self) -> bool {
        self.height < world::HOLE_HEIGHT_THRESHOLD
    }

    /// Inclusive horizontal containment.
    pub fn spans_x(&self, x: f32) -> bool {
        x >= self.left_x && x <= self.right_x()
    }

    pub fn aabb(&self, floor_y: f32) -> Aabb {
        Aabb::new(Vec2::new(self.left_x, self.top_y(floor_y)), Vec2::new(self.right_x(), floor_y))
    }
}

/// The empty stretch between two clusters. Always a hole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub left_x: f32,
    pub width: f32,
}

impl Gap {
    pub fn center_x(&self) -> f32 {
        self.left_x + self.width / 2.0
    }
}

/// A hanging swing anchor. `visual` is the handle of the entity drawing it, once spawned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CraneAnchor {
    pub x: f32,
    pub tip_y: f32,
    pub visual: Option<Entity>,
}

impl CraneAnchor {
    pub fn tip(&self) -> Vec2 {
        Vec2::new(self.x, self.tip_y)
    }
}

/// Horizontal footprint of the rescue tower, which counts as a building and repels cranes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerFootprint {
    pub center_x: f32,
    pub width: f32,
    pub height: f32,
}

impl TowerFootprint {
    pub fn spans_x(&self, x: f32) -> bool {
        (x - self.center_x).abs() <= self.width / 2.0
    }
}

/// What a single `extend` call appended, as index ranges into the generator's collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extension {
    pub buildings: Range<usize>,
    pub cranes: Range<usize>,
    /// Rooftop positions of hearts (center of the heart sprite).
    pub hearts: SmallVec<[Vec2; 8]>,
}

impl Extension {
    pub fn is_empty(&self) -> bool {
        self.buildings.is_empty() && self.cranes.is_empty() && self.hearts.is_empty()
    }
}

/// Builds the level left to right, ahead of the player, from a seeded random stream.
///
/// The generator only ever appends past its frontier: buildings that exist are never
/// touched again. Cranes are the one mutable collection, since placing the rescue tower
/// suppresses those within its exclusion range (and clearing it restores them).
#[derive(Resource, Debug, Clone)]
pub struct WorldGenerator {
    random: SeededRandom,
    floor_y: f32,
    frontier: f32,
    buildings: Vec<BuildingSpec>,
    clusters: Vec<Range<usize>>,
    gaps: Vec<Gap>,
    cranes: Vec<CraneAnchor>,
    suppressed: Vec<CraneAnchor>,
    tower: Option<TowerFootprint>,
    death_zone: Aabb,
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::new(SeededRandom::new())
    }
}

impl WorldGenerator {
    pub fn new(random: SeededRandom) -> Self {
        Self::with_floor(random, world::FLOOR_Y)
    }

    pub fn with_floor(random: SeededRandom, floor_y: f32) -> Self {
        let mut generator = Self {
            random,
            floor_y,
            frontier: 0.0,
            buildings: Vec::new(),
            clusters: Vec::new(),
            gaps: Vec::new(),
            cranes: Vec::new(),
            suppressed: Vec::new(),
            tower: None,
            death_zone: Aabb::new(Vec2::ZERO, Vec2::ZERO),
        };
        generator.update_death_zone();
        generator
    }

    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    /// The rightmost generated world x.
    pub fn frontier(&self) -> f32 {
        self.frontier
    }

    pub fn random(&self) -> &SeededRandom {
        &self.random
    }

    pub fn buildings(&self) -> &[BuildingSpec] {
        &self.buildings
    }

    /// Building index ranges, one per cluster, in generation order.
    pub fn clusters(&self) -> &[Range<usize>] {
        &self.clusters
    }

    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn cranes(&self) -> &[CraneAnchor] {
        &self.cranes
    }

    pub fn tower(&self) -> Option<&TowerFootprint> {
        self.tower.as_ref()
    }

    /// Region below the floor spanning the whole generated level.
    pub fn death_zone(&self) -> Aabb {
        self.death_zone
    }

    /// Whether the level has to grow for a player standing at `player_x`.
    pub fn needs_extension(&self, player_x: f32, lookahead: f32) -> bool {
        player_x + lookahead > self.frontier
    }

    /// Appends whole clusters (each followed by its gap) until the frontier reaches `target_x`.
    ///
    /// Calling this with a target at or behind the frontier is a no-op.
    pub fn extend(&mut self, target_x: f32) -> Extension {
        let first_building = self.buildings.len();
        let first_crane = self.cranes.len();
        let mut hearts = SmallVec::new();

        while self.frontier < target_x {
            self.generate_cluster(&mut hearts);
            self.generate_gap();
        }

        let extension = Extension {
            buildings: first_building..self.buildings.len(),
            cranes: first_crane..self.cranes.len(),
            hearts,
        };

        if !extension.is_empty() {
            self.update_death_zone();
            debug!(
                frontier = self.frontier,
                buildings = extension.buildings.len(),
                cranes = extension.cranes.len(),
                hearts = extension.hearts.len(),
                "Level extended"
            );
        }

        extension
    }

    fn generate_cluster(&mut self, hearts: &mut SmallVec<[Vec2; 8]>) {
        let cluster_size = world::MIN_CLUSTER_SIZE + (self.random.next_unit() * world::CLUSTER_SIZE_SPREAD as f64) as u32;
        let start = self.buildings.len();

        for _ in 0..cluster_size {
            let width = self
                .random
                .next_floor(world::MIN_BUILDING_WIDTH, world::MAX_BUILDING_WIDTH - world::MIN_BUILDING_WIDTH);
            let height = self
                .random
                .next_floor(world::MIN_BUILDING_HEIGHT, world::MAX_BUILDING_HEIGHT - world::MIN_BUILDING_HEIGHT);

            let building = BuildingSpec {
                left_x: self.frontier,
                width,
                height,
            };

            if building.is_hole() {
                self.place_crane(building.center_x());
            }

            // The draw only happens for buildings tall enough to hold a heart
            if height >= world::HEART_MIN_BUILDING_HEIGHT && self.random.next_unit() < world::HEART_SPAWN_CHANCE as f64 {
                let top_y = building.top_y(self.floor_y);
                hearts.push(Vec2::new(building.center_x(), top_y - world::HEART_SIZE / 2.0));
            }

            self.buildings.push(building);
            self.frontier += width;
        }

        trace!(size = cluster_size, frontier = self.frontier, "Cluster generated");
        self.clusters.push(start..self.buildings.len());
    }

    fn generate_gap(&mut self) {
        let width = self.random.next_floor(world::MIN_GAP_WIDTH, world::GAP_WIDTH_SPREAD);
        let gap = Gap {
            left_x: self.frontier,
            width,
        };

        self.place_crane(gap.center_x());
        self.gaps.push(gap);
        self.frontier += width;
    }

    fn place_crane(&mut self, x: f32) {
        let crane = CraneAnchor {
            x,
            tip_y: world::CRANE_TIP_Y,
            visual: None,
        };

        if self.is_tower_excluded(x) {
            trace!(x, "Crane suppressed near rescue tower");
            self.suppressed.push(crane);
            return;
        }

        self.cranes.push(crane);
    }

    fn update_death_zone(&mut self) {
        let width = self.frontier + world::DEATH_ZONE_MARGIN;
        self.death_zone = Aabb::new(
            Vec2::new(0.0, self.floor_y),
            Vec2::new(width, self.floor_y + world::DEATH_ZONE_HEIGHT),
        );
    }

    /// Whether a crane at `x` would sit within the rescue tower's exclusion range (inclusive).
    pub fn is_tower_excluded(&self, x: f32) -> bool {
        self.tower
            .is_some_and(|tower| (x - tower.center_x).abs() <= rescue::CRANE_EXCLUSION_RANGE)
    }

    /// The highest rooftop (smallest y) covering `x`, including the rescue tower.
    pub fn top_surface_y_at(&self, x: f32) -> Option<f32> {
        let buildings = self
            .buildings
            .iter()
            .filter(|building| building.spans_x(x))
            .map(|building| building.top_y(self.floor_y));
        let tower = self
            .tower
            .filter(|tower| tower.spans_x(x))
            .map(|tower| self.floor_y - tower.height);

        buildings.chain(tower).reduce(f32::min)
    }

    /// The crane tip nearest to `point` if it lies within `max_distance` (inclusive).
    pub fn nearest_crane(&self, point: Vec2, max_distance: f32) -> Option<&CraneAnchor> {
        self.cranes
            .iter()
            .map(|crane| (crane, crane.tip().distance(point)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .filter(|(_, distance)| *distance <= max_distance)
            .map(|(crane, _)| crane)
    }

    /// Records the visual entity drawing the crane at `index`.
    pub fn attach_crane_visual(&mut self, index: usize, visual: Entity) {
        if let Some(crane) = self.cranes.get_mut(index) {
            crane.visual = Some(visual);
        }
    }

    /// Registers the rescue tower and suppresses every crane within its exclusion range.
    ///
    /// Returns the suppressed anchors so their visuals can be destroyed.
    pub fn place_tower(&mut self, tower: TowerFootprint) -> Vec<CraneAnchor> {
        self.tower = Some(tower);

        let (removed, kept): (Vec<_>, Vec<_>) = self
            .cranes
            .drain(..)
            .partition(|crane| (crane.x - tower.center_x).abs() <= rescue::CRANE_EXCLUSION_RANGE);
        self.cranes = kept;
        self.suppressed.extend(removed.iter().map(|crane| CraneAnchor { visual: None, ..*crane }));

        debug!(tower_x = tower.center_x, removed = removed.len(), "Rescue tower placed");
        removed
    }

    /// Forgets the rescue tower and restores the cranes it suppressed.
    ///
    /// Returns the index range of the restored anchors, which have no visuals yet.
    pub fn clear_tower(&mut self) -> Range<usize> {
        self.tower = None;
        let start = self.cranes.len();
        self.cranes.append(&mut self.suppressed);
        start..self.cranes.len()
    }
}
