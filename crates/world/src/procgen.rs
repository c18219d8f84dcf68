use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::chunk::ChunkCoord;
use crate::rng::{ChunkRng, chunk_seed};

/// Inset from the chunk bounds where nothing is placed.
const SCATTER_MARGIN: f32 = 4.0;
/// Required clearance around a prospective house, measured against the
/// centers of same-chunk scatter.
const HOUSE_CLEARANCE: f32 = 6.5;
const HOUSE_ATTEMPTS: usize = 6;
const HOUSE_CHANCE: f32 = 0.16;
const HERB_CHANCE: f32 = 0.35;

/// Procedural scatter kinds and their collision radii.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneryKind {
    Tree,
    Bush,
    Rock,
}

impl SceneryKind {
    pub fn obstacle_radius(self) -> f32 {
        match self {
            SceneryKind::Tree => 1.3,
            SceneryKind::Bush => 0.6,
            SceneryKind::Rock => 0.7,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedScenery {
    pub kind: SceneryKind,
    pub position: Vec2,
    pub scale: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannedHouse {
    pub position: Vec2,
    /// Quarter-turn orientation, radians.
    pub rotation: f32,
}

/// Deterministic content plan for one chunk.
///
/// Generation is pure: the plan depends only on the chunk coordinates, so an
/// evict/reload cycle reproduces identical content. The world applies the
/// plan; nothing here touches registries or placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPlan {
    pub coord: ChunkCoord,
    pub scenery: Vec<PlannedScenery>,
    pub herbs: Vec<Vec2>,
    pub house: Option<PlannedHouse>,
}

impl ChunkPlan {
    /// Plan the content of `coord`. Reserved village chunks plan nothing.
    pub fn generate(coord: ChunkCoord, chunk_size: f32) -> Self {
        let mut plan = Self {
            coord,
            scenery: Vec::new(),
            herbs: Vec::new(),
            house: None,
        };
        if coord.is_reserved() {
            return plan;
        }

        let mut rng = ChunkRng::new(chunk_seed(coord.x, coord.z));
        let corner = coord.min_corner(chunk_size);
        let span = chunk_size - SCATTER_MARGIN * 2.0;
        let sample = |rng: &mut ChunkRng, base: f32| base + SCATTER_MARGIN + rng.next_f32() * span;

        let count = 6 + (rng.next_f32() * 6.0) as usize;
        for _ in 0..count {
            let x = sample(&mut rng, corner.x);
            let z = sample(&mut rng, corner.y);
            let pick = rng.next_f32();
            let (kind, scale) = if pick < 0.55 {
                (SceneryKind::Tree, Vec3::ONE)
            } else if pick < 0.75 {
                (SceneryKind::Bush, Vec3::ONE)
            } else {
                let scale = Vec3::new(
                    rng.next_range(0.8, 1.3),
                    rng.next_range(0.6, 1.0),
                    rng.next_range(0.8, 1.3),
                );
                (SceneryKind::Rock, scale)
            };
            plan.scenery.push(PlannedScenery {
                kind,
                position: Vec2::new(x, z),
                scale,
            });

            if rng.next_f32() < HERB_CHANCE {
                plan.herbs.push(Vec2::new(
                    x + (rng.next_f32() - 0.5) * 2.0,
                    z + (rng.next_f32() - 0.5) * 2.0,
                ));
            }
        }

        // Sprinkle the occasional house so far-out terrain isn't all forest.
        // First clear attempt wins; all attempts failing skips silently.
        if rng.next_f32() < HOUSE_CHANCE {
            for _ in 0..HOUSE_ATTEMPTS {
                let position = Vec2::new(sample(&mut rng, corner.x), sample(&mut rng, corner.y));
                if !plan.is_clear(position, HOUSE_CLEARANCE) {
                    continue;
                }
                let rotation = (rng.next_f32() * 3.0).round() * FRAC_PI_2;
                plan.house = Some(PlannedHouse { position, rotation });
                break;
            }
        }

        plan
    }

    /// Clearance against the scatter this plan itself creates.
    fn is_clear(&self, point: Vec2, min_distance: f32) -> bool {
        let min_sq = min_distance * min_distance;
        self.scenery
            .iter()
            .all(|s| s.position.distance_squared(point) >= min_sq)
    }
}
