use glam::Vec2;

use crate::chunk::ChunkCoord;

/// Below this separation the push direction is considered degenerate and a
/// fixed +X axis is used instead.
const DEGENERATE_EPSILON: f32 = 1e-4;

/// A circular collision blocker on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub center: Vec2,
    pub radius: f32,
    /// Owning chunk; `None` marks permanent obstacles (village, interior
    /// ring) that no eviction may remove.
    pub owner: Option<ChunkCoord>,
}

/// Flat collection of circular colliders with bulk removal by owning chunk.
#[derive(Debug, Default)]
pub struct ObstacleRegistry {
    obstacles: Vec<Obstacle>,
}

impl ObstacleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, center: Vec2, radius: f32, owner: Option<ChunkCoord>) {
        debug_assert!(radius > 0.0, "obstacle radius must be positive");
        self.obstacles.push(Obstacle {
            center,
            radius,
            owner,
        });
    }

    /// Remove every obstacle owned by `owner`. Returns how many were removed.
    pub fn remove_chunk(&mut self, owner: ChunkCoord) -> usize {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.owner != Some(owner));
        before - self.obstacles.len()
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    /// Push a proposed position out of every penetrating obstacle.
    ///
    /// Single pass: correcting against one obstacle can reintroduce
    /// penetration with one processed earlier in the same call; there is no
    /// iteration to a fixed point. A position already clear of all obstacles
    /// comes back unchanged.
    pub fn resolve(&self, proposed: Vec2, actor_radius: f32) -> Vec2 {
        let mut position = proposed;
        for obstacle in &self.obstacles {
            let min_dist = obstacle.radius + actor_radius;
            let delta = position - obstacle.center;
            let dist = delta.length();
            if dist < min_dist {
                let push = if dist < DEGENERATE_EPSILON {
                    Vec2::new(min_dist, 0.0)
                } else {
                    delta * (min_dist / dist)
                };
                position = obstacle.center + push;
            }
        }
        position
    }
}
