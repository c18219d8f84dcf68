use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Integer coordinates of one square terrain chunk.
///
/// `i64` keeps the floor-division and the seed derivation well-defined over
/// unbounded exploration time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ChunkCoord {
    pub x: i64,
    pub z: i64,
}

impl ChunkCoord {
    pub fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Chunk containing a ground-plane position (floor division).
    pub fn from_position(position: Vec2, chunk_size: f32) -> Self {
        Self {
            x: (position.x / chunk_size).floor() as i64,
            z: (position.y / chunk_size).floor() as i64,
        }
    }

    /// Chunks within Chebyshev distance 1 of the origin hold the hand-placed
    /// village and are never auto-populated.
    pub fn is_reserved(&self) -> bool {
        self.x.abs() <= 1 && self.z.abs() <= 1
    }

    /// World-space center of the chunk.
    pub fn center(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(
            self.x as f32 * chunk_size + chunk_size / 2.0,
            self.z as f32 * chunk_size + chunk_size / 2.0,
        )
    }

    /// World-space minimum corner of the chunk.
    pub fn min_corner(&self, chunk_size: f32) -> Vec2 {
        Vec2::new(self.x as f32 * chunk_size, self.z as f32 * chunk_size)
    }
}

/// Chunks created and evicted by one streaming update.
///
/// Order within a delta is unspecified; chunks are independent.
#[derive(Debug, Clone, Default)]
pub struct ChunkDelta {
    pub created: Vec<ChunkCoord>,
    pub evicted: Vec<ChunkCoord>,
}

impl ChunkDelta {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.evicted.is_empty()
    }
}

/// Tracks the loaded chunk set around the actor.
///
/// `update` runs every frame; an unchanged center chunk returns immediately.
/// The needed set is the (2R+1)² Chebyshev square around the actor's chunk.
#[derive(Debug)]
pub struct ChunkManager {
    chunk_size: f32,
    radius: i64,
    loaded: BTreeSet<ChunkCoord>,
    current: Option<ChunkCoord>,
}

impl ChunkManager {
    pub fn new(chunk_size: f32, radius: i64) -> Self {
        assert!(chunk_size > 0.0, "chunk_size must be positive");
        assert!(radius >= 0, "radius must be non-negative");
        Self {
            chunk_size,
            radius,
            loaded: BTreeSet::new(),
            current: None,
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn loaded(&self) -> &BTreeSet<ChunkCoord> {
        &self.loaded
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.loaded.contains(&coord)
    }

    /// Center chunk of the last non-skipped update.
    pub fn current_center(&self) -> Option<ChunkCoord> {
        self.current
    }

    /// Streaming update for the actor's current position.
    ///
    /// Returns the chunks that entered and left the needed set. The caller
    /// drives population and the eviction cascade from the delta.
    pub fn update(&mut self, actor: Vec2, force: bool) -> ChunkDelta {
        let center = ChunkCoord::from_position(actor, self.chunk_size);
        if !force && self.current == Some(center) {
            return ChunkDelta::default();
        }
        let _span = tracing::info_span!("chunk_update", cx = center.x, cz = center.z).entered();
        self.current = Some(center);

        let mut needed = BTreeSet::new();
        for dx in -self.radius..=self.radius {
            for dz in -self.radius..=self.radius {
                needed.insert(ChunkCoord::new(center.x + dx, center.z + dz));
            }
        }

        let created: Vec<ChunkCoord> = needed
            .iter()
            .filter(|c| !self.loaded.contains(c))
            .copied()
            .collect();
        let evicted: Vec<ChunkCoord> = self
            .loaded
            .iter()
            .filter(|c| !needed.contains(c))
            .copied()
            .collect();

        for c in &created {
            tracing::debug!(?c, "loading chunk");
            self.loaded.insert(*c);
        }
        for c in &evicted {
            tracing::debug!(?c, "evicting chunk");
            self.loaded.remove(c);
        }

        tracing::trace!(
            created = created.len(),
            evicted = evicted.len(),
            total = self.loaded.len(),
            "chunk update complete"
        );

        ChunkDelta { created, evicted }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_basic() {
        let coord = ChunkCoord::from_position(Vec2::new(10.0, 10.0), 40.0);
        assert_eq!(coord, ChunkCoord::new(0, 0));

        let coord = ChunkCoord::from_position(Vec2::new(50.0, -10.0), 40.0);
        assert_eq!(coord, ChunkCoord::new(1, -1));
    }

    #[test]
    fn negative_positions_floor_toward_negative_infinity() {
        let coord = ChunkCoord::from_position(Vec2::new(-0.5, -40.0), 40.0);
        assert_eq!(coord, ChunkCoord::new(-1, -1));
    }

    #[test]
    fn reserved_region_is_chebyshev_one() {
        assert!(ChunkCoord::new(0, 0).is_reserved());
        assert!(ChunkCoord::new(-1, 1).is_reserved());
        assert!(!ChunkCoord::new(2, 0).is_reserved());
        assert!(!ChunkCoord::new(0, -2).is_reserved());
    }

    #[test]
    fn update_loads_full_square() {
        let mut manager = ChunkManager::new(40.0, 2);
        let delta = manager.update(Vec2::new(0.0, 0.0), true);
        assert_eq!(delta.created.len(), 25);
        assert!(delta.evicted.is_empty());
        assert_eq!(manager.loaded().len(), 25);
    }

    #[test]
    fn loaded_set_matches_square_exactly() {
        let mut manager = ChunkManager::new(40.0, 2);
        manager.update(Vec2::new(95.0, -130.0), true);
        let center = ChunkCoord::from_position(Vec2::new(95.0, -130.0), 40.0);
        for dx in -2..=2 {
            for dz in -2..=2 {
                assert!(manager.is_loaded(ChunkCoord::new(center.x + dx, center.z + dz)));
            }
        }
        assert_eq!(manager.loaded().len(), 25);
    }

    #[test]
    fn unchanged_center_is_a_no_op() {
        let mut manager = ChunkManager::new(40.0, 2);
        manager.update(Vec2::new(5.0, 5.0), true);
        // Still inside chunk (0,0); nothing changes.
        let delta = manager.update(Vec2::new(30.0, 12.0), false);
        assert!(delta.is_empty());
    }

    #[test]
    fn force_reruns_without_reloading() {
        let mut manager = ChunkManager::new(40.0, 2);
        manager.update(Vec2::new(0.0, 0.0), true);
        let delta = manager.update(Vec2::new(0.0, 0.0), true);
        assert!(delta.is_empty());
        assert_eq!(manager.loaded().len(), 25);
    }

    #[test]
    fn movement_evicts_out_of_range_chunks() {
        let mut manager = ChunkManager::new(40.0, 2);
        manager.update(Vec2::new(0.0, 0.0), true);
        let delta = manager.update(Vec2::new(400.0, 0.0), false);
        assert!(!delta.evicted.is_empty());
        assert_eq!(manager.loaded().len(), 25);
        assert!(!manager.is_loaded(ChunkCoord::new(0, 0)));
    }
}
