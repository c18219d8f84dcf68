use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an entity in the world.
///
/// Catalog entries (lanterns, herbs, houses) and their drawable placements
/// share the same id, so eviction events address both sides at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Every drawable kind the world can place.
///
/// Closed set: the rendering boundary matches this exhaustively, so adding a
/// kind is a compile error until every backend handles it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementKind {
    Ground,
    Path,
    Tree,
    Bush,
    Rock,
    Crate,
    Barrel,
    Fence,
    Bench,
    Well,
    Campfire,
    House,
    Lantern,
    Herb,
    Marker,
    InteriorShell,
    Table,
    Chest,
    Bed,
    ExitPad,
}

/// A semantic placement: what to draw, where, and with which per-instance
/// parameters. The world hands these to the rendering collaborator and never
/// inspects what the renderer builds from them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PlacementKind,
    pub position: Vec3,
    /// Rotation around the world Y axis, radians.
    pub rotation: f32,
    pub scale: Vec3,
}

impl Placement {
    /// Placement at a ground position with identity rotation and scale.
    pub fn at(kind: PlacementKind, x: f32, z: f32) -> Self {
        Self {
            kind,
            position: Vec3::new(x, 0.0, z),
            rotation: 0.0,
            scale: Vec3::ONE,
        }
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn placement_builder_defaults() {
        let p = Placement::at(PlacementKind::Tree, 3.0, -4.0);
        assert_eq!(p.position, Vec3::new(3.0, 0.0, -4.0));
        assert_eq!(p.rotation, 0.0);
        assert_eq!(p.scale, Vec3::ONE);
    }

    #[test]
    fn placement_builder_applies_overrides() {
        let p = Placement::at(PlacementKind::Rock, 0.0, 0.0)
            .with_rotation(1.5)
            .with_scale(Vec3::new(1.2, 0.8, 1.0));
        assert_eq!(p.rotation, 1.5);
        assert_eq!(p.scale.y, 0.8);
    }
}
