use glam::{Vec2, Vec3};

use emberglade_common::{Placement, PlacementKind};

use crate::obstacle::ObstacleRegistry;

/// Anchor of the interior region. Far enough out that no reachable chunk
/// address ever streams terrain into it.
pub const INTERIOR_ORIGIN: Vec2 = Vec2::new(6000.0, 6000.0);

/// Half the side length of the interior room.
const HALF_SIZE: f32 = 6.0;
/// Perimeter ring geometry: circle distance from the origin and radius.
const WALL_DISTANCE: f32 = 7.2;
const WALL_RADIUS: f32 = 1.2;
/// Camera clamp box: horizontal inset from the walls and the vertical band.
const CAMERA_MARGIN: f32 = 0.9;
const CAMERA_MIN_Y: f32 = 0.7;
const CAMERA_MAX_Y: f32 = 3.8;

const EXIT_RANGE: f32 = 1.7;
const CHEST_RANGE: f32 = 1.6;
const BED_RANGE: f32 = 1.9;
const CHEST_COINS: u32 = 2;

/// Furnishing offsets, local to the interior origin.
const TABLE_OFFSET: Vec2 = Vec2::new(-1.2, 0.6);
const CHEST_OFFSET: Vec2 = Vec2::new(2.2, -1.5);
const BED_OFFSET: Vec2 = Vec2::new(-2.6, -2.2);

/// Interactable furnishings inside the house.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteriorInteractable {
    Chest,
    Bed,
}

/// Outcome of an interior interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteriorOutcome {
    pub changed: bool,
    /// Currency granted (chest only, first time).
    pub coins: u32,
    /// The bed was used; the caller advances time of day.
    pub advance_to_day: bool,
}

impl InteriorOutcome {
    pub(crate) fn unchanged() -> Self {
        Self {
            changed: false,
            coins: 0,
            advance_to_day: false,
        }
    }
}

/// The single shared "inside a house" space.
///
/// Built once on first entry and kept for the rest of the session; all
/// houses teleport into this one room, so at most one interior is ever
/// active.
#[derive(Debug)]
pub struct Interior {
    spawn: Vec2,
    exit: Vec2,
    chest: Vec2,
    bed: Vec2,
    chest_looted: bool,
}

impl Interior {
    /// Build the interior: permanent perimeter ring plus the furnishing
    /// placements the renderer should construct.
    ///
    /// The ring is three circles per side (offsets -4, 0, +4) plus the four
    /// corners, sized so every wall is closed to the actor while the exit
    /// pad near the south wall stays reachable.
    pub(crate) fn build(registry: &mut ObstacleRegistry) -> (Self, Vec<Placement>) {
        let o = INTERIOR_ORIGIN;
        for s in [-4.0, 0.0, 4.0] {
            registry.add(Vec2::new(o.x + s, o.y - WALL_DISTANCE), WALL_RADIUS, None);
            registry.add(Vec2::new(o.x + s, o.y + WALL_DISTANCE), WALL_RADIUS, None);
            registry.add(Vec2::new(o.x - WALL_DISTANCE, o.y + s), WALL_RADIUS, None);
            registry.add(Vec2::new(o.x + WALL_DISTANCE, o.y + s), WALL_RADIUS, None);
        }
        for (dx, dz) in [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)] {
            registry.add(
                Vec2::new(o.x + dx * WALL_DISTANCE, o.y + dz * WALL_DISTANCE),
                WALL_RADIUS,
                None,
            );
        }

        let exit = Vec2::new(o.x, o.y + HALF_SIZE - 0.8);
        let chest = o + CHEST_OFFSET;
        let bed = o + BED_OFFSET;
        let table = o + TABLE_OFFSET;

        let placements = vec![
            Placement::at(PlacementKind::InteriorShell, o.x, o.y),
            Placement::at(PlacementKind::Table, table.x, table.y),
            Placement::at(PlacementKind::Chest, chest.x, chest.y),
            Placement::at(PlacementKind::Bed, bed.x, bed.y),
            Placement::at(PlacementKind::ExitPad, exit.x, exit.y),
        ];

        (
            Self {
                spawn: o,
                exit,
                chest,
                bed,
                chest_looted: false,
            },
            placements,
        )
    }

    /// Where entering teleports the actor.
    pub fn spawn(&self) -> Vec2 {
        self.spawn
    }

    pub fn exit(&self) -> Vec2 {
        self.exit
    }

    pub fn chest_looted(&self) -> bool {
        self.chest_looted
    }

    /// Whether the actor stands on the exit pad.
    pub fn in_exit_zone(&self, actor: Vec2) -> bool {
        actor.distance(self.exit) < EXIT_RANGE
    }

    /// Nearest furnishing within its own interaction range.
    pub fn nearest_interactable(&self, actor: Vec2) -> Option<InteriorInteractable> {
        let mut nearest = None;
        let mut nearest_dist = f32::INFINITY;
        for (item, position, range) in [
            (InteriorInteractable::Chest, self.chest, CHEST_RANGE),
            (InteriorInteractable::Bed, self.bed, BED_RANGE),
        ] {
            let dist = actor.distance(position);
            if dist < range && dist < nearest_dist {
                nearest = Some(item);
                nearest_dist = dist;
            }
        }
        nearest
    }

    /// Interact with a furnishing. The chest pays out once and is inert
    /// afterwards; the bed always triggers a time advance.
    pub(crate) fn interact(&mut self, which: InteriorInteractable) -> InteriorOutcome {
        match which {
            InteriorInteractable::Chest => {
                if self.chest_looted {
                    return InteriorOutcome::unchanged();
                }
                self.chest_looted = true;
                InteriorOutcome {
                    changed: true,
                    coins: CHEST_COINS,
                    advance_to_day: false,
                }
            }
            InteriorInteractable::Bed => InteriorOutcome {
                changed: true,
                coins: 0,
                advance_to_day: true,
            },
        }
    }

    /// Clamp an orbiting camera to the room's bounding box so it cannot see
    /// through the walls. Independent of actor collision.
    pub fn clamp_camera(&self, position: Vec3) -> Vec3 {
        let min = INTERIOR_ORIGIN - Vec2::splat(HALF_SIZE - CAMERA_MARGIN);
        let max = INTERIOR_ORIGIN + Vec2::splat(HALF_SIZE - CAMERA_MARGIN);
        Vec3::new(
            position.x.clamp(min.x, max.x),
            position.y.clamp(CAMERA_MIN_Y, CAMERA_MAX_Y),
            position.z.clamp(min.y, max.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn built() -> (Interior, ObstacleRegistry) {
        let mut registry = ObstacleRegistry::new();
        let (interior, _placements) = Interior::build(&mut registry);
        (interior, registry)
    }

    #[test]
    fn ring_is_permanent() {
        let (_, registry) = built();
        assert_eq!(registry.len(), 16);
        assert!(registry.iter().all(|o| o.owner.is_none()));
    }

    #[test]
    fn spawn_and_exit_are_clear_of_the_ring() {
        let (interior, registry) = built();
        let actor_radius = 0.6;
        assert_eq!(
            registry.resolve(interior.spawn(), actor_radius),
            interior.spawn()
        );
        assert_eq!(
            registry.resolve(interior.exit(), actor_radius),
            interior.exit()
        );
    }

    #[test]
    fn exit_zone_detection() {
        let (interior, _) = built();
        assert!(interior.in_exit_zone(interior.exit()));
        assert!(interior.in_exit_zone(interior.exit() + Vec2::new(1.0, 0.0)));
        assert!(!interior.in_exit_zone(interior.spawn()));
    }

    #[test]
    fn chest_pays_out_exactly_once() {
        let (mut interior, _) = built();
        let first = interior.interact(InteriorInteractable::Chest);
        assert!(first.changed);
        assert_eq!(first.coins, 2);

        let second = interior.interact(InteriorInteractable::Chest);
        assert!(!second.changed);
        assert_eq!(second.coins, 0);
        assert!(interior.chest_looted());
    }

    #[test]
    fn bed_always_advances_time() {
        let (mut interior, _) = built();
        for _ in 0..3 {
            let outcome = interior.interact(InteriorInteractable::Bed);
            assert!(outcome.changed);
            assert!(outcome.advance_to_day);
            assert_eq!(outcome.coins, 0);
        }
    }

    #[test]
    fn furnishings_found_within_their_ranges() {
        let (interior, _) = built();
        let near_chest = INTERIOR_ORIGIN + Vec2::new(2.2, -0.5);
        assert_eq!(
            interior.nearest_interactable(near_chest),
            Some(InteriorInteractable::Chest)
        );
        let near_bed = INTERIOR_ORIGIN + Vec2::new(-2.6, -1.5);
        assert_eq!(
            interior.nearest_interactable(near_bed),
            Some(InteriorInteractable::Bed)
        );
        assert_eq!(interior.nearest_interactable(INTERIOR_ORIGIN), None);
    }

    #[test]
    fn camera_clamps_to_the_room_box() {
        let (interior, _) = built();
        let clamped = interior.clamp_camera(Vec3::new(
            INTERIOR_ORIGIN.x + 30.0,
            10.0,
            INTERIOR_ORIGIN.y - 30.0,
        ));
        assert_eq!(clamped.x, INTERIOR_ORIGIN.x + HALF_SIZE - CAMERA_MARGIN);
        assert_eq!(clamped.y, CAMERA_MAX_Y);
        assert_eq!(clamped.z, INTERIOR_ORIGIN.y - HALF_SIZE + CAMERA_MARGIN);

        let inside = Vec3::new(INTERIOR_ORIGIN.x + 1.0, 2.0, INTERIOR_ORIGIN.y + 1.0);
        assert_eq!(interior.clamp_camera(inside), inside);
    }
}
