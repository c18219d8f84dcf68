use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4};

use emberglade_common::{EntityId, Placement, PlacementKind};

use crate::catalog::{
    EntityCatalog, HOUSE_DOOR_ENTER_RANGE, HerbOutcome, LanternOutcome, MarkerOutcome, rotate_y,
};
use crate::chunk::{ChunkCoord, ChunkDelta, ChunkManager};
use crate::config::WorldConfig;
use crate::interior::{Interior, InteriorInteractable, InteriorOutcome};
use crate::obstacle::ObstacleRegistry;
use crate::placement::PlacementStore;
use crate::procgen::{ChunkPlan, SceneryKind};

/// NPCs are offered as interaction targets within this range. Their
/// positions are supplied by the (external) NPC collaborator.
const NPC_RANGE: f32 = 2.8;

/// House footprint: perimeter collider offsets in house-local space. The
/// front (+Z) center is left open so the actor can stand at the door.
const HOUSE_FOOTPRINT: [(f32, f32); 7] = [
    (-1.65, -1.35),
    (1.65, -1.35),
    (-1.65, 1.35),
    (1.65, 1.35),
    (0.0, -1.35),
    (-1.65, 0.0),
    (1.65, 0.0),
];
const HOUSE_COLLIDER_RADIUS: f32 = 0.95;
/// Core blocker keeping the actor out of the hollow decorative mesh; entry
/// is via the door interaction only.
const HOUSE_CORE_RADIUS: f32 = 1.35;

/// An event record produced by every externally-visible transition.
///
/// The renderer consumes placement events; the audio collaborator filters
/// the discrete transition events; diagnostics can log the lot. Drained once
/// per frame via [`World::drain_events`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    PlacementAdded { id: EntityId, placement: Placement },
    PlacementRemoved { id: EntityId },
    ChunkLoaded { coord: ChunkCoord },
    ChunkEvicted { coord: ChunkCoord },
    LanternLit { id: EntityId },
    HerbCollected { id: EntityId },
    MarkerInspected,
    DoorOpened,
    DoorClosed,
    ChestLooted,
    BedUsed,
}

/// Outcome of entering or leaving a house. `teleport` carries the position
/// the movement collaborator should snap the actor to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortalOutcome {
    pub changed: bool,
    pub teleport: Option<Vec2>,
}

impl PortalOutcome {
    fn unchanged() -> Self {
        Self {
            changed: false,
            teleport: None,
        }
    }
}

/// Classification of the single interaction prompt target, evaluated in
/// fixed priority order (see [`World::nearest_interactable`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionTarget {
    /// Index into the caller-supplied NPC position slice.
    Npc(usize),
    Marker,
    Herb(EntityId),
    Lantern(EntityId),
    HouseDoor(EntityId),
    ExitPad,
}

/// The world: streamed terrain, obstacles, interactive entities, and the
/// shared interior. Exclusively owns every collection; collaborators reach
/// in only through the methods below.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    obstacles: ObstacleRegistry,
    catalog: EntityCatalog,
    placements: PlacementStore,
    chunks: ChunkManager,
    interior: Option<Interior>,
    inside_house: bool,
    return_position: Vec2,
    events: Vec<WorldEvent>,
}

impl World {
    /// Create the world and seed the hand-placed village around the origin.
    /// Call [`World::update_chunks`] with `force = true` to stream the first
    /// terrain ring in.
    pub fn new(config: WorldConfig) -> Self {
        let chunks = ChunkManager::new(config.chunk_size, config.chunk_radius);
        let catalog = EntityCatalog::new(config.lantern_goal, config.herb_goal);
        let mut world = Self {
            config,
            obstacles: ObstacleRegistry::new(),
            catalog,
            placements: PlacementStore::new(),
            chunks,
            interior: None,
            inside_house: false,
            return_position: Vec2::ZERO,
            events: Vec::new(),
        };
        world.seed_village();
        world
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn obstacles(&self) -> &ObstacleRegistry {
        &self.obstacles
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    pub fn placements(&self) -> &PlacementStore {
        &self.placements
    }

    pub fn chunks(&self) -> &ChunkManager {
        &self.chunks
    }

    pub fn is_inside_house(&self) -> bool {
        self.inside_house
    }

    /// Take all events accumulated since the last drain.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view of the pending events.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    // -- streaming --

    /// Per-frame streaming update around the actor.
    ///
    /// Unchanged center chunk and `!force` returns immediately. While the
    /// actor is inside the interior no streaming happens at all: the
    /// reserved region must never pull procedural chunks in around it.
    pub fn update_chunks(&mut self, actor: Vec2, force: bool) -> ChunkDelta {
        if self.inside_house {
            return ChunkDelta::default();
        }
        let delta = self.chunks.update(actor, force);
        for coord in &delta.created {
            self.create_chunk(*coord);
        }
        for coord in &delta.evicted {
            self.evict_chunk(*coord);
        }
        delta
    }

    fn create_chunk(&mut self, coord: ChunkCoord) {
        let size = self.config.chunk_size;
        let center = coord.center(size);
        self.add_placement(
            Placement::at(PlacementKind::Ground, center.x, center.y)
                .with_scale(Vec3::new(size, 1.0, size)),
            Some(coord),
        );

        let plan = ChunkPlan::generate(coord, size);
        for s in &plan.scenery {
            self.obstacles
                .add(s.position, s.kind.obstacle_radius(), Some(coord));
            let kind = match s.kind {
                SceneryKind::Tree => PlacementKind::Tree,
                SceneryKind::Bush => PlacementKind::Bush,
                SceneryKind::Rock => PlacementKind::Rock,
            };
            self.add_placement(
                Placement::at(kind, s.position.x, s.position.y).with_scale(s.scale),
                Some(coord),
            );
        }
        for herb in &plan.herbs {
            self.spawn_herb(*herb, Some(coord));
        }
        if let Some(house) = &plan.house {
            self.spawn_house(house.position, house.rotation, Some(coord));
        }

        self.events.push(WorldEvent::ChunkLoaded { coord });
    }

    /// Eviction cascade: everything tagged with the chunk goes at once, and
    /// the renderer is told which drawables to release.
    fn evict_chunk(&mut self, coord: ChunkCoord) {
        for id in self.placements.remove_chunk(coord) {
            self.events.push(WorldEvent::PlacementRemoved { id });
        }
        self.obstacles.remove_chunk(coord);
        self.catalog.remove_chunk(coord);
        self.events.push(WorldEvent::ChunkEvicted { coord });
    }

    // -- collision --

    /// Correct a proposed actor position against all loaded obstacles.
    pub fn resolve_collisions(&self, proposed: Vec2, actor_radius: f32) -> Vec2 {
        self.obstacles.resolve(proposed, actor_radius)
    }

    /// Correct a proposed position using the configured actor radius.
    pub fn resolve_actor(&self, proposed: Vec2) -> Vec2 {
        self.obstacles.resolve(proposed, self.config.actor_radius)
    }

    // -- interaction queries --

    pub fn nearest_lantern(&self, actor: Vec2) -> Option<EntityId> {
        self.catalog.nearest_lantern(actor)
    }

    pub fn nearest_herb(&self, actor: Vec2) -> Option<EntityId> {
        self.catalog.nearest_herb(actor)
    }

    pub fn marker_in_range(&self, actor: Vec2) -> bool {
        self.catalog.marker_in_range(actor)
    }

    /// Nearest house door, never offered while already inside.
    pub fn nearest_house_door(&self, actor: Vec2) -> Option<EntityId> {
        if self.inside_house {
            return None;
        }
        self.catalog.nearest_house_door(actor)
    }

    /// The one interaction target the prompt should show, in fixed priority
    /// order. Inside the house only the exit pad counts; outside, NPCs win
    /// over the marker, the marker over herbs, herbs over unlit lanterns,
    /// lanterns over house doors.
    pub fn nearest_interactable(&self, actor: Vec2, npcs: &[Vec2]) -> Option<InteractionTarget> {
        if self.inside_house {
            return self
                .in_exit_zone(actor)
                .then_some(InteractionTarget::ExitPad);
        }

        let mut nearest_npc = None;
        let mut nearest_dist = NPC_RANGE;
        for (i, npc) in npcs.iter().enumerate() {
            let dist = npc.distance(actor);
            if dist < nearest_dist {
                nearest_npc = Some(i);
                nearest_dist = dist;
            }
        }
        if let Some(i) = nearest_npc {
            return Some(InteractionTarget::Npc(i));
        }

        if self.catalog.marker_in_range(actor) && !self.catalog.marker_inspected() {
            return Some(InteractionTarget::Marker);
        }
        if let Some(id) = self.catalog.nearest_herb(actor) {
            return Some(InteractionTarget::Herb(id));
        }
        if let Some(id) = self.catalog.nearest_lantern(actor) {
            if self.catalog.lantern(id).is_some_and(|l| !l.lit) {
                return Some(InteractionTarget::Lantern(id));
            }
        }
        self.catalog
            .nearest_house_door(actor)
            .map(InteractionTarget::HouseDoor)
    }

    // -- mutations --

    pub fn light_lantern(&mut self, id: EntityId) -> LanternOutcome {
        let outcome = self.catalog.light_lantern(id);
        if outcome.changed {
            self.events.push(WorldEvent::LanternLit { id });
        }
        outcome
    }

    pub fn collect_herb(&mut self, id: EntityId) -> HerbOutcome {
        let outcome = self.catalog.collect_herb(id);
        if outcome.changed {
            self.events.push(WorldEvent::HerbCollected { id });
        }
        outcome
    }

    pub fn inspect_marker(&mut self) -> MarkerOutcome {
        let outcome = self.catalog.inspect_marker();
        if outcome.changed {
            self.events.push(WorldEvent::MarkerInspected);
        }
        outcome
    }

    // -- interior portal --

    /// Enter a house through its door. Valid only while outside and within
    /// door range; the interior is built on first entry. Returns the
    /// interior spawn as the teleport target.
    pub fn enter_house(&mut self, id: EntityId, actor: Vec2) -> PortalOutcome {
        if self.inside_house {
            return PortalOutcome::unchanged();
        }
        let Some(house) = self.catalog.house(id) else {
            return PortalOutcome::unchanged();
        };
        if house.door_anchor().distance(actor) > HOUSE_DOOR_ENTER_RANGE {
            return PortalOutcome::unchanged();
        }

        self.ensure_interior();
        let Some(interior) = &self.interior else {
            return PortalOutcome::unchanged();
        };
        self.return_position = actor;
        self.inside_house = true;
        self.events.push(WorldEvent::DoorOpened);
        PortalOutcome {
            changed: true,
            teleport: Some(interior.spawn()),
        }
    }

    /// Leave the interior, restoring the exact position recorded at entry.
    pub fn exit_house(&mut self) -> PortalOutcome {
        if !self.inside_house {
            return PortalOutcome::unchanged();
        }
        self.inside_house = false;
        self.events.push(WorldEvent::DoorClosed);
        PortalOutcome {
            changed: true,
            teleport: Some(self.return_position),
        }
    }

    /// Whether the actor stands on the interior exit pad.
    pub fn in_exit_zone(&self, actor: Vec2) -> bool {
        self.inside_house
            && self
                .interior
                .as_ref()
                .is_some_and(|i| i.in_exit_zone(actor))
    }

    /// Nearest interior furnishing, only meaningful while inside.
    pub fn nearest_interior_interactable(&self, actor: Vec2) -> Option<InteriorInteractable> {
        if !self.inside_house {
            return None;
        }
        self.interior
            .as_ref()
            .and_then(|i| i.nearest_interactable(actor))
    }

    /// Interact with the chest or bed.
    pub fn interact_interior(&mut self, which: InteriorInteractable) -> InteriorOutcome {
        if !self.inside_house {
            return InteriorOutcome::unchanged();
        }
        let Some(interior) = &mut self.interior else {
            return InteriorOutcome::unchanged();
        };
        let outcome = interior.interact(which);
        if outcome.changed {
            self.events.push(match which {
                InteriorInteractable::Chest => WorldEvent::ChestLooted,
                InteriorInteractable::Bed => WorldEvent::BedUsed,
            });
        }
        outcome
    }

    /// Clamp the camera while inside the interior; a pass-through outside.
    pub fn clamp_camera(&self, position: Vec3) -> Vec3 {
        if !self.inside_house {
            return position;
        }
        match &self.interior {
            Some(interior) => interior.clamp_camera(position),
            None => position,
        }
    }

    fn ensure_interior(&mut self) {
        if self.interior.is_some() {
            return;
        }
        let (interior, placements) = Interior::build(&mut self.obstacles);
        for placement in placements {
            self.add_placement(placement, None);
        }
        self.interior = Some(interior);
    }

    // -- quest progress --

    pub fn lantern_progress(&self) -> u32 {
        self.catalog.lanterns_lit()
    }

    pub fn lantern_goal(&self) -> u32 {
        self.catalog.lantern_goal()
    }

    pub fn is_lantern_quest_complete(&self) -> bool {
        self.catalog.is_lantern_quest_complete()
    }

    pub fn herb_progress(&self) -> u32 {
        self.catalog.herbs_collected()
    }

    pub fn herb_goal(&self) -> u32 {
        self.catalog.herb_goal()
    }

    pub fn is_herb_quest_complete(&self) -> bool {
        self.catalog.is_herb_quest_complete()
    }

    pub fn marker_inspected(&self) -> bool {
        self.catalog.marker_inspected()
    }

    // -- spawning --

    fn add_placement(&mut self, placement: Placement, owner: Option<ChunkCoord>) -> EntityId {
        let id = EntityId::new();
        self.add_placement_for(id, placement, owner);
        id
    }

    /// Insert a placement under an existing catalog-entity id so renderer
    /// and catalog address the same thing.
    fn add_placement_for(&mut self, id: EntityId, placement: Placement, owner: Option<ChunkCoord>) {
        self.placements.insert(id, placement, owner);
        self.events.push(WorldEvent::PlacementAdded { id, placement });
    }

    fn spawn_scenery(
        &mut self,
        kind: PlacementKind,
        at: Vec2,
        radius: f32,
        owner: Option<ChunkCoord>,
    ) {
        self.obstacles.add(at, radius, owner);
        self.add_placement(Placement::at(kind, at.x, at.y), owner);
    }

    fn spawn_house(&mut self, at: Vec2, rotation: f32, owner: Option<ChunkCoord>) -> EntityId {
        for (dx, dz) in HOUSE_FOOTPRINT {
            let offset = rotate_y(Vec2::new(dx, dz), rotation);
            self.obstacles
                .add(at + offset, HOUSE_COLLIDER_RADIUS, owner);
        }
        self.obstacles.add(at, HOUSE_CORE_RADIUS, owner);

        let id = self.catalog.add_house(at, rotation, owner);
        self.add_placement_for(
            id,
            Placement::at(PlacementKind::House, at.x, at.y).with_rotation(rotation),
            owner,
        );
        id
    }

    fn spawn_lantern(&mut self, at: Vec2, owner: Option<ChunkCoord>) -> EntityId {
        self.obstacles.add(at, 0.6, owner);
        let id = self.catalog.add_lantern(at, owner);
        self.add_placement_for(id, Placement::at(PlacementKind::Lantern, at.x, at.y), owner);
        id
    }

    fn spawn_herb(&mut self, at: Vec2, owner: Option<ChunkCoord>) -> EntityId {
        let id = self.catalog.add_herb(at, owner);
        self.add_placement_for(id, Placement::at(PlacementKind::Herb, at.x, at.y), owner);
        id
    }

    fn spawn_marker(&mut self, at: Vec2) -> EntityId {
        self.obstacles.add(at, 0.8, None);
        let id = self.catalog.set_marker(at);
        self.add_placement_for(id, Placement::at(PlacementKind::Marker, at.x, at.y), None);
        id
    }

    fn spawn_fixture(&mut self, kind: PlacementKind, at: Vec2, rotation: f32) {
        self.add_placement(Placement::at(kind, at.x, at.y).with_rotation(rotation), None);
    }

    fn spawn_path(&mut self, at: Vec2, extent: Vec2) {
        self.add_placement(
            Placement::at(PlacementKind::Path, at.x, at.y)
                .with_scale(Vec3::new(extent.x, 1.0, extent.y)),
            None,
        );
    }

    /// Hand-placed village in the reserved region around the origin. All of
    /// it is permanent: nothing here carries an owning chunk.
    fn seed_village(&mut self) {
        self.spawn_path(Vec2::new(0.0, -2.0), Vec2::new(4.6, 34.0));
        self.spawn_path(Vec2::new(2.0, 2.0), Vec2::new(18.0, 4.2));

        self.spawn_house(Vec2::new(-8.0, -6.0), 0.0, None);
        self.spawn_house(Vec2::new(10.0, -4.0), 0.0, None);
        self.spawn_house(Vec2::new(-12.0, 8.0), 0.0, None);
        self.spawn_house(Vec2::new(6.0, 10.0), 0.0, None);

        for at in [(-4.0, -12.0), (12.0, 14.0), (-16.0, 2.0), (4.0, -16.0)] {
            self.spawn_scenery(PlacementKind::Tree, Vec2::from(at), 1.3, None);
        }
        for at in [(-6.0, 2.0), (8.0, 3.0)] {
            self.spawn_scenery(PlacementKind::Crate, Vec2::from(at), 0.75, None);
        }
        for at in [(-10.0, -2.0), (2.0, -8.0)] {
            self.spawn_scenery(PlacementKind::Barrel, Vec2::from(at), 0.75, None);
        }
        for at in [(14.0, 4.0), (16.0, 0.0), (14.0, -4.0)] {
            self.spawn_lantern(Vec2::from(at), None);
        }

        self.spawn_fixture(PlacementKind::Fence, Vec2::new(-1.0, 4.6), FRAC_PI_2);
        self.spawn_fixture(PlacementKind::Fence, Vec2::new(1.6, 4.6), FRAC_PI_2);
        self.spawn_fixture(PlacementKind::Fence, Vec2::new(-5.5, -0.5), FRAC_PI_3);
        self.spawn_fixture(PlacementKind::Bench, Vec2::new(-1.5, 1.6), FRAC_PI_2);
        self.spawn_fixture(PlacementKind::Bench, Vec2::new(3.5, 1.2), -FRAC_PI_4);

        self.spawn_scenery(PlacementKind::Well, Vec2::new(-3.2, 5.2), 1.0, None);
        self.spawn_scenery(PlacementKind::Campfire, Vec2::new(2.4, -3.6), 0.9, None);
        self.spawn_scenery(PlacementKind::Bush, Vec2::new(-6.2, 6.5), 0.6, None);
        self.spawn_scenery(PlacementKind::Bush, Vec2::new(6.2, -1.4), 0.6, None);

        for at in [
            (7.5, -9.5),
            (9.2, -10.8),
            (11.3, -9.2),
            (8.6, -12.2),
            (10.1, -12.8),
        ] {
            self.spawn_herb(Vec2::from(at), None);
        }

        self.spawn_marker(Vec2::new(18.0, 14.0));
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}
