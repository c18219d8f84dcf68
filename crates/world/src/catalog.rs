use glam::Vec2;
use std::collections::BTreeMap;

use emberglade_common::EntityId;

use crate::chunk::ChunkCoord;

/// Activation radius for lighting a lantern.
pub const LANTERN_RANGE: f32 = 2.4;
/// Activation radius for gathering an herb.
pub const HERB_RANGE: f32 = 2.2;
/// Activation radius for inspecting the marker.
pub const MARKER_RANGE: f32 = 2.4;
/// A house door is offered as an interaction target within this range.
pub const HOUSE_DOOR_RANGE: f32 = 1.65;
/// Entering is validated against a slightly wider range than detection, so a
/// prompt shown on one frame cannot be rejected on the next.
pub(crate) const HOUSE_DOOR_ENTER_RANGE: f32 = 1.9;
/// Door anchor offset from the house center, along local +Z before rotation.
pub(crate) const HOUSE_DOOR_OFFSET: f32 = 2.05;

/// Rotate a local (x, z) offset around the world Y axis.
pub(crate) fn rotate_y(offset: Vec2, rotation: f32) -> Vec2 {
    let (sin, cos) = rotation.sin_cos();
    Vec2::new(
        offset.x * cos - offset.y * sin,
        offset.x * sin + offset.y * cos,
    )
}

/// A streetlamp-style lantern the actor can light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lantern {
    pub id: EntityId,
    pub position: Vec2,
    pub lit: bool,
    pub owner: Option<ChunkCoord>,
}

/// A gatherable herb.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Herb {
    pub id: EntityId,
    pub position: Vec2,
    pub collected: bool,
    pub owner: Option<ChunkCoord>,
}

/// An enterable house. The drawable footprint is approximated by circular
/// colliders registered by the world; the catalog only tracks identity,
/// placement, and the door anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct House {
    pub id: EntityId,
    pub position: Vec2,
    pub rotation: f32,
    pub owner: Option<ChunkCoord>,
}

impl House {
    /// World position of the door anchor: a fixed forward offset rotated by
    /// the house orientation.
    pub fn door_anchor(&self) -> Vec2 {
        self.position + rotate_y(Vec2::new(0.0, HOUSE_DOOR_OFFSET), self.rotation)
    }
}

/// The singleton rune marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: EntityId,
    pub position: Vec2,
    pub inspected: bool,
}

/// Outcome of a lantern interaction. `changed == false` means no state was
/// altered (already lit, or unknown id).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LanternOutcome {
    pub changed: bool,
    pub lit: u32,
    pub goal: u32,
    pub complete: bool,
}

/// Outcome of an herb interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HerbOutcome {
    pub changed: bool,
    pub collected: u32,
    pub goal: u32,
    pub complete: bool,
}

/// Outcome of a marker inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOutcome {
    pub changed: bool,
}

/// All quest-relevant interactive entities, with catalog-owned progress
/// counters.
///
/// BTreeMap storage keeps iteration deterministic. The counters are mutated
/// only through this API: `lanterns_lit` always equals the number of
/// currently-loaded lit lanterns (eviction decrements), while
/// `herbs_collected` is a permanent tally that eviction never lowers.
#[derive(Debug)]
pub struct EntityCatalog {
    lanterns: BTreeMap<EntityId, Lantern>,
    herbs: BTreeMap<EntityId, Herb>,
    houses: BTreeMap<EntityId, House>,
    marker: Option<Marker>,
    lanterns_lit: u32,
    herbs_collected: u32,
    lantern_goal: u32,
    herb_goal: u32,
}

impl EntityCatalog {
    pub fn new(lantern_goal: u32, herb_goal: u32) -> Self {
        Self {
            lanterns: BTreeMap::new(),
            herbs: BTreeMap::new(),
            houses: BTreeMap::new(),
            marker: None,
            lanterns_lit: 0,
            herbs_collected: 0,
            lantern_goal,
            herb_goal,
        }
    }

    // -- construction --

    pub fn add_lantern(&mut self, position: Vec2, owner: Option<ChunkCoord>) -> EntityId {
        let id = EntityId::new();
        self.lanterns.insert(
            id,
            Lantern {
                id,
                position,
                lit: false,
                owner,
            },
        );
        id
    }

    pub fn add_herb(&mut self, position: Vec2, owner: Option<ChunkCoord>) -> EntityId {
        let id = EntityId::new();
        self.herbs.insert(
            id,
            Herb {
                id,
                position,
                collected: false,
                owner,
            },
        );
        id
    }

    pub fn add_house(
        &mut self,
        position: Vec2,
        rotation: f32,
        owner: Option<ChunkCoord>,
    ) -> EntityId {
        let id = EntityId::new();
        self.houses.insert(
            id,
            House {
                id,
                position,
                rotation,
                owner,
            },
        );
        id
    }

    /// Install the singleton marker. Replaces any previous one.
    pub fn set_marker(&mut self, position: Vec2) -> EntityId {
        let id = EntityId::new();
        self.marker = Some(Marker {
            id,
            position,
            inspected: false,
        });
        id
    }

    // -- access --

    pub fn lantern(&self, id: EntityId) -> Option<&Lantern> {
        self.lanterns.get(&id)
    }

    pub fn herb(&self, id: EntityId) -> Option<&Herb> {
        self.herbs.get(&id)
    }

    pub fn house(&self, id: EntityId) -> Option<&House> {
        self.houses.get(&id)
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub fn lantern_count(&self) -> usize {
        self.lanterns.len()
    }

    pub fn herb_count(&self) -> usize {
        self.herbs.len()
    }

    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    // -- interaction queries --

    /// Nearest lantern within activation range (lit or not; lighting is
    /// idempotent).
    pub fn nearest_lantern(&self, actor: Vec2) -> Option<EntityId> {
        nearest_within(
            self.lanterns.values().map(|l| (l.id, l.position)),
            actor,
            LANTERN_RANGE,
        )
    }

    /// Nearest uncollected herb within activation range.
    pub fn nearest_herb(&self, actor: Vec2) -> Option<EntityId> {
        nearest_within(
            self.herbs
                .values()
                .filter(|h| !h.collected)
                .map(|h| (h.id, h.position)),
            actor,
            HERB_RANGE,
        )
    }

    /// Whether the marker is within inspection range of the actor.
    pub fn marker_in_range(&self, actor: Vec2) -> bool {
        self.marker
            .as_ref()
            .is_some_and(|m| m.position.distance(actor) < MARKER_RANGE)
    }

    /// Nearest house whose door anchor lies within range of the actor.
    pub fn nearest_house_door(&self, actor: Vec2) -> Option<EntityId> {
        nearest_within(
            self.houses.values().map(|h| (h.id, h.door_anchor())),
            actor,
            HOUSE_DOOR_RANGE,
        )
    }

    // -- mutations --

    /// Light a lantern. First-time lighting flips the flag and counts it;
    /// anything else reports `changed == false`.
    pub fn light_lantern(&mut self, id: EntityId) -> LanternOutcome {
        let changed = match self.lanterns.get_mut(&id) {
            Some(lantern) if !lantern.lit => {
                lantern.lit = true;
                self.lanterns_lit += 1;
                true
            }
            _ => false,
        };
        LanternOutcome {
            changed,
            lit: self.lanterns_lit,
            goal: self.lantern_goal,
            complete: self.lanterns_lit >= self.lantern_goal,
        }
    }

    /// Collect an herb. Idempotent per herb; the tally only ever grows.
    pub fn collect_herb(&mut self, id: EntityId) -> HerbOutcome {
        let changed = match self.herbs.get_mut(&id) {
            Some(herb) if !herb.collected => {
                herb.collected = true;
                self.herbs_collected += 1;
                true
            }
            _ => false,
        };
        HerbOutcome {
            changed,
            collected: self.herbs_collected,
            goal: self.herb_goal,
            complete: self.herbs_collected >= self.herb_goal,
        }
    }

    /// Inspect the marker. Idempotent.
    pub fn inspect_marker(&mut self) -> MarkerOutcome {
        let changed = match &mut self.marker {
            Some(marker) if !marker.inspected => {
                marker.inspected = true;
                true
            }
            _ => false,
        };
        MarkerOutcome { changed }
    }

    // -- progress --

    pub fn lanterns_lit(&self) -> u32 {
        self.lanterns_lit
    }

    pub fn lantern_goal(&self) -> u32 {
        self.lantern_goal
    }

    pub fn is_lantern_quest_complete(&self) -> bool {
        self.lanterns_lit >= self.lantern_goal
    }

    pub fn herbs_collected(&self) -> u32 {
        self.herbs_collected
    }

    pub fn herb_goal(&self) -> u32 {
        self.herb_goal
    }

    pub fn is_herb_quest_complete(&self) -> bool {
        self.herbs_collected >= self.herb_goal
    }

    pub fn marker_inspected(&self) -> bool {
        self.marker.as_ref().is_some_and(|m| m.inspected)
    }

    // -- eviction --

    /// Remove every entity owned by `owner`; returns the removed ids.
    ///
    /// A lit lantern leaving memory stops counting toward the goal. Collected
    /// herbs keep their tally: gathering is a permanent achievement, light is
    /// world state that unloads with its chunk.
    pub fn remove_chunk(&mut self, owner: ChunkCoord) -> Vec<EntityId> {
        let mut removed = Vec::new();

        let lantern_ids: Vec<EntityId> = self
            .lanterns
            .values()
            .filter(|l| l.owner == Some(owner))
            .map(|l| l.id)
            .collect();
        for id in lantern_ids {
            if let Some(lantern) = self.lanterns.remove(&id) {
                if lantern.lit {
                    self.lanterns_lit -= 1;
                }
                removed.push(id);
            }
        }

        let herb_ids: Vec<EntityId> = self
            .herbs
            .values()
            .filter(|h| h.owner == Some(owner))
            .map(|h| h.id)
            .collect();
        for id in herb_ids {
            self.herbs.remove(&id);
            removed.push(id);
        }

        let house_ids: Vec<EntityId> = self
            .houses
            .values()
            .filter(|h| h.owner == Some(owner))
            .map(|h| h.id)
            .collect();
        for id in house_ids {
            self.houses.remove(&id);
            removed.push(id);
        }

        removed
    }
}

/// Nearest candidate strictly within `range` of `actor`.
fn nearest_within(
    candidates: impl Iterator<Item = (EntityId, Vec2)>,
    actor: Vec2,
    range: f32,
) -> Option<EntityId> {
    let mut nearest = None;
    let mut nearest_dist = range;
    for (id, position) in candidates {
        let dist = position.distance(actor);
        if dist < nearest_dist {
            nearest = Some(id);
            nearest_dist = dist;
        }
    }
    nearest
}
