use std::collections::{BTreeMap, BTreeSet};

use emberglade_common::{EntityId, Placement, PlacementKind};
use emberglade_world::WorldEvent;

/// A handle referencing a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

/// Owned material ids start above the shared range.
const OWNED_ID_BASE: u64 = 1_000;

/// How a node references its material.
///
/// The distinction is the disposal gate: it is fixed at construction time,
/// so releasing a node can never destroy a material other instances still
/// reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialRef {
    /// Default material shared by every instance of the kind.
    Shared(MaterialId),
    /// Cloned for this instance because its look mutates at runtime
    /// (lantern glow, interior shell). Released with the node.
    Owned(MaterialId),
}

/// A drawable node built from one semantic placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneNode {
    pub placement: Placement,
    pub material: MaterialRef,
}

/// Errors from scene mutations. These only arise from caller misuse of the
/// event stream (applying it twice, or out of order).
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("placement {0:?} already has a node")]
    DuplicateNode(EntityId),
    #[error("no node for placement {0:?}")]
    UnknownNode(EntityId),
}

/// Scene graph derived from world events.
///
/// Applies `PlacementAdded`/`PlacementRemoved` and ignores the rest (audio
/// and quest events are other collaborators' business).
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: BTreeMap<EntityId, SceneNode>,
    live_owned: BTreeSet<MaterialId>,
    next_owned: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one world event to the scene.
    pub fn apply(&mut self, event: &WorldEvent) -> Result<(), SceneError> {
        match event {
            WorldEvent::PlacementAdded { id, placement } => self.build_node(*id, *placement),
            WorldEvent::PlacementRemoved { id } => self.release_node(*id),
            _ => Ok(()),
        }
    }

    /// Apply a drained event batch in order.
    pub fn apply_all<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a WorldEvent>,
    ) -> Result<(), SceneError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    fn build_node(&mut self, id: EntityId, placement: Placement) -> Result<(), SceneError> {
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateNode(id));
        }
        let material = if kind_mutates_at_runtime(placement.kind) {
            let owned = MaterialId(OWNED_ID_BASE + self.next_owned);
            self.next_owned += 1;
            self.live_owned.insert(owned);
            MaterialRef::Owned(owned)
        } else {
            MaterialRef::Shared(shared_material(placement.kind))
        };
        tracing::trace!(?id, kind = ?placement.kind, "building scene node");
        self.nodes.insert(id, SceneNode { placement, material });
        Ok(())
    }

    fn release_node(&mut self, id: EntityId) -> Result<(), SceneError> {
        let Some(node) = self.nodes.remove(&id) else {
            return Err(SceneError::UnknownNode(id));
        };
        if let MaterialRef::Owned(material) = node.material {
            // Disposal is gated on the ownership marker: shared defaults are
            // never touched here.
            self.live_owned.remove(&material);
            tracing::trace!(?id, ?material, "released owned material");
        }
        Ok(())
    }

    pub fn node(&self, id: EntityId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = (EntityId, &SceneNode)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Live per-instance materials awaiting release.
    pub fn owned_material_count(&self) -> usize {
        self.live_owned.len()
    }

    /// Nodes of one kind currently in the scene.
    pub fn count_kind(&self, kind: PlacementKind) -> usize {
        self.nodes
            .values()
            .filter(|n| n.placement.kind == kind)
            .count()
    }
}

/// Whether instances of this kind mutate their look at runtime and thus
/// need a private material clone.
fn kind_mutates_at_runtime(kind: PlacementKind) -> bool {
    matches!(
        kind,
        PlacementKind::Lantern | PlacementKind::InteriorShell | PlacementKind::ExitPad
    )
}

/// The shared default material for a kind. Exhaustive: a new placement kind
/// does not render until it is given a material here.
fn shared_material(kind: PlacementKind) -> MaterialId {
    let slot: u64 = match kind {
        PlacementKind::Ground => 0,
        PlacementKind::Path => 1,
        PlacementKind::Tree => 2,
        PlacementKind::Bush => 3,
        PlacementKind::Rock => 4,
        PlacementKind::Crate => 5,
        PlacementKind::Barrel => 6,
        PlacementKind::Fence => 7,
        PlacementKind::Bench => 8,
        PlacementKind::Well => 9,
        PlacementKind::Campfire => 10,
        PlacementKind::House => 11,
        PlacementKind::Lantern => 12,
        PlacementKind::Herb => 13,
        PlacementKind::Marker => 14,
        PlacementKind::InteriorShell => 15,
        PlacementKind::Table => 16,
        PlacementKind::Chest => 17,
        PlacementKind::Bed => 18,
        PlacementKind::ExitPad => 19,
    };
    MaterialId(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberglade_world::World;
    use glam::Vec2;

    fn added(id: EntityId, kind: PlacementKind) -> WorldEvent {
        WorldEvent::PlacementAdded {
            id,
            placement: Placement::at(kind, 0.0, 0.0),
        }
    }

    #[test]
    fn trees_share_one_material() {
        let mut scene = SceneGraph::new();
        let a = EntityId::new();
        let b = EntityId::new();
        scene.apply(&added(a, PlacementKind::Tree)).expect("add");
        scene.apply(&added(b, PlacementKind::Tree)).expect("add");

        let ma = scene.node(a).map(|n| n.material);
        let mb = scene.node(b).map(|n| n.material);
        assert_eq!(ma, mb);
        assert!(matches!(ma, Some(MaterialRef::Shared(_))));
        assert_eq!(scene.owned_material_count(), 0);
    }

    #[test]
    fn lanterns_get_private_materials() {
        let mut scene = SceneGraph::new();
        let a = EntityId::new();
        let b = EntityId::new();
        scene.apply(&added(a, PlacementKind::Lantern)).expect("add");
        scene.apply(&added(b, PlacementKind::Lantern)).expect("add");

        assert_eq!(scene.owned_material_count(), 2);
        let (ma, mb) = (scene.node(a).map(|n| n.material), scene.node(b).map(|n| n.material));
        assert!(matches!(ma, Some(MaterialRef::Owned(_))));
        assert_ne!(ma, mb);
    }

    #[test]
    fn release_drops_owned_but_never_shared() {
        let mut scene = SceneGraph::new();
        let lantern = EntityId::new();
        let tree_a = EntityId::new();
        let tree_b = EntityId::new();
        scene.apply(&added(lantern, PlacementKind::Lantern)).expect("add");
        scene.apply(&added(tree_a, PlacementKind::Tree)).expect("add");
        scene.apply(&added(tree_b, PlacementKind::Tree)).expect("add");

        scene
            .apply(&WorldEvent::PlacementRemoved { id: lantern })
            .expect("remove");
        scene
            .apply(&WorldEvent::PlacementRemoved { id: tree_a })
            .expect("remove");

        assert_eq!(scene.node_count(), 1);
        assert_eq!(scene.owned_material_count(), 0);
        // The surviving tree still references the shared default.
        assert_eq!(
            scene.node(tree_b).map(|n| n.material),
            Some(MaterialRef::Shared(shared_material(PlacementKind::Tree)))
        );
    }

    #[test]
    fn duplicate_and_unknown_ids_are_errors() {
        let mut scene = SceneGraph::new();
        let id = EntityId::new();
        scene.apply(&added(id, PlacementKind::Rock)).expect("add");
        assert!(matches!(
            scene.apply(&added(id, PlacementKind::Rock)),
            Err(SceneError::DuplicateNode(_))
        ));
        assert!(matches!(
            scene.apply(&WorldEvent::PlacementRemoved { id: EntityId::new() }),
            Err(SceneError::UnknownNode(_))
        ));
    }

    #[test]
    fn non_placement_events_are_ignored() {
        let mut scene = SceneGraph::new();
        scene.apply(&WorldEvent::DoorOpened).expect("ignore");
        scene.apply(&WorldEvent::BedUsed).expect("ignore");
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn eviction_events_return_the_scene_to_its_prior_size() {
        let mut world = World::default();
        let mut scene = SceneGraph::new();
        scene.apply_all(&world.drain_events()).expect("village");
        let village_nodes = scene.node_count();
        let village_owned = scene.owned_material_count();

        // Stream a far region in, then walk back so it evicts.
        world.update_chunks(Vec2::new(400.0, 400.0), true);
        scene.apply_all(&world.drain_events()).expect("load");
        assert!(scene.node_count() > village_nodes);

        world.update_chunks(Vec2::new(0.0, 0.0), false);
        scene.apply_all(&world.drain_events()).expect("evict");

        // Every chunk around the village is new; count only what survived
        // from the far region: nothing.
        let ground_chunks = scene.count_kind(PlacementKind::Ground);
        assert_eq!(ground_chunks, 25);
        assert_eq!(scene.owned_material_count(), village_owned);
        for (_, node) in scene.nodes() {
            let p = node.placement.position;
            assert!(
                p.x < 300.0 && p.z < 300.0,
                "far-region node survived eviction at {p:?}"
            );
        }
    }
}
