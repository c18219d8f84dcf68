use std::collections::BTreeMap;

use emberglade_common::{EntityId, Placement};

use crate::chunk::ChunkCoord;

/// Semantic placements the rendering collaborator builds drawables from,
/// tagged with their owning chunk for bulk removal.
#[derive(Debug, Default)]
pub struct PlacementStore {
    entries: BTreeMap<EntityId, (Placement, Option<ChunkCoord>)>,
}

impl PlacementStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: EntityId, placement: Placement, owner: Option<ChunkCoord>) {
        self.entries.insert(id, (placement, owner));
    }

    pub fn get(&self, id: EntityId) -> Option<&Placement> {
        self.entries.get(&id).map(|(p, _)| p)
    }

    pub fn owner(&self, id: EntityId) -> Option<ChunkCoord> {
        self.entries.get(&id).and_then(|(_, owner)| *owner)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic (id-ordered) iteration over all placements.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Placement, Option<ChunkCoord>)> {
        self.entries
            .iter()
            .map(|(id, (placement, owner))| (*id, placement, *owner))
    }

    /// Remove every placement owned by `owner`; returns the removed ids in
    /// id order.
    pub fn remove_chunk(&mut self, owner: ChunkCoord) -> Vec<EntityId> {
        let ids: Vec<EntityId> = self
            .entries
            .iter()
            .filter(|(_, (_, o))| *o == Some(owner))
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            self.entries.remove(id);
        }
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberglade_common::PlacementKind;

    #[test]
    fn insert_and_get() {
        let mut store = PlacementStore::new();
        let id = EntityId::new();
        store.insert(id, Placement::at(PlacementKind::Tree, 1.0, 2.0), None);
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some_and(|p| p.kind == PlacementKind::Tree));
        assert_eq!(store.owner(id), None);
    }

    #[test]
    fn remove_chunk_removes_only_tagged() {
        let mut store = PlacementStore::new();
        let chunk = ChunkCoord::new(1, 1);
        let tagged = EntityId::new();
        let permanent = EntityId::new();
        store.insert(
            tagged,
            Placement::at(PlacementKind::Rock, 0.0, 0.0),
            Some(chunk),
        );
        store.insert(permanent, Placement::at(PlacementKind::Well, 5.0, 5.0), None);

        let removed = store.remove_chunk(chunk);
        assert_eq!(removed, vec![tagged]);
        assert_eq!(store.len(), 1);
        assert!(store.get(permanent).is_some());
    }
}
