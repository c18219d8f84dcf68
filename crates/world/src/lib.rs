//! World core: chunk streaming, deterministic scatter, collision, entities.
//!
//! # Invariants
//! - Chunk content is a pure function of chunk coordinates; evict/reload
//!   cycles reproduce identical content.
//! - Everything a chunk owns is tagged with its coordinate and removed by
//!   cascade on eviction; permanent content carries no tag.
//! - External collaborators mutate world state only through the narrow entry
//!   points on [`World`]; every mutation reports a `changed` flag.

mod catalog;
mod chunk;
mod config;
mod interior;
mod obstacle;
mod placement;
mod procgen;
mod rng;
mod world;

pub use catalog::{
    EntityCatalog, HERB_RANGE, HOUSE_DOOR_RANGE, Herb, HerbOutcome, House, LANTERN_RANGE, Lantern,
    LanternOutcome, MARKER_RANGE, Marker, MarkerOutcome,
};
pub use chunk::{ChunkCoord, ChunkDelta, ChunkManager};
pub use config::WorldConfig;
pub use interior::{INTERIOR_ORIGIN, Interior, InteriorInteractable, InteriorOutcome};
pub use obstacle::{Obstacle, ObstacleRegistry};
pub use placement::PlacementStore;
pub use procgen::{ChunkPlan, PlannedHouse, PlannedScenery, SceneryKind};
pub use rng::{ChunkRng, chunk_seed};
pub use world::{InteractionTarget, PortalOutcome, World, WorldEvent};

pub fn crate_info() -> &'static str {
    "emberglade-world v0.1.0"
}
