//! Shared vocabulary types for the emberglade world.
//!
//! # Invariants
//! - `EntityId` is the single identity currency: a catalog entry and its
//!   drawable placement share one id.
//! - `PlacementKind` is a closed enum; the rendering boundary matches it
//!   exhaustively.

mod types;

pub use types::{EntityId, Placement, PlacementKind};

pub fn crate_info() -> &'static str {
    "emberglade-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
