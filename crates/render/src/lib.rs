//! Rendering Adapter: renderer-agnostic scene derived from world events.
//!
//! # Invariants
//! - The renderer never mutates world truth; the scene graph is rebuilt
//!   purely from drained world events.
//! - A shared default material is never released by a single chunk's
//!   eviction; owned (disposable) materials are released with their node.
//!
//! # Workaround
//! The scene graph and debug text renderer stand in for a GPU backend. The
//! `Renderer` trait is stable; swap in a GPU implementation without changing
//! consumers.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{MaterialId, MaterialRef, SceneError, SceneGraph, SceneNode};

pub fn crate_info() -> &'static str {
    "emberglade-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
