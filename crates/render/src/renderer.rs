use glam::Vec3;

use emberglade_common::PlacementKind;
use emberglade_world::World;

use crate::scene::SceneGraph;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 10.0, 10.0),
            target: Vec3::ZERO,
            fov_degrees: 60.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the derived scene and world queries, then produces
/// output. It never mutates world truth.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene, world state, and view.
    fn render(&self, scene: &SceneGraph, world: &World, view: &RenderView) -> Self::Output;
}

/// Debug text renderer — workaround for a GPU backend.
///
/// Produces a human-readable summary of the scene and quest state. Useful
/// for CLI output, logging, and testing the render interface.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

const SUMMARY_KINDS: [PlacementKind; 7] = [
    PlacementKind::Ground,
    PlacementKind::Tree,
    PlacementKind::Bush,
    PlacementKind::Rock,
    PlacementKind::House,
    PlacementKind::Lantern,
    PlacementKind::Herb,
];

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, world: &World, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene ({} nodes, {} owned materials) ===\n",
            scene.node_count(),
            scene.owned_material_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        for kind in SUMMARY_KINDS {
            let count = scene.count_kind(kind);
            if count > 0 {
                out.push_str(&format!("  {kind:?}: {count}\n"));
            }
        }
        out.push_str(&format!(
            "Quests: lanterns {}/{}, herbs {}/{}, marker {}\n",
            world.lantern_progress(),
            world.lantern_goal(),
            world.herb_progress(),
            world.herb_goal(),
            if world.marker_inspected() {
                "inspected"
            } else {
                "unread"
            }
        ));
        out.push_str(&format!(
            "Chunks loaded: {}, inside house: {}\n",
            world.chunks().loaded().len(),
            world.is_inside_house()
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_renderer_summarizes_the_village() {
        let mut world = World::default();
        let mut scene = SceneGraph::new();
        scene.apply_all(&world.drain_events()).expect("village");

        let output = DebugTextRenderer::new().render(&scene, &world, &RenderView::default());
        assert!(output.contains("House: 4"));
        assert!(output.contains("Lantern: 3"));
        assert!(output.contains("lanterns 0/3"));
        assert!(output.contains("herbs 0/5"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 60.0);
        assert_eq!(view.target, Vec3::ZERO);
    }
}
