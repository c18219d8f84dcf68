use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use emberglade_render::{DebugTextRenderer, RenderView, Renderer, SceneGraph};
use emberglade_world::{
    ChunkCoord, ChunkPlan, InteriorInteractable, World, WorldConfig, WorldEvent,
};

#[derive(Parser)]
#[command(name = "emberglade-cli", about = "CLI tool for emberglade world demos")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate info
    Info,
    /// March an actor in a straight line and report streaming stats
    Walk {
        /// Number of movement steps
        #[arg(short, long, default_value = "100")]
        steps: u32,
        /// Distance per step
        #[arg(long, default_value = "8.0")]
        stride: f32,
        /// Step direction, x component
        #[arg(long, default_value = "1.0")]
        dx: f32,
        /// Step direction, z component
        #[arg(long, default_value = "0.0")]
        dz: f32,
    },
    /// Print the deterministic content plan of one chunk as JSON
    Dump {
        #[arg(long)]
        cx: i64,
        #[arg(long)]
        cz: i64,
    },
    /// Run the village quests end to end and print every transition
    Quest,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("emberglade-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", emberglade_common::crate_info());
            println!("world: {}", emberglade_world::crate_info());
            println!("render: {}", emberglade_render::crate_info());
        }
        Commands::Walk {
            steps,
            stride,
            dx,
            dz,
        } => walk(steps, stride, Vec2::new(dx, dz))?,
        Commands::Dump { cx, cz } => {
            let plan = ChunkPlan::generate(ChunkCoord::new(cx, cz), WorldConfig::default().chunk_size);
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Commands::Quest => quest()?,
    }

    Ok(())
}

fn walk(steps: u32, stride: f32, direction: Vec2) -> anyhow::Result<()> {
    let mut world = World::default();
    let mut scene = SceneGraph::new();
    let mut actor = Vec2::ZERO;
    let mut created = 0usize;
    let mut evicted = 0usize;

    world.update_chunks(actor, true);
    scene.apply_all(&world.drain_events())?;

    for _ in 0..steps {
        actor = world.resolve_actor(actor + direction * stride);
        let delta = world.update_chunks(actor, false);
        created += delta.created.len();
        evicted += delta.evicted.len();
        scene.apply_all(&world.drain_events())?;
    }

    println!(
        "Walked {steps} steps of {stride} units; ended at ({:.1}, {:.1})",
        actor.x, actor.y
    );
    println!("Chunks created: {created}, evicted: {evicted}");
    let view = RenderView::default();
    print!("{}", DebugTextRenderer::new().render(&scene, &world, &view));
    Ok(())
}

fn quest() -> anyhow::Result<()> {
    let mut world = World::default();
    let mut scene = SceneGraph::new();
    world.update_chunks(Vec2::ZERO, true);
    scene.apply_all(&world.drain_events())?;

    // Light the three village lanterns.
    for spot in [(14.0, 4.0), (16.0, 0.0), (14.0, -4.0)] {
        let actor = Vec2::from(spot);
        if let Some(id) = world.nearest_lantern(actor) {
            let outcome = world.light_lantern(id);
            println!(
                "lantern at {spot:?}: changed={} ({}/{})",
                outcome.changed, outcome.lit, outcome.goal
            );
        }
    }

    // Gather the herb patch.
    for spot in [
        (7.5, -9.5),
        (9.2, -10.8),
        (11.3, -9.2),
        (8.6, -12.2),
        (10.1, -12.8),
    ] {
        let actor = Vec2::from(spot);
        if let Some(id) = world.nearest_herb(actor) {
            let outcome = world.collect_herb(id);
            println!(
                "herb at {spot:?}: changed={} ({}/{})",
                outcome.changed, outcome.collected, outcome.goal
            );
        }
    }

    // Study the rune marker.
    let outcome = world.inspect_marker();
    println!("marker: changed={}", outcome.changed);

    // Step inside the nearest house, loot the chest, sleep, and leave.
    let at_door = Vec2::new(-8.0, -3.9);
    if let Some(door) = world.nearest_house_door(at_door) {
        let entered = world.enter_house(door, at_door);
        println!("enter house: changed={}", entered.changed);
        if let Some(spawn) = entered.teleport {
            let chest = world.interact_interior(InteriorInteractable::Chest);
            println!("chest: changed={} coins={}", chest.changed, chest.coins);
            let bed = world.interact_interior(InteriorInteractable::Bed);
            println!("bed: changed={} sleep={}", bed.changed, bed.advance_to_day);
            let exited = world.exit_house();
            println!(
                "exit house: changed={} back_at={:?}",
                exited.changed,
                exited.teleport.unwrap_or(spawn)
            );
        }
    }

    println!(
        "Quests complete: lanterns={} herbs={} marker={}",
        world.is_lantern_quest_complete(),
        world.is_herb_quest_complete(),
        world.marker_inspected()
    );

    println!("-- transition events --");
    for event in world.drain_events() {
        match event {
            WorldEvent::PlacementAdded { .. } | WorldEvent::PlacementRemoved { .. } => {}
            other => println!("  {other:?}"),
        }
    }
    Ok(())
}
