use anyhow::Context;
use clap::{Parser, Subcommand};
use cubeview_common::{ViewerConfig, Viewport};
use cubeview_input::{Action, PointerButton, PointerController, pick_mesh, pick_ray};
use cubeview_kernel::parse_moves;
use cubeview_mesh::{FaceColor, NUM_CUBIES};
use cubeview_render::{DebugTextRenderer, Renderer, Scene};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubeview-cli", about = "Headless tool for the cube puzzle core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML viewer config (camera, window size, controls)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, config and scene summary
    Info,
    /// Print mesh statistics
    Mesh {
        /// Emit the full mesh arrays as JSON
        #[arg(long)]
        json: bool,
    },
    /// Cast a pick ray through a pixel and report the face it hits
    Pick {
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
        /// Viewport width (defaults to the configured window width)
        #[arg(long)]
        width: Option<u32>,
        /// Viewport height (defaults to the configured window height)
        #[arg(long)]
        height: Option<u32>,
    },
    /// Apply a move sequence such as "R U R' U'" and print the result
    Turn {
        moves: String,
    },
    /// Orbit the puzzle by a pointer drag and print the orientation
    Orbit {
        #[arg(long, allow_hyphen_values = true)]
        dx: f32,
        #[arg(long, allow_hyphen_values = true)]
        dy: f32,
    },
}

#[derive(Serialize)]
struct MeshDump<'a> {
    vertices: &'a [f32],
    indices: &'a [u32],
    tags: &'a [f32],
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = ViewerConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let mut scene = Scene::from_config(&config).context("invalid camera configuration")?;

    match cli.command {
        Commands::Info => {
            println!("cubeview-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("{}", config_summary(&config));
            print!("{}", DebugTextRenderer::new().render(&scene));
        }
        Commands::Mesh { json } => {
            let mesh = &scene.mesh;
            if json {
                let dump = MeshDump {
                    vertices: mesh.vertices(),
                    indices: mesh.indices(),
                    tags: mesh.tags(),
                };
                println!("{}", serde_json::to_string(&dump)?);
            } else {
                let stickers = (0..NUM_CUBIES)
                    .flat_map(|c| cubeview_mesh::Face::ALL.map(|f| mesh.face_color(c, f)))
                    .filter(|c| *c != Some(FaceColor::Black))
                    .count();
                println!("cubies:    {NUM_CUBIES}");
                println!("vertices:  {}", mesh.vertex_count());
                println!("triangles: {}", mesh.triangle_count());
                println!("stickers:  {stickers}");
            }
        }
        Commands::Pick {
            x,
            y,
            width,
            height,
        } => {
            scene.resize(Viewport::new(
                width.unwrap_or(scene.viewport.width),
                height.unwrap_or(scene.viewport.height),
            ));
            let projection = scene.projection_matrix()?;
            let ray = pick_ray(&scene.camera, &projection, scene.viewport, x, y)?;
            println!("ray: {}", serde_json::to_string(&ray)?);
            match pick_mesh(&ray, &scene.mesh, &scene.puzzle) {
                Some(hit) => {
                    let color = scene.mesh.face_color(hit.cubie, hit.face);
                    println!("hit: {}", serde_json::to_string(&hit)?);
                    println!("cube {} face {:?} color {:?}", hit.cubie + 1, hit.face, color);
                }
                None => println!("miss"),
            }
        }
        Commands::Turn { moves } => {
            let turns = parse_moves(&moves)?;
            for turn in &turns {
                Action::TurnLayer(*turn).apply(&mut scene.puzzle)?;
            }
            let events = scene.puzzle.drain_events();
            tracing::debug!(events = events.len(), "applied moves");
            print!("{}", DebugTextRenderer::new().render(&scene));
            println!("solved: {}", scene.puzzle.is_home());
        }
        Commands::Orbit { dx, dy } => {
            let mut controller = PointerController::new(&config.controls);
            let cx = scene.viewport.width as f32 / 2.0;
            let cy = scene.viewport.height as f32 / 2.0;
            controller.on_cursor_moved(cx, cy, &scene);
            controller.on_pointer_button(PointerButton::Secondary, true, &scene);
            let action = controller.on_cursor_moved(cx + dx, cy + dy, &scene);
            if action == Action::Noop {
                tracing::warn!("zero drag, orientation unchanged");
            }
            action.apply(&mut scene.puzzle)?;
            let q = scene.puzzle.orientation();
            println!("orientation: {}", serde_json::to_string(&q)?);
            println!("model: {}", serde_json::to_string(&scene.puzzle.model_matrix())?);
        }
    }

    Ok(())
}

fn config_summary(config: &ViewerConfig) -> String {
    let cam = &config.camera;
    format!(
        "window {}x{}, camera at {:?} looking at {:?}, fovy {}",
        config.window.width, config.window.height, cam.position, cam.target, cam.fovy_degrees
    )
}
