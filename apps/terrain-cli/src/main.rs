use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use terrain_author::EditorSession;
use terrain_common::{CameraPreset, EditorConfig};
use terrain_render::{DebugTextRenderer, RenderView, Renderer, SceneGeometry};
use terrain_tools::MeshInspector;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "terrain-cli", about = "CLI tool for terrain mesh operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Editor configuration (JSON); defaults apply to missing fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the startup mesh.
#[derive(Args)]
struct MeshArgs {
    /// Cells along Z
    #[arg(long)]
    rows: Option<usize>,
    /// Cells along X
    #[arg(long)]
    cols: Option<usize>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    depth: Option<f64>,
    /// Snow-cap height
    #[arg(long)]
    snow: Option<f64>,
    /// RNG seed for reproducible meshes
    #[arg(short, long)]
    seed: Option<u64>,
}

impl MeshArgs {
    fn apply(&self, config: &mut EditorConfig) {
        if let Some(rows) = self.rows {
            config.mesh.rows = rows;
        }
        if let Some(cols) = self.cols {
            config.mesh.cols = cols;
        }
        if let Some(width) = self.width {
            config.mesh.width = width;
        }
        if let Some(depth) = self.depth {
            config.mesh.depth = depth;
        }
        if let Some(snow) = self.snow {
            config.mesh.snow_cap_height = snow;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and the effective configuration
    Info,
    /// Write the default configuration to a file
    InitConfig {
        path: PathBuf,
    },
    /// Build a mesh, refine it, and optionally export it
    Generate {
        #[command(flatten)]
        mesh: MeshArgs,
        /// Re-randomize all heights within this range before refining
        #[arg(long)]
        randomize: Option<f64>,
        /// Fractalize iterations
        #[arg(short, long, default_value = "0")]
        fractalize: u32,
        /// Smooth iterations (applied after fractalizing)
        #[arg(long, default_value = "0")]
        smooth: u32,
        /// OBJ output path; the MTL file is written next to it
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
        /// Print a text rendering of the scene
        #[arg(long)]
        render: bool,
    },
    /// Pick the vertex under a normalized screen point
    Pick {
        #[command(flatten)]
        mesh: MeshArgs,
        /// Camera preset: front, right, left, back, above
        #[arg(long, default_value = "front", value_parser = parse_preset)]
        preset: CameraPreset,
        /// Screen x in [0, 1], left to right
        #[arg(long, default_value = "0.5")]
        sx: f64,
        /// Screen y in [0, 1], bottom to top
        #[arg(long, default_value = "0.5")]
        sy: f64,
        /// Viewport width / height
        #[arg(long, default_value = "1.0")]
        aspect: f64,
        /// Flatten the mesh before picking
        #[arg(long)]
        flat: bool,
    },
}

fn parse_preset(s: &str) -> Result<CameraPreset, String> {
    CameraPreset::ALL
        .into_iter()
        .find(|p| p.label().eq_ignore_ascii_case(s))
        .ok_or_else(|| format!("unknown preset '{s}' (expected front, right, left, back or above)"))
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<EditorConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            Ok(EditorConfig::load(path)?)
        }
        None => Ok(EditorConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Info => {
            println!("terrain-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("  {}", terrain_math::crate_info());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::InitConfig { path } => {
            config.save(&path)?;
            println!("Wrote {}", path.display());
        }
        Commands::Generate {
            mesh,
            randomize,
            fractalize,
            smooth,
            output,
            json,
            render,
        } => {
            mesh.apply(&mut config);
            let mut session = EditorSession::new(config)?;
            if let Some(range) = randomize {
                session.randomize(range);
            }
            session.fractalize(fractalize);
            session.smooth(smooth);

            let summary = MeshInspector::summary(session.mesh());
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{summary}");
            }

            if render {
                let scene = SceneGeometry::build(session.mesh(), None, session.display_mode());
                let view = RenderView::from_camera(session.camera());
                print!("{}", DebugTextRenderer::new().render(&scene, &view));
            }

            if let Some(path) = output {
                let files = session.export(&path)?;
                println!("Exported {} and {}", files.obj.display(), files.mtl.display());
            }
        }
        Commands::Pick {
            mesh,
            preset,
            sx,
            sy,
            aspect,
            flat,
        } => {
            mesh.apply(&mut config);
            let mut session = EditorSession::new(config)?;
            if flat {
                session.flatten();
            }
            session.align_camera(preset)?;

            let eye = session.camera().eye();
            println!("Camera {}: eye={eye}", preset.label());
            match session.pick(sx, sy, aspect)? {
                Some(index) => match MeshInspector::inspect_point(session.mesh(), index) {
                    Some(info) => println!("Picked {info}"),
                    None => println!("Picked {index}"),
                },
                None => println!(
                    "No vertex within {} of the ray",
                    session.config().picking.selection_radius
                ),
            }
        }
    }

    Ok(())
}
