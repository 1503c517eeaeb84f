use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use watchface_core::{is_dynamic, Catalog, Clock, FaceDescriptor, LocalClock, Sample, TimeSample};

mod manifest;
mod render;

#[derive(Parser)]
#[command(name = "watchface", about = "Watch face authoring and packaging CLI")]
struct Cli {
    /// Directory holding one sub-directory per face
    #[arg(long, env = "WATCHFACE_FACES_DIR", default_value = "faces", global = true)]
    faces_dir: PathBuf,

    /// Directory label fonts are resolved against
    #[arg(long, env = "WATCHFACE_FONTS_DIR", default_value = "fonts", global = true)]
    fonts_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List installed faces
    List,
    /// Validate a face descriptor and its assets
    Check {
        face: String,
    },
    /// Render a face once and print its labels
    Render {
        face: String,
        /// Time tuple: YYYY,MM,DD,hh,mm,ss[,weekday]
        #[arg(long)]
        time: Option<TimeSample>,
        /// Battery charge in percent
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        battery: Option<u8>,
        /// Write the background snapshot as PNG
        #[arg(long)]
        snapshot: Option<PathBuf>,
        #[arg(long, default_value_t = 240)]
        width: u32,
        #[arg(long, default_value_t = 240)]
        height: u32,
    },
    /// Write the faces.json package manifest
    Manifest {
        #[arg(long, default_value = "faces.json")]
        out: PathBuf,
        /// Also write preview and thumbnail images here
        #[arg(long)]
        previews: Option<PathBuf>,
        /// Reference time for previews
        #[arg(long, default_value = "2023,1,2,10,8,0")]
        time: TimeSample,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let catalog = Catalog::scan(&cli.faces_dir)?;

    match cli.command {
        Commands::List => {
            for name in catalog.names() {
                println!("{name}");
            }
        }
        Commands::Check { face } => {
            if !catalog.contains(&face) {
                bail!("no face named {face:?} in {}", catalog.root().display());
            }
            let face_dir = catalog.face_dir(&face);
            let descriptor = FaceDescriptor::parse_dir(&face_dir)
                .with_context(|| format!("face {face} is not renderable"))?;

            let dynamic = descriptor
                .labels
                .iter()
                .filter(|l| is_dynamic(&l.template))
                .count();
            println!(
                "{face}: version {}, {} label(s), {dynamic} dynamic",
                descriptor.version,
                descriptor.labels.len()
            );
            let mut missing = 0;
            if let Some(image) = descriptor.background.as_ref().and_then(|b| b.image.as_ref()) {
                missing += report_asset("background", &face_dir.join(image));
            }
            for font in descriptor.labels.iter().filter_map(|l| l.font.as_ref()) {
                missing += report_asset("font", &cli.fonts_dir.join(font));
            }
            if missing > 0 {
                println!("{missing} asset(s) missing; affected elements fall back to defaults");
            }
        }
        Commands::Render {
            face,
            time,
            battery,
            snapshot,
            width,
            height,
        } => {
            if !catalog.contains(&face) {
                bail!("no face named {face:?} in {}", catalog.root().display());
            }
            let sample = Sample {
                time: time.unwrap_or_else(|| LocalClock.now()),
                battery_percent: battery,
            };
            let rendered = render::render_face(
                &catalog.face_dir(&face),
                &cli.fonts_dir,
                &sample,
                (width, height),
            )?;

            for label in &rendered.labels {
                let (x, y) = rendered
                    .surface
                    .label_origin(label.handle)
                    .unwrap_or((label.spec.position.x, label.spec.position.y));
                println!(
                    "{:>4},{:<4} {:<13} {:?}",
                    x,
                    y,
                    format!("{:?}", label.spec.align),
                    label.value()
                );
            }
            if let Some(path) = snapshot {
                rendered
                    .snapshot()
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("snapshot: {}", path.display());
            }
        }
        Commands::Manifest { out, previews, time } => {
            let sample = Sample {
                time,
                battery_percent: Some(100),
            };
            let manifest =
                manifest::build_manifest(&catalog, &cli.fonts_dir, &sample, previews.as_deref())?;
            let json = serde_json::to_string_pretty(&manifest)?;
            std::fs::write(&out, json).with_context(|| format!("writing {}", out.display()))?;
            println!("{} face(s) written to {}", manifest.len(), out.display());
        }
    }

    Ok(())
}

/// Print an asset's status. Returns 1 when it is missing.
fn report_asset(kind: &str, path: &std::path::Path) -> usize {
    if path.is_file() {
        println!("  {kind}: {}", path.display());
        0
    } else {
        println!("  {kind}: {} (missing)", path.display());
        1
    }
}
