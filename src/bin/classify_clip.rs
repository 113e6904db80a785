use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{info, warn};

use handgesture::config::GestureConfig;
use handgesture::hand_landmarks::model_mediapipe::MediapipeHandLandmarksModel;
use handgesture::hand_landmarks::HandLandmarksModel;
use handgesture::logging::init_tracing;
use handgesture::overlay::{draw_hand, HAND_COLOR};
use handgesture::session::GestureSession;
use handgesture::templates::TemplateLibrary;

/// Classifies a recorded clip (a directory of frames, in file-name order).
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the clip's frames
    frames: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Template store, overrides the configured one
    #[arg(short, long)]
    templates: Option<PathBuf>,

    /// Landmark model, overrides the configured one
    #[arg(short, long)]
    model: Option<PathBuf>,

    /// Write every frame with its detected hand drawn into this directory
    #[arg(long)]
    annotate: Option<PathBuf>,
}

fn frame_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("could not list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn annotate<M: HandLandmarksModel>(
    model: &M,
    frame: &DynamicImage,
    config: &GestureConfig,
    out: &Path,
) -> Result<()> {
    let (width, height) = (config.frame_width, config.frame_height);
    let frame = frame.resize_exact(width, height, FilterType::Triangle);
    let mut canvas = frame.to_rgb8();

    if let Some(first) = model.run(&frame)?.first() {
        draw_hand(&mut canvas, &first.to_pixels(width, height)?, HAND_COLOR);
    }

    canvas.save(out)?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = GestureConfig::load_or_default(args.config.as_deref())?;
    if let Some(templates) = args.templates {
        config.template_path = templates;
    }
    if let Some(model) = args.model {
        config.model.path = model;
    }
    init_tracing(&config.log_level);

    let library = TemplateLibrary::load(&config.template_path)?;
    let model = MediapipeHandLandmarksModel::new(&config.model)?;
    let mut session = GestureSession::new(model, Arc::new(library), &config)?;

    if let Some(dir) = &args.annotate {
        fs::create_dir_all(dir)?;
    }

    let paths = frame_paths(&args.frames)?;
    info!(frames = paths.len(), "classifying clip");

    for path in &paths {
        let frame = match image::open(path) {
            Ok(frame) => frame,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable frame");
                continue;
            }
        };

        if let (Some(dir), Some(name)) = (&args.annotate, path.file_name()) {
            let out = dir.join(name).with_extension("png");
            if let Err(e) = annotate(session.model(), &frame, &config, &out) {
                warn!(path = %path.display(), error = %e, "could not annotate frame");
            }
        }

        if let Some(result) = session.push_frame(frame) {
            println!("gestures: {}", result.gestures().join(", "));
            println!("verdict: {}", result.verdict());
            return Ok(());
        }
    }

    bail!(
        "clip has {} readable frames, a window needs {}",
        session.buffered(),
        config.clip_size + 1
    )
}
