use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use image::imageops::FilterType;
use tracing::info;

use handgesture::config::GestureConfig;
use handgesture::descriptor::Descriptor;
use handgesture::hand_landmarks::model_mediapipe::MediapipeHandLandmarksModel;
use handgesture::hand_landmarks::HandLandmarksModel;
use handgesture::logging::init_tracing;
use handgesture::templates::{Template, TemplateLibrary};

/// Builds a template store from reference images, one gesture per image.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Where to write the template store (.npz)
    #[arg(short, long)]
    output: PathBuf,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// NAME=IMAGE pairs, stored in the order given
    #[arg(required = true)]
    entries: Vec<String>,
}

fn parse_entry(entry: &str) -> Result<(String, PathBuf)> {
    match entry.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => bail!("expected NAME=IMAGE, got '{}'", entry),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = GestureConfig::load_or_default(args.config.as_deref())?;
    init_tracing(&config.log_level);

    let model = MediapipeHandLandmarksModel::new(&config.model)?;
    let (width, height) = (config.frame_width, config.frame_height);

    let mut templates = Vec::with_capacity(args.entries.len());
    for entry in &args.entries {
        let (name, path) = parse_entry(entry)?;

        let frame = image::open(&path)
            .with_context(|| format!("could not read {}", path.display()))?
            .resize_exact(width, height, FilterType::Triangle);

        let hands = model.run(&frame)?;
        let first = hands
            .first()
            .ok_or_else(|| anyhow!("no hand found in {}", path.display()))?;

        let descriptor = Descriptor::from_hand(&first.to_pixels(width, height)?)
            .with_context(|| format!("unusable hand in {}", path.display()))?;

        info!(%name, path = %path.display(), "recorded template");
        templates.push(Template::new(name, descriptor));
    }

    TemplateLibrary::new(templates)?.save(&args.output)?;
    println!("wrote {} templates to {}", args.entries.len(), args.output.display());

    Ok(())
}
