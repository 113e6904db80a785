use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use nng::{Protocol, Socket};
use tracing::{info, warn};

use handgesture::config::GestureConfig;
use handgesture::hand_landmarks::model_mediapipe::MediapipeHandLandmarksModel;
use handgesture::hand_landmarks::HandLandmarksModel;
use handgesture::logging::init_tracing;
use handgesture::session::{GestureSession, SessionState};
use handgesture::templates::TemplateLibrary;

/// Gesture recognition node: takes commands and frames over nng, replies with verdicts.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the configured listen address
    #[arg(short, long)]
    address: Option<String>,
}

#[derive(Debug, PartialEq)]
enum Command {
    Start,
    Stop,
    Status,
    Frame(PathBuf),
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.trim().splitn(2, ' ');
        match (parts.next(), parts.next().map(str::trim)) {
            (Some("start"), None) => Ok(Command::Start),
            (Some("stop"), None) => Ok(Command::Stop),
            (Some("status"), None) => Ok(Command::Status),
            (Some("frame"), Some(path)) if !path.is_empty() => Ok(Command::Frame(path.into())),
            _ => Err(format!("unknown command '{}'", s.trim())),
        }
    }
}

fn handle_command<M: HandLandmarksModel>(
    session: &mut GestureSession<M>,
    command: Command,
) -> String {
    match command {
        Command::Start => {
            session.start();
            "ok started".to_string()
        }
        Command::Stop => {
            session.stop();
            "ok stopped".to_string()
        }
        Command::Status => format!("ok {:?} {}", session.state(), session.buffered()),
        Command::Frame(path) => {
            if session.state() != SessionState::Collecting {
                return format!("ignored {:?}", session.state());
            }

            // a bad frame never ends the session
            let frame = match image::open(&path) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not read frame");
                    return format!("error {}", e);
                }
            };

            match session.push_frame(frame) {
                Some(result) => format!(
                    "verdict {}; gestures {}",
                    result.verdict(),
                    result.gestures().join(",")
                ),
                None => format!("ok buffered {}", session.buffered()),
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = GestureConfig::load_or_default(args.config.as_deref())
        .context("could not load configuration")?;
    init_tracing(&config.log_level);

    let library = TemplateLibrary::load(&config.template_path).with_context(|| {
        format!(
            "could not load templates from {}",
            config.template_path.display()
        )
    })?;
    let model = MediapipeHandLandmarksModel::new(&config.model)
        .with_context(|| format!("could not load model {}", config.model.path.display()))?;

    let mut session = GestureSession::new(model, Arc::new(library), &config)?;
    // idle until the first start command
    session.stop();

    let address = args.address.unwrap_or_else(|| config.node.address.clone());
    let socket = Socket::new(Protocol::Rep0)?;
    socket.listen(&address)?;

    info!(%address, "gesture node listening");

    loop {
        let msg = socket.recv()?;

        let command = std::str::from_utf8(&msg)
            .map_err(|e| e.to_string())
            .and_then(Command::from_str);

        let reply = match command {
            Ok(command) => handle_command(&mut session, command),
            Err(e) => {
                warn!(error = %e, "rejected request");
                format!("error {}", e)
            }
        };

        socket.send(reply.as_bytes()).map_err(|(_, e)| e)?;
    }
}
