use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{GestureError, Result};
use crate::hand_landmarks::{landmarks, NUM_LANDMARKS};

/// Fingertips, finger bases, the wrist and the palm reference.
pub const DEFAULT_KEY_POINTS: [usize; 10] = [
    landmarks::WRIST,
    landmarks::THUMB_TIP,
    landmarks::INDEX_FINGER_MCP,
    landmarks::MIDDLE_FINGER_MCP,
    landmarks::RING_FINGER_MCP,
    landmarks::PINKY_MCP,
    landmarks::INDEX_FINGER_TIP,
    landmarks::MIDDLE_FINGER_TIP,
    landmarks::RING_FINGER_TIP,
    landmarks::PINKY_TIP,
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Summed key-point error below which a template is accepted.
    pub tolerance: f64,
    pub key_points: Vec<usize>,
    /// Frames buffered before a classification pass.
    pub clip_size: usize,
    /// Classified frames after which a pass stops early.
    pub max_gestures: usize,
    pub frame_width: u32,
    pub frame_height: u32,
    pub template_path: PathBuf,
    pub log_level: String,
    pub model: ModelConfig,
    pub node: NodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Side length of the square network input.
    pub input_size: u32,
    pub presence_threshold: f32,
    pub intra_threads: i16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub address: String,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            tolerance: 20.0,
            key_points: DEFAULT_KEY_POINTS.to_vec(),
            clip_size: 150,
            max_gestures: 10,
            frame_width: 1280,
            frame_height: 720,
            template_path: PathBuf::from("default.npz"),
            log_level: "info".to_string(),
            model: ModelConfig::default(),
            node: NodeConfig::default(),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/hand_landmark.onnx"),
            input_size: 224,
            presence_threshold: 0.5,
            intra_threads: 1,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            address: "tcp://127.0.0.1:54321".to_string(),
        }
    }
}

impl GestureConfig {
    /// Reads a JSON config. Missing fields take their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config: GestureConfig = serde_json::from_str(&content)?;
        config.validate()?;

        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Loads `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GestureError::Config(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }

        if self.key_points.is_empty() {
            return Err(GestureError::Config("key_points must not be empty".into()));
        }

        if let Some(&bad) = self.key_points.iter().find(|&&i| i >= NUM_LANDMARKS) {
            return Err(GestureError::Config(format!(
                "key point {} is out of range (hands have {} landmarks)",
                bad, NUM_LANDMARKS
            )));
        }

        if self.clip_size == 0 {
            return Err(GestureError::Config("clip_size must be at least 1".into()));
        }

        if self.max_gestures == 0 {
            return Err(GestureError::Config("max_gestures must be at least 1".into()));
        }

        if self.frame_width == 0 || self.frame_height == 0 {
            return Err(GestureError::Config(format!(
                "frame size {}x{} is empty",
                self.frame_width, self.frame_height
            )));
        }

        if self.model.input_size == 0 {
            return Err(GestureError::Config("model.input_size must be at least 1".into()));
        }

        Ok(())
    }
}
