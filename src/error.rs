use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GestureError {
    #[error("a hand needs exactly {expected} landmarks, got {actual}")]
    InvalidHand { expected: usize, actual: usize },

    /// Wrist and middle-finger base coincide, so the palm size is zero.
    #[error("degenerate hand: palm reference distance is {0}")]
    DegenerateHand(f64),

    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("template library {0} contains no templates")]
    EmptyLibrary(String),

    #[error("template store {path}: {reason}")]
    TemplateStore { path: PathBuf, reason: String },

    #[error("template '{name}' is malformed: {reason}")]
    InvalidTemplate { name: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("could not parse configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("landmark model failed: {0}")]
    Model(#[from] ort::OrtError),

    #[error("tensor shape mismatch: {0}")]
    Tensor(#[from] ndarray::ShapeError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GestureError>;
