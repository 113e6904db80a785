//! Static hand gesture classification from 2D hand landmarks.
//!
//! A hand's 21 landmarks are turned into a scale-invariant [`Descriptor`],
//! matched against a [`TemplateLibrary`] of named gestures, and a
//! [`GestureSession`] runs that over a buffered window of frames to reach one
//! verdict per window.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod hand_landmarks;
pub mod logging;
pub mod matcher;
pub mod overlay;
pub mod session;
pub mod templates;
pub mod window;

pub use config::GestureConfig;
pub use descriptor::Descriptor;
pub use error::{GestureError, Result};
pub use hand_landmarks::{Hand, HandLandmarks, HandLandmarksModel};
pub use matcher::{GestureMatch, GestureMatcher, UNKNOWN_GESTURE};
pub use session::{GestureSession, SessionResult, SessionState, Verdict};
pub use templates::{Template, TemplateLibrary};
