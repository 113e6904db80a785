use std::fmt;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use crate::config::GestureConfig;
use crate::descriptor::Descriptor;
use crate::error::{GestureError, Result};
use crate::hand_landmarks::HandLandmarksModel;
use crate::matcher::GestureMatcher;
use crate::templates::TemplateLibrary;
use crate::window::FrameWindow;

/// Frames at the front of the window (after eviction) that a pass skips.
pub const SKIPPED_LEADING_FRAMES: usize = 1;

pub const NO_GESTURE_DETECTED: &str = "no gesture detected";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Buffering frames until the window overflows.
    Collecting,
    /// Running the classification pass over the buffered frames.
    Classifying,
    /// A verdict has been produced; frames are ignored until `start`.
    Done,
    /// Collection halted from outside; frames are ignored until `start`.
    Stopped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Gesture(String),
    NoDetection,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Gesture(name) => f.write_str(name),
            Verdict::NoDetection => f.write_str(NO_GESTURE_DETECTED),
        }
    }
}

/// Gesture names collected during one pass, in frame order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionResult {
    gestures: Vec<String>,
}

impl SessionResult {
    pub fn from_gestures(gestures: Vec<String>) -> SessionResult {
        SessionResult { gestures }
    }

    pub fn gestures(&self) -> &[String] {
        &self.gestures
    }

    pub fn any_detection(&self) -> bool {
        !self.gestures.is_empty()
    }

    /// The first collected gesture. Later entries never override it.
    pub fn verdict(&self) -> Verdict {
        match self.gestures.first() {
            Some(name) => Verdict::Gesture(name.clone()),
            None => Verdict::NoDetection,
        }
    }

    pub fn into_gestures(self) -> Vec<String> {
        self.gestures
    }
}

/// One collect-then-classify cycle over a window of frames.
pub struct GestureSession<M> {
    model: M,
    library: Arc<TemplateLibrary>,
    matcher: GestureMatcher,
    frame_width: u32,
    frame_height: u32,
    max_gestures: usize,
    window: FrameWindow<DynamicImage>,
    state: SessionState,
}

impl<M: HandLandmarksModel> GestureSession<M> {
    /// Creates a session that is already collecting.
    pub fn new(
        model: M,
        library: Arc<TemplateLibrary>,
        config: &GestureConfig,
    ) -> Result<GestureSession<M>> {
        config.validate()?;

        Ok(GestureSession {
            model,
            library,
            matcher: GestureMatcher::from_config(config)?,
            frame_width: config.frame_width,
            frame_height: config.frame_height,
            max_gestures: config.max_gestures,
            window: FrameWindow::new(config.clip_size),
            state: SessionState::Collecting,
        })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffered(&self) -> usize {
        self.window.len()
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Begins a fresh collection, discarding any buffered frames.
    pub fn start(&mut self) {
        self.window.clear();
        self.state = SessionState::Collecting;
        info!(clip_size = self.window.capacity(), "gesture session started");
    }

    /// Halts collection. Buffered frames are dropped.
    pub fn stop(&mut self) {
        self.window.clear();
        self.state = SessionState::Stopped;
        info!("gesture session stopped");
    }

    /// Frame arrival. Returns the result once the window overflows and the
    /// classification pass has run; `None` while collecting or when the
    /// frame is ignored.
    pub fn push_frame(&mut self, frame: DynamicImage) -> Option<SessionResult> {
        if self.state != SessionState::Collecting {
            debug!(state = ?self.state, "ignoring frame");
            return None;
        }

        // overflow evicts the oldest frame and triggers the pass
        if self.window.push(frame).is_none() {
            return None;
        }

        info!(frames = self.window.len(), "window full, classifying");
        Some(self.classify())
    }

    fn classify(&mut self) -> SessionResult {
        self.state = SessionState::Classifying;

        let capacity = self.window.capacity();
        let window = std::mem::replace(&mut self.window, FrameWindow::new(capacity));
        let mut gestures = Vec::with_capacity(self.max_gestures);

        for (position, frame) in window.iter().enumerate().skip(SKIPPED_LEADING_FRAMES) {
            if gestures.len() >= self.max_gestures {
                debug!(position, "gesture cap reached");
                break;
            }

            match self.classify_frame(frame) {
                Ok(Some(name)) => gestures.push(name),
                Ok(None) => {}
                Err(GestureError::DegenerateHand(palm_size)) => {
                    debug!(position, palm_size, "degenerate hand, skipping frame");
                }
                Err(e) => {
                    warn!(position, error = %e, "could not classify frame");
                }
            }
        }

        let result = SessionResult::from_gestures(gestures);
        self.state = SessionState::Done;

        info!(
            gestures = ?result.gestures(),
            verdict = %result.verdict(),
            "gesture session done"
        );
        result
    }

    /// Raw best template name for the first hand in `frame`, if any.
    fn classify_frame(&self, frame: &DynamicImage) -> Result<Option<String>> {
        let (width, height) = (self.frame_width, self.frame_height);

        let resized;
        let frame = if frame.dimensions() == (width, height) {
            frame
        } else {
            resized = frame.resize_exact(width, height, FilterType::Triangle);
            &resized
        };

        let hands = self.model.run(frame)?;
        let Some(first) = hands.first() else {
            return Ok(None);
        };

        let hand = first.to_pixels(width, height)?;
        let descriptor = Descriptor::from_hand(&hand)?;
        let found = self.matcher.find_gesture(&descriptor, &self.library);

        debug!(
            label = found.label(),
            best = found.best_name(),
            error = found.error,
            "classified frame"
        );

        Ok(Some(found.best_name().to_string()))
    }
}
