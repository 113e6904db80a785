use crate::config::{GestureConfig, DEFAULT_KEY_POINTS};
use crate::descriptor::Descriptor;
use crate::error::{GestureError, Result};
use crate::hand_landmarks::NUM_LANDMARKS;
use crate::templates::{Template, TemplateLibrary};

/// Label given to shapes that match no template closely enough.
pub const UNKNOWN_GESTURE: &str = "Unknown";

/// Compares descriptors on a subset of landmarks and picks the closest template.
#[derive(Debug, Clone)]
pub struct GestureMatcher {
    key_points: Vec<usize>,
    tolerance: f64,
}

/// Outcome of matching one descriptor against a library.
#[derive(Debug, Clone, Copy)]
pub struct GestureMatch<'a> {
    /// Lowest-error template, whether or not it passed the tolerance.
    pub best: &'a Template,
    pub error: f64,
    pub accepted: bool,
}

impl GestureMatch<'_> {
    /// Name of the closest template, ignoring the tolerance.
    pub fn best_name(&self) -> &str {
        self.best.name()
    }

    /// Template name if accepted, [`UNKNOWN_GESTURE`] otherwise.
    pub fn label(&self) -> &str {
        if self.accepted {
            self.best.name()
        } else {
            UNKNOWN_GESTURE
        }
    }
}

impl Default for GestureMatcher {
    fn default() -> Self {
        Self {
            key_points: DEFAULT_KEY_POINTS.to_vec(),
            tolerance: 20.0,
        }
    }
}

impl GestureMatcher {
    pub fn new(key_points: Vec<usize>, tolerance: f64) -> Result<GestureMatcher> {
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(GestureError::Config(format!(
                "tolerance must be a positive number, got {}",
                tolerance
            )));
        }
        if key_points.is_empty() || key_points.iter().any(|&i| i >= NUM_LANDMARKS) {
            return Err(GestureError::Config(format!(
                "key points {:?} must be a non-empty set of landmark indices",
                key_points
            )));
        }

        Ok(GestureMatcher {
            key_points,
            tolerance,
        })
    }

    pub fn from_config(config: &GestureConfig) -> Result<GestureMatcher> {
        Self::new(config.key_points.clone(), config.tolerance)
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn key_points(&self) -> &[usize] {
        &self.key_points
    }

    /// Sum of absolute differences over every (row, column) pair of key points.
    pub fn error(&self, known: &Descriptor, unknown: &Descriptor) -> f64 {
        let mut error = 0.0;
        for &row in &self.key_points {
            for &column in &self.key_points {
                error += (known.get(row, column) - unknown.get(row, column)).abs();
            }
        }
        error
    }

    /// Scans the library in order; the first template with the strictly
    /// lowest error wins.
    pub fn find_gesture<'a>(
        &self,
        unknown: &Descriptor,
        library: &'a TemplateLibrary,
    ) -> GestureMatch<'a> {
        let (first, rest) = library
            .templates()
            .split_first()
            .expect("template libraries are never empty");

        let mut best = first;
        let mut best_error = self.error(first.descriptor(), unknown);

        for template in rest {
            let error = self.error(template.descriptor(), unknown);
            if error < best_error {
                best = template;
                best_error = error;
            }
        }

        GestureMatch {
            best,
            error: best_error,
            accepted: best_error < self.tolerance,
        }
    }
}
