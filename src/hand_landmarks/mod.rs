pub mod model_mediapipe;

use image::DynamicImage;
use nalgebra::Point2;

use crate::error::{GestureError, Result};

/// Number of landmarks in a MediaPipe hand.
pub const NUM_LANDMARKS: usize = 21;

/// Hand landmark indices (MediaPipe hand landmark convention)
pub mod landmarks {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_MCP: usize = 5;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_DIP: usize = 7;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_PIP: usize = 10;
    pub const MIDDLE_FINGER_DIP: usize = 11;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_MCP: usize = 13;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_DIP: usize = 15;
    pub const RING_FINGER_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;
}

/// Pairs of landmarks joined by a bone, used for drawing.
pub const HAND_CONNECTIONS: [(usize, usize); 21] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 4),
    (0, 5),
    (5, 6),
    (6, 7),
    (7, 8),
    (5, 9),
    (9, 10),
    (10, 11),
    (11, 12),
    (9, 13),
    (13, 14),
    (14, 15),
    (15, 16),
    (13, 17),
    (17, 18),
    (18, 19),
    (19, 20),
    (0, 17),
];

/// One hand as reported by a landmark model, in fractions of the frame (0.0 to 1.0).
#[derive(Debug, Clone)]
pub struct HandLandmarks {
    pub points: Vec<Point2<f32>>,
    pub confidence: f32,
}

impl HandLandmarks {
    // construct from 1D vector of interleaved coordinates, `stride` values per landmark
    // (x and y come first, anything after them is ignored)
    pub fn from_vec(values: &[f32], stride: usize, confidence: f32) -> HandLandmarks {
        let stride = stride.max(2);
        let points = values
            .chunks_exact(stride)
            .map(|c| Point2::new(c[0], c[1]))
            .collect();

        HandLandmarks { points, confidence }
    }

    /// Converts to pixel coordinates of a `width` x `height` frame.
    ///
    /// Coordinates are truncated to whole pixels.
    pub fn to_pixels(&self, width: u32, height: u32) -> Result<Hand> {
        let points = self
            .points
            .iter()
            .map(|p| {
                Point2::new(
                    (p.x as f64 * width as f64).trunc(),
                    (p.y as f64 * height as f64).trunc(),
                )
            })
            .collect();

        Hand::from_points(points)
    }
}

/// A hand in pixel space: exactly [`NUM_LANDMARKS`] points in the fixed landmark order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    points: [Point2<f64>; NUM_LANDMARKS],
}

impl Hand {
    pub fn new(points: [Point2<f64>; NUM_LANDMARKS]) -> Hand {
        Hand { points }
    }

    pub fn from_points(points: Vec<Point2<f64>>) -> Result<Hand> {
        let actual = points.len();
        let points: [Point2<f64>; NUM_LANDMARKS] =
            points.try_into().map_err(|_| GestureError::InvalidHand {
                expected: NUM_LANDMARKS,
                actual,
            })?;

        Ok(Hand { points })
    }

    pub fn point(&self, index: usize) -> Point2<f64> {
        self.points[index]
    }

    pub fn points(&self) -> &[Point2<f64>; NUM_LANDMARKS] {
        &self.points
    }

    pub fn distance(&self, a: usize, b: usize) -> f64 {
        nalgebra::distance(&self.points[a], &self.points[b])
    }

    /// Axis-aligned bounding box as (x, y, width, height), in pixels.
    pub fn bbox(&self) -> (f64, f64, f64, f64) {
        let mut x_min = f64::MAX;
        let mut y_min = f64::MAX;
        let mut x_max = f64::MIN;
        let mut y_max = f64::MIN;

        for p in self.points.iter() {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }

        (x_min, y_min, x_max - x_min, y_max - y_min)
    }
}

/// Maps an image to the hands visible in it.
pub trait HandLandmarksModel {
    fn run(&self, image: &DynamicImage) -> Result<Vec<HandLandmarks>>;
}
