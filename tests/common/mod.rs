#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Arc;

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use nalgebra::Point2;

use handgesture::config::GestureConfig;
use handgesture::descriptor::Descriptor;
use handgesture::error::Result;
use handgesture::hand_landmarks::{Hand, HandLandmarks, HandLandmarksModel};
use handgesture::templates::{Template, TemplateLibrary};

/// Test frames are square and already at working resolution.
pub const FRAME_SIZE: u32 = 256;

pub const OPEN_PALM: [(u32, u32); 21] = [
    (128, 240),
    (100, 220),
    (85, 195),
    (72, 172),
    (60, 150),
    (105, 160),
    (100, 120),
    (97, 95),
    (95, 70),
    (128, 155),
    (128, 110),
    (128, 82),
    (128, 55),
    (150, 160),
    (155, 120),
    (158, 95),
    (160, 72),
    (170, 170),
    (180, 140),
    (186, 120),
    (190, 100),
];

pub const FIST: [(u32, u32); 21] = [
    (128, 240),
    (102, 222),
    (92, 200),
    (100, 185),
    (115, 178),
    (105, 160),
    (102, 140),
    (108, 155),
    (110, 168),
    (128, 155),
    (128, 135),
    (130, 150),
    (130, 165),
    (150, 160),
    (152, 140),
    (150, 155),
    (148, 168),
    (170, 170),
    (172, 152),
    (168, 165),
    (165, 175),
];

pub fn hand(shape: &[(u32, u32); 21]) -> Hand {
    let points = shape
        .iter()
        .map(|&(x, y)| Point2::new(x as f64, y as f64))
        .collect();
    Hand::from_points(points).expect("21 points")
}

/// Detector output for `shape`, as fractions of a [`FRAME_SIZE`] frame.
pub fn detected(shape: &[(u32, u32); 21]) -> HandLandmarks {
    HandLandmarks {
        points: shape
            .iter()
            .map(|&(x, y)| Point2::new(x as f32 / FRAME_SIZE as f32, y as f32 / FRAME_SIZE as f32))
            .collect(),
        confidence: 0.9,
    }
}

pub fn descriptor(shape: &[(u32, u32); 21]) -> Descriptor {
    Descriptor::from_hand(&hand(shape)).expect("non-degenerate shape")
}

pub fn library() -> Arc<TemplateLibrary> {
    Arc::new(
        TemplateLibrary::new(vec![
            Template::new("fist", descriptor(&FIST)),
            Template::new("open_palm", descriptor(&OPEN_PALM)),
        ])
        .expect("non-empty"),
    )
}

/// Frame whose red channel carries its id.
pub fn frame(id: u8) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_pixel(FRAME_SIZE, FRAME_SIZE, Rgb([id, 0, 0])))
}

pub fn config(clip_size: usize) -> GestureConfig {
    GestureConfig {
        clip_size,
        frame_width: FRAME_SIZE,
        frame_height: FRAME_SIZE,
        ..GestureConfig::default()
    }
}

/// Landmark model driven by the id painted into each frame.
pub struct ScriptedModel<F> {
    script: F,
    seen: RefCell<Vec<u8>>,
}

impl<F> ScriptedModel<F>
where
    F: Fn(u8) -> Result<Vec<HandLandmarks>>,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            seen: RefCell::new(Vec::new()),
        }
    }

    /// Ids of the frames the model was run on, in order.
    pub fn seen(&self) -> Vec<u8> {
        self.seen.borrow().clone()
    }
}

impl<F> HandLandmarksModel for ScriptedModel<F>
where
    F: Fn(u8) -> Result<Vec<HandLandmarks>>,
{
    fn run(&self, image: &DynamicImage) -> Result<Vec<HandLandmarks>> {
        let id = image.get_pixel(0, 0).0[0];
        self.seen.borrow_mut().push(id);
        (self.script)(id)
    }
}
