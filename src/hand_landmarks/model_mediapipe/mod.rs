use std::sync::Arc;

use image::DynamicImage;
use ndarray::{Array, CowArray};
use ort::tensor::OrtOwnedTensor;
use ort::{Environment, ExecutionProvider, Session, SessionBuilder, Value};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::hand_landmarks::{HandLandmarks, HandLandmarksModel, NUM_LANDMARKS};

/// x, y, z per landmark
const LANDMARK_STRIDE: usize = 3;

/// MediaPipe hand landmark network exported to ONNX.
///
/// The network sees the whole frame and reports a single hand together with a
/// presence logit. Landmarks come back in pixels of the square network input.
pub struct MediapipeHandLandmarksModel {
    _enviroment: Arc<Environment>,
    session: Session,
    input_size: u32,
    presence_threshold: f32,
}

impl MediapipeHandLandmarksModel {
    pub fn new(config: &ModelConfig) -> Result<MediapipeHandLandmarksModel> {
        let enviroment = Environment::builder()
            .with_name("hand_landmarks")
            .with_execution_providers([ExecutionProvider::CPU(Default::default())])
            .build()?
            .into_arc();

        let session = SessionBuilder::new(&enviroment)?
            .with_intra_threads(config.intra_threads)?
            .with_model_from_file(&config.path)?;

        info!(model = %config.path.display(), "loaded hand landmark model");

        Ok(MediapipeHandLandmarksModel {
            _enviroment: enviroment,
            session,
            input_size: config.input_size,
            presence_threshold: config.presence_threshold,
        })
    }
}

impl HandLandmarksModel for MediapipeHandLandmarksModel {
    fn run(&self, image: &DynamicImage) -> Result<Vec<HandLandmarks>> {
        let size = self.input_size;

        // resize to network input, convert to RGB
        let input = image
            .resize_exact(size, size, image::imageops::FilterType::Triangle)
            .to_rgb8();

        let input_: Vec<f32> = input
            .pixels()
            .flat_map(|p| p.0)
            .map(|p| p as f32 / 255.0)
            .collect();

        let array: CowArray<_, _> =
            Array::from_shape_vec((1, size as usize, size as usize, 3), input_)?
                .into_dyn()
                .into();

        let inputs = vec![Value::from_array(self.session.allocator(), &array)?];
        let outputs: Vec<Value> = self.session.run(inputs)?;

        let presence: OrtOwnedTensor<f32, _> = outputs[1].try_extract()?;
        let presence = presence
            .view()
            .iter()
            .next()
            .copied()
            .map(sigmoid)
            .unwrap_or(0.0);

        if presence < self.presence_threshold {
            debug!(presence, "no hand in frame");
            return Ok(Vec::new());
        }

        let res: OrtOwnedTensor<f32, _> = outputs[0].try_extract()?;
        let res: Vec<f32> = res.view().iter().map(|p| p / size as f32).collect();

        let hand = HandLandmarks::from_vec(&res, LANDMARK_STRIDE, presence);
        if hand.points.len() != NUM_LANDMARKS {
            debug!(count = hand.points.len(), "unexpected landmark count, dropping hand");
            return Ok(Vec::new());
        }

        Ok(vec![hand])
    }
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
