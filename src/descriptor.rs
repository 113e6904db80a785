use ndarray::Array2;

use crate::error::{GestureError, Result};
use crate::hand_landmarks::{landmarks, Hand, NUM_LANDMARKS};

/// Scale-invariant shape of a hand.
///
/// Entry (i, j) is the distance between landmarks i and j divided by the
/// palm size, the distance from the wrist to the middle-finger base.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    matrix: Array2<f64>,
}

impl Descriptor {
    pub fn from_hand(hand: &Hand) -> Result<Descriptor> {
        let palm_size = hand.distance(landmarks::WRIST, landmarks::MIDDLE_FINGER_MCP);
        if palm_size == 0.0 || !palm_size.is_finite() {
            return Err(GestureError::DegenerateHand(palm_size));
        }

        let mut matrix = Array2::zeros((NUM_LANDMARKS, NUM_LANDMARKS));
        for row in 0..NUM_LANDMARKS {
            for column in row + 1..NUM_LANDMARKS {
                let d = hand.distance(row, column) / palm_size;
                matrix[[row, column]] = d;
                matrix[[column, row]] = d;
            }
        }

        Ok(Descriptor { matrix })
    }

    /// Wraps a precomputed matrix, e.g. one read from a template store.
    pub fn from_matrix(matrix: Array2<f64>) -> Result<Descriptor> {
        if matrix.dim() != (NUM_LANDMARKS, NUM_LANDMARKS) {
            return Err(GestureError::InvalidDescriptor(format!(
                "expected a {n}x{n} matrix, got {:?}",
                matrix.shape(),
                n = NUM_LANDMARKS
            )));
        }

        if let Some(bad) = matrix.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(GestureError::InvalidDescriptor(format!(
                "entries must be finite and non-negative, found {}",
                bad
            )));
        }

        Ok(Descriptor { matrix })
    }

    #[inline]
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.matrix[[row, column]]
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.matrix
    }
}
