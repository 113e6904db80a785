use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_cross_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::hand_landmarks::{Hand, HAND_CONNECTIONS};

pub const HAND_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Draws the skeleton, a cross at every landmark and the bounding box.
///
/// `hand` must be in pixels of `image`.
pub fn draw_hand(image: &mut RgbImage, hand: &Hand, color: Rgb<u8>) {
    for &(a, b) in HAND_CONNECTIONS.iter() {
        let p = hand.point(a);
        let q = hand.point(b);
        draw_line_segment_mut(image, (p.x as f32, p.y as f32), (q.x as f32, q.y as f32), color);
    }

    for p in hand.points().iter() {
        draw_cross_mut(image, color, p.x as i32, p.y as i32);
    }

    let (x, y, w, h) = hand.bbox();
    // Rect panics on zero size
    if w >= 1.0 && h >= 1.0 {
        draw_hollow_rect_mut(
            image,
            Rect::at(x as i32, y as i32).of_size(w as u32, h as u32),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand_landmarks::NUM_LANDMARKS;
    use nalgebra::Point2;

    #[test]
    fn test_draws_on_landmarks() {
        let mut points = [Point2::new(10.0, 10.0); NUM_LANDMARKS];
        points[9] = Point2::new(30.0, 10.0);
        points[20] = Point2::new(20.0, 40.0);
        let hand = Hand::new(points);

        let mut image = RgbImage::new(64, 64);
        draw_hand(&mut image, &hand, HAND_COLOR);

        assert_eq!(*image.get_pixel(30, 10), HAND_COLOR);
        assert_eq!(*image.get_pixel(20, 40), HAND_COLOR);
        assert_eq!(*image.get_pixel(60, 60), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_collapsed_hand_does_not_panic() {
        let hand = Hand::new([Point2::new(5.0, 5.0); NUM_LANDMARKS]);
        let mut image = RgbImage::new(16, 16);
        draw_hand(&mut image, &hand, HAND_COLOR);

        assert_eq!(*image.get_pixel(5, 5), HAND_COLOR);
    }
}
