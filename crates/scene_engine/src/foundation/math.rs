//! Math utilities and types
//!
//! Provides the 2D math types used by bodies, the camera and the graphic driver.

use std::cmp::Ordering;

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Total ordering over 2D vectors, x first then y.
///
/// Uses `f32::total_cmp` so the result is usable as a sort key even for
/// NaN components. `-0.0` and `0.0` compare equal, as they do under `==`.
pub fn total_cmp_vec2(a: &Vec2, b: &Vec2) -> Ordering {
    total_cmp_f32(a.x, b.x).then_with(|| total_cmp_f32(a.y, b.y))
}

fn total_cmp_f32(a: f32, b: f32) -> Ordering {
    // Adding zero maps -0.0 to 0.0 and leaves every other value unchanged
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Parallax offset applied to a camera-space layer.
///
/// A scroll factor of 1 follows the camera fully (no extra translation);
/// a factor of 0 stays glued to the screen.
pub fn parallax_offset(scroll_factor: &Vec2, camera_position: &Vec2) -> Vec2 {
    Vec2::new(
        -(1.0 - scroll_factor.x) * camera_position.x,
        -(1.0 - scroll_factor.y) * camera_position.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_cmp_orders_x_before_y() {
        let a = Vec2::new(0.5, 1.0);
        let b = Vec2::new(1.0, 0.0);
        assert_eq!(total_cmp_vec2(&a, &b), Ordering::Less);
        assert_eq!(total_cmp_vec2(&b, &a), Ordering::Greater);
        assert_eq!(total_cmp_vec2(&a, &a), Ordering::Equal);

        let c = Vec2::new(0.5, 0.25);
        assert_eq!(total_cmp_vec2(&c, &a), Ordering::Less);
    }

    #[test]
    fn test_total_cmp_treats_signed_zero_as_equal() {
        let positive = Vec2::new(0.0, 0.0);
        let negative = Vec2::new(-0.0, -0.0);
        assert_eq!(total_cmp_vec2(&positive, &negative), Ordering::Equal);
        assert_eq!(positive, negative);

        let nan = Vec2::new(f32::NAN, 0.0);
        assert_eq!(total_cmp_vec2(&nan, &nan), Ordering::Equal);
    }

    #[test]
    fn test_parallax_offset() {
        let camera = Vec2::new(100.0, -40.0);

        let full = parallax_offset(&Vec2::new(1.0, 1.0), &camera);
        assert_relative_eq!(full, Vec2::zeros());

        let half = parallax_offset(&Vec2::new(0.5, 0.5), &camera);
        assert_relative_eq!(half, Vec2::new(-50.0, 20.0));

        let fixed = parallax_offset(&Vec2::zeros(), &camera);
        assert_relative_eq!(fixed, Vec2::new(-100.0, 40.0));
    }
}
