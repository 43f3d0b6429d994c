//! # 2D Scene Camera
//!
//! Provides the base transform of a scene: position, rotation, zoom and the
//! clear colour handed to the graphic driver at the start of a frame.
//!
//! Camera-space bodies are drawn relative to the camera position, scaled by
//! their layer's scroll factor (see [`parallax_offset`](crate::foundation::math::parallax_offset)).
//! HUD bodies ignore the camera entirely.

use rand::Rng;

use crate::foundation::math::Vec2;
use crate::render::{Color, GraphicDriver};

/// Axes a camera shake moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShakeAxes {
    /// Horizontal and vertical
    #[default]
    Both,
    /// Horizontal only
    Horizontal,
    /// Vertical only
    Vertical,
}

impl ShakeAxes {
    fn horizontal(self) -> bool {
        matches!(self, Self::Both | Self::Horizontal)
    }

    fn vertical(self) -> bool {
        matches!(self, Self::Both | Self::Vertical)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Shake {
    intensity: f32,
    duration: f64,
    elapsed: f64,
    axes: ShakeAxes,
}

impl Shake {
    fn is_running(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Intensity decays linearly to zero over the duration
    fn current_intensity(&self) -> f32 {
        if self.elapsed <= 0.0 {
            self.intensity
        } else {
            #[allow(clippy::cast_possible_truncation)]
            let remaining = (1.0 - self.elapsed / self.duration) as f32;
            remaining * self.intensity
        }
    }
}

/// 2D camera
///
/// The camera position is its top-left corner in world units. Shake offsets
/// are fractions of the viewport size, so an intensity of `0.05` moves the
/// view by up to 5% of its width and height.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Top-left corner in world units
    pub position: Vec2,

    /// Rotation in degrees
    pub angle: f32,

    /// Zoom on each axis
    pub scaling: Vec2,

    /// Colour the frame is cleared to
    pub background_color: Color,

    /// Viewport size used to scale shake offsets
    pub viewport_size: Vec2,

    enabled: bool,
    active: bool,
    visible: bool,
    shake: Shake,
    offset: Vec2,
}

impl Camera {
    /// Camera at the origin with no rotation or zoom
    pub fn new() -> Self {
        Self {
            position: Vec2::zeros(),
            angle: 0.0,
            scaling: Vec2::new(1.0, 1.0),
            background_color: Color::BLACK,
            viewport_size: Vec2::new(1.0, 1.0),
            enabled: true,
            active: true,
            visible: true,
            shake: Shake::default(),
            offset: Vec2::zeros(),
        }
    }

    /// Builder-style viewport size
    #[must_use]
    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport_size = Vec2::new(width, height);
        self
    }

    /// Move the camera by `delta`
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Whether the camera takes part in the frame at all
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the camera
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether the camera is updated
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Set whether the camera is updated
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Whether the camera is rendered before the bodies
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Set whether the camera is rendered before the bodies
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Start a shake.
    ///
    /// A running shake is only replaced by a stronger one, unless
    /// `force_reset` is set. The sign of `intensity` is ignored and negative
    /// durations are treated as zero.
    pub fn shake(&mut self, intensity: f32, duration: f64, force_reset: bool, axes: ShakeAxes) {
        let intensity = intensity.abs();
        if force_reset || !self.shake.is_running() || intensity > self.shake.intensity {
            self.shake = Shake {
                intensity,
                duration: duration.max(0.0),
                elapsed: 0.0,
                axes,
            };
            log::trace!(
                "Camera shake: intensity {}, duration {}s",
                self.shake.intensity,
                self.shake.duration
            );
        }
    }

    /// Whether a shake is in progress
    pub fn is_shaking(&self) -> bool {
        self.shake.is_running()
    }

    /// Offset currently added to the position by the shake
    pub fn shake_offset(&self) -> Vec2 {
        self.offset
    }

    /// Advance the shake by `delta_time` seconds and pick a new offset
    pub fn update(&mut self, delta_time: f64) {
        if !self.shake.is_running() {
            self.offset = Vec2::zeros();
            self.shake.intensity = 0.0;
            return;
        }

        let intensity = self.shake.current_intensity();
        let mut rng = rand::thread_rng();
        let mut jitter = || {
            if intensity > 0.0 {
                rng.gen_range(-intensity..=intensity)
            } else {
                0.0
            }
        };

        self.offset = Vec2::new(
            if self.shake.axes.horizontal() { jitter() * self.viewport_size.x } else { 0.0 },
            if self.shake.axes.vertical() { jitter() * self.viewport_size.y } else { 0.0 },
        );
        self.shake.elapsed += delta_time;
    }

    /// Clear the frame and load the camera's base transform
    pub fn render(&self, driver: &mut dyn GraphicDriver) {
        driver.prepare_scene(
            self.position + self.offset,
            self.angle,
            self.scaling,
            self.background_color,
        );
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DriverCall, RecordingDriver};
    use approx::assert_relative_eq;

    #[test]
    fn test_render_prepares_scene() {
        let mut camera = Camera::new();
        camera.position = Vec2::new(10.0, 20.0);
        camera.angle = 45.0;
        camera.background_color = Color::rgb(10, 20, 30);

        let mut driver = RecordingDriver::new();
        camera.render(&mut driver);

        assert_eq!(
            driver.calls(),
            vec![DriverCall::PrepareScene {
                position: Vec2::new(10.0, 20.0),
                angle: 45.0,
                scaling: Vec2::new(1.0, 1.0),
                background: Color::rgb(10, 20, 30),
            }]
        );
    }

    #[test]
    fn test_shake_stays_within_intensity() {
        let mut camera = Camera::new().with_viewport(200.0, 100.0);
        camera.shake(0.1, 1.0, false, ShakeAxes::Both);
        assert!(camera.is_shaking());

        for _ in 0..20 {
            camera.update(0.01);
            let offset = camera.shake_offset();
            assert!(offset.x.abs() <= 20.0 + f32::EPSILON);
            assert!(offset.y.abs() <= 10.0 + f32::EPSILON);
        }
    }

    #[test]
    fn test_shake_respects_axes() {
        let mut camera = Camera::new().with_viewport(100.0, 100.0);
        camera.shake(0.5, 1.0, false, ShakeAxes::Horizontal);
        for _ in 0..10 {
            camera.update(0.01);
            assert_relative_eq!(camera.shake_offset().y, 0.0);
        }
    }

    #[test]
    fn test_shake_ends_after_duration() {
        let mut camera = Camera::new();
        camera.shake(0.2, 0.05, false, ShakeAxes::Both);

        for _ in 0..10 {
            camera.update(0.01);
        }
        assert!(!camera.is_shaking());
        assert_relative_eq!(camera.shake_offset(), Vec2::zeros());
    }

    #[test]
    fn test_weaker_shake_does_not_replace_stronger() {
        let mut camera = Camera::new();
        camera.shake(0.5, 1.0, false, ShakeAxes::Both);
        camera.shake(0.1, 5.0, false, ShakeAxes::Vertical);
        assert_relative_eq!(camera.shake.intensity, 0.5);

        camera.shake(0.1, 5.0, true, ShakeAxes::Vertical);
        assert_relative_eq!(camera.shake.intensity, 0.1);
        assert_eq!(camera.shake.axes, ShakeAxes::Vertical);
    }

    #[test]
    fn test_expired_shake_accepts_weaker_one() {
        let mut camera = Camera::new();
        camera.shake(0.5, 0.05, false, ShakeAxes::Both);
        camera.update(0.1);
        assert!(!camera.is_shaking());

        camera.shake(0.1, 1.0, false, ShakeAxes::Horizontal);
        assert!(camera.is_shaking());
        assert_relative_eq!(camera.shake.intensity, 0.1);
        assert_eq!(camera.shake.axes, ShakeAxes::Horizontal);
    }

    #[test]
    fn test_negative_intensity_compares_by_magnitude() {
        let mut camera = Camera::new();
        camera.shake(0.5, 1.0, false, ShakeAxes::Both);
        camera.shake(-0.8, 1.0, false, ShakeAxes::Both);
        assert_relative_eq!(camera.shake.intensity, 0.8);

        camera.shake(-0.2, 1.0, false, ShakeAxes::Both);
        assert_relative_eq!(camera.shake.intensity, 0.8);
    }
}
