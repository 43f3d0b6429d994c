//! Backend abstraction trait for the scene renderer

use super::Color;
use crate::foundation::math::Vec2;

/// Matrix-stack interface consumed by the scene compositor
///
/// Every push and pop is assumed to be a real driver call, which is why the
/// compositor batches bodies sharing a transform under one matrix scope.
pub trait GraphicDriver {
    /// Save the current model-view matrix
    fn push_matrix(&mut self);

    /// Restore the last saved model-view matrix
    fn pop_matrix(&mut self);

    /// Multiply the current matrix by a translation
    fn translate(&mut self, offset: Vec2);

    /// Replace the current matrix by the identity
    fn load_identity(&mut self);

    /// Clear the frame and set up the camera's base transform
    ///
    /// # Arguments
    /// * `position` - Camera position (top-left corner) in world units
    /// * `angle` - Camera rotation in degrees
    /// * `scaling` - Camera zoom on each axis
    /// * `background` - Clear colour
    fn prepare_scene(&mut self, position: Vec2, angle: f32, scaling: Vec2, background: Color);
}
