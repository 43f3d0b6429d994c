//! Headless graphic driver

use super::{Color, GraphicDriver};
use crate::foundation::math::Vec2;

/// Driver that ignores every call, for headless runs
#[derive(Debug, Default, Clone, Copy)]
pub struct NullGraphicDriver;

impl NullGraphicDriver {
    /// Create a null driver
    pub fn new() -> Self {
        Self
    }
}

impl GraphicDriver for NullGraphicDriver {
    fn push_matrix(&mut self) {}

    fn pop_matrix(&mut self) {}

    fn translate(&mut self, _offset: Vec2) {}

    fn load_identity(&mut self) {}

    fn prepare_scene(&mut self, _position: Vec2, _angle: f32, _scaling: Vec2, _background: Color) {}
}
