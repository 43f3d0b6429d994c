//! Ordering key shared by scheduling and rendering

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{total_cmp_vec2, Vec2};

/// A body's layer: z-order, parallax scroll factor and HUD flag.
///
/// Ordering rules (all ascending):
/// 1) `hud`: camera-space bodies first, HUD bodies last
/// 2) `z`: back-to-front
/// 3) `scroll_factor`: x then y
///
/// Putting `hud` and `scroll_factor` in the key keeps bodies that render
/// under the same transform adjacent, so the compositor can share one matrix
/// scope per run instead of one per body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Layer {
    /// Z-layer. Lower values are drawn first (further back).
    pub z: i32,
    /// Parallax multiplier, usually in `[0, 1]` on each axis.
    pub scroll_factor: Vec2,
    /// Rendered in screen space, ignoring the camera.
    pub hud: bool,
}

/// Transform space a layer renders in
#[derive(Debug, Clone, Copy)]
pub enum RenderSpace {
    /// World space, translated by the parallax offset of this scroll factor
    Camera(Vec2),
    /// Screen space (identity transform)
    Hud,
}

impl Layer {
    /// Camera-space layer following the camera fully
    pub fn new(z: i32) -> Self {
        Self {
            z,
            scroll_factor: Vec2::new(1.0, 1.0),
            hud: false,
        }
    }

    /// Builder-style scroll factor
    #[must_use]
    pub fn with_scroll_factor(mut self, x: f32, y: f32) -> Self {
        self.scroll_factor = Vec2::new(x, y);
        self
    }

    /// Builder-style HUD flag
    #[must_use]
    pub fn with_hud(mut self, hud: bool) -> Self {
        self.hud = hud;
        self
    }

    /// The transform space bodies on this layer render in
    pub fn space(&self) -> RenderSpace {
        if self.hud {
            RenderSpace::Hud
        } else {
            RenderSpace::Camera(self.scroll_factor)
        }
    }

    /// Whether two layers render under the same transform.
    ///
    /// HUD layers always share a space; camera layers share one when their
    /// scroll factors are equal.
    pub fn same_space(&self, other: &Self) -> bool {
        match (self.hud, other.hud) {
            (true, true) => true,
            (false, false) => total_cmp_vec2(&self.scroll_factor, &other.scroll_factor).is_eq(),
            _ => false,
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Ord for Layer {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hud
            .cmp(&other.hud)
            .then_with(|| self.z.cmp(&other.z))
            .then_with(|| total_cmp_vec2(&self.scroll_factor, &other.scroll_factor))
    }
}

impl PartialOrd for Layer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Layer {}
