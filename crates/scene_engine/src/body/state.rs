//! Per-body scheduling state

use bitflags::bitflags;

use super::Layer;
use crate::foundation::math::{total_cmp_vec2, Vec2};

bitflags! {
    /// Boolean state shared by every scheduled body
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct BodyFlags: u8 {
        /// Participates in update and render at all
        const ENABLED = 1 << 0;
        /// Receives `update()` calls
        const ACTIVE = 1 << 1;
        /// Receives `render()` calls
        const VISIBLE = 1 << 2;
        /// Destroyed at the end of the next update pass
        const TO_BE_DELETED = 1 << 3;
        /// Owned by a body container
        const MANAGED = 1 << 4;
        /// Layer changed since the body was last placed in order
        const KEY_CHANGED = 1 << 5;
    }
}

/// State every body carries: flags plus its ordering layer.
///
/// Cloning produces an unmanaged copy, ready to be added to a container.
#[derive(Debug)]
pub struct BodyState {
    flags: BodyFlags,
    layer: Layer,
}

impl BodyState {
    /// Enabled, active and visible body on the given layer
    pub fn new(layer: Layer) -> Self {
        Self {
            flags: BodyFlags::ENABLED | BodyFlags::ACTIVE | BodyFlags::VISIBLE,
            layer,
        }
    }

    /// Current flag set
    pub fn flags(&self) -> BodyFlags {
        self.flags
    }

    /// Whether the body is enabled
    pub fn is_enabled(&self) -> bool {
        self.flags.contains(BodyFlags::ENABLED)
    }

    /// Enable or disable the body
    pub fn set_enabled(&mut self, enabled: bool) {
        self.flags.set(BodyFlags::ENABLED, enabled);
    }

    /// Whether the body receives updates
    pub fn is_active(&self) -> bool {
        self.flags.contains(BodyFlags::ACTIVE)
    }

    /// Toggle update calls
    pub fn set_active(&mut self, active: bool) {
        self.flags.set(BodyFlags::ACTIVE, active);
    }

    /// Whether the body is drawn
    pub fn is_visible(&self) -> bool {
        self.flags.contains(BodyFlags::VISIBLE)
    }

    /// Toggle render calls
    pub fn set_visible(&mut self, visible: bool) {
        self.flags.set(BodyFlags::VISIBLE, visible);
    }

    /// Updated by the container this tick
    pub fn should_update(&self) -> bool {
        self.flags.contains(BodyFlags::ENABLED | BodyFlags::ACTIVE)
    }

    /// Rendered by the compositor this frame
    pub fn should_render(&self) -> bool {
        self.flags.contains(BodyFlags::ENABLED | BodyFlags::VISIBLE)
    }

    /// Whether the body is flagged for destruction
    pub fn is_to_be_deleted(&self) -> bool {
        self.flags.contains(BodyFlags::TO_BE_DELETED)
    }

    /// Flag the body for destruction at the end of the next update pass
    pub fn mark_for_deletion(&mut self) {
        self.flags.insert(BodyFlags::TO_BE_DELETED);
    }

    /// Whether a container owns the body
    pub fn is_managed(&self) -> bool {
        self.flags.contains(BodyFlags::MANAGED)
    }

    pub(crate) fn set_managed(&mut self, managed: bool) {
        self.flags.set(BodyFlags::MANAGED, managed);
    }

    /// Return to the state of a body never added: unmanaged, not flagged for
    /// deletion, key clean.
    pub(crate) fn release(&mut self) {
        self.flags
            .remove(BodyFlags::MANAGED | BodyFlags::TO_BE_DELETED | BodyFlags::KEY_CHANGED);
    }

    /// Whether the layer changed since the body was last ordered
    pub fn is_key_changed(&self) -> bool {
        self.flags.contains(BodyFlags::KEY_CHANGED)
    }

    pub(crate) fn reset_key_changed(&mut self) {
        self.flags.remove(BodyFlags::KEY_CHANGED);
    }

    /// Current layer
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Current z-layer
    pub fn z(&self) -> i32 {
        self.layer.z
    }

    /// Current parallax scroll factor
    pub fn scroll_factor(&self) -> Vec2 {
        self.layer.scroll_factor
    }

    /// Whether the body renders in screen space
    pub fn is_hud(&self) -> bool {
        self.layer.hud
    }

    /// Set the z-layer, flagging the key as changed when it differs
    pub fn set_z(&mut self, z: i32) {
        if self.layer.z != z {
            self.layer.z = z;
            self.flags.insert(BodyFlags::KEY_CHANGED);
        }
    }

    /// Set the scroll factor, flagging the key as changed when it differs
    pub fn set_scroll_factor(&mut self, x: f32, y: f32) {
        let factor = Vec2::new(x, y);
        if total_cmp_vec2(&self.layer.scroll_factor, &factor).is_ne() {
            self.layer.scroll_factor = factor;
            self.flags.insert(BodyFlags::KEY_CHANGED);
        }
    }

    /// Set the HUD flag, flagging the key as changed when it differs
    pub fn set_hud(&mut self, hud: bool) {
        if self.layer.hud != hud {
            self.layer.hud = hud;
            self.flags.insert(BodyFlags::KEY_CHANGED);
        }
    }

    /// Replace the whole layer at once
    pub fn set_layer(&mut self, layer: Layer) {
        self.set_z(layer.z);
        self.set_scroll_factor(layer.scroll_factor.x, layer.scroll_factor.y);
        self.set_hud(layer.hud);
    }
}

impl Default for BodyState {
    fn default() -> Self {
        Self::new(Layer::default())
    }
}

impl Clone for BodyState {
    fn clone(&self) -> Self {
        Self {
            flags: self.flags - BodyFlags::MANAGED,
            layer: self.layer,
        }
    }
}
