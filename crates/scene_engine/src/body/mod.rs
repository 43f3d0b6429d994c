//! Body capability
//!
//! A body is any entity scheduled by a scene: it carries a [`BodyState`]
//! (flags plus ordering [`Layer`]) and implements `update`/`render`.
//! Behaviour is composed by containment: concrete bodies embed a
//! `BodyState` and expose it through [`Body::state`] / [`Body::state_mut`].

mod layer;
mod state;

pub use layer::{Layer, RenderSpace};
pub use state::{BodyFlags, BodyState};

use crate::render::GraphicDriver;
use crate::scene::UpdateContext;

/// Contract every scheduled entity satisfies
///
/// # Example
/// ```rust
/// use scene_engine::body::{Body, BodyState, Layer};
/// use scene_engine::render::GraphicDriver;
/// use scene_engine::scene::UpdateContext;
///
/// struct Cloud {
///     state: BodyState,
///     drift: f32,
/// }
///
/// impl Body for Cloud {
///     fn state(&self) -> &BodyState { &self.state }
///     fn state_mut(&mut self) -> &mut BodyState { &mut self.state }
///
///     fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
///         self.drift += 0.1;
///     }
///
///     fn render(&mut self, _driver: &mut dyn GraphicDriver) {}
/// }
///
/// let layer = Layer::new(-1).with_scroll_factor(0.3, 0.3);
/// let cloud = Cloud { state: BodyState::new(layer), drift: 0.0 };
/// assert!(cloud.is_enabled());
/// ```
pub trait Body {
    /// Scheduling state
    fn state(&self) -> &BodyState;

    /// Mutable scheduling state
    fn state_mut(&mut self) -> &mut BodyState;

    /// Advance the body by one tick.
    ///
    /// Called at most once per update pass, only while the body is enabled
    /// and active. `ctx` gives access to sibling bodies and lets the body
    /// spawn new ones; those are scheduled from the next pass on.
    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        let _ = ctx;
    }

    /// Draw the body. The compositor has already set up the transform for
    /// the body's layer.
    fn render(&mut self, driver: &mut dyn GraphicDriver) {
        let _ = driver;
    }

    /// Whether the body is enabled
    fn is_enabled(&self) -> bool {
        self.state().is_enabled()
    }

    /// Whether the body receives updates
    fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Whether the body is drawn
    fn is_visible(&self) -> bool {
        self.state().is_visible()
    }

    /// Whether the body is flagged for destruction
    fn is_to_be_deleted(&self) -> bool {
        self.state().is_to_be_deleted()
    }

    /// Flag the body for destruction at the end of the next update pass
    fn mark_for_deletion(&mut self) {
        self.state_mut().mark_for_deletion();
    }

    /// Current ordering layer
    fn layer(&self) -> Layer {
        self.state().layer()
    }

    /// Set the z-layer; raises the key-changed flag
    fn set_z(&mut self, z: i32) {
        self.state_mut().set_z(z);
    }

    /// Set the parallax scroll factor; raises the key-changed flag
    fn set_scroll_factor(&mut self, x: f32, y: f32) {
        self.state_mut().set_scroll_factor(x, y);
    }

    /// Set the HUD flag; raises the key-changed flag
    fn set_hud(&mut self, hud: bool) {
        self.state_mut().set_hud(hud);
    }
}
