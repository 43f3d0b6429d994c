//! Transform-grouped body traversal
//!
//! Bodies are visited in ascending layer order. Consecutive bodies that
//! render in the same space share one matrix scope:
//!
//! ```text
//! body:    A(1.0)  B(1.0)  C(0.5)  D(0.5)  H(hud)
//! driver:  push T(0)  .   pop push T(c)  .   pop push I   ...  pop
//! ```
//!
//! where `T(f)` is the parallax translation for scroll factor `f` and `I` is
//! the identity. The number of push/pop pairs equals the number of runs.

use super::BodyContainer;
use crate::body::{Layer, RenderSpace};
use crate::foundation::math::{parallax_offset, Vec2};
use crate::render::GraphicDriver;

/// Counters from one body traversal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Matrix scopes opened, one push/pop pair each
    pub groups: usize,
    /// Bodies whose `render()` was called
    pub bodies: usize,
}

/// Render every enabled and visible body of `bodies` with the fewest matrix
/// scopes the layer order allows. Leaves the driver's stack as it found it.
pub(super) fn render_bodies(
    bodies: &mut BodyContainer,
    camera_position: Vec2,
    driver: &mut dyn GraphicDriver,
) -> RenderStats {
    let mut stats = RenderStats::default();
    let mut scope: Option<Layer> = None;

    bodies.for_each_in_order(|layer, body| {
        if !body.state().should_render() {
            return;
        }

        match scope {
            Some(open) if open.same_space(&layer) => {}
            Some(_) => {
                driver.pop_matrix();
                open_scope(driver, &layer, &camera_position);
                stats.groups += 1;
                scope = Some(layer);
            }
            None => {
                open_scope(driver, &layer, &camera_position);
                stats.groups += 1;
                scope = Some(layer);
            }
        }

        body.render(&mut *driver);
        stats.bodies += 1;
    });

    if scope.is_some() {
        driver.pop_matrix();
    }

    log::trace!("Rendered {} bodies in {} groups", stats.bodies, stats.groups);
    stats
}

fn open_scope(driver: &mut dyn GraphicDriver, layer: &Layer, camera_position: &Vec2) {
    driver.push_matrix();
    match layer.space() {
        RenderSpace::Camera(scroll_factor) => {
            driver.translate(parallax_offset(&scroll_factor, camera_position));
        }
        RenderSpace::Hud => driver.load_identity(),
    }
}
