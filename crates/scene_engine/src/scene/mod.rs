//! Scene scheduling system
//!
//! Owns the bodies of a scene, updates each of them exactly once per tick and
//! renders them with as few driver matrix operations as the layer order
//! allows.
//!
//! ## Architecture
//!
//! ```text
//! Engine (fixed-timestep pulse)
//!      ↓
//! SceneCompositor (update phase / render phase)
//!      ↓                      ↓
//! BodyContainer          Camera + GraphicDriver
//! ```
//!
//! The container defers every structural change requested during a pass
//! (insertions, deletions, layer changes) to the end of that pass, so bodies
//! may freely spawn, remove and re-layer each other from `update()`.

mod camera;
mod compositor;
mod container;
mod context;
mod render_pass;

pub use camera::{Camera, ShakeAxes};
pub use compositor::{EmptyScene, SceneBehavior, SceneCompositor, SceneView};
pub use container::{BodyContainer, UsageError};
pub use context::UpdateContext;
pub use render_pass::RenderStats;

#[cfg(test)]
mod tests;
