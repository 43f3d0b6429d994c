//! # Scene Engine
//!
//! The scheduling core of a 2D scene engine: owns every body of a scene,
//! updates each exactly once per tick and renders them with a minimal
//! number of matrix-stack operations, honouring parallax scroll factors and
//! a screen-space HUD layer.
//!
//! ## Features
//!
//! - **Deferred mutation**: bodies may spawn, remove and re-layer each other
//!   from inside `update()` without disturbing the pass in progress
//! - **Transform batching**: bodies sharing a render space share one matrix scope
//! - **Fixed timestep**: updates at a fixed rate with bounded catch-up
//! - **Headless drivers**: a null driver and a recording driver for tests and tools
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! struct Star {
//!     state: BodyState,
//! }
//!
//! impl Body for Star {
//!     fn state(&self) -> &BodyState { &self.state }
//!     fn state_mut(&mut self) -> &mut BodyState { &mut self.state }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let clock = ManualClock::new();
//!     let driver = NullGraphicDriver::new();
//!     let mut engine = Engine::new(EngineConfig::default(), driver, clock.clone())?;
//!
//!     let mut scene = SceneCompositor::empty("sky");
//!     let layer = Layer::new(0).with_scroll_factor(0.1, 0.1);
//!     scene.add(Box::new(Star { state: BodyState::new(layer) }))?;
//!     engine.add_scene(scene)?;
//!
//!     engine.pulse()?;
//!     clock.advance(1.0 / 30.0);
//!     let report = engine.pulse()?;
//!     assert!(report.rendered);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod body;
pub mod render;
pub mod scene;

mod engine;

pub use engine::{
    Engine, EngineConfig, EngineError, FrameReport, DEFAULT_MIN_FPS, DEFAULT_UPDATES_PER_SECOND,
};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Engine, EngineConfig, EngineError, FrameReport,
        body::{Body, BodyState, Layer},
        config::Config,
        foundation::{
            collections::BodyKey,
            math::Vec2,
            time::{Clock, ManualClock, SystemClock},
        },
        render::{Color, GraphicDriver, NullGraphicDriver, RecordingDriver},
        scene::{
            BodyContainer, Camera, SceneBehavior, SceneCompositor, SceneView, ShakeAxes,
            UpdateContext, UsageError,
        },
    };
}
