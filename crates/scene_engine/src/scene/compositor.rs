//! Scene compositor - drives one scene's update and render phases
//!
//! The compositor owns the scene's [`Camera`] and [`BodyContainer`] and calls
//! into a user-supplied [`SceneBehavior`] for scene-level logic.
//!
//! Update phase:
//! 1. Camera update (when enabled and active)
//! 2. Body container pass
//! 3. `SceneBehavior::update`
//!
//! Render phase:
//! 1. Camera render, when enabled and visible
//! 2. Bodies, grouped by transform
//! 3. Camera render, if step 1 was skipped
//! 4. `SceneBehavior::render`

use super::render_pass::{render_bodies, RenderStats};
use super::{BodyContainer, Camera, UsageError};
use crate::body::Body;
use crate::foundation::collections::BodyKey;
use crate::render::GraphicDriver;

/// The parts of a scene its behaviour may touch
pub struct SceneView<'a> {
    /// The scene's camera
    pub camera: &'a mut Camera,
    /// The scene's bodies
    pub bodies: &'a mut BodyContainer,
    /// Length of one update step in seconds
    pub delta_time: f64,
}

/// Scene-level hooks
///
/// Every method has an empty default so a scene only overrides what it needs.
pub trait SceneBehavior {
    /// Called once per update step, after the bodies were updated
    fn update(&mut self, scene: &mut SceneView<'_>) {
        let _ = scene;
    }

    /// Called once per rendered frame, after the bodies were drawn
    fn render(&mut self, driver: &mut dyn GraphicDriver) {
        let _ = driver;
    }

    /// The scene became the one the engine plays
    fn on_get_focus(&mut self, scene: &mut SceneView<'_>) {
        let _ = scene;
    }

    /// The engine switched to another scene
    fn on_lose_focus(&mut self, scene: &mut SceneView<'_>) {
        let _ = scene;
    }
}

/// Behaviour of a scene with no logic of its own
#[derive(Debug, Default, Clone, Copy)]
pub struct EmptyScene;

impl SceneBehavior for EmptyScene {}

/// A named scene: camera, bodies and behaviour
pub struct SceneCompositor {
    name: String,
    camera: Camera,
    bodies: BodyContainer,
    behavior: Box<dyn SceneBehavior>,
    last_render: RenderStats,
}

impl SceneCompositor {
    /// Create a scene with a default camera and no bodies
    pub fn new(name: impl Into<String>, behavior: impl SceneBehavior + 'static) -> Self {
        Self {
            name: name.into(),
            camera: Camera::new(),
            bodies: BodyContainer::new(),
            behavior: Box::new(behavior),
            last_render: RenderStats::default(),
        }
    }

    /// Create a scene with no behaviour
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, EmptyScene)
    }

    /// Scene name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The scene's camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The scene's camera, mutably
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// The scene's bodies
    pub fn bodies(&self) -> &BodyContainer {
        &self.bodies
    }

    /// The scene's bodies, mutably
    pub fn bodies_mut(&mut self) -> &mut BodyContainer {
        &mut self.bodies
    }

    /// Hand a body to the scene. See [`BodyContainer::add`].
    ///
    /// # Errors
    /// [`UsageError::AlreadyManaged`] if the body already belongs to a container.
    pub fn add(&mut self, body: Box<dyn Body>) -> Result<BodyKey, UsageError> {
        self.bodies.add(body)
    }

    /// Counters from the most recent render phase
    pub fn last_render_stats(&self) -> RenderStats {
        self.last_render
    }

    /// Run one update phase
    pub fn internal_update(&mut self, delta_time: f64) {
        if self.camera.is_enabled() && self.camera.is_active() {
            self.camera.update(delta_time);
        }

        self.bodies.internal_update();

        let mut view = SceneView {
            camera: &mut self.camera,
            bodies: &mut self.bodies,
            delta_time,
        };
        self.behavior.update(&mut view);
    }

    /// Run one render phase
    pub fn internal_render(&mut self, driver: &mut dyn GraphicDriver) -> RenderStats {
        let camera_first = self.camera.is_enabled() && self.camera.is_visible();
        if camera_first {
            self.camera.render(driver);
        }

        let stats = render_bodies(&mut self.bodies, self.camera.position, driver);

        if !camera_first {
            self.camera.render(driver);
        }

        self.behavior.render(driver);
        self.last_render = stats;
        stats
    }

    pub(crate) fn get_focus(&mut self) {
        log::debug!("Scene '{}' gets focus", self.name);
        let mut view = SceneView {
            camera: &mut self.camera,
            bodies: &mut self.bodies,
            delta_time: 0.0,
        };
        self.behavior.on_get_focus(&mut view);
    }

    pub(crate) fn lose_focus(&mut self) {
        log::debug!("Scene '{}' loses focus", self.name);
        let mut view = SceneView {
            camera: &mut self.camera,
            bodies: &mut self.bodies,
            delta_time: 0.0,
        };
        self.behavior.on_lose_focus(&mut view);
    }
}

impl std::fmt::Debug for SceneCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneCompositor")
            .field("name", &self.name)
            .field("camera", &self.camera)
            .field("bodies", &self.bodies)
            .finish_non_exhaustive()
    }
}
