//! Core engine implementation
//!
//! The engine owns the registered scenes, the graphic driver and the clock,
//! and advances the current scene with a fixed-timestep loop:
//!
//! - updates run every `1 / updates_per_second` seconds of clock time
//! - a late frame catches up with several updates in a row, at most
//!   `min_fps` of them per pulse
//! - one render follows, only if at least one update ran since the last one

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{Config, ConfigError};
use crate::foundation::time::Clock;
use crate::render::GraphicDriver;
use crate::scene::SceneCompositor;

/// Default number of updates per second
pub const DEFAULT_UPDATES_PER_SECOND: f64 = 60.0;

/// Default cap on catch-up updates per pulse
pub const DEFAULT_MIN_FPS: u32 = 5;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Application name, used in log output
    pub application_name: String,

    /// Fixed update rate
    pub updates_per_second: f64,

    /// Maximum number of updates run by one pulse before rendering anyway
    pub min_fps: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            application_name: "SceneEngineApp".to_string(),
            updates_per_second: DEFAULT_UPDATES_PER_SECOND,
            min_fps: DEFAULT_MIN_FPS,
        }
    }
}

impl Config for EngineConfig {}

impl EngineConfig {
    /// Load a configuration file and check it
    ///
    /// # Errors
    /// Any [`ConfigError`] from reading, parsing or validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::load_from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.updates_per_second.is_finite() || self.updates_per_second <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "updates_per_second must be a positive number, got {}",
                self.updates_per_second
            )));
        }
        if self.min_fps == 0 {
            return Err(ConfigError::Invalid("min_fps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// A scene with this name is already registered
    #[error("Scene '{0}' is already registered")]
    DuplicateScene(String),

    /// No scene with this name is registered
    #[error("Scene '{0}' does not exist")]
    UnknownScene(String),

    /// The scene is playing or about to play
    #[error("Scene '{0}' is in use and cannot be removed")]
    SceneInUse(String),

    /// Nothing to play
    #[error("No scene to play")]
    NoScene,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// What one pulse did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Update steps run
    pub updates: u32,
    /// Whether a render phase ran
    pub rendered: bool,
    /// Catch-up stopped at the `min_fps` cap while still behind
    pub saturated: bool,
}

/// Main engine struct
///
/// One engine per application; it is passed explicitly to whatever needs it.
pub struct Engine {
    config: EngineConfig,
    driver: Box<dyn GraphicDriver>,
    clock: Box<dyn Clock>,
    scenes: HashMap<String, SceneCompositor>,
    current: Option<String>,
    next: Option<String>,
    next_update: Option<f64>,
    last_update: Option<f64>,
    last_render: Option<f64>,
    rendered_since_last_update: bool,
    exit_requested: bool,
}

impl Engine {
    /// Create an engine
    ///
    /// # Errors
    /// [`EngineError::Config`] if the configuration does not validate.
    pub fn new(
        config: EngineConfig,
        driver: impl GraphicDriver + 'static,
        clock: impl Clock + 'static,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine for '{}' ({} updates/s, min {} fps)",
            config.application_name,
            config.updates_per_second,
            config.min_fps
        );

        Ok(Self {
            config,
            driver: Box::new(driver),
            clock: Box::new(clock),
            scenes: HashMap::new(),
            current: None,
            next: None,
            next_update: None,
            last_update: None,
            last_render: None,
            rendered_since_last_update: false,
            exit_requested: false,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Register a scene. The first scene registered is played automatically.
    ///
    /// # Errors
    /// [`EngineError::DuplicateScene`] if the name is taken.
    pub fn add_scene(&mut self, scene: SceneCompositor) -> Result<(), EngineError> {
        let name = scene.name().to_string();
        if self.scenes.contains_key(&name) {
            log::warn!("Scene '{}' is already registered", name);
            return Err(EngineError::DuplicateScene(name));
        }

        if self.scenes.is_empty() {
            self.next = Some(name.clone());
        }

        log::debug!("Added scene '{}'", name);
        self.scenes.insert(name, scene);
        Ok(())
    }

    /// Unregister a scene and hand it back
    ///
    /// # Errors
    /// [`EngineError::UnknownScene`] if no scene has this name,
    /// [`EngineError::SceneInUse`] if it is playing or about to play.
    pub fn remove_scene(&mut self, name: &str) -> Result<SceneCompositor, EngineError> {
        if self.current.as_deref() == Some(name) || self.next.as_deref() == Some(name) {
            log::warn!("Cannot remove scene '{}' while it is in use", name);
            return Err(EngineError::SceneInUse(name.to_string()));
        }

        let scene = self
            .scenes
            .remove(name)
            .ok_or_else(|| EngineError::UnknownScene(name.to_string()))?;
        log::debug!("Removed scene '{}'", name);
        Ok(scene)
    }

    /// Switch to another scene at the start of the next update step
    ///
    /// # Errors
    /// [`EngineError::UnknownScene`] if no scene has this name.
    pub fn play_scene(&mut self, name: &str) -> Result<(), EngineError> {
        if !self.scenes.contains_key(name) {
            log::warn!("Scene '{}' doesn't exist so it cannot be played", name);
            return Err(EngineError::UnknownScene(name.to_string()));
        }

        self.next = Some(name.to_string());
        Ok(())
    }

    /// The scene being played
    pub fn current_scene(&self) -> Option<&SceneCompositor> {
        self.current.as_ref().and_then(|name| self.scenes.get(name))
    }

    /// The scene being played, mutably
    pub fn current_scene_mut(&mut self) -> Option<&mut SceneCompositor> {
        self.current.as_ref().and_then(|name| self.scenes.get_mut(name))
    }

    /// A registered scene
    pub fn scene(&self, name: &str) -> Option<&SceneCompositor> {
        self.scenes.get(name)
    }

    /// A registered scene, mutably
    pub fn scene_mut(&mut self, name: &str) -> Option<&mut SceneCompositor> {
        self.scenes.get_mut(name)
    }

    /// The graphic driver
    pub fn driver_mut(&mut self) -> &mut dyn GraphicDriver {
        self.driver.as_mut()
    }

    /// Updates per second
    pub fn updates_per_second(&self) -> f64 {
        self.config.updates_per_second
    }

    /// Change the update rate. Zero, negative and non-finite values are ignored.
    pub fn set_updates_per_second(&mut self, updates_per_second: f64) {
        if updates_per_second.is_finite() && updates_per_second > 0.0 {
            self.config.updates_per_second = updates_per_second;
        } else {
            log::warn!("Ignoring invalid update rate {}", updates_per_second);
        }
    }

    /// Seconds between two update steps
    pub fn update_delay(&self) -> f64 {
        1.0 / self.config.updates_per_second
    }

    /// Cap on catch-up updates per pulse
    pub fn min_fps(&self) -> u32 {
        self.config.min_fps
    }

    /// Change the catch-up cap. Zero is ignored.
    pub fn set_min_fps(&mut self, min_fps: u32) {
        if min_fps == 0 {
            log::warn!("Ignoring min_fps of 0");
        } else {
            self.config.min_fps = min_fps;
        }
    }

    /// Clock time of the last update step
    pub fn last_update(&self) -> Option<f64> {
        self.last_update
    }

    /// Clock time of the last render phase
    pub fn last_render(&self) -> Option<f64> {
        self.last_render
    }

    /// Ask the application to stop after the current pulse
    pub fn request_exit(&mut self) {
        log::info!("Engine shutdown requested");
        self.exit_requested = true;
    }

    /// Whether [`request_exit`](Self::request_exit) was called
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Advance the engine by one frame
    ///
    /// Runs as many update steps as the clock calls for, at most `min_fps`,
    /// then renders once if anything was updated since the last render.
    ///
    /// # Errors
    /// [`EngineError::NoScene`] if no scene is registered.
    pub fn pulse(&mut self) -> Result<FrameReport, EngineError> {
        if self.current.is_none() && self.next.is_none() {
            return Err(EngineError::NoScene);
        }

        let delay = self.update_delay();
        let mut next_update = *self.next_update.get_or_insert_with(|| self.clock.now());
        let mut report = FrameReport::default();

        while self.clock.now() > next_update && report.updates < self.config.min_fps {
            self.switch_scene();
            if let Some(scene) = self.current.as_ref().and_then(|name| self.scenes.get_mut(name)) {
                scene.internal_update(delay);
            }

            self.rendered_since_last_update = false;
            next_update += delay;
            self.last_update = Some(self.clock.now());
            report.updates += 1;
        }
        self.next_update = Some(next_update);
        report.saturated = report.updates == self.config.min_fps && self.clock.now() > next_update;

        if !self.rendered_since_last_update {
            if let Some(scene) = self.current.as_ref().and_then(|name| self.scenes.get_mut(name)) {
                scene.internal_render(self.driver.as_mut());
                self.rendered_since_last_update = true;
                self.last_render = Some(self.clock.now());
                report.rendered = true;
            }
        }

        if report.saturated {
            log::trace!("Update catch-up capped at {} steps", report.updates);
        }
        Ok(report)
    }

    fn switch_scene(&mut self) {
        let Some(next) = self.next.take() else {
            return;
        };

        if let Some(scene) = self.current.as_ref().and_then(|name| self.scenes.get_mut(name)) {
            scene.lose_focus();
        }

        match self.scenes.get_mut(&next) {
            Some(scene) => {
                scene.get_focus();
                log::info!("Playing scene '{}'", next);
                self.current = Some(next);
            }
            None => log::error!("Scene '{}' vanished before it could be played", next),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("scenes", &self.scenes.keys().collect::<Vec<_>>())
            .field("current", &self.current)
            .field("next", &self.next)
            .finish_non_exhaustive()
    }
}
