//! Parallax demo application
//!
//! Builds a scene with several parallax layers, a player that drops short
//! lived sparks and a HUD counter, then runs the engine headless against a
//! recording driver and reports how many matrix operations each frame needed.
//!
//! Usage: `parallax_demo [config.toml|config.ron]`

use rand::prelude::*;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;

const FRAMES: usize = 240;
const FRAME_TIME: f64 = 1.0 / 60.0;
const STARS: usize = 40;
const HILLS: usize = 8;

/// Static scenery on a parallax layer
struct Scenery {
    state: BodyState,
    position: Vec2,
}

impl Body for Scenery {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn render(&mut self, _driver: &mut dyn GraphicDriver) {
        log::trace!("scenery at {:?}", self.position);
    }
}

/// Short lived particle dropped by the player
struct Spark {
    state: BodyState,
    ttl: u32,
}

impl Body for Spark {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, _ctx: &mut UpdateContext<'_>) {
        self.ttl = self.ttl.saturating_sub(1);
        if self.ttl == 0 {
            self.mark_for_deletion();
        }
    }
}

/// Player: moves right and drops a spark every few ticks
struct Player {
    state: BodyState,
    position: Vec2,
    ticks: u32,
}

impl Body for Player {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.position.x += 2.0;
        self.ticks += 1;

        if self.ticks % 6 == 0 {
            let spark = Spark {
                state: BodyState::new(Layer::new(self.state().z() - 1)),
                ttl: 30,
            };
            if let Err(err) = ctx.add(Box::new(spark)) {
                log::warn!("could not spawn spark: {err}");
            }
        }

        // Step in front of the hills every other second
        let z = if (self.ticks / 120) % 2 == 0 { 1 } else { 3 };
        self.set_z(z);
    }
}

/// Screen-space counter
struct Hud {
    state: BodyState,
    frames: u64,
}

impl Body for Hud {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn render(&mut self, _driver: &mut dyn GraphicDriver) {
        self.frames += 1;
    }
}

/// Scene logic: follows the player with the camera
struct ParallaxScene {
    player: Option<BodyKey>,
}

impl SceneBehavior for ParallaxScene {
    fn update(&mut self, scene: &mut SceneView<'_>) {
        let Some(player) = self.player else {
            return;
        };

        match scene.bodies.get(player) {
            Some(_) => scene.camera.move_by(Vec2::new(2.0, 0.0)),
            None => {
                log::warn!("player body is gone");
                self.player = None;
            }
        }
    }

    fn on_get_focus(&mut self, scene: &mut SceneView<'_>) {
        log::info!("parallax scene starts with {} bodies", scene.bodies.len());
        scene.camera.shake(0.02, 0.5, true, ShakeAxes::Both);
    }
}

fn build_scene(rng: &mut impl Rng) -> Result<SceneCompositor, UsageError> {
    let mut bodies = BodyContainer::new();

    for _ in 0..STARS {
        let star = Scenery {
            state: BodyState::new(Layer::new(0).with_scroll_factor(0.1, 0.1)),
            position: Vec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..300.0)),
        };
        bodies.add(Box::new(star))?;
    }

    for _ in 0..HILLS {
        let hill = Scenery {
            state: BodyState::new(Layer::new(2).with_scroll_factor(0.5, 1.0)),
            position: Vec2::new(rng.gen_range(0.0..1600.0), 450.0),
        };
        bodies.add(Box::new(hill))?;
    }

    let player = bodies.add(Box::new(Player {
        state: BodyState::new(Layer::new(1)),
        position: Vec2::new(50.0, 500.0),
        ticks: 0,
    }))?;

    bodies.add(Box::new(Hud {
        state: BodyState::new(Layer::new(0).with_hud(true)),
        frames: 0,
    }))?;

    let mut scene = SceneCompositor::new("parallax", ParallaxScene { player: Some(player) });
    *scene.bodies_mut() = bodies;

    let camera = scene.camera_mut();
    camera.background_color = Color::rgb(12, 16, 40);
    camera.viewport_size = Vec2::new(800.0, 600.0);
    Ok(scene)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_filter("info");

    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load(&path)?,
        None => EngineConfig {
            application_name: "Parallax Demo".to_string(),
            ..EngineConfig::default()
        },
    };

    let clock = ManualClock::new();
    let driver = RecordingDriver::new();
    let mut engine = Engine::new(config, driver.clone(), clock.clone())?;

    let mut rng = rand::thread_rng();
    engine.add_scene(build_scene(&mut rng)?)?;

    let mut total_updates = 0;
    let mut frames_rendered = 0;
    let mut saturated = 0;

    for frame in 0..FRAMES {
        // Simulate an occasional hitch so the catch-up path is exercised
        let elapsed = if frame % 60 == 59 { FRAME_TIME * 12.0 } else { FRAME_TIME };
        clock.advance(elapsed);

        driver.reset();
        let report = engine.pulse()?;
        total_updates += report.updates;
        if report.saturated {
            saturated += 1;
        }

        if report.rendered {
            frames_rendered += 1;
            let stats = driver.stats();
            log::debug!(
                "frame {frame}: {} updates, {} push/pop pairs, max depth {}",
                report.updates,
                stats.pushes,
                stats.max_depth
            );
            if stats.pushes != stats.pops || stats.unbalanced_pops > 0 {
                log::error!("unbalanced matrix stack in frame {frame}: {stats:?}");
            }
        }
    }

    if let Some(scene) = engine.current_scene() {
        let render = scene.last_render_stats();
        log::info!(
            "{}: {} bodies drawn in {} groups on the last frame",
            engine.config().application_name,
            render.bodies,
            render.groups
        );
        log::info!("{} bodies alive", scene.bodies().len());
    }
    log::info!(
        "{total_updates} updates, {frames_rendered} frames rendered, {saturated} saturated pulses"
    );

    engine.request_exit();
    Ok(())
}
