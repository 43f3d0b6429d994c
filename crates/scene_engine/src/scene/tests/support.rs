//! Shared helpers for the scheduling and render tests

use std::cell::RefCell;
use std::rc::Rc;

use crate::body::{Body, BodyState, Layer};
use crate::foundation::math::Vec2;
use crate::render::{GraphicDriver, RecordingDriver};
use crate::scene::{SceneBehavior, SceneView, UpdateContext};

/// Something observable that happened during a test
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Updated(u32),
    Rendered { id: u32, translation: Vec2, screen_space: bool },
    Dropped(u32),
    SceneUpdated,
    SceneRendered,
}

pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub fn event_log() -> EventLog {
    Rc::new(RefCell::new(Vec::new()))
}

type Script = Box<dyn FnMut(&mut BodyState, &mut UpdateContext<'_>)>;

/// Body that records its updates, renders and destruction
pub struct TestBody {
    id: u32,
    state: BodyState,
    log: EventLog,
    observer: Option<RecordingDriver>,
    script: Option<Script>,
}

impl TestBody {
    pub fn new(id: u32, layer: Layer, log: &EventLog) -> Self {
        Self {
            id,
            state: BodyState::new(layer),
            log: Rc::clone(log),
            observer: None,
            script: None,
        }
    }

    /// Record the simulated matrix state of `observer` on every render
    pub fn observed_by(mut self, observer: &RecordingDriver) -> Self {
        self.observer = Some(observer.clone());
        self
    }

    /// Run `script` after logging each update
    pub fn on_update(
        mut self,
        script: impl FnMut(&mut BodyState, &mut UpdateContext<'_>) + 'static,
    ) -> Self {
        self.script = Some(Box::new(script));
        self
    }

    pub fn hidden(mut self) -> Self {
        self.state.set_visible(false);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.state.set_active(false);
        self
    }

    pub fn boxed(self) -> Box<dyn Body> {
        Box::new(self)
    }
}

impl Body for TestBody {
    fn state(&self) -> &BodyState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut BodyState {
        &mut self.state
    }

    fn update(&mut self, ctx: &mut UpdateContext<'_>) {
        self.log.borrow_mut().push(Event::Updated(self.id));
        if let Some(script) = self.script.as_mut() {
            script(&mut self.state, ctx);
        }
    }

    fn render(&mut self, _driver: &mut dyn GraphicDriver) {
        let (translation, screen_space) = self
            .observer
            .as_ref()
            .map_or((Vec2::zeros(), false), |observer| {
                (observer.current_translation(), observer.in_screen_space())
            });

        self.log.borrow_mut().push(Event::Rendered {
            id: self.id,
            translation,
            screen_space,
        });
    }
}

impl Drop for TestBody {
    fn drop(&mut self) {
        self.log.borrow_mut().push(Event::Dropped(self.id));
    }
}

/// Scene behaviour that records its hooks
pub struct TestScene {
    pub log: EventLog,
}

impl SceneBehavior for TestScene {
    fn update(&mut self, _scene: &mut SceneView<'_>) {
        self.log.borrow_mut().push(Event::SceneUpdated);
    }

    fn render(&mut self, _driver: &mut dyn GraphicDriver) {
        self.log.borrow_mut().push(Event::SceneRendered);
    }
}

/// Ids of updated bodies, in call order
pub fn updated(log: &EventLog) -> Vec<u32> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Updated(id) => Some(*id),
            _ => None,
        })
        .collect()
}

/// Ids of rendered bodies, in call order
pub fn rendered(log: &EventLog) -> Vec<u32> {
    log.borrow()
        .iter()
        .filter_map(|event| match event {
            Event::Rendered { id, .. } => Some(*id),
            _ => None,
        })
        .collect()
}

/// Whether body `id` was dropped
pub fn dropped(log: &EventLog, id: u32) -> bool {
    log.borrow().contains(&Event::Dropped(id))
}

pub fn render_event(log: &EventLog, wanted: u32) -> Option<(Vec2, bool)> {
    log.borrow().iter().find_map(|event| match event {
        Event::Rendered {
            id,
            translation,
            screen_space,
        } if *id == wanted => Some((*translation, *screen_space)),
        _ => None,
    })
}
