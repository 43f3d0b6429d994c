//! Recording driver
//!
//! Records every driver call and simulates the matrix stack so callers can
//! check balance and batching without a graphics context.

use std::cell::RefCell;
use std::rc::Rc;

use super::{Color, GraphicDriver};
use crate::foundation::math::Vec2;

/// One recorded driver call
#[derive(Debug, Clone, PartialEq)]
pub enum DriverCall {
    /// `push_matrix()`
    PushMatrix,
    /// `pop_matrix()`
    PopMatrix,
    /// `translate(offset)`
    Translate(Vec2),
    /// `load_identity()`
    LoadIdentity,
    /// `prepare_scene(...)`
    PrepareScene {
        /// Camera position
        position: Vec2,
        /// Camera angle in degrees
        angle: f32,
        /// Camera zoom
        scaling: Vec2,
        /// Clear colour
        background: Color,
    },
}

/// Aggregated counters since the last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Number of `push_matrix` calls
    pub pushes: usize,
    /// Number of `pop_matrix` calls
    pub pops: usize,
    /// Pops issued on an empty stack
    pub unbalanced_pops: usize,
    /// Deepest stack reached
    pub max_depth: usize,
    /// Number of `prepare_scene` calls
    pub scenes_prepared: usize,
}

#[derive(Debug, Clone, Copy, Default)]
struct MatrixState {
    translation: Vec2,
    screen_space: bool,
}

#[derive(Debug, Default)]
struct Recording {
    calls: Vec<DriverCall>,
    stats: DriverStats,
    current: MatrixState,
    stack: Vec<MatrixState>,
}

/// Driver that records calls and tracks the simulated matrix stack
///
/// Clones share the same recording, so one handle can be given to the engine
/// while another is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    inner: Rc<RefCell<Recording>>,
}

impl RecordingDriver {
    /// Create an empty recording
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last reset
    pub fn calls(&self) -> Vec<DriverCall> {
        self.inner.borrow().calls.clone()
    }

    /// Counters since the last reset
    pub fn stats(&self) -> DriverStats {
        self.inner.borrow().stats
    }

    /// Current stack depth
    pub fn depth(&self) -> usize {
        self.inner.borrow().stack.len()
    }

    /// Translation accumulated on the current matrix since the last
    /// `prepare_scene` or `load_identity`
    pub fn current_translation(&self) -> Vec2 {
        self.inner.borrow().current.translation
    }

    /// Whether the current matrix was reset to identity (screen space)
    pub fn in_screen_space(&self) -> bool {
        self.inner.borrow().current.screen_space
    }

    /// Forget recorded calls and counters; the simulated stack is kept
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.clear();
        inner.stats = DriverStats::default();
    }

    fn record(&self, call: DriverCall) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl GraphicDriver for RecordingDriver {
    fn push_matrix(&mut self) {
        self.record(DriverCall::PushMatrix);
        let mut inner = self.inner.borrow_mut();
        let current = inner.current;
        inner.stack.push(current);
        inner.stats.pushes += 1;
        let depth = inner.stack.len();
        inner.stats.max_depth = inner.stats.max_depth.max(depth);
    }

    fn pop_matrix(&mut self) {
        self.record(DriverCall::PopMatrix);
        let mut inner = self.inner.borrow_mut();
        inner.stats.pops += 1;
        let saved = inner.stack.pop();
        match saved {
            Some(saved) => inner.current = saved,
            None => {
                inner.stats.unbalanced_pops += 1;
                log::warn!("pop_matrix called on an empty matrix stack");
            }
        }
    }

    fn translate(&mut self, offset: Vec2) {
        self.record(DriverCall::Translate(offset));
        self.inner.borrow_mut().current.translation += offset;
    }

    fn load_identity(&mut self) {
        self.record(DriverCall::LoadIdentity);
        self.inner.borrow_mut().current = MatrixState {
            translation: Vec2::zeros(),
            screen_space: true,
        };
    }

    fn prepare_scene(&mut self, position: Vec2, angle: f32, scaling: Vec2, background: Color) {
        self.record(DriverCall::PrepareScene { position, angle, scaling, background });
        let mut inner = self.inner.borrow_mut();
        inner.current = MatrixState::default();
        inner.stats.scenes_prepared += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_simulation() {
        let mut driver = RecordingDriver::new();
        let handle = driver.clone();

        driver.push_matrix();
        driver.translate(Vec2::new(-5.0, 2.0));
        assert_eq!(handle.current_translation(), Vec2::new(-5.0, 2.0));
        assert_eq!(handle.depth(), 1);

        driver.pop_matrix();
        driver.push_matrix();
        driver.load_identity();
        assert!(handle.in_screen_space());

        driver.pop_matrix();
        assert!(!handle.in_screen_space());
        assert_eq!(handle.current_translation(), Vec2::zeros());

        let stats = handle.stats();
        assert_eq!(stats.pushes, 2);
        assert_eq!(stats.pops, 2);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.unbalanced_pops, 0);
    }

    #[test]
    fn test_unbalanced_pop_is_counted() {
        let mut driver = RecordingDriver::new();
        driver.pop_matrix();
        assert_eq!(driver.stats().unbalanced_pops, 1);
        assert_eq!(driver.calls(), vec![DriverCall::PopMatrix]);
    }

    #[test]
    fn test_reset_keeps_stack() {
        let mut driver = RecordingDriver::new();
        driver.push_matrix();
        driver.reset();
        assert!(driver.calls().is_empty());
        assert_eq!(driver.stats(), DriverStats::default());
        assert_eq!(driver.depth(), 1);
    }
}
