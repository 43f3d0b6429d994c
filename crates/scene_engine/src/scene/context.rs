//! Access handed to a body while it updates

use super::container::{stage_body, Slot};
use super::UsageError;
use crate::body::Body;
use crate::foundation::collections::{BodyArena, BodyKey};

/// What a body may touch from inside its own `update()`
///
/// Siblings are reachable by key and may be re-keyed or flagged for
/// deletion; new bodies are staged and join the schedule once the current
/// pass ends. The body being updated is not reachable through the context
/// (it is borrowed by the call itself).
pub struct UpdateContext<'a> {
    current: BodyKey,
    arena: &'a mut BodyArena<Slot>,
    pending_add: &'a mut Vec<BodyKey>,
    remove_current: bool,
}

impl<'a> UpdateContext<'a> {
    pub(super) fn new(
        current: BodyKey,
        arena: &'a mut BodyArena<Slot>,
        pending_add: &'a mut Vec<BodyKey>,
    ) -> Self {
        Self {
            current,
            arena,
            pending_add,
            remove_current: false,
        }
    }

    /// Key of the body being updated
    pub fn current_key(&self) -> BodyKey {
        self.current
    }

    /// Spawn a body. It is first updated on the next pass.
    ///
    /// # Errors
    /// [`UsageError::AlreadyManaged`] if the body is already owned by a
    /// container; the rejected box is dropped.
    pub fn add(&mut self, body: Box<dyn Body>) -> Result<BodyKey, UsageError> {
        stage_body(self.arena, self.pending_add, body, false)
    }

    /// Spawn a body that is handed back instead of dropped once deleted
    ///
    /// # Errors
    /// [`UsageError::AlreadyManaged`] if the body is already owned by a container.
    pub fn add_retained(&mut self, body: Box<dyn Body>) -> Result<BodyKey, UsageError> {
        stage_body(self.arena, self.pending_add, body, true)
    }

    /// Look up a sibling
    pub fn get(&self, key: BodyKey) -> Option<&dyn Body> {
        self.arena.get(key).and_then(|slot| slot.body.as_deref())
    }

    /// Look up a sibling mutably
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut (dyn Body + 'static)> {
        self.arena.get_mut(key).and_then(|slot| slot.body.as_deref_mut())
    }

    /// Flag a body for deletion. Removing the current body takes effect once
    /// its `update()` returns.
    ///
    /// # Errors
    /// [`UsageError::UnknownBody`] if `key` does not resolve to a live body.
    pub fn remove(&mut self, key: BodyKey) -> Result<(), UsageError> {
        if key == self.current {
            self.remove_current = true;
            return Ok(());
        }

        match self.get_mut(key) {
            Some(body) => {
                body.mark_for_deletion();
                Ok(())
            }
            None => {
                log::warn!("Tried to remove unknown body {:?}", key);
                Err(UsageError::UnknownBody(key))
            }
        }
    }

    pub(super) fn removes_current(&self) -> bool {
        self.remove_current
    }
}
