//! Ordered body container
//!
//! Owns every body of a scene in a slot-map arena and keeps an index of live
//! bodies sorted by layer. Mutation requested while the update pass is
//! running goes through three staging lists and is applied once the pass is
//! over:
//!
//! ```text
//! pending_add ──► ordered index ──► pass ──┬─► pending_delete ──► destroyed / released
//!                       ▲                  └─► pending_key_change ─┐
//!                       └──────────────────────────────────────────┘
//! ```
//!
//! Because nothing is inserted into the ordered index while it is being
//! walked, each enabled and active body is updated exactly once per pass,
//! even when it changes its own layer or spawns and removes siblings.

use std::cmp::Ordering;

use thiserror::Error;

use super::UpdateContext;
use crate::body::{Body, Layer};
use crate::foundation::collections::{BodyArena, BodyKey};

/// Invalid use of a body container
///
/// These are caller logic errors. They are logged and the offending call is a
/// no-op; nothing in the container changes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    /// The body is already owned by a container
    #[error("body is already managed by a body container")]
    AlreadyManaged,

    /// The handle does not resolve to a live body
    #[error("no live body for handle {0:?}")]
    UnknownBody(BodyKey),
}

/// Arena slot. `body` is `None` only while that body's `update()` runs.
pub(super) struct Slot {
    pub(super) body: Option<Box<dyn Body>>,
    retained: bool,
}

/// Sort key of the ordered index: the body's layer when it was placed, then
/// a container-wide insertion counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OrderKey {
    layer: Layer,
    sequence: u64,
}

impl Ord for OrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.layer
            .cmp(&other.layer)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for OrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, Copy)]
struct OrderedEntry {
    order: OrderKey,
    key: BodyKey,
}

/// Validate and stage a new body into `pending_add`.
///
/// A rejected body is dropped here. Shared by [`BodyContainer::add`] and [`UpdateContext::add`].
pub(super) fn stage_body(
    arena: &mut BodyArena<Slot>,
    pending_add: &mut Vec<BodyKey>,
    mut body: Box<dyn Body>,
    retained: bool,
) -> Result<BodyKey, UsageError> {
    if body.state().is_managed() {
        log::warn!("Tried to add a body that is already in a body container");
        return Err(UsageError::AlreadyManaged);
    }

    body.state_mut().set_managed(true);
    let key = arena.insert(Slot { body: Some(body), retained });
    pending_add.push(key);
    log::trace!("Staged body {:?} for insertion", key);
    Ok(key)
}

/// Ordered collection of bodies with deferred mutation
pub struct BodyContainer {
    arena: BodyArena<Slot>,
    ordered: Vec<OrderedEntry>,
    pending_add: Vec<BodyKey>,
    pending_delete: Vec<BodyKey>,
    pending_key_change: Vec<BodyKey>,
    released: Vec<Box<dyn Body>>,
    next_sequence: u64,
}

impl BodyContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            arena: BodyArena::with_key(),
            ordered: Vec::new(),
            pending_add: Vec::new(),
            pending_delete: Vec::new(),
            pending_key_change: Vec::new(),
            released: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Take ownership of a body.
    ///
    /// The body joins the ordered set at the start of the next update pass
    /// (or at the end of the current one, when called from inside it) and is
    /// destroyed by the container once flagged for deletion.
    ///
    /// # Errors
    /// [`UsageError::AlreadyManaged`] if the body is already owned by a
    /// container. The error is logged and the rejected body is dropped.
    pub fn add(&mut self, body: Box<dyn Body>) -> Result<BodyKey, UsageError> {
        stage_body(&mut self.arena, &mut self.pending_add, body, false)
    }

    /// Like [`add`](Self::add), but once deleted the body is handed back
    /// through [`take_released`](Self::take_released) instead of being dropped.
    ///
    /// # Errors
    /// [`UsageError::AlreadyManaged`] if the body is already owned by a container.
    pub fn add_retained(&mut self, body: Box<dyn Body>) -> Result<BodyKey, UsageError> {
        stage_body(&mut self.arena, &mut self.pending_add, body, true)
    }

    /// Flag a body for deletion at the end of the next update pass
    ///
    /// # Errors
    /// [`UsageError::UnknownBody`] if `key` does not resolve to a live body.
    pub fn remove(&mut self, key: BodyKey) -> Result<(), UsageError> {
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

    /// Look up a live body
    pub fn get(&self, key: BodyKey) -> Option<&dyn Body> {
        self.arena.get(key).and_then(|slot| slot.body.as_deref())
    }

    /// Look up a live body mutably
    pub fn get_mut(&mut self, key: BodyKey) -> Option<&mut (dyn Body + 'static)> {
        self.arena.get_mut(key).and_then(|slot| slot.body.as_deref_mut())
    }

    /// Whether `key` resolves to a live body
    pub fn contains(&self, key: BodyKey) -> bool {
        self.arena.contains_key(key)
    }

    /// Number of bodies scheduled: ordered plus staged for insertion or
    /// re-insertion
    pub fn len(&self) -> usize {
        self.ordered.len() + self.pending_add.len() + self.pending_key_change.len()
    }

    /// Whether no body is scheduled
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bodies of the ordered set, ascending by layer
    pub fn iter(&self) -> impl Iterator<Item = (BodyKey, &dyn Body)> + '_ {
        self.ordered.iter().filter_map(move |entry| {
            self.arena
                .get(entry.key)
                .and_then(|slot| slot.body.as_deref())
                .map(|body| (entry.key, body))
        })
    }

    /// Visit the ordered set ascending, passing the layer each body was
    /// sorted under
    pub fn for_each_in_order(&mut self, mut visit: impl FnMut(Layer, &mut (dyn Body + 'static))) {
        for entry in &self.ordered {
            let body = self.arena.get_mut(entry.key).and_then(|slot| slot.body.as_deref_mut());
            if let Some(body) = body {
                visit(entry.order.layer, body);
            }
        }
    }

    /// Retained bodies handed back since the last call
    pub fn take_released(&mut self) -> Vec<Box<dyn Body>> {
        std::mem::take(&mut self.released)
    }

    /// Sizes of the three staging lists, in order add / delete / key change
    pub fn staging_lens(&self) -> (usize, usize, usize) {
        (self.pending_add.len(), self.pending_delete.len(), self.pending_key_change.len())
    }

    /// Run one update pass.
    ///
    /// 1. Staged bodies join the ordered set.
    /// 2. Single ascending walk: bodies flagged for deletion leave the set;
    ///    enabled and active bodies are updated; bodies whose layer changed
    ///    leave the set for re-insertion.
    /// 3. Deleted bodies are destroyed (or released when retained).
    /// 4. Re-keyed bodies and bodies spawned during the walk join the set.
    ///
    /// All staging lists are empty when this returns.
    pub fn internal_update(&mut self) {
        self.drain_pending_add();

        {
            let Self {
                arena,
                ordered,
                pending_add,
                pending_delete,
                pending_key_change,
                ..
            } = self;

            let mut kept = 0;
            for index in 0..ordered.len() {
                let entry = ordered[index];
                let taken = arena.get_mut(entry.key).and_then(|slot| slot.body.take());
                let Some(mut body) = taken else {
                    log::error!("Ordered index refers to missing body {:?}", entry.key);
                    continue;
                };

                let mut keep = true;
                if body.state().is_to_be_deleted() {
                    pending_delete.push(entry.key);
                    keep = false;
                } else {
                    if body.state().should_update() {
                        let mut ctx = UpdateContext::new(entry.key, arena, pending_add);
                        body.update(&mut ctx);
                        if ctx.removes_current() {
                            body.mark_for_deletion();
                        }
                    }

                    if body.state().is_key_changed() {
                        pending_key_change.push(entry.key);
                        keep = false;
                    }
                }

                if let Some(slot) = arena.get_mut(entry.key) {
                    slot.body = Some(body);
                }

                if keep {
                    ordered[kept] = entry;
                    kept += 1;
                }
            }
            ordered.truncate(kept);
        }

        for key in std::mem::take(&mut self.pending_delete) {
            self.destroy(key);
        }

        let key_changed = std::mem::take(&mut self.pending_key_change);
        if !key_changed.is_empty() {
            for key in key_changed {
                self.add_direct(key);
            }
            self.sort_ordered();
        }

        self.drain_pending_add();
    }

    /// Destroy every body; retained bodies are released instead
    pub fn clear(&mut self) {
        let keys: Vec<BodyKey> = self.arena.keys().collect();
        for key in keys {
            self.destroy(key);
        }
        self.ordered.clear();
        self.pending_add.clear();
        self.pending_delete.clear();
        self.pending_key_change.clear();
    }

    fn drain_pending_add(&mut self) {
        if self.pending_add.is_empty() {
            return;
        }

        let staged = std::mem::take(&mut self.pending_add);
        for key in staged {
            self.add_direct(key);
        }
        self.sort_ordered();
    }

    /// Place a managed body into the ordered index under its current layer.
    /// The caller re-sorts once the batch is in.
    fn add_direct(&mut self, key: BodyKey) {
        let Some(body) = self.get_mut(key) else {
            log::error!("Tried to order missing body {:?}", key);
            return;
        };

        debug_assert!(body.state().is_managed());
        body.state_mut().reset_key_changed();
        let layer = body.layer();

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.ordered.push(OrderedEntry {
            order: OrderKey { layer, sequence },
            key,
        });
    }

    fn sort_ordered(&mut self) {
        self.ordered.sort_unstable_by(|a, b| a.order.cmp(&b.order));
    }

    fn destroy(&mut self, key: BodyKey) {
        let Some(slot) = self.arena.remove(key) else {
            return;
        };
        let Some(mut body) = slot.body else {
            return;
        };

        if slot.retained {
            body.state_mut().release();
            self.released.push(body);
            log::debug!("Released retained body {:?}", key);
        } else {
            log::debug!("Destroyed body {:?}", key);
        }
    }
}

impl Default for BodyContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BodyContainer {
    fn drop(&mut self) {
        if !self.arena.is_empty() {
            log::debug!("Destroying {} bodies with their container", self.arena.len());
        }
    }
}

impl std::fmt::Debug for BodyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyContainer")
            .field("ordered", &self.ordered.len())
            .field("pending_add", &self.pending_add.len())
            .field("pending_delete", &self.pending_delete.len())
            .field("pending_key_change", &self.pending_key_change.len())
            .field("released", &self.released.len())
            .finish()
    }
}
