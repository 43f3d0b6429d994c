//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Stable handle to a body owned by a [`BodyContainer`](crate::scene::BodyContainer).
    ///
    /// Handles are generational: once the body is destroyed the handle stops
    /// resolving, even if its slot is reused.
    pub struct BodyKey;
}

/// Handle-based arena used for body storage
pub type BodyArena<T> = SlotMap<BodyKey, T>;
