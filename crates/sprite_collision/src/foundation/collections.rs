//! Specialized collection types

pub use slotmap::{Key, SlotMap};

slotmap::new_key_type! {
    /// Stable handle to a body owned by a collision world
    pub struct BodyHandle;

    /// Stable handle to a group of bodies
    pub struct GroupHandle;
}

/// Handle-based map using slot map for stable references
pub type HandleMap<K, T> = SlotMap<K, T>;

/// Borrow two distinct entries mutably at once.
///
/// Returns `None` when either key is missing or both keys are equal.
pub fn get_pair_mut<K: Key, T>(map: &mut HandleMap<K, T>, a: K, b: K) -> Option<(&mut T, &mut T)> {
    if a == b {
        return None;
    }
    let [first, second] = map.get_disjoint_mut([a, b])?;
    Some((first, second))
}
