//! Cycle detection for a single traversal.

use crate::reflect::Reflect;
use indexmap::IndexSet;
use std::any::TypeId;

/// Identity of a composite on the active path: the address of the data it
/// refers to, and the concrete type of the composite itself.
///
/// The type keeps a `Box<Vec<T>>` and the `Vec<T>` it owns apart even though
/// both report the address of the vector.
type Identity = (usize, TypeId);

/// The set of composites currently being rendered on the active call path.
///
/// One guard is created per top-level call and is never shared.
#[derive(Debug, Default)]
pub(crate) struct RecursionGuard {
    active: IndexSet<Identity>,
}

impl RecursionGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Builds the identity of `owner` for data at `target`.
    ///
    /// Returns `None` for zero-sized targets, which have no meaningful
    /// address and can not form a cycle.
    pub(crate) fn identity(owner: &dyn Reflect, target: &dyn Reflect) -> Option<Identity> {
        if std::mem::size_of_val(target) == 0 {
            return None;
        }
        let address = target as *const dyn Reflect as *const () as usize;
        Some((address, owner.concrete_type_id()))
    }

    /// Marks `identity` as being rendered.
    ///
    /// Returns `true` if it is already on the active path.
    pub(crate) fn enter(&mut self, identity: Identity) -> bool {
        !self.active.insert(identity)
    }

    /// Removes `identity` from the active path.
    pub(crate) fn leave(&mut self, identity: &Identity) {
        self.active.swap_remove(identity);
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.active.len()
    }
}
