//! Item stacks: one kind, one quantity, one identity.

use std::sync::Arc;

use satchel_core::{Entity, ItemKindId, StackId};

use crate::kind::ItemKind;

/// A quantity of one [`ItemKind`].
///
/// Stacks are only constructed and mutated by the inventory that owns them;
/// everyone else sees them through `&ItemStack` and the getters below. A stack
/// never removes itself: when its quantity would reach zero the owning
/// sequence drops it instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStack {
    id: StackId,
    kind: Arc<ItemKind>,
    quantity: i64,
}

impl ItemStack {
    pub(crate) fn new(kind: Arc<ItemKind>, quantity: i64) -> Self {
        Self {
            id: StackId::new(),
            kind,
            quantity,
        }
    }

    /// Same stack (same id) with a different quantity.
    pub(crate) fn with_quantity(&self, quantity: i64) -> Self {
        Self {
            id: self.id,
            kind: Arc::clone(&self.kind),
            quantity,
        }
    }

    pub(crate) fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
    }

    pub fn stack_id(&self) -> StackId {
        self.id
    }

    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    pub fn kind_id(&self) -> &ItemKindId {
        self.kind.id()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn is_kind(&self, kind: &ItemKindId) -> bool {
        self.kind.id() == kind
    }
}

impl Entity for ItemStack {
    type Id = StackId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_quantity_keeps_identity() {
        let wood = Arc::new(ItemKind::stackable("wood", "Wood"));
        let stack = ItemStack::new(Arc::clone(&wood), 10);
        let grown = stack.with_quantity(20);

        assert_eq!(grown.stack_id(), stack.stack_id());
        assert_eq!(grown.quantity(), 20);
        assert!(Arc::ptr_eq(grown.kind(), &wood));
    }

    #[test]
    fn equal_contents_are_distinct_entities() {
        let wood = Arc::new(ItemKind::stackable("wood", "Wood"));
        let a = ItemStack::new(Arc::clone(&wood), 10);
        let b = ItemStack::new(wood, 10);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
