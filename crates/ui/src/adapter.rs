//! Event-driven reconciliation between an inventory and its visuals.
//!
//! Bindings are keyed by stack identity: two stacks of the same kind and
//! quantity are two bindings. Any event that cannot be matched to the current
//! bindings is reported as a [`UiError`], never ignored.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use tracing::{debug, info};

use satchel_core::{DomainResult, StackId};
use satchel_events::{SubscriberError, SubscriberId};
use satchel_inventory::{Inventory, InventoryEvent, ItemStack};

use crate::error::UiError;
use crate::pool::{SlotVisual, VisualHandle, VisualPool};

#[derive(Debug, Default)]
pub struct InventoryUi {
    pool: VisualPool,
    bindings: HashMap<StackId, VisualHandle>,
    /// Bound visuals in display order; mirrors the inventory's stack order.
    placement: Vec<VisualHandle>,
    visible: bool,
}

/// A UI subscribed to an inventory.
#[derive(Debug)]
pub struct UiAttachment {
    pub ui: Rc<RefCell<InventoryUi>>,
    pub subscription: SubscriberId,
}

impl UiAttachment {
    /// Stop receiving events. The UI keeps its last state.
    pub fn detach(self, inventory: &mut Inventory) -> Rc<RefCell<InventoryUi>> {
        inventory.unsubscribe(self.subscription);
        self.ui
    }
}

impl InventoryUi {
    /// A hidden, empty UI.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the inventory's current stacks, then follow its events.
    pub fn attach(inventory: &mut Inventory) -> DomainResult<UiAttachment> {
        let mut ui = Self::new();
        ui.populate(inventory.stacks())?;

        let ui = Rc::new(RefCell::new(ui));
        let sink = Rc::clone(&ui);
        let subscription = inventory.subscribe(move |event| {
            sink.borrow_mut()
                .handle_event(event)
                .map_err(SubscriberError::from)
        });

        info!(
            inventory = %inventory.id(),
            %subscription,
            stacks = inventory.len(),
            "inventory ui attached"
        );
        Ok(UiAttachment { ui, subscription })
    }

    /// Bind one visual per stack, in order. Used on first attach.
    pub fn populate(&mut self, stacks: &[ItemStack]) -> Result<(), UiError> {
        for stack in stacks {
            self.bind(stack)?;
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: &InventoryEvent) -> Result<(), UiError> {
        match event {
            InventoryEvent::StackAdded(e) => self.bind(&e.stack),
            InventoryEvent::StackUpdated(e) => self.refresh(&e.stack),
            InventoryEvent::StacksRemoved(e) => {
                for stack in &e.stacks {
                    self.unbind(stack.stack_id())?;
                }
                Ok(())
            }
            InventoryEvent::Sorted(e) => self.reorder(&e.order),
            InventoryEvent::Changed(_) => Ok(()),
        }
    }

    fn bind(&mut self, stack: &ItemStack) -> Result<(), UiError> {
        let stack_id = stack.stack_id();
        if let Some(&handle) = self.bindings.get(&stack_id) {
            return Err(UiError::AlreadyBound { stack_id, handle });
        }

        let handle = self.pool.acquire();
        if let Some(visual) = self.pool.get_mut(handle) {
            visual.bind(stack);
        }
        self.bindings.insert(stack_id, handle);
        self.placement.push(handle);
        debug!(%stack_id, %handle, quantity = stack.quantity(), "bound visual");
        Ok(())
    }

    fn refresh(&mut self, stack: &ItemStack) -> Result<(), UiError> {
        let stack_id = stack.stack_id();
        let handle = *self
            .bindings
            .get(&stack_id)
            .ok_or(UiError::Unbound { stack_id })?;
        if let Some(visual) = self.pool.get_mut(handle) {
            visual.refresh(stack);
        }
        Ok(())
    }

    fn unbind(&mut self, stack_id: StackId) -> Result<(), UiError> {
        let handle = self
            .bindings
            .remove(&stack_id)
            .ok_or(UiError::Unbound { stack_id })?;
        self.placement.retain(|h| *h != handle);
        self.pool.release(handle);
        debug!(%stack_id, %handle, "released visual");
        Ok(())
    }

    /// Re-derive placement from the inventory's order without touching the pool.
    fn reorder(&mut self, order: &[StackId]) -> Result<(), UiError> {
        let distinct: HashSet<&StackId> = order.iter().collect();
        if order.len() != self.bindings.len() || distinct.len() != order.len() {
            return Err(UiError::OrderMismatch {
                order: order.len(),
                bound: self.bindings.len(),
            });
        }

        let placement = order
            .iter()
            .map(|stack_id| {
                self.bindings
                    .get(stack_id)
                    .copied()
                    .ok_or(UiError::Unbound { stack_id: *stack_id })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.placement = placement;
        Ok(())
    }

    /// Bound visuals in display order.
    pub fn placed(&self) -> impl Iterator<Item = &SlotVisual> + '_ {
        self.placement.iter().filter_map(|h| self.pool.get(*h))
    }

    pub fn visual_for(&self, stack_id: StackId) -> Option<&SlotVisual> {
        self.bindings.get(&stack_id).and_then(|h| self.pool.get(*h))
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn pool(&self) -> &VisualPool {
        &self.pool
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flip visibility; returns the new state. Bindings keep tracking either way.
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use satchel_inventory::{ItemKind, OrderMethod};

    fn wood() -> Arc<ItemKind> {
        Arc::new(ItemKind::stackable("wood", "Wood").with_icon("icons/wood.png"))
    }

    #[test]
    fn populate_binds_existing_stacks_in_order() {
        let mut inventory = Inventory::new(64).unwrap();
        inventory.add_item(&wood(), 100).unwrap();

        let mut ui = InventoryUi::new();
        ui.populate(inventory.stacks()).unwrap();

        let shown: Vec<i64> = ui.placed().map(SlotVisual::quantity).collect();
        assert_eq!(shown, vec![64, 36]);
        assert_eq!(ui.placed().next().unwrap().icon(), Some("icons/wood.png"));
    }

    #[test]
    fn duplicate_bind_is_a_violation() {
        let mut inventory = Inventory::new(64).unwrap();
        inventory.add_item(&wood(), 5).unwrap();

        let mut ui = InventoryUi::new();
        ui.populate(inventory.stacks()).unwrap();
        let err = ui.populate(inventory.stacks()).unwrap_err();
        assert!(matches!(err, UiError::AlreadyBound { .. }));
    }

    #[test]
    fn update_for_unknown_stack_is_a_violation() {
        let wood = wood();
        let mut inventory = Inventory::new(64).unwrap();
        inventory.add_item(&wood, 5).unwrap();

        // The UI never saw the existing stack.
        let mut ui = InventoryUi::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        inventory.subscribe(move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });
        inventory.add_item(&wood, 5).unwrap();

        let err = ui.handle_event(&log.borrow()[0]).unwrap_err();
        assert!(matches!(err, UiError::Unbound { .. }));
    }

    #[test]
    fn sorted_with_wrong_membership_is_a_violation() {
        let mut inventory = Inventory::new(64).unwrap();
        inventory.add_item(&wood(), 200).unwrap();
        let mut ui = InventoryUi::new();
        ui.populate(&inventory.stacks()[..2]).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        inventory.on_sorted(move |e| {
            sink.borrow_mut().push(e.clone());
            Ok(())
        });
        inventory.order_by_method(OrderMethod::Ascending).unwrap();

        let sorted = InventoryEvent::Sorted(log.borrow()[0].clone());
        assert!(matches!(
            ui.handle_event(&sorted),
            Err(UiError::OrderMismatch { order: 4, bound: 2 })
        ));
    }

    #[test]
    fn visibility_toggles_independently_of_bindings() {
        let mut ui = InventoryUi::new();
        assert!(!ui.is_visible());
        assert!(ui.toggle_visible());
        assert!(!ui.toggle_visible());
        ui.set_visible(true);
        assert!(ui.is_visible());
        assert_eq!(ui.bound_count(), 0);
    }
}
