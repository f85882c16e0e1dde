//! The stack sequence aggregate: decision logic for every inventory mutation.
//!
//! `StackSequence` never notifies anyone. `handle` plans the events a command
//! produces against the current state and `apply` folds them in; the
//! [`crate::Inventory`] facade runs both and publishes the result.

use std::collections::HashMap;
use std::sync::Arc;

use satchel_core::{Aggregate, AggregateRoot, DomainError, DomainResult, InventoryId, ItemKindId, StackId};

use crate::events::{
    InventoryEvent, RemovalReason, Sorted, StackAdded, StackUpdated, StacksRemoved,
};
use crate::kind::ItemKind;
use crate::order::OrderMethod;
use crate::stack::ItemStack;

/// Command: add `quantity` units of `kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    pub kind: Arc<ItemKind>,
    pub quantity: i64,
}

/// Command: remove `quantity` units of `kind`, consuming stacks front to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveQuantity {
    pub kind: ItemKindId,
    pub quantity: i64,
}

/// Command: reorder stacks by quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub method: OrderMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryCommand {
    AddItem(AddItem),
    RemoveQuantity(RemoveQuantity),
    /// Merge same-kind stacks into the fewest capacity-packed stacks.
    AggregateStacks,
    OrderBy(OrderBy),
}

/// Ordered stacks plus the inventory-wide cap.
///
/// Invariants kept by `handle`/`apply`:
/// - no stack has quantity `<= 0`
/// - no stack exceeds the effective cap of its kind
/// - order only changes through `Sorted` or through appends/removals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackSequence {
    id: InventoryId,
    max_stack_size: i64,
    stacks: Vec<ItemStack>,
    version: u64,
}

impl StackSequence {
    pub fn new(id: InventoryId, max_stack_size: i64) -> DomainResult<Self> {
        if max_stack_size <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "max_stack_size must be positive (got {max_stack_size})"
            )));
        }
        Ok(Self {
            id,
            max_stack_size,
            stacks: Vec::new(),
            version: 0,
        })
    }

    pub fn max_stack_size(&self) -> i64 {
        self.max_stack_size
    }

    pub fn stacks(&self) -> &[ItemStack] {
        &self.stacks
    }

    pub fn get(&self, id: StackId) -> Option<&ItemStack> {
        self.stacks.iter().find(|s| s.stack_id() == id)
    }

    /// Total units of `kind` across all stacks.
    pub fn count_of(&self, kind: &ItemKindId) -> i64 {
        self.stacks
            .iter()
            .filter(|s| s.is_kind(kind))
            .map(ItemStack::quantity)
            .sum()
    }

    pub fn effective_max_stack(&self, kind: &ItemKind) -> i64 {
        kind.effective_max_stack(self.max_stack_size)
    }

    /// An empty sequence with the same identity and cap, used to plan re-packing.
    fn scratch(&self) -> Self {
        Self {
            id: self.id,
            max_stack_size: self.max_stack_size,
            stacks: Vec::new(),
            version: 0,
        }
    }
}

impl AggregateRoot for StackSequence {
    type Id = InventoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for StackSequence {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::StackAdded(e) => {
                self.stacks.push(e.stack.clone());
            }
            InventoryEvent::StackUpdated(e) => {
                if let Some(stack) = self
                    .stacks
                    .iter_mut()
                    .find(|s| s.stack_id() == e.stack.stack_id())
                {
                    stack.set_quantity(e.stack.quantity());
                }
            }
            InventoryEvent::StacksRemoved(e) => {
                self.stacks
                    .retain(|s| !e.stacks.iter().any(|r| r.stack_id() == s.stack_id()));
            }
            InventoryEvent::Sorted(e) => {
                let position: HashMap<StackId, usize> =
                    e.order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
                // Stable: ids missing from the order keep their relative place at the end.
                self.stacks.sort_by_key(|s| {
                    position.get(&s.stack_id()).copied().unwrap_or(usize::MAX)
                });
            }
            // Coarse notification; carries no state.
            InventoryEvent::Changed(_) => return,
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::AddItem(cmd) => self.handle_add(&cmd.kind, cmd.quantity),
            InventoryCommand::RemoveQuantity(cmd) => self.handle_remove(&cmd.kind, cmd.quantity),
            InventoryCommand::AggregateStacks => self.handle_aggregate(),
            InventoryCommand::OrderBy(cmd) => Ok(self.handle_order(cmd.method)),
        }
    }
}

impl StackSequence {
    fn ensure_quantity(quantity: i64) -> Result<(), DomainError> {
        if quantity < 0 {
            return Err(DomainError::invalid_argument(format!(
                "quantity must be >= 0 (got {quantity})"
            )));
        }
        Ok(())
    }

    fn handle_add(
        &self,
        kind: &Arc<ItemKind>,
        quantity: i64,
    ) -> Result<Vec<InventoryEvent>, DomainError> {
        Self::ensure_quantity(quantity)?;
        let cap = self.effective_max_stack(kind);
        if cap <= 0 {
            return Err(DomainError::invalid_argument(format!(
                "item kind `{}` has non-positive max stack size {cap}",
                kind.id()
            )));
        }
        if quantity == 0 {
            return Ok(Vec::new());
        }

        if !kind.is_stackable() {
            // One unit per stack, never merged.
            return Ok((0..quantity)
                .map(|_| {
                    InventoryEvent::StackAdded(StackAdded {
                        stack: ItemStack::new(Arc::clone(kind), 1),
                    })
                })
                .collect());
        }

        let mut remaining = quantity;
        let mut events = Vec::new();

        // Top up existing stacks in their current order.
        for stack in self.stacks.iter().filter(|s| s.is_kind(kind.id())) {
            if remaining == 0 {
                break;
            }
            let space = cap - stack.quantity();
            if space <= 0 {
                continue;
            }
            let to_add = space.min(remaining);
            events.push(InventoryEvent::StackUpdated(StackUpdated {
                stack: stack.with_quantity(stack.quantity() + to_add),
                previous_quantity: stack.quantity(),
            }));
            remaining -= to_add;
        }

        while remaining > 0 {
            let to_add = cap.min(remaining);
            events.push(InventoryEvent::StackAdded(StackAdded {
                stack: ItemStack::new(Arc::clone(kind), to_add),
            }));
            remaining -= to_add;
        }

        Ok(events)
    }

    /// Consumes front to back. A shortfall still consumes every matching stack;
    /// nothing is rolled back.
    fn handle_remove(
        &self,
        kind: &ItemKindId,
        quantity: i64,
    ) -> Result<Vec<InventoryEvent>, DomainError> {
        Self::ensure_quantity(quantity)?;

        let mut remaining = quantity;
        let mut events = Vec::new();

        for stack in self.stacks.iter().filter(|s| s.is_kind(kind)) {
            if remaining == 0 {
                break;
            }
            if stack.quantity() > remaining {
                events.push(InventoryEvent::StackUpdated(StackUpdated {
                    stack: stack.with_quantity(stack.quantity() - remaining),
                    previous_quantity: stack.quantity(),
                }));
                remaining = 0;
            } else {
                remaining -= stack.quantity();
                events.push(InventoryEvent::StacksRemoved(StacksRemoved {
                    stacks: vec![stack.clone()],
                    reason: RemovalReason::Consumed,
                }));
            }
        }

        Ok(events)
    }

    /// Clears the sequence and re-adds each kind's total through the add
    /// policy, kinds in order of first appearance.
    fn handle_aggregate(&self) -> Result<Vec<InventoryEvent>, DomainError> {
        if self.stacks.is_empty() {
            return Ok(Vec::new());
        }

        let mut totals: Vec<(Arc<ItemKind>, i64)> = Vec::new();
        for stack in &self.stacks {
            match totals.iter_mut().find(|(k, _)| k.id() == stack.kind_id()) {
                Some((_, total)) => *total += stack.quantity(),
                None => totals.push((Arc::clone(stack.kind()), stack.quantity())),
            }
        }

        let mut events = vec![InventoryEvent::StacksRemoved(StacksRemoved {
            stacks: self.stacks.clone(),
            reason: RemovalReason::Aggregated,
        })];

        let mut scratch = self.scratch();
        for (kind, total) in totals {
            let added = scratch.handle_add(&kind, total)?;
            for ev in &added {
                scratch.apply(ev);
            }
            events.extend(added);
        }

        Ok(events)
    }

    fn handle_order(&self, method: OrderMethod) -> Vec<InventoryEvent> {
        let mut ordered: Vec<&ItemStack> = self.stacks.iter().collect();
        match method {
            OrderMethod::Ascending => ordered.sort_by_key(|s| s.quantity()),
            OrderMethod::Descending => ordered.sort_by_key(|s| core::cmp::Reverse(s.quantity())),
        }

        vec![InventoryEvent::Sorted(Sorted {
            method,
            order: ordered.into_iter().map(ItemStack::stack_id).collect(),
        })]
    }
}
