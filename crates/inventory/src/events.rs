//! Events published by an [`crate::Inventory`].
//!
//! Stack-level events are the primary channel; [`InventoryChanged`] is a
//! coarse "something changed" signal emitted at most once per mutating call,
//! after the stack-level events of that call.

use satchel_core::StackId;
use satchel_events::Event;

use crate::order::OrderMethod;
use crate::stack::ItemStack;

/// Event: a brand-new stack entered the sequence (appended at the end).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackAdded {
    pub stack: ItemStack,
}

/// Event: an existing stack's quantity changed; membership did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackUpdated {
    /// Snapshot after the update.
    pub stack: ItemStack,
    pub previous_quantity: i64,
}

/// Why stacks left the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalReason {
    /// Fully consumed by a removal request.
    Consumed,
    /// Cleared so aggregation can re-pack their contents.
    Aggregated,
}

/// Event: one or more stacks left the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StacksRemoved {
    /// Snapshots as they were just before removal.
    pub stacks: Vec<ItemStack>,
    pub reason: RemovalReason,
}

/// Event: sequence order changed; membership and quantities did not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorted {
    pub method: OrderMethod,
    /// Every stack id, in the new order.
    pub order: Vec<StackId>,
}

/// Event: coarse notification for batch consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryChanged {
    /// Inventory version after the call's stack-level events were applied.
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InventoryEvent {
    StackAdded(StackAdded),
    StackUpdated(StackUpdated),
    StacksRemoved(StacksRemoved),
    Sorted(Sorted),
    Changed(InventoryChanged),
}

impl InventoryEvent {
    /// Stacks this event is about (empty for order/coarse events).
    pub fn stacks(&self) -> &[ItemStack] {
        match self {
            InventoryEvent::StackAdded(e) => core::slice::from_ref(&e.stack),
            InventoryEvent::StackUpdated(e) => core::slice::from_ref(&e.stack),
            InventoryEvent::StacksRemoved(e) => &e.stacks,
            InventoryEvent::Sorted(_) | InventoryEvent::Changed(_) => &[],
        }
    }
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::StackAdded(_) => "inventory.stack.added",
            InventoryEvent::StackUpdated(_) => "inventory.stack.updated",
            InventoryEvent::StacksRemoved(_) => "inventory.stack.removed",
            InventoryEvent::Sorted(_) => "inventory.sorted",
            InventoryEvent::Changed(_) => "inventory.changed",
        }
    }

    fn version(&self) -> u32 {
        1
    }
}
