//! Inventory facade: the public engine API.
//!
//! Every mutating call runs the same pipeline:
//!
//! 1. **Decide** – [`StackSequence::handle`] plans the stack-level events
//! 2. **Apply** – the events are folded into the sequence
//! 3. **Publish** – each event goes to every subscriber, in order, followed by
//!    one [`InventoryChanged`] if the call changed anything
//!
//! All three happen before the call returns. The inventory has a single
//! logical owner: mutation takes `&mut self` and there is no internal locking,
//! so concurrent callers need their own mutual exclusion around it.

use std::sync::Arc;

use tracing::{debug, info, trace, warn};

use satchel_core::{AggregateRoot, DomainError, DomainResult, InventoryId, ItemKindId};
use satchel_events::{
    Event, EventBus, InMemoryEventBus, PublishError, SubscriberError, SubscriberId, execute,
};

use crate::events::{
    InventoryChanged, InventoryEvent, Sorted, StackAdded, StackUpdated, StacksRemoved,
};
use crate::kind::ItemKind;
use crate::order::OrderMethod;
use crate::sequence::{AddItem, InventoryCommand, OrderBy, RemoveQuantity, StackSequence};
use crate::stack::ItemStack;

/// A slot-free, stack-based inventory.
#[derive(Debug)]
pub struct Inventory {
    sequence: StackSequence,
    bus: InMemoryEventBus<InventoryEvent>,
}

impl Inventory {
    /// Create an empty inventory whose stacks hold at most `max_stack_size`
    /// units unless a kind overrides it.
    pub fn new(max_stack_size: i64) -> DomainResult<Self> {
        Ok(Self {
            sequence: StackSequence::new(InventoryId::new(), max_stack_size)?,
            bus: InMemoryEventBus::new(),
        })
    }

    pub fn id(&self) -> InventoryId {
        *self.sequence.id()
    }

    /// Number of stack-level events applied so far.
    pub fn version(&self) -> u64 {
        self.sequence.version()
    }

    pub fn max_stack_size(&self) -> i64 {
        self.sequence.max_stack_size()
    }

    pub fn effective_max_stack(&self, kind: &ItemKind) -> i64 {
        self.sequence.effective_max_stack(kind)
    }

    /// Read-only view of the stacks in presentation order.
    pub fn stacks(&self) -> &[ItemStack] {
        self.sequence.stacks()
    }

    pub fn len(&self) -> usize {
        self.sequence.stacks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.stacks().is_empty()
    }

    pub fn count_of(&self, kind: &ItemKindId) -> i64 {
        self.sequence.count_of(kind)
    }

    /// Add `quantity` units of `kind`; returns the leftover that could not be placed.
    ///
    /// The number of stacks is unbounded, so the leftover is always `0`.
    pub fn add_item(&mut self, kind: &Arc<ItemKind>, quantity: i64) -> DomainResult<i64> {
        let events = self.dispatch(InventoryCommand::AddItem(AddItem {
            kind: Arc::clone(kind),
            quantity,
        }))?;

        info!(
            kind = %kind.id(),
            quantity,
            events = events.len(),
            stacks = self.len(),
            "added items"
        );
        Ok(0)
    }

    /// Remove `quantity` units of `kind`, front to back.
    ///
    /// Returns `false` when the inventory held less than `quantity`. In that
    /// case every stack of the kind has still been consumed: removal is not
    /// rolled back.
    pub fn try_remove_quantity(&mut self, kind: &ItemKind, quantity: i64) -> DomainResult<bool> {
        let available = self.count_of(kind.id());
        self.dispatch(InventoryCommand::RemoveQuantity(RemoveQuantity {
            kind: kind.id().clone(),
            quantity,
        }))?;

        let satisfied = available >= quantity;
        if satisfied {
            info!(kind = %kind.id(), quantity, "removed items");
        } else {
            warn!(
                kind = %kind.id(),
                requested = quantity,
                consumed = available,
                "insufficient quantity; consumed all available"
            );
        }
        Ok(satisfied)
    }

    /// Merge same-kind stacks into the fewest capacity-packed stacks.
    pub fn aggregate(&mut self) -> DomainResult<()> {
        let events = self.dispatch(InventoryCommand::AggregateStacks)?;
        info!(events = events.len(), stacks = self.len(), "aggregated stacks");
        Ok(())
    }

    /// Stable sort of the stacks by quantity.
    pub fn order_by_method(&mut self, method: OrderMethod) -> DomainResult<()> {
        self.dispatch(InventoryCommand::OrderBy(OrderBy { method }))?;
        info!(%method, stacks = self.len(), "ordered stacks");
        Ok(())
    }

    /// Aggregate, then order.
    ///
    /// A subscriber failure during aggregation does not skip the ordering
    /// step; the first error is returned once both have run.
    pub fn aggregate_and_order_by_method(&mut self, method: OrderMethod) -> DomainResult<()> {
        let aggregated = self.aggregate();
        if let Err(err) = &aggregated {
            if !matches!(err, DomainError::ConsistencyViolation(_)) {
                return aggregated;
            }
        }
        let ordered = self.order_by_method(method);
        aggregated.and(ordered)
    }

    /// Subscribe to every inventory event.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriberId
    where
        F: FnMut(&InventoryEvent) -> Result<(), SubscriberError> + 'static,
    {
        self.bus.subscribe(Box::new(handler))
    }

    pub fn on_stack_added<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(&StackAdded) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(move |event| match event {
            InventoryEvent::StackAdded(e) => handler(e),
            _ => Ok(()),
        })
    }

    pub fn on_stack_updated<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(&StackUpdated) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(move |event| match event {
            InventoryEvent::StackUpdated(e) => handler(e),
            _ => Ok(()),
        })
    }

    pub fn on_stack_removed<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(&StacksRemoved) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(move |event| match event {
            InventoryEvent::StacksRemoved(e) => handler(e),
            _ => Ok(()),
        })
    }

    pub fn on_sorted<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(&Sorted) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(move |event| match event {
            InventoryEvent::Sorted(e) => handler(e),
            _ => Ok(()),
        })
    }

    pub fn on_changed<F>(&mut self, mut handler: F) -> SubscriberId
    where
        F: FnMut(&InventoryChanged) -> Result<(), SubscriberError> + 'static,
    {
        self.subscribe(move |event| match event {
            InventoryEvent::Changed(e) => handler(e),
            _ => Ok(()),
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Human-readable dump, one `name quantity` line per stack.
    pub fn describe(&self) -> String {
        let mut out = String::from("Inventory:\n");
        for stack in self.stacks() {
            out.push_str(stack.kind().name());
            out.push(' ');
            out.push_str(&stack.quantity().to_string());
            out.push('\n');
        }
        out.push('\n');
        out
    }

    fn dispatch(&mut self, command: InventoryCommand) -> DomainResult<Vec<InventoryEvent>> {
        let events = execute(&mut self.sequence, &command)?;

        let mut failure = None;
        for event in &events {
            debug!(
                event_type = event.event_type(),
                stacks = ?event.stacks().iter().map(|s| (s.stack_id(), s.quantity())).collect::<Vec<_>>(),
                version = self.sequence.version(),
                "inventory event"
            );
            self.publish(event, &mut failure);
        }

        if !events.is_empty() {
            let changed = InventoryEvent::Changed(InventoryChanged {
                version: self.sequence.version(),
            });
            self.publish(&changed, &mut failure);
            trace!("{}", self.describe());
        }

        match failure {
            Some(err) => Err(DomainError::consistency(err.to_string())),
            None => Ok(events),
        }
    }

    /// Keep delivering after a failure so other subscribers stay in sync;
    /// remember the first failure for the caller.
    fn publish(&mut self, event: &InventoryEvent, failure: &mut Option<PublishError>) {
        if let Err(err) = self.bus.publish(event) {
            failure.get_or_insert(err);
        }
    }
}
