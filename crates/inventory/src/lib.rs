//! Inventory engine (slot-free, stack-based).
//!
//! This crate contains the stack-management rules (add with overflow, remove
//! with split, aggregate, sort) implemented as deterministic domain logic, plus
//! the facade that publishes every state change to subscribers.
//! No IO except the optional config loader.

pub mod config;
pub mod events;
pub mod inventory;
pub mod kind;
pub mod order;
pub mod pickup;
pub mod sequence;
pub mod stack;

pub use config::{ItemCatalog, SatchelConfig};
pub use events::{
    InventoryChanged, InventoryEvent, RemovalReason, Sorted, StackAdded, StackUpdated,
    StacksRemoved,
};
pub use inventory::Inventory;
pub use kind::{Effect, ItemKind};
pub use order::OrderMethod;
pub use pickup::{Pickup, PickupDef};
pub use sequence::{AddItem, InventoryCommand, OrderBy, RemoveQuantity, StackSequence};
pub use stack::ItemStack;

/// Cap used when neither the inventory nor the kind says otherwise.
pub const DEFAULT_MAX_STACK_SIZE: i64 = 64;
