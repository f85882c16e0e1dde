//! `satchel-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no presentation concerns).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{InventoryId, ItemKindId, StackId};
