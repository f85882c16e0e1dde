//! `satchel-events`: in-process event mechanics.
//!
//! Domain crates define their own event enums; this crate only provides the
//! contracts for describing them and fanning them out to subscribers.

pub mod bus;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Handler, PublishError, SubscriberError, SubscriberId};
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::InMemoryEventBus;
