//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **observer pattern** used between a domain owner
//! (e.g. an inventory) and the collaborators mirroring its state (e.g. a UI).
//!
//! ## Delivery model
//!
//! - **Synchronous**: `publish()` returns only after every subscriber has run.
//! - **Exactly once**: each subscriber sees each published message once.
//! - **Ordered**: subscribers run in registration order; messages arrive in
//!   publication order. There is no queue and no batching.
//! - **Single-threaded**: handlers are `FnMut` without `Send` bounds. Callers
//!   sharing a bus across threads must wrap its owner in their own lock.
//!
//! ## Failure model
//!
//! A subscriber that cannot apply a message returns a [`SubscriberError`].
//! The bus still delivers the message to the remaining subscribers, then
//! reports the first failure as a [`PublishError`]. Failures are never
//! swallowed.

use thiserror::Error;

/// Handle returned by [`EventBus::subscribe`]; pass it back to unsubscribe.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl core::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "subscriber#{}", self.0)
    }
}

/// Raised by a subscriber that could not process a message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubscriberError {
    /// The subscriber's mirrored state disagrees with the message.
    #[error("inconsistent subscriber state: {0}")]
    Inconsistent(String),
}

impl SubscriberError {
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }
}

/// First subscriber failure observed while publishing one message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{subscriber} failed on `{event_type}`: {source}")]
pub struct PublishError {
    pub subscriber: SubscriberId,
    pub event_type: &'static str,
    #[source]
    pub source: SubscriberError,
}

/// Boxed subscriber callback.
pub type Handler<M> = Box<dyn FnMut(&M) -> Result<(), SubscriberError>>;

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// Subscribers register explicitly and receive a [`SubscriberId`]; there is no
/// implicit global dispatch. Owners hold the bus by value and publish through
/// `&mut self`, which is what keeps delivery re-entrancy free: a handler cannot
/// call back into the owner while the owner is publishing.
pub trait EventBus<M> {
    type Error: core::fmt::Debug + 'static;

    /// Deliver `message` to every current subscriber, in registration order.
    fn publish(&mut self, message: &M) -> Result<(), Self::Error>;

    /// Register a handler; it receives every message published after this call.
    fn subscribe(&mut self, handler: Handler<M>) -> SubscriberId;

    /// Remove a handler. Returns `false` if the id was not registered.
    fn unsubscribe(&mut self, id: SubscriberId) -> bool;

    /// Number of registered subscribers.
    fn subscriber_count(&self) -> usize;
}
