use thiserror::Error;

use satchel_core::{DomainError, StackId};
use satchel_events::SubscriberError;

use crate::pool::VisualHandle;

/// Binding-consistency failures. Each one means the adapter and the inventory
/// disagree, which is a programming error upstream.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UiError {
    #[error("stack {stack_id} has no bound visual")]
    Unbound { stack_id: StackId },

    #[error("stack {stack_id} is already bound to {handle}")]
    AlreadyBound {
        stack_id: StackId,
        handle: VisualHandle,
    },

    #[error("sorted order lists {order} stacks but {bound} are bound")]
    OrderMismatch { order: usize, bound: usize },
}

impl From<UiError> for SubscriberError {
    fn from(err: UiError) -> Self {
        SubscriberError::inconsistent(err.to_string())
    }
}

impl From<UiError> for DomainError {
    fn from(err: UiError) -> Self {
        DomainError::consistency(err.to_string())
    }
}
