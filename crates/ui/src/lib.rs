//! UI reconciliation adapter for `satchel-inventory`.
//!
//! Mirrors an inventory's stacks as a set of pooled visuals, driven purely by
//! inventory events (no polling). Rendering itself is out of scope: a visual
//! here is the data a renderer would draw.

pub mod adapter;
pub mod error;
pub mod pool;

pub use adapter::{InventoryUi, UiAttachment};
pub use error::UiError;
pub use pool::{SlotVisual, VisualHandle, VisualPool};
