/// A domain-agnostic event.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - delivered exactly once per subscriber, in emission order
pub trait Event: Clone + core::fmt::Debug + 'static {
    /// Stable event name/type identifier (e.g. "inventory.stack.added").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;
}
