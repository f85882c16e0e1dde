//! Free-list pool of slot visuals.
//!
//! Visuals are never destroyed: released ones go back on the free list and are
//! handed out again by `acquire`. The pool has no upper bound and never
//! shrinks, so its size is the high-water mark of simultaneously bound stacks.

use satchel_core::StackId;
use satchel_inventory::ItemStack;

/// Index of a visual inside its pool.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(usize);

impl VisualHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for VisualHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// What a renderer needs to draw one stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotVisual {
    handle: VisualHandle,
    binding: Option<StackId>,
    label: String,
    icon: Option<String>,
    quantity: i64,
    active: bool,
}

impl SlotVisual {
    fn idle(handle: VisualHandle) -> Self {
        Self {
            handle,
            binding: None,
            label: String::new(),
            icon: None,
            quantity: 0,
            active: false,
        }
    }

    pub fn handle(&self) -> VisualHandle {
        self.handle
    }

    pub fn binding(&self) -> Option<StackId> {
        self.binding
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn bind(&mut self, stack: &ItemStack) {
        self.binding = Some(stack.stack_id());
        self.active = true;
        self.refresh(stack);
    }

    pub(crate) fn refresh(&mut self, stack: &ItemStack) {
        self.label = stack.kind().name().to_string();
        self.icon = stack.kind().icon().map(str::to_string);
        self.quantity = stack.quantity();
    }
}

#[derive(Debug, Default)]
pub struct VisualPool {
    visuals: Vec<SlotVisual>,
    free: Vec<VisualHandle>,
}

impl VisualPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an idle visual, or create one if none is idle. The visual is
    /// active (but unbound) until released.
    pub fn acquire(&mut self) -> VisualHandle {
        let handle = match self.free.pop() {
            Some(handle) => handle,
            None => {
                let handle = VisualHandle(self.visuals.len());
                self.visuals.push(SlotVisual::idle(handle));
                handle
            }
        };
        self.visuals[handle.0].active = true;
        handle
    }

    /// Unbind, deactivate, and return a visual to the free list.
    ///
    /// Releasing an idle or unknown handle does nothing.
    pub fn release(&mut self, handle: VisualHandle) {
        if let Some(visual) = self.visuals.get_mut(handle.0) {
            if !visual.active {
                return;
            }
            *visual = SlotVisual::idle(handle);
            self.free.push(handle);
        }
    }

    pub fn get(&self, handle: VisualHandle) -> Option<&SlotVisual> {
        self.visuals.get(handle.0)
    }

    pub(crate) fn get_mut(&mut self, handle: VisualHandle) -> Option<&mut SlotVisual> {
        self.visuals.get_mut(handle.0)
    }

    /// Visuals ever created.
    pub fn created(&self) -> usize {
        self.visuals.len()
    }

    pub fn idle(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn released_visuals_are_reused() {
        let mut pool = VisualPool::new();
        let a = pool.acquire();
        let b = pool.acquire();
        assert_ne!(a, b);
        assert_eq!(pool.created(), 2);

        pool.release(a);
        assert_eq!(pool.idle(), 1);
        assert_eq!(pool.acquire(), a);
        assert_eq!(pool.created(), 2);
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn releasing_idle_visual_is_ignored() {
        let mut pool = VisualPool::new();
        let handle = pool.acquire();
        pool.release(handle);
        pool.release(handle);

        assert_eq!(pool.idle(), 1);
        let visual = pool.get(handle).unwrap();
        assert!(!visual.is_active());
        assert_eq!(visual.binding(), None);
    }
}
