//! Item kinds: the immutable type descriptors stacks point at.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use satchel_core::{DomainError, DomainResult, ItemKindId};

/// Opaque effect attached to a kind. The engine carries it, never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    pub name: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl Effect {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

fn default_stackable() -> bool {
    true
}

/// Description of an item type.
///
/// Kinds are configuration data: built once (usually deserialized), then
/// shared behind `Arc` by every stack of that kind. Identity is `id`; two kinds
/// with the same id are the same kind as far as stacking is concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemKind {
    id: ItemKindId,
    name: String,
    #[serde(default = "default_stackable")]
    stackable: bool,
    /// Per-kind cap; falls back to the inventory-wide cap when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_stack: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    icon: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    effects: Vec<Effect>,
}

impl ItemKind {
    /// A stackable kind using the inventory-wide cap.
    pub fn stackable(id: impl Into<ItemKindId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stackable: true,
            max_stack: None,
            icon: None,
            effects: Vec::new(),
        }
    }

    /// A kind whose units never share a stack.
    pub fn unstackable(id: impl Into<ItemKindId>, name: impl Into<String>) -> Self {
        Self {
            stackable: false,
            ..Self::stackable(id, name)
        }
    }

    pub fn with_max_stack(mut self, max_stack: i64) -> Self {
        self.max_stack = Some(max_stack);
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn id(&self) -> &ItemKindId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_stackable(&self) -> bool {
        self.stackable
    }

    pub fn max_stack(&self) -> Option<i64> {
        self.max_stack
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Cap for one stack of this kind inside an inventory whose cap is `inventory_cap`.
    pub fn effective_max_stack(&self, inventory_cap: i64) -> i64 {
        if !self.stackable {
            return 1;
        }
        self.max_stack.unwrap_or(inventory_cap)
    }

    /// Reject records that would break stack invariants once used.
    pub fn validate(&self) -> DomainResult<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(DomainError::config("item kind id cannot be empty"));
        }
        if self.name.trim().is_empty() {
            return Err(DomainError::config(format!(
                "item kind `{}` has an empty name",
                self.id
            )));
        }
        if let Some(cap) = self.max_stack {
            if cap <= 0 {
                return Err(DomainError::config(format!(
                    "item kind `{}` has non-positive max_stack {cap}",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_cap_prefers_override_then_inventory() {
        let wood = ItemKind::stackable("wood", "Wood");
        assert_eq!(wood.effective_max_stack(64), 64);

        let pearl = ItemKind::stackable("pearl", "Ender Pearl").with_max_stack(16);
        assert_eq!(pearl.effective_max_stack(64), 16);

        let sword = ItemKind::unstackable("sword", "Sword").with_max_stack(10);
        assert_eq!(sword.effective_max_stack(64), 1);
    }

    #[test]
    fn deserializes_with_defaults() {
        let kind: ItemKind = serde_json::from_str(r#"{ "id": "stone", "name": "Stone" }"#).unwrap();
        assert!(kind.is_stackable());
        assert_eq!(kind.max_stack(), None);
        assert!(kind.effects().is_empty());

        let kind: ItemKind = serde_json::from_str(
            r#"{
                "id": "potion",
                "name": "Potion",
                "stackable": false,
                "icon": "icons/potion.png",
                "effects": [{ "name": "heal", "params": { "amount": "5" } }]
            }"#,
        )
        .unwrap();
        assert!(!kind.is_stackable());
        assert_eq!(kind.icon(), Some("icons/potion.png"));
        assert_eq!(kind.effects()[0], Effect::new("heal").with_param("amount", "5"));
    }

    #[test]
    fn validate_rejects_bad_records() {
        assert!(ItemKind::stackable("wood", "Wood").validate().is_ok());
        assert!(matches!(
            ItemKind::stackable("wood", "  ").validate(),
            Err(DomainError::Config(_))
        ));
        assert!(matches!(
            ItemKind::stackable("wood", "Wood").with_max_stack(0).validate(),
            Err(DomainError::Config(_))
        ));
    }
}
