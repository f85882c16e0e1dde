//! Configuration: item kinds, inventory cap, and pickup definitions.
//!
//! Loaded once at startup from JSON. The engine only ever reads the result.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use satchel_core::{DomainError, DomainResult, ItemKindId};

use crate::DEFAULT_MAX_STACK_SIZE;
use crate::kind::ItemKind;
use crate::pickup::PickupDef;

fn default_max_stack_size() -> i64 {
    DEFAULT_MAX_STACK_SIZE
}

/// Top-level configuration document.
///
/// ```json
/// {
///   "max_stack_size": 64,
///   "items": [{ "id": "wood", "name": "Wood" }],
///   "pickups": [{ "kind": "wood", "amount": 12 }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatchelConfig {
    #[serde(default = "default_max_stack_size")]
    pub max_stack_size: i64,
    #[serde(default)]
    pub items: Vec<ItemKind>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
}

impl Default for SatchelConfig {
    fn default() -> Self {
        Self {
            max_stack_size: DEFAULT_MAX_STACK_SIZE,
            items: Vec::new(),
            pickups: Vec::new(),
        }
    }
}

impl SatchelConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(raw: &str) -> DomainResult<Self> {
        let config: SatchelConfig = serde_json::from_str(raw)
            .map_err(|e| DomainError::config(format!("malformed config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn load(path: impl AsRef<Path>) -> DomainResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DomainError::config(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            items = config.items.len(),
            pickups = config.pickups.len(),
            max_stack_size = config.max_stack_size,
            "loaded config"
        );
        Ok(config)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.max_stack_size <= 0 {
            return Err(DomainError::config(format!(
                "max_stack_size must be positive (got {})",
                self.max_stack_size
            )));
        }
        let catalog = self.catalog()?;
        for pickup in &self.pickups {
            pickup.validate()?;
            if catalog.get(&pickup.kind).is_none() {
                return Err(DomainError::config(format!(
                    "pickup references unknown item kind `{}`",
                    pickup.kind
                )));
            }
        }
        Ok(())
    }

    /// Index the configured kinds.
    pub fn catalog(&self) -> DomainResult<ItemCatalog> {
        ItemCatalog::from_kinds(self.items.iter().cloned())
    }
}

/// Read-only registry of item kinds, handing out shared handles.
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    kinds: Vec<Arc<ItemKind>>,
    index: HashMap<ItemKindId, usize>,
}

impl ItemCatalog {
    /// Build from kinds in declaration order; duplicate ids are rejected.
    pub fn from_kinds(kinds: impl IntoIterator<Item = ItemKind>) -> DomainResult<Self> {
        let mut catalog = Self::default();
        for kind in kinds {
            kind.validate()?;
            if catalog.index.contains_key(kind.id()) {
                return Err(DomainError::config(format!(
                    "duplicate item kind `{}`",
                    kind.id()
                )));
            }
            catalog.index.insert(kind.id().clone(), catalog.kinds.len());
            catalog.kinds.push(Arc::new(kind));
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &ItemKindId) -> Option<&Arc<ItemKind>> {
        self.index.get(id).map(|&i| &self.kinds[i])
    }

    pub fn require(&self, id: &ItemKindId) -> DomainResult<Arc<ItemKind>> {
        self.get(id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(format!("item kind `{id}`")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ItemKind>> {
        self.kinds.iter()
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "max_stack_size": 32,
        "items": [
            { "id": "wood", "name": "Wood", "icon": "icons/wood.png" },
            { "id": "pearl", "name": "Pearl", "max_stack": 16 },
            { "id": "sword", "name": "Sword", "stackable": false }
        ],
        "pickups": [
            { "kind": "wood", "amount": 12 },
            { "kind": "sword", "amount": 1 }
        ]
    }"#;

    #[test]
    fn loads_sample_document() {
        let config = SatchelConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.max_stack_size, 32);
        assert_eq!(config.pickups.len(), 2);

        let catalog = config.catalog().unwrap();
        assert_eq!(catalog.len(), 3);
        let names: Vec<&str> = catalog.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["Wood", "Pearl", "Sword"]);
        assert_eq!(
            catalog.require(&ItemKindId::new("pearl")).unwrap().max_stack(),
            Some(16)
        );
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        let config = SatchelConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SatchelConfig::default());
        assert_eq!(config.max_stack_size, DEFAULT_MAX_STACK_SIZE);
    }

    #[test]
    fn rejects_invalid_documents() {
        let cases = [
            r#"{ "max_stack_size": 0 }"#,
            r#"{ "items": [{ "id": "a", "name": "A" }, { "id": "a", "name": "B" }] }"#,
            r#"{ "items": [{ "id": "a", "name": "" }] }"#,
            r#"{ "items": [{ "id": "a", "name": "A" }], "pickups": [{ "kind": "b", "amount": 1 }] }"#,
            r#"{ "items": [{ "id": "a", "name": "A" }], "pickups": [{ "kind": "a", "amount": 65 }] }"#,
            r#"{ "items": "#,
        ];
        for raw in cases {
            assert!(
                matches!(SatchelConfig::from_json_str(raw), Err(DomainError::Config(_))),
                "expected config error for {raw}"
            );
        }
    }

    #[test]
    fn require_reports_unknown_kinds() {
        let catalog = ItemCatalog::default();
        assert!(matches!(
            catalog.require(&ItemKindId::new("ghost")),
            Err(DomainError::NotFound(_))
        ));
    }
}
