//! World pickups: a fixed amount of one kind, collectable exactly once.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use satchel_core::{DomainError, DomainResult, ItemKindId};

use crate::config::ItemCatalog;
use crate::inventory::Inventory;
use crate::kind::ItemKind;

/// Amounts a single pickup may carry.
pub const PICKUP_AMOUNT: RangeInclusive<i64> = 1..=64;

/// Configured pickup: which kind and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupDef {
    pub kind: ItemKindId,
    pub amount: i64,
}

impl PickupDef {
    pub fn validate(&self) -> DomainResult<()> {
        if !PICKUP_AMOUNT.contains(&self.amount) {
            return Err(DomainError::config(format!(
                "pickup amount for `{}` must be within {}..={} (got {})",
                self.kind,
                PICKUP_AMOUNT.start(),
                PICKUP_AMOUNT.end(),
                self.amount
            )));
        }
        Ok(())
    }
}

/// A pickup placed in the world.
#[derive(Debug, Clone)]
pub struct Pickup {
    kind: Arc<ItemKind>,
    amount: i64,
    collected: bool,
}

impl Pickup {
    pub fn new(kind: Arc<ItemKind>, amount: i64) -> DomainResult<Self> {
        PickupDef {
            kind: kind.id().clone(),
            amount,
        }
        .validate()?;
        Ok(Self {
            kind,
            amount,
            collected: false,
        })
    }

    /// Resolve a configured pickup against the catalog.
    pub fn from_def(def: &PickupDef, catalog: &ItemCatalog) -> DomainResult<Self> {
        Self::new(catalog.require(&def.kind)?, def.amount)
    }

    pub fn kind(&self) -> &Arc<ItemKind> {
        &self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }

    /// Move the pickup's items into `inventory`.
    ///
    /// Returns `false` without touching the inventory if it was already collected.
    pub fn collect(&mut self, inventory: &mut Inventory) -> DomainResult<bool> {
        if self.collected {
            debug!(kind = %self.kind.id(), "pickup already collected");
            return Ok(false);
        }
        self.collected = true;
        inventory.add_item(&self.kind, self.amount)?;
        Ok(true)
    }
}
