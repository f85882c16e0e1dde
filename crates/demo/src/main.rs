//! Scripted session: collect configured pickups, grant a debug item, then
//! consume, aggregate and sort while a UI mirrors the inventory.

use anyhow::Context;

use satchel_core::ItemKindId;
use satchel_inventory::{Inventory, ItemKind, OrderMethod, Pickup, PickupDef, SatchelConfig};
use satchel_ui::InventoryUi;

fn builtin_config() -> SatchelConfig {
    SatchelConfig {
        items: vec![
            ItemKind::stackable("wood", "Wood"),
            ItemKind::stackable("stone", "Stone"),
            ItemKind::unstackable("sword", "Sword"),
        ],
        pickups: vec![
            PickupDef {
                kind: ItemKindId::new("wood"),
                amount: 64,
            },
            PickupDef {
                kind: ItemKindId::new("stone"),
                amount: 30,
            },
            PickupDef {
                kind: ItemKindId::new("wood"),
                amount: 36,
            },
        ],
        ..SatchelConfig::default()
    }
}

fn load_config() -> anyhow::Result<SatchelConfig> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SATCHEL_CONFIG").ok());

    match path {
        Some(path) => SatchelConfig::load(&path).with_context(|| format!("loading {path}")),
        None => {
            tracing::warn!("no config path given (arg or SATCHEL_CONFIG); using built-in catalog");
            let config = builtin_config();
            config.validate()?;
            Ok(config)
        }
    }
}

fn main() -> anyhow::Result<()> {
    satchel_observability::init();

    let config = load_config()?;
    let catalog = config.catalog()?;
    let mut inventory = Inventory::new(config.max_stack_size)?;
    let attachment = InventoryUi::attach(&mut inventory)?;

    for def in &config.pickups {
        let mut pickup = Pickup::from_def(def, &catalog)?;
        pickup.collect(&mut inventory)?;
    }

    let grant = catalog
        .iter()
        .next()
        .cloned()
        .context("catalog has no item kinds")?;
    inventory.add_item(&grant, 1)?;

    if attachment.ui.borrow_mut().toggle_visible() {
        tracing::info!(visuals = attachment.ui.borrow().bound_count(), "inventory ui shown");
    }

    let removed = inventory.try_remove_quantity(&grant, 50)?;
    tracing::info!(kind = %grant.id(), removed, "consumed items");

    inventory.aggregate_and_order_by_method(OrderMethod::Descending)?;

    let ui = attachment.ui.borrow();
    for visual in ui.placed() {
        tracing::info!(
            label = visual.label(),
            quantity = visual.quantity(),
            icon = visual.icon().unwrap_or("-"),
            "slot"
        );
    }
    tracing::info!(
        stacks = inventory.len(),
        pooled = ui.pool().created(),
        version = inventory.version(),
        "session finished"
    );
    print!("{}", inventory.describe());

    Ok(())
}
