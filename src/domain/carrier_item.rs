//! Carrier items and the catalog that knows their slot-space sizes
//!
//! A carrier item is a host item type whose wear counter is borrowed to pick a
//! model. Only its id and `max_uses` matter for allocation; the remaining fields
//! feed the root descriptor written by the resource pack emitter.

use std::collections::BTreeMap;

/// Base descriptor for hand-held tools
pub const HANDHELD_PARENT: &str = "item/handheld";
/// Base descriptor for flat items such as armor
pub const GENERATED_PARENT: &str = "item/generated";

/// A host item type used as a model carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierItem {
    pub id: String,
    /// Size of the slot space, i.e. host maximum damage + 1
    pub max_uses: u32,
    pub parent: String,
    pub default_texture: String,
    pub default_model: String,
}

/// Carrier items keyed by id
#[derive(Debug, Clone, Default)]
pub struct DomainCatalog {
    items: BTreeMap<String, CarrierItem>,
}

/// Create a carrier item using the host's default texture and model paths
pub fn carrier_item(id: &str, max_uses: u32, parent: &str) -> CarrierItem {
    CarrierItem {
        id: id.to_string(),
        max_uses,
        parent: parent.to_string(),
        default_texture: format!("minecraft:item/{}", id),
        default_model: format!("minecraft:item/{}", id),
    }
}

/// Stock damageable items: (id, maximum damage, parent)
const VANILLA_CARRIERS: &[(&str, u32, &str)] = &[
    ("shears", 238, HANDHELD_PARENT),
    ("flint_and_steel", 64, GENERATED_PARENT),
    ("fishing_rod", 64, HANDHELD_PARENT),
    ("carrot_on_a_stick", 25, HANDHELD_PARENT),
    ("bow", 384, GENERATED_PARENT),
    ("wooden_sword", 59, HANDHELD_PARENT),
    ("wooden_pickaxe", 59, HANDHELD_PARENT),
    ("wooden_axe", 59, HANDHELD_PARENT),
    ("wooden_shovel", 59, HANDHELD_PARENT),
    ("wooden_hoe", 59, HANDHELD_PARENT),
    ("stone_sword", 131, HANDHELD_PARENT),
    ("stone_pickaxe", 131, HANDHELD_PARENT),
    ("stone_axe", 131, HANDHELD_PARENT),
    ("stone_shovel", 131, HANDHELD_PARENT),
    ("stone_hoe", 131, HANDHELD_PARENT),
    ("iron_sword", 250, HANDHELD_PARENT),
    ("iron_pickaxe", 250, HANDHELD_PARENT),
    ("iron_axe", 250, HANDHELD_PARENT),
    ("iron_shovel", 250, HANDHELD_PARENT),
    ("iron_hoe", 250, HANDHELD_PARENT),
    ("golden_sword", 32, HANDHELD_PARENT),
    ("golden_pickaxe", 32, HANDHELD_PARENT),
    ("golden_axe", 32, HANDHELD_PARENT),
    ("golden_shovel", 32, HANDHELD_PARENT),
    ("golden_hoe", 32, HANDHELD_PARENT),
    ("diamond_sword", 1561, HANDHELD_PARENT),
    ("diamond_pickaxe", 1561, HANDHELD_PARENT),
    ("diamond_axe", 1561, HANDHELD_PARENT),
    ("diamond_shovel", 1561, HANDHELD_PARENT),
    ("diamond_hoe", 1561, HANDHELD_PARENT),
    ("leather_helmet", 55, GENERATED_PARENT),
    ("leather_chestplate", 80, GENERATED_PARENT),
    ("leather_leggings", 75, GENERATED_PARENT),
    ("leather_boots", 65, GENERATED_PARENT),
    ("iron_helmet", 165, GENERATED_PARENT),
    ("iron_chestplate", 240, GENERATED_PARENT),
    ("iron_leggings", 225, GENERATED_PARENT),
    ("iron_boots", 195, GENERATED_PARENT),
    ("diamond_helmet", 363, GENERATED_PARENT),
    ("diamond_chestplate", 528, GENERATED_PARENT),
    ("diamond_leggings", 495, GENERATED_PARENT),
    ("diamond_boots", 429, GENERATED_PARENT),
    ("shield", 336, GENERATED_PARENT),
    ("elytra", 432, GENERATED_PARENT),
];

/// Catalog with every stock damageable item
pub fn vanilla_catalog() -> DomainCatalog {
    let mut catalog = DomainCatalog::default();
    for (id, max_damage, parent) in VANILLA_CARRIERS {
        catalog.insert(carrier_item(id, max_damage + 1, parent));
    }
    catalog
}

impl DomainCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a carrier item, returning the previous entry
    pub fn insert(&mut self, item: CarrierItem) -> Option<CarrierItem> {
        self.items.insert(item.id.clone(), item)
    }

    pub fn get(&self, id: &str) -> Option<&CarrierItem> {
        self.items.get(id)
    }

    pub fn max_uses(&self, id: &str) -> Option<u32> {
        self.items.get(id).map(|item| item.max_uses)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarrierItem> {
        self.items.values()
    }
}
