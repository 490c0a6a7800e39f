//! Resource Pack Descriptor Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in emitter_operations.rs

use serde::{Deserialize, Serialize};

/// Texture layers of an item descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTextures {
    pub layer0: String,
}

/// Conditions under which an override applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverridePredicate {
    pub damaged: u8,
    pub damage: f64,
}

/// One entry of a root descriptor's `overrides` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOverride {
    pub predicate: OverridePredicate,
    pub model: String,
}

/// Descriptor of a carrier item, selecting a model per durability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDescriptor {
    pub parent: String,
    pub textures: ItemTextures,
    pub overrides: Vec<ModelOverride>,
}

/// Descriptor of a single plugin model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub parent: String,
    pub textures: ItemTextures,
}

/// Order of the per-model overrides inside a root descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrideOrder {
    /// Order in which models were registered
    Registration,
    /// Lowest damage threshold first, as the renderer expects
    #[default]
    AscendingDamage,
}

/// Settings for one emission run
#[derive(Debug, Clone, PartialEq)]
pub struct EmitOptions {
    /// Namespace owning the carrier item descriptors
    pub host_namespace: String,
    pub order: OverrideOrder,
    /// Replace per-model descriptors that already exist
    pub overwrite_model_descriptors: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            host_namespace: "minecraft".to_string(),
            order: OverrideOrder::default(),
            overwrite_model_descriptors: false,
        }
    }
}

/// Counters from one emission run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmissionReport {
    pub domains: usize,
    pub root_descriptors: usize,
    pub model_descriptors: usize,
    /// Per-model descriptors left alone because they already existed
    pub kept_existing: usize,
    pub failed: usize,
}
