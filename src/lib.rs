// Durability Models - Data-Oriented Programming (DOP) Architecture
//
// The host exposes one small integer per item stack, its wear counter, as the
// only client-visible model selector. This crate hands those integers out to
// named plugin models, keeps the assignment stable across restarts and writes
// the resource pack descriptors that make durability N render model N.
//
// Layout follows the engine convention:
// - *_data modules hold plain data
// - *_operations modules hold the functions that transform it
// - registry::ToolRegistry ties the lifecycle together

// Core modules
pub mod config;
pub mod error;

// Data model
pub mod domain;
pub mod index;

// Disk formats
pub mod persistence;
pub mod resource_pack;

// Lifecycle
pub mod registry;

pub use config::RegistryConfig;
pub use domain::{
    carrier_item, parse_slot, vanilla_catalog, CarrierItem, DomainCatalog, ModelIdentity, Slot,
};
pub use error::{RegistryError, RegistryResult};
pub use index::{BidirectionalMap, DurabilityIndexData, SharedIndex};
pub use persistence::{load_index, save_index, LoadReport, LoadStatus, REGISTRY_FILE_NAME};
pub use registry::{PrepareReport, ToolRegistry};
pub use resource_pack::{generate, EmissionReport, EmitOptions, OverrideOrder};
