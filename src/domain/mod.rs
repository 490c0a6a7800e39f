//! Domain types: carrier items, model identities and slots

pub mod carrier_item;
pub mod identity;

pub use carrier_item::{
    carrier_item, vanilla_catalog, CarrierItem, DomainCatalog, GENERATED_PARENT, HANDHELD_PARENT,
};
pub use identity::{parse_slot, ModelIdentity, Slot};
