//! Durability Index Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in durability_index_operations.rs

use super::bimap::BidirectionalMap;
use crate::domain::ModelIdentity;
use std::collections::{BTreeMap, HashMap};

/// Directory hint used when none is known, e.g. for entries loaded from disk
pub const DEFAULT_DIRECTORY_HINT: &str = "item";

/// Mappings for a single carrier item
#[derive(Debug, Clone, Default)]
pub struct DomainSlots {
    /// Durability <-> model identity, in registration order
    pub(crate) slots: BidirectionalMap<u32, ModelIdentity>,
    /// Durability -> output folder of the model descriptor
    pub(crate) directory_hints: HashMap<u32, String>,
}

/// All slot assignments known to this session
#[derive(Debug, Clone, Default)]
pub struct DurabilityIndexData {
    /// Domains keyed by carrier item id
    pub(crate) domains: BTreeMap<String, DomainSlots>,
    /// Set by the preparation barrier, after which the index is read-only
    pub(crate) sealed: bool,
}
