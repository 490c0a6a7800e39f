//! Model identities and slots, with their persisted string forms
//!
//! `ModelIdentity` renders as `namespace:model`, `Slot` as `domain@durability`.
//! Slots can only be parsed against a catalog since the durability bound
//! belongs to the domain.

use super::carrier_item::DomainCatalog;
use crate::error::{RegistryError, RegistryResult};
use std::fmt;
use std::str::FromStr;

/// Separator between namespace and model name
pub const IDENTITY_SEPARATOR: char = ':';
/// Separator between domain id and durability
pub const SLOT_SEPARATOR: char = '@';

/// Plugin-defined name of a visual variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelIdentity {
    pub namespace: String,
    pub model: String,
}

/// A (domain, durability) rendering selector
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    pub domain: String,
    pub durability: u32,
}

impl ModelIdentity {
    pub fn new(namespace: &str, model: &str) -> RegistryResult<Self> {
        let reason = if namespace.trim().is_empty() {
            Some("namespace is empty")
        } else if model.trim().is_empty() {
            Some("model is empty")
        } else if namespace.contains(IDENTITY_SEPARATOR) {
            Some("namespace may not contain ':'")
        } else if namespace.contains(['/', '\\']) || is_relative_segment(namespace) {
            Some("namespace must be a single folder name")
        } else if model.contains('\\')
            || model
                .split('/')
                .any(|segment| segment.is_empty() || is_relative_segment(segment))
        {
            Some("model path may not contain empty, '.' or '..' segments")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(RegistryError::InvalidIdentity {
                value: format!("{}{}{}", namespace, IDENTITY_SEPARATOR, model),
                reason: reason.to_string(),
            });
        }
        Ok(Self {
            namespace: namespace.to_string(),
            model: model.to_string(),
        })
    }
}

// Both parts end up as folder and file names inside the resource pack
fn is_relative_segment(segment: &str) -> bool {
    segment == "." || segment == ".."
}

impl fmt::Display for ModelIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.namespace, IDENTITY_SEPARATOR, self.model)
    }
}

impl FromStr for ModelIdentity {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(IDENTITY_SEPARATOR) {
            Some((namespace, model)) => ModelIdentity::new(namespace, model),
            None => Err(RegistryError::InvalidIdentity {
                value: s.to_string(),
                reason: "expected '<namespace>:<model>'".to_string(),
            }),
        }
    }
}

impl Slot {
    pub fn new(domain: &str, durability: u32) -> Self {
        Self {
            domain: domain.to_string(),
            durability,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.domain, SLOT_SEPARATOR, self.durability)
    }
}

/// Parse `domain@durability`, checking the domain exists and the durability
/// lies in `1..max_uses`
pub fn parse_slot(catalog: &DomainCatalog, text: &str) -> RegistryResult<Slot> {
    let invalid = |reason: String| RegistryError::InvalidSlot {
        value: text.to_string(),
        reason,
    };
    let (domain, durability) = text
        .rsplit_once(SLOT_SEPARATOR)
        .ok_or_else(|| invalid("expected '<domain>@<durability>'".to_string()))?;
    let durability: u32 = durability
        .trim()
        .parse()
        .map_err(|e| invalid(format!("durability '{}' is not an integer: {}", durability, e)))?;
    let max_uses = catalog
        .max_uses(domain)
        .ok_or_else(|| RegistryError::UnknownDomain {
            id: domain.to_string(),
        })?;
    if durability == 0 || durability >= max_uses {
        return Err(RegistryError::SlotOutOfRange {
            domain: domain.to_string(),
            durability,
            max_uses,
        });
    }
    Ok(Slot::new(domain, durability))
}
