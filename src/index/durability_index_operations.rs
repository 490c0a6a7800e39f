//! Durability Index Operations - Pure DOP Functions
//!
//! Functions that read or grow a `DurabilityIndexData`. Every mutating
//! function validates first and commits last, so a failed call leaves the
//! index exactly as it found it.

use super::bimap::InsertConflict;
use super::durability_index_data::{DomainSlots, DurabilityIndexData, DEFAULT_DIRECTORY_HINT};
use super::slot_allocator::{next_slot, RESERVED_SLOT};
use crate::domain::{CarrierItem, ModelIdentity, Slot};
use crate::error::{RegistryError, RegistryResult};
use std::collections::BTreeSet;

/// Create an empty, unsealed index
pub fn create_durability_index() -> DurabilityIndexData {
    DurabilityIndexData::default()
}

/// Register a model on a carrier item, returning its slot.
///
/// Registering a known pair returns the slot it already has. The directory
/// hint of a known pair is refreshed, since hints are not persisted.
pub fn register(
    data: &mut DurabilityIndexData,
    domain: &CarrierItem,
    identity: &ModelIdentity,
    directory_hint: &str,
) -> RegistryResult<Slot> {
    if data.sealed {
        log::error!(
            "[durability_index::register] Rejected '{}' on '{}': index is sealed",
            identity,
            domain.id
        );
        return Err(RegistryError::sealed("register a model"));
    }

    if let Some(existing) = data.domains.get_mut(&domain.id) {
        if let Some(&durability) = existing.slots.get_by_right(identity) {
            let hint = existing
                .directory_hints
                .entry(durability)
                .or_insert_with(|| directory_hint.to_string());
            if hint.as_str() != directory_hint {
                log::debug!(
                    "[durability_index::register] Directory hint for {}@{} changed '{}' -> '{}'",
                    domain.id,
                    durability,
                    hint,
                    directory_hint
                );
                *hint = directory_hint.to_string();
            }
            return Ok(Slot::new(&domain.id, durability));
        }
    }

    let used: BTreeSet<u32> = data
        .domains
        .get(&domain.id)
        .map(|entries| entries.slots.lefts().copied().collect())
        .unwrap_or_default();

    let durability = next_slot(&domain.id, domain.max_uses, &used).map_err(|err| match err {
        RegistryError::AllocationOverflow {
            domain, max_uses, ..
        } => RegistryError::AllocationOverflow {
            domain,
            model: identity.to_string(),
            max_uses,
        },
        other => other,
    })?;

    commit(data, &domain.id, durability, identity, directory_hint)?;

    log::info!(
        "[durability_index::register] Assigned {}@{} to '{}'",
        domain.id,
        durability,
        identity
    );
    Ok(Slot::new(&domain.id, durability))
}

/// Seed a known assignment, typically from the persisted registry file
pub fn insert_persisted(
    data: &mut DurabilityIndexData,
    domain: &CarrierItem,
    durability: u32,
    identity: &ModelIdentity,
) -> RegistryResult<Slot> {
    if data.sealed {
        return Err(RegistryError::sealed("seed a persisted slot"));
    }
    if durability == RESERVED_SLOT || durability >= domain.max_uses {
        return Err(RegistryError::SlotOutOfRange {
            domain: domain.id.clone(),
            durability,
            max_uses: domain.max_uses,
        });
    }

    commit(data, &domain.id, durability, identity, DEFAULT_DIRECTORY_HINT)?;
    Ok(Slot::new(&domain.id, durability))
}

fn commit(
    data: &mut DurabilityIndexData,
    domain_id: &str,
    durability: u32,
    identity: &ModelIdentity,
    directory_hint: &str,
) -> RegistryResult<()> {
    if let Some(entries) = data.domains.get(domain_id) {
        if entries.slots.contains_left(&durability) || entries.slots.contains_right(identity) {
            let conflict = if entries.slots.contains_left(&durability) {
                InsertConflict::LeftTaken
            } else {
                InsertConflict::RightTaken
            };
            return Err(conflict_error(domain_id, durability, identity, conflict));
        }
    }

    let entries = data
        .domains
        .entry(domain_id.to_string())
        .or_insert_with(DomainSlots::default);
    entries
        .slots
        .insert(durability, identity.clone())
        .map_err(|conflict| conflict_error(domain_id, durability, identity, conflict))?;
    entries
        .directory_hints
        .insert(durability, directory_hint.to_string());
    Ok(())
}

fn conflict_error(
    domain_id: &str,
    durability: u32,
    identity: &ModelIdentity,
    conflict: InsertConflict,
) -> RegistryError {
    let reason = match conflict {
        InsertConflict::LeftTaken => format!("durability {} is already assigned", durability),
        InsertConflict::RightTaken => format!("'{}' already owns another durability", identity),
    };
    RegistryError::BijectionViolation {
        domain: domain_id.to_string(),
        reason,
    }
}

/// Model rendered by a durability, if this index manages it
pub fn resolve<'a>(
    data: &'a DurabilityIndexData,
    domain_id: &str,
    durability: u32,
) -> Option<&'a ModelIdentity> {
    data.domains
        .get(domain_id)
        .and_then(|entries| entries.slots.get_by_left(&durability))
}

/// Slot assigned to a model on a carrier item
pub fn slot_of(
    data: &DurabilityIndexData,
    domain_id: &str,
    identity: &ModelIdentity,
) -> Option<Slot> {
    data.domains
        .get(domain_id)
        .and_then(|entries| entries.slots.get_by_right(identity))
        .map(|&durability| Slot::new(domain_id, durability))
}

/// Models of a domain in registration order
pub fn identities(data: &DurabilityIndexData, domain_id: &str) -> Vec<ModelIdentity> {
    data.domains
        .get(domain_id)
        .map(|entries| entries.slots.iter().map(|(_, id)| id.clone()).collect())
        .unwrap_or_default()
}

/// `(durability, identity, directory hint)` triples of a domain in registration order
pub fn entries<'a>(
    data: &'a DurabilityIndexData,
    domain_id: &str,
) -> Vec<(u32, &'a ModelIdentity, &'a str)> {
    data.domains
        .get(domain_id)
        .map(|entries| {
            entries
                .slots
                .iter()
                .map(move |(&durability, identity)| {
                    let hint = entries
                        .directory_hints
                        .get(&durability)
                        .map(String::as_str)
                        .unwrap_or(DEFAULT_DIRECTORY_HINT);
                    (durability, identity, hint)
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Directory hint recorded for a slot
pub fn directory_hint<'a>(
    data: &'a DurabilityIndexData,
    domain_id: &str,
    durability: u32,
) -> Option<&'a str> {
    data.domains
        .get(domain_id)
        .and_then(|entries| entries.directory_hints.get(&durability))
        .map(String::as_str)
}

/// Ids of every domain with at least one assignment, sorted
pub fn domains(data: &DurabilityIndexData) -> Vec<&str> {
    data.domains
        .iter()
        .filter(|(_, entries)| !entries.slots.is_empty())
        .map(|(id, _)| id.as_str())
        .collect()
}

/// Total number of assignments across all domains
pub fn len(data: &DurabilityIndexData) -> usize {
    data.domains.values().map(|entries| entries.slots.len()).sum()
}

pub fn is_empty(data: &DurabilityIndexData) -> bool {
    len(data) == 0
}

/// Drop every assignment. Only used when persisted state cannot be trusted.
pub fn clear(data: &mut DurabilityIndexData) -> RegistryResult<()> {
    if data.sealed {
        return Err(RegistryError::sealed("clear the index"));
    }
    data.domains.clear();
    Ok(())
}

/// Make the index read-only for the rest of the session
pub fn seal(data: &mut DurabilityIndexData) {
    if !data.sealed {
        log::info!(
            "[durability_index::seal] Sealing index with {} assignments across {} domains",
            len(data),
            domains(data).len()
        );
    }
    data.sealed = true;
}

pub fn is_sealed(data: &DurabilityIndexData) -> bool {
    data.sealed
}

/// Unsealed deep copy, the first half of a copy-and-swap update
pub fn fork(data: &DurabilityIndexData) -> DurabilityIndexData {
    DurabilityIndexData {
        domains: data.domains.clone(),
        sealed: false,
    }
}
