//! Slot Allocator - gap-filling durability allocation
//!
//! Pure function of the used-slot set. Slot 0 is never handed out, the lowest
//! hole is reused before the run is extended, and running past `max_uses` is
//! an error rather than a clamp.

use crate::error::{RegistryError, RegistryResult};
use std::collections::BTreeSet;

/// Durability reserved for the host's default representation
pub const RESERVED_SLOT: u32 = 0;

/// Choose the next free durability in a domain
pub fn next_slot(domain: &str, max_uses: u32, used: &BTreeSet<u32>) -> RegistryResult<u32> {
    let candidate = if used.is_empty() {
        1
    } else {
        let count = used.len() as u32;
        let largest = used.iter().next_back().copied().unwrap_or(0);
        if largest > count {
            // BTreeSet iterates ascending, so the first slot out of place marks the hole
            used.iter()
                .zip(1u32..)
                .find(|(slot, expected)| **slot != *expected)
                .map(|(_, expected)| expected)
                .unwrap_or(count + 1)
        } else {
            count + 1
        }
    };

    if candidate >= max_uses {
        log::error!(
            "[slot_allocator::next_slot] Domain '{}' is full: {} slots used, bound {}",
            domain,
            used.len(),
            max_uses
        );
        return Err(RegistryError::AllocationOverflow {
            domain: domain.to_string(),
            model: String::new(),
            max_uses,
        });
    }

    Ok(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn used(slots: &[u32]) -> BTreeSet<u32> {
        slots.iter().copied().collect()
    }

    #[test]
    fn test_empty_domain_starts_at_one() {
        assert_eq!(next_slot("shears", 239, &used(&[])).ok(), Some(1));
    }

    #[test]
    fn test_fills_lowest_gap() {
        assert_eq!(next_slot("shears", 239, &used(&[1, 2, 4])).ok(), Some(3));
        assert_eq!(next_slot("shears", 239, &used(&[2, 3])).ok(), Some(1));
        assert_eq!(next_slot("shears", 239, &used(&[1, 5, 9])).ok(), Some(2));
    }

    #[test]
    fn test_dense_run_appends() {
        assert_eq!(next_slot("shears", 239, &used(&[1, 2, 3])).ok(), Some(4));
    }

    #[test]
    fn test_never_returns_reserved() {
        for bound in 2..10 {
            let slot = next_slot("d", bound, &used(&[])).expect("room for one slot");
            assert_ne!(slot, RESERVED_SLOT);
        }
    }

    #[test]
    fn test_overflow() {
        // Bound 4 leaves slots 1..=3
        let err = next_slot("shears", 4, &used(&[1, 2, 3])).expect_err("domain is full");
        match err {
            RegistryError::AllocationOverflow {
                domain, max_uses, ..
            } => {
                assert_eq!(domain, "shears");
                assert_eq!(max_uses, 4);
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(next_slot("tiny", 1, &used(&[])).is_err());
    }
}
