//! Shared read access to a sealed index
//!
//! Runtime lookups read an `Arc` snapshot and never block each other. Late
//! changes go through `update`, which forks the current index, applies the
//! change to the copy and swaps it in only when the change succeeded.

use super::durability_index_data::DurabilityIndexData;
use super::durability_index_operations as ops;
use crate::domain::{ModelIdentity, Slot};
use crate::error::RegistryResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// Thread-safe handle to the current sealed index
pub struct SharedIndex {
    current: RwLock<Arc<DurabilityIndexData>>,
}

impl SharedIndex {
    /// Wrap an index, sealing it if it is not sealed yet
    pub fn new(mut data: DurabilityIndexData) -> Self {
        ops::seal(&mut data);
        Self {
            current: RwLock::new(Arc::new(data)),
        }
    }

    /// Current snapshot. Holding it does not block updates.
    pub fn snapshot(&self) -> Arc<DurabilityIndexData> {
        Arc::clone(&*self.current.read())
    }

    pub fn resolve(&self, domain_id: &str, durability: u32) -> Option<ModelIdentity> {
        ops::resolve(&self.current.read(), domain_id, durability).cloned()
    }

    pub fn slot_of(&self, domain_id: &str, identity: &ModelIdentity) -> Option<Slot> {
        ops::slot_of(&self.current.read(), domain_id, identity)
    }

    /// Copy-and-swap mutation of a sealed index
    pub fn update<T, F>(&self, change: F) -> RegistryResult<T>
    where
        F: FnOnce(&mut DurabilityIndexData) -> RegistryResult<T>,
    {
        let mut guard = self.current.write();
        let mut copy = ops::fork(&**guard);
        let result = change(&mut copy)?;
        ops::seal(&mut copy);
        *guard = Arc::new(copy);
        log::debug!(
            "[shared_index::update] Swapped in index with {} assignments",
            ops::len(&**guard)
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::vanilla_catalog;
    use crate::error::RegistryError;

    fn model(name: &str) -> ModelIdentity {
        ModelIdentity::new("test", name).expect("valid identity")
    }

    #[test]
    fn test_new_seals_and_resolves() {
        let catalog = vanilla_catalog();
        let shears = catalog.get("shears").expect("stock carrier");
        let mut data = ops::create_durability_index();
        ops::register(&mut data, shears, &model("a"), "tools").expect("room");

        let shared = SharedIndex::new(data);
        assert!(ops::is_sealed(&shared.snapshot()));
        assert_eq!(shared.resolve("shears", 1), Some(model("a")));
        assert_eq!(shared.slot_of("shears", &model("a")), Some(Slot::new("shears", 1)));
        assert_eq!(shared.resolve("shears", 2), None);
    }

    #[test]
    fn test_update_swaps_on_success_only() {
        let catalog = vanilla_catalog();
        let shears = catalog.get("shears").expect("stock carrier");
        let shared = SharedIndex::new(ops::create_durability_index());
        let before = shared.snapshot();

        let slot = shared
            .update(|data| ops::register(data, shears, &model("a"), "tools"))
            .expect("copy is writable");
        assert_eq!(slot.durability, 1);
        assert_eq!(ops::len(&before), 0);
        assert_eq!(shared.resolve("shears", 1), Some(model("a")));
        assert!(ops::is_sealed(&shared.snapshot()));

        let failed: RegistryResult<()> = shared.update(|data| {
            ops::register(data, shears, &model("b"), "tools")?;
            Err(RegistryError::sealed("finish the change"))
        });
        assert!(failed.is_err());
        assert_eq!(shared.slot_of("shears", &model("b")), None);
    }

    #[test]
    fn test_concurrent_readers() {
        let catalog = vanilla_catalog();
        let shears = catalog.get("shears").expect("stock carrier");
        let mut data = ops::create_durability_index();
        ops::register(&mut data, shears, &model("a"), "tools").expect("room");
        let shared = Arc::new(SharedIndex::new(data));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = Arc::clone(&shared);
                std::thread::spawn(move || shared.resolve("shears", 1))
            })
            .collect();
        for handle in handles {
            let resolved = handle.join().expect("reader thread finished");
            assert_eq!(resolved, Some(model("a")));
        }
    }
}
