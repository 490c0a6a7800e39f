//! Tool registry - the owned context plugins register models through
//!
//! Lifecycle: `new` -> `load` -> any number of `register` calls -> `prepare`
//! (seal, save, emit) -> runtime lookups through `shared`. Pass the registry
//! to whatever needs it; there is no process-wide instance.

use crate::config::RegistryConfig;
use crate::domain::{DomainCatalog, ModelIdentity, Slot};
use crate::error::{RegistryError, RegistryResult};
use crate::index::{self, DurabilityIndexData, SharedIndex};
use crate::persistence::{self, LoadReport};
use crate::resource_pack::{self, EmissionReport};
use std::sync::Arc;

enum RegistryState {
    Registering(DurabilityIndexData),
    Sealed(Arc<SharedIndex>),
}

/// What the preparation barrier did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareReport {
    pub assignments: usize,
    /// False when saving was disabled or failed; the mapping then only lives in memory
    pub saved: bool,
    pub emission: Option<EmissionReport>,
}

/// Registry of durability slots for every carrier item
pub struct ToolRegistry {
    config: RegistryConfig,
    catalog: DomainCatalog,
    state: RegistryState,
}

impl ToolRegistry {
    pub fn new(config: RegistryConfig, catalog: DomainCatalog) -> RegistryResult<Self> {
        if let Err(e) = config.validate() {
            log::error!("[ToolRegistry::new] Configuration validation failed: {}", e);
            return Err(e);
        }

        log::debug!(
            "[ToolRegistry::new] {} carrier items, registry at {}",
            catalog.len(),
            config.registry_path().display()
        );
        Ok(Self {
            config,
            catalog,
            state: RegistryState::Registering(index::create_durability_index()),
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DomainCatalog {
        &self.catalog
    }

    /// Fill the still-empty in-memory index from the registry file
    pub fn load(&mut self) -> RegistryResult<LoadReport> {
        let data = match &mut self.state {
            RegistryState::Registering(data) => data,
            RegistryState::Sealed(_) => return Err(RegistryError::sealed("load the registry")),
        };
        if !index::is_empty(data) {
            log::error!(
                "[ToolRegistry::load] Refusing to load over {} live assignments",
                index::len(data)
            );
            return Err(RegistryError::StateError {
                expected: "empty index".to_string(),
                actual: format!("{} assignments", index::len(data)),
            });
        }
        let outcome = persistence::load_index(&self.config.registry_path(), &self.catalog);
        *data = outcome.index;
        Ok(outcome.report)
    }

    /// Assign (or look up) the slot of a model on a carrier item
    pub fn register(
        &mut self,
        domain_id: &str,
        identity: &ModelIdentity,
        directory_hint: &str,
    ) -> RegistryResult<Slot> {
        let domain = self
            .catalog
            .get(domain_id)
            .ok_or_else(|| RegistryError::UnknownDomain {
                id: domain_id.to_string(),
            })?;
        match &mut self.state {
            RegistryState::Registering(data) => {
                index::register(data, domain, identity, directory_hint).map_err(|err| {
                    log::error!("[ToolRegistry::register] {}", err);
                    err
                })
            }
            RegistryState::Sealed(_) => {
                log::error!(
                    "[ToolRegistry::register] '{}' on '{}' arrived after preparation",
                    identity,
                    domain_id
                );
                Err(RegistryError::sealed("register a model"))
            }
        }
    }

    pub fn resolve(&self, domain_id: &str, durability: u32) -> Option<ModelIdentity> {
        match &self.state {
            RegistryState::Registering(data) => {
                index::resolve(data, domain_id, durability).cloned()
            }
            RegistryState::Sealed(shared) => shared.resolve(domain_id, durability),
        }
    }

    pub fn slot_of(&self, domain_id: &str, identity: &ModelIdentity) -> Option<Slot> {
        match &self.state {
            RegistryState::Registering(data) => index::slot_of(data, domain_id, identity),
            RegistryState::Sealed(shared) => shared.slot_of(domain_id, identity),
        }
    }

    pub fn identities(&self, domain_id: &str) -> Vec<ModelIdentity> {
        match &self.state {
            RegistryState::Registering(data) => index::identities(data, domain_id),
            RegistryState::Sealed(shared) => index::identities(&shared.snapshot(), domain_id),
        }
    }

    pub fn is_sealed(&self) -> bool {
        matches!(self.state, RegistryState::Sealed(_))
    }

    /// Runtime lookup handle, available once prepared
    pub fn shared(&self) -> Option<Arc<SharedIndex>> {
        match &self.state {
            RegistryState::Registering(_) => None,
            RegistryState::Sealed(shared) => Some(Arc::clone(shared)),
        }
    }

    /// The preparation barrier: seal, persist, emit.
    ///
    /// Save and emission failures are logged and reported, never returned.
    pub fn prepare(&mut self) -> RegistryResult<PrepareReport> {
        let data = match &mut self.state {
            RegistryState::Registering(data) => std::mem::take(data),
            RegistryState::Sealed(_) => return Err(RegistryError::sealed("prepare twice")),
        };
        let shared = Arc::new(SharedIndex::new(data));
        self.state = RegistryState::Sealed(Arc::clone(&shared));
        let snapshot = shared.snapshot();

        let saved = if self.config.save_on_prepare {
            self.save_snapshot(&snapshot)
        } else {
            false
        };

        let emission = if self.config.emit_on_prepare {
            Some(resource_pack::generate(
                &self.config.output_root,
                &snapshot,
                &self.catalog,
                &self.config.emit_options(),
            ))
        } else {
            None
        };

        let report = PrepareReport {
            assignments: index::len(&snapshot),
            saved,
            emission,
        };
        log::info!("[ToolRegistry::prepare] Registry prepared: {:?}", report);
        Ok(report)
    }

    /// Write the current index to the registry file, e.g. at shutdown
    pub fn save(&self) -> RegistryResult<()> {
        let path = self.config.registry_path();
        match &self.state {
            RegistryState::Registering(data) => persistence::save_index(&path, data),
            RegistryState::Sealed(shared) => persistence::save_index(&path, &shared.snapshot()),
        }
    }

    fn save_snapshot(&self, snapshot: &DurabilityIndexData) -> bool {
        match persistence::save_index(&self.config.registry_path(), snapshot) {
            Ok(()) => true,
            Err(err) => {
                log::warn!(
                    "[ToolRegistry::prepare] {}. Slots stay in memory only and will be reassigned after restart",
                    err
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{carrier_item, vanilla_catalog, HANDHELD_PARENT};
    use crate::persistence::LoadStatus;
    use tempfile::TempDir;

    fn model(name: &str) -> ModelIdentity {
        ModelIdentity::new("test", name).expect("valid identity")
    }

    fn test_config(dir: &TempDir) -> RegistryConfig {
        RegistryConfig {
            config_dir: dir.path().join("config"),
            output_root: dir.path().join("pack"),
            ..RegistryConfig::default()
        }
    }

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_restart_keeps_slots() {
        init_logging();
        let dir = TempDir::new().expect("Failed to create temporary directory for test");

        let mut first = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        let report = first.load().expect("unsealed");
        assert_eq!(report.status, LoadStatus::Missing);
        for (expected, name) in [(1, "a"), (2, "b"), (3, "c")] {
            let slot = first.register("shears", &model(name), "tools").expect("room");
            assert_eq!(slot.durability, expected);
        }
        let prepared = first.prepare().expect("first prepare");
        assert!(prepared.saved);
        assert_eq!(prepared.assignments, 3);

        let mut second = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        let report = second.load().expect("unsealed");
        assert_eq!(report.status, LoadStatus::Loaded);
        assert_eq!(report.loaded, 3);
        let a = second.register("shears", &model("a"), "tools").expect("known");
        assert_eq!(a.durability, 1);
        let d = second.register("shears", &model("d"), "tools").expect("room");
        assert_eq!(d.durability, 4);
    }

    #[test]
    fn test_prepare_seals_and_emits() {
        init_logging();
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let mut registry = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        registry.load().expect("unsealed");
        registry
            .register("shears", &model("a"), "tools")
            .expect("room");

        let report = registry.prepare().expect("prepare");
        let emission = report.emission.expect("emission enabled");
        assert_eq!(emission.root_descriptors, 1);
        assert_eq!(emission.model_descriptors, 1);
        assert!(registry.is_sealed());

        assert!(matches!(
            registry.register("shears", &model("b"), "tools"),
            Err(RegistryError::Sealed { .. })
        ));
        assert!(registry.load().is_err());
        assert!(registry.prepare().is_err());

        let shared = registry.shared().expect("sealed registry shares its index");
        assert_eq!(shared.resolve("shears", 1), Some(model("a")));
        assert_eq!(registry.resolve("shears", 1), Some(model("a")));
        assert_eq!(registry.identities("shears"), vec![model("a")]);
    }

    #[test]
    fn test_unknown_domain() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let mut registry = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        let err = registry
            .register("stick", &model("a"), "tools")
            .expect_err("stick is not a carrier");
        assert!(matches!(err, RegistryError::UnknownDomain { .. }));
    }

    #[test]
    fn test_overflow_surfaces_to_caller() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let mut catalog = DomainCatalog::new();
        catalog.insert(carrier_item("tiny", 3, HANDHELD_PARENT));
        let mut registry =
            ToolRegistry::new(test_config(&dir), catalog).expect("valid registry");

        registry.register("tiny", &model("a"), "tools").expect("room");
        registry.register("tiny", &model("b"), "tools").expect("room");
        let err = registry
            .register("tiny", &model("c"), "tools")
            .expect_err("domain full");
        assert!(matches!(err, RegistryError::AllocationOverflow { .. }));
        assert_eq!(registry.identities("tiny"), vec![model("a"), model("b")]);
    }

    #[test]
    fn test_save_failure_keeps_running() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let config = test_config(&dir);
        // Occupy the registry path with a directory
        std::fs::create_dir_all(config.registry_path().join("blocker")).expect("create blocker");

        let mut registry = ToolRegistry::new(config, vanilla_catalog()).expect("valid registry");
        registry.register("shears", &model("a"), "tools").expect("room");
        let report = registry.prepare().expect("prepare still succeeds");
        assert!(!report.saved);
        assert_eq!(registry.resolve("shears", 1), Some(model("a")));
        assert!(registry.save().is_err());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = RegistryConfig {
            host_namespace: String::new(),
            ..RegistryConfig::default()
        };
        match ToolRegistry::new(config, vanilla_catalog()) {
            Err(RegistryError::InvalidConfig { field, .. }) => assert_eq!(field, "host_namespace"),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("empty namespace accepted"),
        }
    }

    #[test]
    fn test_load_after_register_keeps_assignments() {
        init_logging();
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let mut registry = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        registry.register("shears", &model("a"), "tools").expect("room");

        let err = registry.load().expect_err("index already populated");
        assert!(matches!(err, RegistryError::StateError { .. }));

        let b = registry.register("shears", &model("b"), "tools").expect("room");
        assert_eq!(b.durability, 2);
        assert_eq!(registry.resolve("shears", 1), Some(model("a")));
    }

    #[test]
    fn test_escaping_identity_never_registers() {
        let dir = TempDir::new().expect("Failed to create temporary directory for test");
        let mut registry = ToolRegistry::new(test_config(&dir), vanilla_catalog())
            .expect("valid registry");
        assert!("..:../../../escaped".parse::<ModelIdentity>().is_err());
        assert!(ModelIdentity::new("test", "../../../escaped").is_err());

        registry.register("shears", &model("a"), "tools").expect("room");
        let report = registry.prepare().expect("prepare");
        assert_eq!(report.emission.map(|e| e.model_descriptors), Some(1));
        assert!(!dir.path().join("escaped.json").exists());
    }
}
