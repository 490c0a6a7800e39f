//! Registry File Operations
//!
//! Reads and writes the slot registry as a TOML document of root-level string
//! entries. Entries are written per domain in registration order and read back
//! in file order, so a reload reproduces the registration order.

use super::atomic_write::write_atomic;
use super::registry_file_data::{LoadOutcome, LoadReport, LoadStatus, REGISTRY_FILE_HEADER};
use crate::domain::{parse_slot, DomainCatalog, ModelIdentity};
use crate::error::{IoContext, RegistryError, RegistryResult};
use crate::index::{self, DurabilityIndexData};
use std::fs;
use std::io;
use std::path::Path;

/// Load the registry file into a fresh index.
///
/// Never fails: a missing file gives an empty index, an unreadable file is
/// logged and gives an empty index, bad entries are logged and skipped.
pub fn load_index(path: &Path, catalog: &DomainCatalog) -> LoadOutcome {
    let mut data = index::create_durability_index();

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            log::info!(
                "[registry_file::load_index] No registry at {}, starting empty",
                path.display()
            );
            return empty_outcome(data, LoadStatus::Missing);
        }
        Err(err) => {
            log_reset(load_failure(path, err));
            return empty_outcome(data, LoadStatus::Reset);
        }
    };

    let table = match text.parse::<toml::Table>() {
        Ok(table) => table,
        Err(err) => {
            log_reset(load_failure(path, err));
            return empty_outcome(data, LoadStatus::Reset);
        }
    };

    let mut report = LoadReport {
        status: LoadStatus::Loaded,
        loaded: 0,
        skipped: 0,
    };

    for (key, value) in &table {
        match load_entry(&mut data, catalog, key, value) {
            Ok(()) => report.loaded += 1,
            Err(cause) => {
                let err = RegistryError::MalformedPersistedEntry {
                    path: path.display().to_string(),
                    key: key.clone(),
                    reason: cause.to_string(),
                };
                log::warn!("[registry_file::load_index] Skipping entry: {}", err);
                report.skipped += 1;
            }
        }
    }

    log::info!(
        "[registry_file::load_index] Loaded {} slots from {} ({} skipped)",
        report.loaded,
        path.display(),
        report.skipped
    );
    LoadOutcome {
        index: data,
        report,
    }
}

fn load_entry(
    data: &mut DurabilityIndexData,
    catalog: &DomainCatalog,
    key: &str,
    value: &toml::Value,
) -> RegistryResult<()> {
    let slot = parse_slot(catalog, key)?;
    let text = value.as_str().ok_or_else(|| RegistryError::InvalidIdentity {
        value: value.to_string(),
        reason: format!("value is a {}, expected a string", value.type_str()),
    })?;
    let identity: ModelIdentity = text.parse()?;
    let domain = catalog
        .get(&slot.domain)
        .ok_or_else(|| RegistryError::UnknownDomain {
            id: slot.domain.clone(),
        })?;
    index::insert_persisted(data, domain, slot.durability, &identity)?;
    Ok(())
}

fn empty_outcome(data: DurabilityIndexData, status: LoadStatus) -> LoadOutcome {
    LoadOutcome {
        index: data,
        report: LoadReport {
            status,
            loaded: 0,
            skipped: 0,
        },
    }
}

fn load_failure(path: &Path, err: impl std::fmt::Display) -> RegistryError {
    RegistryError::PersistenceLoad {
        path: path.display().to_string(),
        error: err.to_string(),
    }
}

fn log_reset(err: RegistryError) {
    log::error!(
        "[registry_file::load_index] {}. Starting with an empty registry, every model gets a new slot this session",
        err
    );
}

/// Render the whole index as registry file text
pub fn render_registry_file(data: &DurabilityIndexData) -> RegistryResult<String> {
    let mut table = toml::Table::new();
    for domain_id in index::domains(data) {
        for (durability, identity, _) in index::entries(data, domain_id) {
            table.insert(
                format!("{}@{}", domain_id, durability),
                toml::Value::String(identity.to_string()),
            );
        }
    }

    let body = toml::to_string(&table).map_err(|e| RegistryError::Serialization {
        context: "registry file".to_string(),
        error: e.to_string(),
    })?;
    Ok(format!("{}\n{}", REGISTRY_FILE_HEADER, body))
}

/// Rewrite the registry file from the index
pub fn save_index(path: &Path, data: &DurabilityIndexData) -> RegistryResult<()> {
    let text = render_registry_file(data)?;
    write_atomic(path, text.as_bytes()).save_context(path)?;
    log::info!(
        "[registry_file::save_index] Saved {} slots to {}",
        index::len(data),
        path.display()
    );
    Ok(())
}
