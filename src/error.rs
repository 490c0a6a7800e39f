//! Error handling for the durability model registry
//!
//! One error type covers every failure the registry can report. Only
//! `AllocationOverflow` and `Sealed` are meant to abort the calling operation;
//! the persistence and emission variants are logged by their callers and the
//! registry carries on with whatever state it has.

use std::path::Path;

/// Main error type for the registry
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    // Allocation Errors
    #[error(
        "Slot space exhausted for domain '{domain}' while registering '{model}': \
         all durabilities 1..{max_uses} are taken"
    )]
    AllocationOverflow {
        domain: String,
        model: String,
        max_uses: u32,
    },
    #[error("Bijection violated in domain '{domain}': {reason}")]
    BijectionViolation { domain: String, reason: String },
    #[error("Index is sealed, refusing to {operation}")]
    Sealed { operation: String },
    #[error("State error: expected {expected}, actual {actual}")]
    StateError { expected: String, actual: String },
    #[error("Durability {durability} is outside 1..{max_uses} for domain '{domain}'")]
    SlotOutOfRange {
        domain: String,
        durability: u32,
        max_uses: u32,
    },
    #[error("Unknown domain '{id}'")]
    UnknownDomain { id: String },
    #[error("Invalid model identity '{value}': {reason}")]
    InvalidIdentity { value: String, reason: String },
    #[error("Invalid slot '{value}': {reason}")]
    InvalidSlot { value: String, reason: String },

    // Persistence Errors
    #[error("Malformed entry '{key}' in {path}: {reason}")]
    MalformedPersistedEntry {
        path: String,
        key: String,
        reason: String,
    },
    #[error("Load failed for {path}: {error}")]
    PersistenceLoad { path: String, error: String },
    #[error("Save failed for {path}: {error}")]
    PersistenceSave { path: String, error: String },

    // Emission Errors
    #[error("Could not write descriptor {path}: {error}")]
    EmissionIo { path: String, error: String },
    #[error("Serialization error in {context}: {error}")]
    Serialization { context: String, error: String },

    // Configuration Errors
    #[error("Invalid config: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
}

/// Type alias for Results in the registry
pub type RegistryResult<T> = Result<T, RegistryError>;

impl RegistryError {
    /// Whether this error must stop the operation that raised it
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RegistryError::AllocationOverflow { .. }
                | RegistryError::Sealed { .. }
                | RegistryError::StateError { .. }
                | RegistryError::SlotOutOfRange { .. }
                | RegistryError::BijectionViolation { .. }
                | RegistryError::UnknownDomain { .. }
                | RegistryError::InvalidIdentity { .. }
                | RegistryError::InvalidSlot { .. }
                | RegistryError::InvalidConfig { .. }
        )
    }

    pub(crate) fn sealed(operation: &str) -> Self {
        RegistryError::Sealed {
            operation: operation.to_string(),
        }
    }
}

/// Extension trait for attaching a path to I/O failures
pub trait IoContext<T> {
    fn save_context(self, path: &Path) -> RegistryResult<T>;
    fn load_context(self, path: &Path) -> RegistryResult<T>;
    fn emission_context(self, path: &Path) -> RegistryResult<T>;
}

impl<T, E> IoContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn save_context(self, path: &Path) -> RegistryResult<T> {
        self.map_err(|e| RegistryError::PersistenceSave {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    fn load_context(self, path: &Path) -> RegistryResult<T> {
        self.map_err(|e| RegistryError::PersistenceLoad {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }

    fn emission_context(self, path: &Path) -> RegistryResult<T> {
        self.map_err(|e| RegistryError::EmissionIo {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}
