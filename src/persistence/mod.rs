//! Persistence Module - registry file on disk

// Data modules
pub mod registry_file_data;

// Operations modules
pub mod atomic_write;
pub mod registry_file_operations;

// Simple re-exports
pub use atomic_write::write_atomic;
pub use registry_file_data::{
    LoadOutcome, LoadReport, LoadStatus, REGISTRY_FILE_HEADER, REGISTRY_FILE_NAME,
};
pub use registry_file_operations::{load_index, render_registry_file, save_index};
