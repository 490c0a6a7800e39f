//! Registry File Data - Pure DOP
//!
//! NO METHODS. Just data.
//! All transformations happen in registry_file_operations.rs

use crate::index::DurabilityIndexData;

/// Default file name of the persisted registry
pub const REGISTRY_FILE_NAME: &str = "toolRegistry.conf";

/// Comment written at the top of every saved registry file
pub const REGISTRY_FILE_HEADER: &str = "\
# Durability model registry.
#
# This file is written by the server and maps carrier item durabilities to models:
#   \"<item>@<durability>\" = \"<namespace>:<model>\"
#
# DO NOT EDIT. Changing, removing or reordering entries desynchronizes items that
# already exist in worlds and player inventories from the models they render with.
";

/// What happened while reading the registry file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No file yet, normal on first run
    Missing,
    /// File parsed, individual entries may still have been skipped
    Loaded,
    /// File unreadable as a whole, the index starts empty
    Reset,
}

/// Summary of a registry file load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub status: LoadStatus,
    pub loaded: usize,
    pub skipped: usize,
}

/// Index produced by a load, along with its report
#[derive(Debug)]
pub struct LoadOutcome {
    pub index: DurabilityIndexData,
    pub report: LoadReport,
}
