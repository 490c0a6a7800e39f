/// Durability Index Module - Data-Oriented Programming (DOP) style
///
/// - durability_index_data.rs: Pure data structures with NO methods
/// - durability_index_operations.rs: Pure functions that operate on data
/// - slot_allocator.rs: gap-filling choice of the next durability
/// - bimap.rs: one-to-one map backing each domain
/// - shared_index.rs: read-mostly handle used after sealing

pub mod bimap;
pub mod durability_index_data;
pub mod durability_index_operations;
pub mod shared_index;
pub mod slot_allocator;

pub use bimap::{BidirectionalMap, InsertConflict};
pub use durability_index_data::{DomainSlots, DurabilityIndexData, DEFAULT_DIRECTORY_HINT};
pub use shared_index::SharedIndex;
pub use slot_allocator::{next_slot, RESERVED_SLOT};

// Re-export all operations
pub use durability_index_operations::{
    // Initialization
    create_durability_index,

    // Registration
    insert_persisted,
    register,

    // Lookups
    directory_hint,
    domains,
    entries,
    identities,
    is_empty,
    len,
    resolve,
    slot_of,

    // Lifecycle
    clear,
    fork,
    is_sealed,
    seal,
};
