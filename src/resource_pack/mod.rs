/// Resource Pack Module - Data-Oriented Programming (DOP) style
///
/// - descriptor_data.rs: serde shapes of the client descriptor files
/// - emitter_operations.rs: functions deriving those files from the index

pub mod descriptor_data;
pub mod emitter_operations;

// Re-export data structures
pub use descriptor_data::{
    EmissionReport, EmitOptions, ItemTextures, ModelDescriptor, ModelOverride, OverrideOrder,
    OverridePredicate, RootDescriptor,
};

// Re-export all operations
pub use emitter_operations::{
    build_model_descriptor, build_root_descriptor, damage_for, generate, model_descriptor_path,
    model_reference, render_json, root_descriptor_path,
};
