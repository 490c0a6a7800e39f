//! Resource Pack Emitter Operations
//!
//! Derives client descriptor files from a durability index. Paths come only
//! from (namespace, model, directory hint) and the JSON is rendered the same
//! way every time, so an unchanged index regenerates identical bytes.

use super::descriptor_data::{
    EmissionReport, EmitOptions, ItemTextures, ModelDescriptor, ModelOverride, OverrideOrder,
    OverridePredicate, RootDescriptor,
};
use crate::domain::{CarrierItem, DomainCatalog, ModelIdentity};
use crate::error::{IoContext, RegistryError, RegistryResult};
use crate::index::{self, DurabilityIndexData};
use crate::persistence::write_atomic;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Damage predicate that selects `durability` on a carrier with `max_uses`
pub fn damage_for(durability: u32, max_uses: u32) -> f64 {
    1.0 - durability as f64 / max_uses as f64
}

/// Model reference used inside descriptors, `namespace:hint/model`
pub fn model_reference(identity: &ModelIdentity, directory_hint: &str) -> String {
    let hint = clean_segments(directory_hint).join("/");
    if hint.is_empty() {
        format!("{}:{}", identity.namespace, identity.model)
    } else {
        format!("{}:{}/{}", identity.namespace, hint, identity.model)
    }
}

/// `assets/<host>/models/item/<domain>.json`
pub fn root_descriptor_path(output_root: &Path, host_namespace: &str, domain_id: &str) -> PathBuf {
    output_root
        .join("assets")
        .join(host_namespace)
        .join("models")
        .join("item")
        .join(format!("{}.json", domain_id))
}

/// `assets/<namespace>/models/<hint>/<model>.json`
pub fn model_descriptor_path(
    output_root: &Path,
    identity: &ModelIdentity,
    directory_hint: &str,
) -> PathBuf {
    let mut path = output_root.join("assets");
    for segment in clean_segments(&identity.namespace) {
        path.push(segment);
    }
    path.push("models");
    for segment in clean_segments(directory_hint) {
        path.push(segment);
    }
    let model = clean_segments(&identity.model);
    if let Some((file, folders)) = model.split_last() {
        for folder in folders {
            path.push(folder);
        }
        path.push(format!("{}.json", file));
    }
    path
}

// Path parts are relative folder names; drop anything that would climb out of the pack
fn clean_segments(directory_hint: &str) -> Vec<&str> {
    directory_hint
        .split(['/', '\\'])
        .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
        .collect()
}

/// Build the root descriptor of one carrier item
pub fn build_root_descriptor(
    data: &DurabilityIndexData,
    domain: &CarrierItem,
    order: OverrideOrder,
) -> RootDescriptor {
    let mut overrides: Vec<(f64, ModelOverride)> = index::entries(data, &domain.id)
        .into_iter()
        .map(|(durability, identity, hint)| {
            let damage = damage_for(durability, domain.max_uses);
            let entry = ModelOverride {
                predicate: OverridePredicate { damaged: 0, damage },
                model: model_reference(identity, hint),
            };
            (damage, entry)
        })
        .collect();

    if order == OverrideOrder::AscendingDamage {
        overrides.sort_by(|a, b| a.0.total_cmp(&b.0));
    }

    let mut overrides: Vec<ModelOverride> = overrides.into_iter().map(|(_, o)| o).collect();
    // Anything worn or unknown falls back to the stock model
    overrides.push(ModelOverride {
        predicate: OverridePredicate {
            damaged: 1,
            damage: 0.0,
        },
        model: domain.default_model.clone(),
    });

    RootDescriptor {
        parent: domain.parent.clone(),
        textures: ItemTextures {
            layer0: domain.default_texture.clone(),
        },
        overrides,
    }
}

/// Build the descriptor of a single plugin model
pub fn build_model_descriptor(
    identity: &ModelIdentity,
    directory_hint: &str,
    parent: &str,
) -> ModelDescriptor {
    ModelDescriptor {
        parent: parent.to_string(),
        textures: ItemTextures {
            layer0: model_reference(identity, directory_hint),
        },
    }
}

/// Pretty JSON with a trailing newline
pub fn render_json<T: Serialize>(value: &T) -> RegistryResult<String> {
    let mut text =
        serde_json::to_string_pretty(value).map_err(|e| RegistryError::Serialization {
            context: "descriptor".to_string(),
            error: e.to_string(),
        })?;
    text.push('\n');
    Ok(text)
}

fn write_descriptor<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let text = render_json(value)?;
    write_atomic(path, text.as_bytes()).emission_context(path)
}

/// Write every root and per-model descriptor for the index.
///
/// A file that cannot be written is logged and counted; the rest of the
/// pack is still emitted.
pub fn generate(
    output_root: &Path,
    data: &DurabilityIndexData,
    catalog: &DomainCatalog,
    options: &EmitOptions,
) -> EmissionReport {
    let mut report = EmissionReport::default();

    for domain_id in index::domains(data) {
        let domain = match catalog.get(domain_id) {
            Some(domain) => domain,
            None => {
                log::warn!(
                    "[emitter::generate] Domain '{}' is not in the catalog, skipping its descriptors",
                    domain_id
                );
                continue;
            }
        };
        report.domains += 1;

        let root = build_root_descriptor(data, domain, options.order);
        let root_path = root_descriptor_path(output_root, &options.host_namespace, domain_id);
        match write_descriptor(&root_path, &root) {
            Ok(()) => report.root_descriptors += 1,
            Err(err) => {
                log::warn!("[emitter::generate] {}", err);
                report.failed += 1;
            }
        }

        for (_, identity, hint) in index::entries(data, domain_id) {
            let path = model_descriptor_path(output_root, identity, hint);
            if path.exists() && !options.overwrite_model_descriptors {
                report.kept_existing += 1;
                continue;
            }
            let descriptor = build_model_descriptor(identity, hint, &domain.parent);
            match write_descriptor(&path, &descriptor) {
                Ok(()) => report.model_descriptors += 1,
                Err(err) => {
                    log::warn!("[emitter::generate] {}", err);
                    report.failed += 1;
                }
            }
        }
    }

    log::info!(
        "[emitter::generate] Emitted {} root and {} model descriptors for {} domains into {} ({} kept, {} failed)",
        report.root_descriptors,
        report.model_descriptors,
        report.domains,
        output_root.display(),
        report.kept_existing,
        report.failed
    );
    report
}
