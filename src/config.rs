//! Registry configuration
//!
//! Where the registry file lives, where the resource pack goes and how it is
//! emitted. Usually embedded in the host's own config file as a TOML table.

use crate::persistence::REGISTRY_FILE_NAME;
use crate::resource_pack::{EmitOptions, OverrideOrder};
use crate::error::{RegistryError, RegistryResult};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Directory holding the registry file
    pub config_dir: PathBuf,
    pub registry_file: String,
    /// Root of the generated resource pack
    pub output_root: PathBuf,
    /// Namespace of the carrier items' own descriptors
    pub host_namespace: String,
    pub override_order: OverrideOrder,
    pub overwrite_model_descriptors: bool,
    /// Write the registry file at the preparation barrier
    pub save_on_prepare: bool,
    /// Generate the resource pack at the preparation barrier
    pub emit_on_prepare: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("config"),
            registry_file: REGISTRY_FILE_NAME.to_string(),
            output_root: PathBuf::from("resourcepack"),
            host_namespace: "minecraft".to_string(),
            override_order: OverrideOrder::default(),
            overwrite_model_descriptors: false,
            save_on_prepare: true,
            emit_on_prepare: true,
        }
    }
}

impl RegistryConfig {
    /// Parse and validate a TOML document; missing fields take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RegistryConfig = toml::from_str(text)
            .map_err(|e| anyhow::anyhow!("RegistryConfig: failed to parse: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> RegistryResult<()> {
        if self.registry_file.trim().is_empty() {
            return Err(invalid("registry_file", &self.registry_file, "cannot be empty"));
        }

        let file = Path::new(&self.registry_file);
        if file.components().count() != 1 || file.file_name().is_none() {
            return Err(invalid(
                "registry_file",
                &self.registry_file,
                "must be a plain file name",
            ));
        }

        if self.host_namespace.trim().is_empty() {
            return Err(invalid("host_namespace", &self.host_namespace, "cannot be empty"));
        }

        if self.host_namespace.contains([':', '/', '\\'])
            || matches!(self.host_namespace.as_str(), "." | "..")
        {
            return Err(invalid(
                "host_namespace",
                &self.host_namespace,
                "must be a single folder name without ':'",
            ));
        }

        if self.emit_on_prepare && self.output_root.as_os_str().is_empty() {
            return Err(invalid(
                "output_root",
                "",
                "required when emit_on_prepare is set",
            ));
        }

        log::debug!("[RegistryConfig] Configuration validated successfully");
        Ok(())
    }

    /// Full path of the registry file
    pub fn registry_path(&self) -> PathBuf {
        self.config_dir.join(&self.registry_file)
    }

    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            host_namespace: self.host_namespace.clone(),
            order: self.override_order,
            overwrite_model_descriptors: self.overwrite_model_descriptors,
        }
    }
}

fn invalid(field: &str, value: &str, reason: &str) -> RegistryError {
    RegistryError::InvalidConfig {
        field: field.to_string(),
        value: format!("{:?}", value),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RegistryConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.registry_path(),
            PathBuf::from("config/toolRegistry.conf")
        );
    }

    #[test]
    fn test_from_toml_partial() {
        let config = RegistryConfig::from_toml_str(
            r#"
config_dir = "plugins/tools"
override_order = "registration"
"#,
        )
        .expect("valid config");
        assert_eq!(config.config_dir, PathBuf::from("plugins/tools"));
        assert_eq!(config.override_order, OverrideOrder::Registration);
        assert_eq!(config.registry_file, REGISTRY_FILE_NAME);
        assert!(config.save_on_prepare);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = RegistryConfig {
            registry_file: "nested/file.conf".to_string(),
            ..RegistryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RegistryError::InvalidConfig { ref field, .. }) if field == "registry_file"
        ));

        for namespace in ["mine:craft", "..", "a/b"] {
            let config = RegistryConfig {
                host_namespace: namespace.to_string(),
                ..RegistryConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(RegistryError::InvalidConfig { ref field, .. }) if field == "host_namespace"
            ));
        }

        let config = RegistryConfig {
            output_root: PathBuf::new(),
            ..RegistryConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(RegistryError::InvalidConfig { ref field, .. }) if field == "output_root"
        ));

        assert!(RegistryConfig::from_toml_str("override_order = \"sideways\"").is_err());
    }

    #[test]
    fn test_emit_options() {
        let config = RegistryConfig {
            host_namespace: "host".to_string(),
            overwrite_model_descriptors: true,
            ..RegistryConfig::default()
        };
        let options = config.emit_options();
        assert_eq!(options.host_namespace, "host");
        assert!(options.overwrite_model_descriptors);
        assert_eq!(options.order, OverrideOrder::AscendingDamage);
    }
}
