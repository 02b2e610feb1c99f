use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// App manifest, read from `app.json` in the plugin directory root.
///
/// Capabilities are declared here rather than discovered by inspecting the
/// loaded module; the cache cross-checks every declaration against the
/// module's handler table when the plugin is ingested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppManifest {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: Option<String>,
    /// Loader type; falls back to the cache's default loader when absent.
    #[serde(default)]
    pub loader: Option<String>,
    /// Library file for dynamically loaded app modules.
    #[serde(default)]
    pub library_file: Option<String>,
    /// Device types instances of this app can be bound to.
    #[serde(default)]
    pub device_types: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<CapabilityDecl>,
}

impl AppManifest {
    pub fn from_file(path: &Path) -> Result<Self, ScanError> {
        let raw = std::fs::read_to_string(path)?;
        let manifest: AppManifest = serde_json::from_str(&raw)
            .map_err(|e| ScanError::InvalidManifest(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn validate(&self) -> Result<(), ScanError> {
        if self.name.is_empty() {
            return Err(ScanError::InvalidManifest("app name is empty".into()));
        }
        for decl in &self.capabilities {
            if decl.name.is_empty() {
                return Err(ScanError::InvalidManifest(format!(
                    "app `{}` declares a capability with an empty name",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// One declared capability of an app.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapabilityDecl {
    pub name: String,
    pub kind: CapabilityKind,
    #[serde(default)]
    pub binding: CapabilityBinding,
    /// Module export backing this capability; defaults to `name`.
    #[serde(default)]
    pub handler: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CapabilityDecl {
    pub fn handler_name(&self) -> &str {
        self.handler.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Action,
    Condition,
    Transform,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityBinding {
    /// Must be invoked on a live, device-bound app instance.
    Instance,
    /// Invocable as a plain function.
    #[default]
    Free,
}
