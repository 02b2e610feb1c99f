use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::ScanError;
use crate::loader::AppModuleLoader;
use crate::manifest::AppManifest;
use crate::module::AppModule;

/// Serves app modules registered in-process, keyed by app name.
///
/// The path embedded deployments take: the host links its apps into the
/// binary and registers their modules before the scan runs. The plugin
/// directory then only carries manifests.
#[derive(Default)]
pub struct HostAppLoader {
    modules: RwLock<HashMap<String, Arc<dyn AppModule>>>,
}

impl HostAppLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_module(&self, app_name: impl Into<String>, module: Arc<dyn AppModule>) {
        self.modules.write().insert(app_name.into(), module);
    }
}

impl AppModuleLoader for HostAppLoader {
    fn loader_type(&self) -> &str {
        "host"
    }

    fn load(
        &self,
        _plugin_dir: &Path,
        manifest: &AppManifest,
    ) -> Result<Arc<dyn AppModule>, ScanError> {
        self.modules
            .read()
            .get(&manifest.name)
            .cloned()
            .ok_or_else(|| {
                ScanError::LoadError(format!(
                    "no host module registered for app `{}`",
                    manifest.name
                ))
            })
    }
}
