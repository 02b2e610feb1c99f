use std::path::Path;
use std::sync::Arc;

use crate::error::ScanError;
use crate::manifest::AppManifest;
use crate::module::AppModule;

/// ABI version expected from dynamically loaded app modules.
pub const APP_MODULE_ABI_VERSION: u32 = 1;

/// Produces an [`AppModule`] from an installed plugin directory.
pub trait AppModuleLoader: Send + Sync {
    fn loader_type(&self) -> &str;

    fn load(
        &self,
        plugin_dir: &Path,
        manifest: &AppManifest,
    ) -> Result<Arc<dyn AppModule>, ScanError>;
}
