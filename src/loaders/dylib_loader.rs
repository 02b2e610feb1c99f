use std::path::Path;
use std::sync::Arc;

use libloading::Library;

use crate::error::ScanError;
use crate::loader::{AppModuleLoader, APP_MODULE_ABI_VERSION};
use crate::manifest::AppManifest;
use crate::module::AppModule;

/// Loads app modules from cdylib plugin crates via `libloading`.
///
/// Plugin crates use [`declare_app_module!`](crate::declare_app_module) to
/// emit the expected exports. The library handle is kept alive alongside
/// the module so handlers never outlive their code.
pub struct DylibAppLoader {
    abi_version: u32,
}

impl Default for DylibAppLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DylibAppLoader {
    pub fn new() -> Self {
        Self {
            abi_version: APP_MODULE_ABI_VERSION,
        }
    }
}

impl AppModuleLoader for DylibAppLoader {
    fn loader_type(&self) -> &str {
        "dylib"
    }

    fn load(
        &self,
        plugin_dir: &Path,
        manifest: &AppManifest,
    ) -> Result<Arc<dyn AppModule>, ScanError> {
        let library_file = manifest.library_file.as_deref().ok_or_else(|| {
            ScanError::InvalidManifest(format!(
                "app `{}` declares no library_file",
                manifest.name
            ))
        })?;
        let path = plugin_dir.join(library_file);

        unsafe {
            let library = Library::new(&path).map_err(|e| {
                ScanError::LoadError(format!("failed to load {}: {}", path.display(), e))
            })?;

            let version = *library
                .get::<*const u32>(b"APPCACHE_MODULE_ABI_VERSION\0")
                .map_err(|e| ScanError::MissingExport(e.to_string()))?;
            if *version != self.abi_version {
                return Err(ScanError::AbiVersionMismatch {
                    expected: self.abi_version,
                    actual: *version,
                });
            }

            let create_fn = library
                .get::<fn() -> Arc<dyn AppModule>>(b"appcache_module_create\0")
                .map_err(|e| ScanError::MissingExport(e.to_string()))?;
            let inner = create_fn();

            Ok(Arc::new(DylibAppModule {
                inner,
                _library: library,
            }))
        }
    }
}

struct DylibAppModule {
    inner: Arc<dyn AppModule>,
    _library: Library,
}

impl std::fmt::Debug for DylibAppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DylibAppModule")
            .field("inner", &self.inner)
            .finish()
    }
}

impl AppModule for DylibAppModule {
    fn app_class(&self) -> Option<Arc<dyn crate::handler::AppFactory>> {
        self.inner.app_class()
    }

    fn handler(&self, name: &str) -> Option<crate::handler::Handler> {
        self.inner.handler(name)
    }
}
