//! The capability registry served to the workflow executor.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptor::{AppDescriptor, CapabilityDescriptor};
use crate::error::{LookupError, LookupResult, ScanError, ScanResult};
use crate::loader::AppModuleLoader;
use crate::manifest::{AppManifest, CapabilityKind};

/// Manifest file expected in the root of every plugin directory.
pub const MANIFEST_FILE: &str = "app.json";

#[derive(Debug, Clone)]
pub struct AppCacheConfig {
    /// Loader used when a manifest does not name one.
    pub default_loader: String,
    /// Manifest file name resolved inside each plugin directory.
    pub manifest_file: String,
}

impl Default for AppCacheConfig {
    fn default() -> Self {
        Self {
            default_loader: "host".to_string(),
            manifest_file: MANIFEST_FILE.to_string(),
        }
    }
}

/// Registry of installed apps and their action/condition/transform
/// capabilities.
///
/// Construct one `AppCache` at process start and share it
/// (`Arc<AppCache>`) with every consumer; there is no implicit global.
/// [`cache_apps`](Self::cache_apps) populates it from a directory of
/// plugin packages, [`clear`](Self::clear) empties it, and the remaining
/// methods are the lookup surface the executor calls while workflows run.
///
/// Lookups take the read lock only; scans build each descriptor off-lock
/// and take the write lock just to commit it, so a long plugin load never
/// blocks executing workflows.
pub struct AppCache {
    config: AppCacheConfig,
    loaders: RwLock<HashMap<String, Arc<dyn AppModuleLoader>>>,
    apps: RwLock<HashMap<String, Arc<AppDescriptor>>>,
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

impl AppCache {
    pub fn new() -> Self {
        Self::with_config(AppCacheConfig::default())
    }

    pub fn with_config(config: AppCacheConfig) -> Self {
        Self {
            config,
            loaders: RwLock::new(HashMap::new()),
            apps: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a module loader under its [`loader_type`](AppModuleLoader::loader_type).
    /// Re-registering a type replaces the previous loader.
    pub fn register_loader(&self, loader: Arc<dyn AppModuleLoader>) {
        self.loaders
            .write()
            .insert(loader.loader_type().to_string(), loader);
    }

    /// Scans `path` and caches every plugin found in its subdirectories.
    ///
    /// One subdirectory per app: its manifest is parsed, the named loader
    /// produces the app module, every declared capability is resolved
    /// against the module's handler table, and the finished descriptor is
    /// committed. A plugin that fails any of those steps is logged and
    /// skipped; it never aborts the rest of the scan. Re-scanning a path
    /// replaces previously cached descriptors wholesale.
    ///
    /// Returns the names of the apps cached by this call, in scan order.
    /// Errors only when `path` itself cannot be read.
    pub fn cache_apps(&self, path: impl AsRef<Path>) -> ScanResult<Vec<String>> {
        let path = path.as_ref();
        let mut plugin_dirs: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|p| p.is_dir())
            .collect();
        plugin_dirs.sort();

        let mut cached = Vec::new();
        for dir in plugin_dirs {
            match self.load_plugin(&dir) {
                Ok(descriptor) => {
                    let name = descriptor.name().to_string();
                    tracing::debug!(
                        app = %name,
                        version = %descriptor.version(),
                        path = %dir.display(),
                        "cached app"
                    );
                    self.apps.write().insert(name.clone(), descriptor);
                    cached.push(name);
                }
                Err(error) => {
                    tracing::warn!(
                        path = %dir.display(),
                        error = %error,
                        "skipping app plugin"
                    );
                }
            }
        }
        Ok(cached)
    }

    /// Empties the registry. Registered loaders survive.
    pub fn clear(&self) {
        self.apps.write().clear();
    }

    /// Names of all cached apps, sorted.
    pub fn app_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.apps.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// The descriptor for `app_name`, through which the executor reaches
    /// the app class.
    ///
    /// Fails with [`LookupError::UnknownApp`] when the name was never
    /// cached, and also when the app defines no app class: an app exposing
    /// only free capabilities cannot be instantiated and is absent for
    /// this call, even though its capabilities remain reachable through
    /// the capability lookups.
    pub fn get_app(&self, app_name: &str) -> LookupResult<Arc<AppDescriptor>> {
        let descriptor = self.entry(app_name)?;
        if descriptor.app_class().is_none() {
            return Err(LookupError::UnknownApp(app_name.to_string()));
        }
        Ok(descriptor)
    }

    pub fn get_app_action(
        &self,
        app_name: &str,
        action_name: &str,
    ) -> LookupResult<Arc<CapabilityDescriptor>> {
        self.capability(app_name, CapabilityKind::Action, action_name)
    }

    pub fn get_app_condition(
        &self,
        app_name: &str,
        condition_name: &str,
    ) -> LookupResult<Arc<CapabilityDescriptor>> {
        self.capability(app_name, CapabilityKind::Condition, condition_name)
    }

    pub fn get_app_transform(
        &self,
        app_name: &str,
        transform_name: &str,
    ) -> LookupResult<Arc<CapabilityDescriptor>> {
        self.capability(app_name, CapabilityKind::Transform, transform_name)
    }

    /// Action names for `app_name` in declaration order. Empty when the
    /// app declares no actions; that is not an error.
    pub fn get_app_action_names(&self, app_name: &str) -> LookupResult<Vec<String>> {
        self.capability_names(app_name, CapabilityKind::Action)
    }

    pub fn get_app_condition_names(&self, app_name: &str) -> LookupResult<Vec<String>> {
        self.capability_names(app_name, CapabilityKind::Condition)
    }

    pub fn get_app_transform_names(&self, app_name: &str) -> LookupResult<Vec<String>> {
        self.capability_names(app_name, CapabilityKind::Transform)
    }

    /// Whether invoking `action_name` requires a live app instance first.
    pub fn is_app_action_bound(&self, app_name: &str, action_name: &str) -> LookupResult<bool> {
        Ok(self.get_app_action(app_name, action_name)?.is_bound())
    }

    fn load_plugin(&self, dir: &Path) -> ScanResult<Arc<AppDescriptor>> {
        let manifest = AppManifest::from_file(&dir.join(&self.config.manifest_file))?;
        let loader_type = manifest
            .loader
            .as_deref()
            .unwrap_or(&self.config.default_loader);
        let loader = self
            .loaders
            .read()
            .get(loader_type)
            .cloned()
            .ok_or_else(|| ScanError::LoaderNotFound(loader_type.to_string()))?;

        let module = loader.load(dir, &manifest)?;
        let descriptor = AppDescriptor::from_module(&manifest, dir.to_path_buf(), module.as_ref())?;
        Ok(Arc::new(descriptor))
    }

    fn entry(&self, app_name: &str) -> LookupResult<Arc<AppDescriptor>> {
        self.apps
            .read()
            .get(app_name)
            .cloned()
            .ok_or_else(|| LookupError::UnknownApp(app_name.to_string()))
    }

    fn capability(
        &self,
        app_name: &str,
        kind: CapabilityKind,
        name: &str,
    ) -> LookupResult<Arc<CapabilityDescriptor>> {
        let descriptor = self.entry(app_name)?;
        descriptor
            .capabilities(kind)
            .get(name)
            .ok_or_else(|| match kind {
                CapabilityKind::Action => LookupError::UnknownAppAction {
                    app: app_name.to_string(),
                    action: name.to_string(),
                },
                CapabilityKind::Condition => LookupError::UnknownCondition {
                    app: app_name.to_string(),
                    condition: name.to_string(),
                },
                CapabilityKind::Transform => LookupError::UnknownTransform {
                    app: app_name.to_string(),
                    transform: name.to_string(),
                },
            })
    }

    fn capability_names(&self, app_name: &str, kind: CapabilityKind) -> LookupResult<Vec<String>> {
        Ok(self.entry(app_name)?.capabilities(kind).names())
    }
}
