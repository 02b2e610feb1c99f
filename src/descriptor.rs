//! Descriptor types committed to the cache when a plugin is ingested.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ScanError;
use crate::handler::{AppFactory, Handler};
use crate::manifest::{AppManifest, CapabilityBinding, CapabilityKind};
use crate::module::AppModule;

/// One discovered capability: the callable plus the tags the executor
/// branches on. Immutable once the owning app descriptor is committed.
pub struct CapabilityDescriptor {
    app: String,
    name: String,
    kind: CapabilityKind,
    binding: CapabilityBinding,
    handler: Handler,
}

impl CapabilityDescriptor {
    fn new(
        app: String,
        name: String,
        kind: CapabilityKind,
        binding: CapabilityBinding,
        handler: Handler,
    ) -> Self {
        Self {
            app,
            name,
            kind,
            binding,
            handler,
        }
    }

    /// Name of the owning app.
    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> CapabilityKind {
        self.kind
    }

    pub fn binding(&self) -> CapabilityBinding {
        self.binding
    }

    /// Whether invocation requires a live app instance as receiver.
    pub fn is_bound(&self) -> bool {
        self.binding == CapabilityBinding::Instance
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }
}

/// Name → descriptor map preserving discovery order within one kind.
pub(crate) struct CapabilityTable {
    kind: CapabilityKind,
    entries: Vec<Arc<CapabilityDescriptor>>,
    index: HashMap<String, usize>,
}

impl CapabilityTable {
    pub(crate) fn new(kind: CapabilityKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, descriptor: Arc<CapabilityDescriptor>) -> Result<(), ScanError> {
        if self.index.contains_key(descriptor.name()) {
            return Err(ScanError::DuplicateCapability {
                kind: self.kind,
                name: descriptor.name().to_string(),
            });
        }
        self.index
            .insert(descriptor.name().to_string(), self.entries.len());
        self.entries.push(descriptor);
        Ok(())
    }

    pub(crate) fn get(&self, name: &str) -> Option<Arc<CapabilityDescriptor>> {
        self.index.get(name).map(|i| self.entries[*i].clone())
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.entries.iter().map(|d| d.name().to_string()).collect()
    }
}

/// Everything the cache knows about one installed app.
pub struct AppDescriptor {
    name: String,
    version: String,
    description: String,
    author: Option<String>,
    path: PathBuf,
    device_types: Vec<String>,
    app_class: Option<Arc<dyn AppFactory>>,
    actions: CapabilityTable,
    conditions: CapabilityTable,
    transforms: CapabilityTable,
}

impl std::fmt::Debug for AppDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppDescriptor")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("description", &self.description)
            .field("author", &self.author)
            .field("path", &self.path)
            .field("device_types", &self.device_types)
            .finish()
    }
}

impl AppDescriptor {
    /// Cross-checks the manifest's declarations against the module's handler
    /// table and assembles the descriptor set for one app.
    pub(crate) fn from_module(
        manifest: &AppManifest,
        path: PathBuf,
        module: &dyn AppModule,
    ) -> Result<Self, ScanError> {
        let mut actions = CapabilityTable::new(CapabilityKind::Action);
        let mut conditions = CapabilityTable::new(CapabilityKind::Condition);
        let mut transforms = CapabilityTable::new(CapabilityKind::Transform);

        for decl in &manifest.capabilities {
            let handler_name = decl.handler_name();
            let handler = module.handler(handler_name).ok_or_else(|| {
                ScanError::MissingHandler {
                    capability: decl.name.clone(),
                    handler: handler_name.to_string(),
                }
            })?;
            if handler.binding() != decl.binding {
                return Err(ScanError::BindingMismatch(decl.name.clone()));
            }

            let descriptor = Arc::new(CapabilityDescriptor::new(
                manifest.name.clone(),
                decl.name.clone(),
                decl.kind,
                decl.binding,
                handler,
            ));
            match decl.kind {
                CapabilityKind::Action => actions.insert(descriptor)?,
                CapabilityKind::Condition => conditions.insert(descriptor)?,
                CapabilityKind::Transform => transforms.insert(descriptor)?,
            }
        }

        Ok(Self {
            name: manifest.name.clone(),
            version: manifest.version.clone(),
            description: manifest.description.clone(),
            author: manifest.author.clone(),
            path,
            device_types: manifest.device_types.clone(),
            app_class: module.app_class(),
            actions,
            conditions,
            transforms,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Directory the app was ingested from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn device_types(&self) -> &[String] {
        &self.device_types
    }

    pub fn supports_device_type(&self, device_type: &str) -> bool {
        self.device_types.iter().any(|t| t == device_type)
    }

    /// The app class, when the plugin defines one.
    pub fn app_class(&self) -> Option<Arc<dyn AppFactory>> {
        self.app_class.clone()
    }

    pub(crate) fn capabilities(&self, kind: CapabilityKind) -> &CapabilityTable {
        match kind {
            CapabilityKind::Action => &self.actions,
            CapabilityKind::Condition => &self.conditions,
            CapabilityKind::Transform => &self.transforms,
        }
    }
}
