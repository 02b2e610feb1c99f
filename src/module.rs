use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::{AppFactory, FreeCapability, Handler, InstanceCapability};

/// One loaded app plugin: a fixed handler table plus an optional app class.
///
/// Loaders produce these; the cache never inspects a module structurally,
/// it only resolves the handler names the manifest declares.
pub trait AppModule: Send + Sync + std::fmt::Debug {
    /// The app class, when the plugin defines one. Plugins exposing only
    /// free capabilities return `None`.
    fn app_class(&self) -> Option<Arc<dyn AppFactory>>;

    /// Resolve a handler export by name.
    fn handler(&self, name: &str) -> Option<Handler>;
}

/// Assembles static [`AppModule`]s for host apps and tests.
#[derive(Default)]
pub struct AppModuleBuilder {
    app_class: Option<Arc<dyn AppFactory>>,
    handlers: HashMap<String, Handler>,
}

impl AppModuleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn app_class(mut self, factory: Arc<dyn AppFactory>) -> Self {
        self.app_class = Some(factory);
        self
    }

    pub fn free_handler(
        mut self,
        name: impl Into<String>,
        capability: Arc<dyn FreeCapability>,
    ) -> Self {
        self.handlers.insert(name.into(), Handler::Free(capability));
        self
    }

    pub fn instance_handler(
        mut self,
        name: impl Into<String>,
        capability: Arc<dyn InstanceCapability>,
    ) -> Self {
        self.handlers
            .insert(name.into(), Handler::Instance(capability));
        self
    }

    pub fn build(self) -> Arc<dyn AppModule> {
        Arc::new(StaticAppModule {
            app_class: self.app_class,
            handlers: self.handlers,
        })
    }
}

struct StaticAppModule {
    app_class: Option<Arc<dyn AppFactory>>,
    handlers: HashMap<String, Handler>,
}

impl std::fmt::Debug for StaticAppModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticAppModule")
            .field("app_class", &self.app_class.is_some())
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl AppModule for StaticAppModule {
    fn app_class(&self) -> Option<Arc<dyn AppFactory>> {
        self.app_class.clone()
    }

    fn handler(&self, name: &str) -> Option<Handler> {
        self.handlers.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use serde_json::Value;

    use crate::error::InvokeError;
    use crate::manifest::CapabilityBinding;

    struct Noop;

    #[async_trait]
    impl FreeCapability for Noop {
        async fn invoke(&self, _args: &Value) -> Result<Value, InvokeError> {
            Ok(Value::Null)
        }
    }

    #[test]
    fn test_builder_resolves_handlers() {
        let module = AppModuleBuilder::new()
            .free_handler("noop", Arc::new(Noop))
            .build();

        assert!(module.app_class().is_none());
        let handler = module.handler("noop").expect("handler registered");
        assert_eq!(handler.binding(), CapabilityBinding::Free);
        assert!(module.handler("missing").is_none());
    }
}
