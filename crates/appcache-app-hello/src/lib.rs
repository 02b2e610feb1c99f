//! HelloWorld example app.
//!
//! Ships one free action, one bound action, and one condition, with a
//! manifest like:
//!
//! ```json
//! {
//!     "name": "HelloWorld",
//!     "version": "1.0.0",
//!     "loader": "dylib",
//!     "library_file": "libappcache_app_hello.so",
//!     "device_types": ["test_device"],
//!     "capabilities": [
//!         { "name": "say_hello", "kind": "action" },
//!         { "name": "greet_device", "kind": "action", "binding": "instance" },
//!         { "name": "is_anyone_home", "kind": "condition" }
//!     ]
//! }
//! ```

use std::any::Any;
use std::sync::Arc;

use appcache::{
    declare_app_module, AppFactory, AppInstance, AppModuleBuilder, DeviceContext, FreeCapability,
    InstanceCapability, InvokeError,
};
use async_trait::async_trait;
use serde_json::{json, Value};

struct SayHello;

#[async_trait]
impl FreeCapability for SayHello {
    async fn invoke(&self, args: &Value) -> Result<Value, InvokeError> {
        let name = args.get("name").and_then(Value::as_str).unwrap_or("world");
        Ok(json!({ "message": format!("hello, {}", name) }))
    }
}

struct IsAnyoneHome;

#[async_trait]
impl FreeCapability for IsAnyoneHome {
    async fn invoke(&self, args: &Value) -> Result<Value, InvokeError> {
        Ok(json!(args.get("name").is_some()))
    }
}

/// Greets the device the receiving app instance is bound to.
struct GreetDevice;

#[async_trait]
impl InstanceCapability for GreetDevice {
    async fn invoke(
        &self,
        instance: &dyn AppInstance,
        _args: &Value,
    ) -> Result<Value, InvokeError> {
        let device = instance.device().ok_or(InvokeError::DeviceNotBound)?;
        let label = device
            .field("label")
            .and_then(Value::as_str)
            .unwrap_or("unnamed device");
        Ok(json!({ "message": format!("hello from {}", label) }))
    }
}

struct HelloApp {
    device: Option<DeviceContext>,
}

#[async_trait]
impl AppInstance for HelloApp {
    fn app_name(&self) -> &str {
        "HelloWorld"
    }

    fn device(&self) -> Option<&DeviceContext> {
        self.device.as_ref()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

struct HelloAppFactory;

#[async_trait]
impl AppFactory for HelloAppFactory {
    async fn instantiate(
        &self,
        device: Option<DeviceContext>,
    ) -> Result<Box<dyn AppInstance>, InvokeError> {
        Ok(Box::new(HelloApp { device }))
    }
}

declare_app_module!(AppModuleBuilder::new()
    .app_class(Arc::new(HelloAppFactory))
    .free_handler("say_hello", Arc::new(SayHello))
    .free_handler("is_anyone_home", Arc::new(IsAnyoneHome))
    .instance_handler("greet_device", Arc::new(GreetDevice))
    .build());
