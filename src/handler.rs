//! Capability callables and the app instances bound ones run against.

use std::any::Any;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::device::DeviceContext;
use crate::error::InvokeError;
use crate::manifest::CapabilityBinding;

/// A capability invocable as a plain async function.
#[async_trait]
pub trait FreeCapability: Send + Sync {
    async fn invoke(&self, args: &Value) -> Result<Value, InvokeError>;
}

/// A capability that must be invoked on a live app instance.
#[async_trait]
pub trait InstanceCapability: Send + Sync {
    async fn invoke(
        &self,
        instance: &dyn AppInstance,
        args: &Value,
    ) -> Result<Value, InvokeError>;
}

/// Tagged callable carried by a capability descriptor.
///
/// The executor branches on the variant: a [`Handler::Instance`] requires
/// constructing an app instance (with device context) before the call, a
/// [`Handler::Free`] does not.
#[derive(Clone)]
pub enum Handler {
    Free(Arc<dyn FreeCapability>),
    Instance(Arc<dyn InstanceCapability>),
}

impl Handler {
    pub fn binding(&self) -> CapabilityBinding {
        match self {
            Handler::Free(_) => CapabilityBinding::Free,
            Handler::Instance(_) => CapabilityBinding::Instance,
        }
    }
}

/// A live app object, optionally bound to a device.
#[async_trait]
pub trait AppInstance: Send + Sync {
    fn app_name(&self) -> &str;

    /// The device this instance was constructed against, if any.
    fn device(&self) -> Option<&DeviceContext> {
        None
    }

    /// Performs shutdown procedures for the app.
    async fn shutdown(&self) -> Result<(), InvokeError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
}

/// The app class: constructs instances bound to a device context.
#[async_trait]
pub trait AppFactory: Send + Sync {
    async fn instantiate(
        &self,
        device: Option<DeviceContext>,
    ) -> Result<Box<dyn AppInstance>, InvokeError>;
}
