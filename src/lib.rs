//! # appcache — App Plugin Discovery & Capability Lookup
//!
//! `appcache` is the capability registry of a workflow-automation platform.
//! It discovers installed app plugins on disk and answers the workflow
//! executor's lookups for their action, condition, and transform callables
//! at execution time:
//!
//! - **Manifest-driven discovery**: each plugin directory declares its
//!   capabilities in an `app.json` manifest; the cache resolves every
//!   declaration against the loaded module's handler table instead of
//!   reflecting over the module structurally.
//! - **Tagged capabilities**: every capability carries `{kind, binding}`
//!   tags, so the executor branches on whether a callable needs a live,
//!   device-bound app instance or runs as a plain async function.
//! - **Pluggable module loaders**: host-registered modules for embedded
//!   deployments, plus `libloading`-based cdylib plugins behind the
//!   `dylib-apps` feature.
//! - **Concurrent lookups**: one `AppCache` value is shared across all
//!   executor tasks; lookups take a read lock only, and scans commit each
//!   finished descriptor under a short write lock.
//! - **Fault-isolated scans**: a plugin that fails to load is logged and
//!   skipped without aborting the rest of the scan.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use appcache::{AppCache, HostAppLoader};
//!
//! let cache = AppCache::new();
//! cache.register_loader(Arc::new(HostAppLoader::new()));
//! cache.cache_apps("./apps").unwrap();
//!
//! let action = cache.get_app_action("HelloWorld", "say_hello").unwrap();
//! if action.is_bound() {
//!     let app = cache.get_app("HelloWorld").unwrap();
//!     // instantiate via app.app_class() with a device context, then invoke
//! }
//! ```
//!
//! # Feature Flags
//!
//! | Flag | Description |
//! |------|-------------|
//! | `dylib-apps` | Enables dynamic loading of app modules via `libloading` |

pub mod cache;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod handler;
pub mod loader;
pub mod loaders;
mod macros;
pub mod manifest;
pub mod module;

pub use crate::cache::{AppCache, AppCacheConfig, MANIFEST_FILE};
pub use crate::descriptor::{AppDescriptor, CapabilityDescriptor};
pub use crate::device::DeviceContext;
pub use crate::error::{
    InvokeError, LookupError, LookupResult, ScanError, ScanResult,
};
pub use crate::handler::{
    AppFactory, AppInstance, FreeCapability, Handler, InstanceCapability,
};
pub use crate::loader::{AppModuleLoader, APP_MODULE_ABI_VERSION};
#[cfg(feature = "dylib-apps")]
pub use crate::loaders::DylibAppLoader;
pub use crate::loaders::HostAppLoader;
pub use crate::manifest::{
    AppManifest, CapabilityBinding, CapabilityDecl, CapabilityKind,
};
pub use crate::module::{AppModule, AppModuleBuilder};
