#[cfg(feature = "dylib-apps")]
pub mod dylib_loader;
pub mod host_loader;

#[cfg(feature = "dylib-apps")]
pub use dylib_loader::DylibAppLoader;
pub use host_loader::HostAppLoader;
