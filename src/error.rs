//! Error types for the app cache.
//!
//! - [`LookupError`]: raised by capability lookups at execution time.
//! - [`ScanError`]: raised while ingesting a plugin directory.
//! - [`InvokeError`]: raised by capability handlers when invoked.

use thiserror::Error;

use crate::manifest::CapabilityKind;

/// Convenience alias for lookup results.
pub type LookupResult<T> = Result<T, LookupError>;
/// Convenience alias for scan results.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors returned by the consumer-facing lookup API.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Unknown app: {0}")]
    UnknownApp(String),

    #[error("Unknown action `{action}` for app `{app}`")]
    UnknownAppAction { app: String, action: String },

    #[error("Unknown condition `{condition}` for app `{app}`")]
    UnknownCondition { app: String, condition: String },

    #[error("Unknown transform `{transform}` for app `{app}`")]
    UnknownTransform { app: String, transform: String },
}

/// Errors raised while loading a single plugin directory. `cache_apps` logs
/// these and moves on to the next plugin; loader APIs surface them directly.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Loader not found: {0}")]
    LoaderNotFound(String),

    #[error("Load error: {0}")]
    LoadError(String),

    #[error("Missing handler `{handler}` for capability `{capability}`")]
    MissingHandler { capability: String, handler: String },

    #[error("Handler binding mismatch for capability `{0}`")]
    BindingMismatch(String),

    #[error("Duplicate {kind:?} capability: {name}")]
    DuplicateCapability { kind: CapabilityKind, name: String },

    #[error("ABI version mismatch: expected {expected}, actual {actual}")]
    AbiVersionMismatch { expected: u32, actual: u32 },

    #[error("Missing export: {0}")]
    MissingExport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by capability handlers at invocation time.
#[derive(Debug, Error)]
pub enum InvokeError {
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("No device bound to app instance")]
    DeviceNotBound,

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_error_display() {
        assert!(LookupError::UnknownApp("Foo".into()).to_string().contains("Foo"));
        let err = LookupError::UnknownAppAction {
            app: "Foo".into(),
            action: "bar".into(),
        };
        assert!(err.to_string().contains("Foo"));
        assert!(err.to_string().contains("bar"));
        let err = LookupError::UnknownCondition {
            app: "Foo".into(),
            condition: "gate".into(),
        };
        assert!(err.to_string().contains("gate"));
        let err = LookupError::UnknownTransform {
            app: "Foo".into(),
            transform: "shape".into(),
        };
        assert!(err.to_string().contains("shape"));
    }

    #[test]
    fn test_scan_error_display() {
        assert!(ScanError::InvalidManifest("bad".into()).to_string().contains("bad"));
        assert!(ScanError::LoaderNotFound("dylib".into()).to_string().contains("dylib"));
        assert!(ScanError::LoadError("fail".into()).to_string().contains("fail"));
        let err = ScanError::MissingHandler {
            capability: "ping".into(),
            handler: "do_ping".into(),
        };
        assert!(err.to_string().contains("ping"));
        assert!(err.to_string().contains("do_ping"));
        assert!(ScanError::BindingMismatch("ping".into()).to_string().contains("ping"));
    }

    #[test]
    fn test_scan_error_abi_mismatch() {
        let err = ScanError::AbiVersionMismatch {
            expected: 1,
            actual: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("1"));
        assert!(msg.contains("2"));
    }

    #[test]
    fn test_scan_error_duplicate_capability() {
        let err = ScanError::DuplicateCapability {
            kind: CapabilityKind::Action,
            name: "ping".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Action"));
        assert!(msg.contains("ping"));
    }
}
