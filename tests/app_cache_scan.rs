use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;

use appcache::{
    AppCache, AppInstance, AppModuleBuilder, FreeCapability, HostAppLoader, InstanceCapability,
    InvokeError, LookupError, MANIFEST_FILE,
};

struct Noop;

#[async_trait]
impl FreeCapability for Noop {
    async fn invoke(&self, _args: &Value) -> Result<Value, InvokeError> {
        Ok(Value::Null)
    }
}

struct NoopBound;

#[async_trait]
impl InstanceCapability for NoopBound {
    async fn invoke(
        &self,
        _instance: &dyn AppInstance,
        _args: &Value,
    ) -> Result<Value, InvokeError> {
        Ok(Value::Null)
    }
}

fn write_manifest(root: &Path, dir_name: &str, manifest: &Value) {
    let dir = root.join(dir_name);
    std::fs::create_dir_all(&dir).expect("create plugin dir");
    std::fs::write(
        dir.join(MANIFEST_FILE),
        serde_json::to_string_pretty(manifest).expect("serialize manifest"),
    )
    .expect("write manifest");
}

/// One valid app "Foo" with a free action `bar` and a bound action `poll`.
fn foo_fixture(root: &Path) -> AppCache {
    write_manifest(
        root,
        "foo",
        &serde_json::json!({
            "name": "Foo",
            "version": "1.0.0",
            "capabilities": [
                { "name": "bar", "kind": "action" },
                { "name": "poll", "kind": "action", "binding": "instance" }
            ]
        }),
    );

    let loader = HostAppLoader::new();
    loader.register_module(
        "Foo",
        AppModuleBuilder::new()
            .free_handler("bar", Arc::new(Noop))
            .instance_handler("poll", Arc::new(NoopBound))
            .build(),
    );

    let cache = AppCache::new();
    cache.register_loader(Arc::new(loader));
    cache
}

#[test]
fn test_action_lookup_and_names() {
    let root = TempDir::new().expect("tempdir");
    let cache = foo_fixture(root.path());
    cache.cache_apps(root.path()).expect("scan succeeds");

    let action = cache.get_app_action("Foo", "bar").expect("bar is cached");
    assert_eq!(action.app(), "Foo");
    assert_eq!(action.name(), "bar");
    assert!(!action.is_bound());

    assert_eq!(
        cache.get_app_action_names("Foo").expect("Foo is cached"),
        vec!["bar".to_string(), "poll".to_string()]
    );

    assert!(matches!(
        cache.get_app_action("Foo", "baz"),
        Err(LookupError::UnknownAppAction { .. })
    ));
    // Lookups are exact, case-sensitive matches.
    assert!(matches!(
        cache.get_app_action("Foo", "Bar"),
        Err(LookupError::UnknownAppAction { .. })
    ));
}

#[test]
fn test_rescan_replaces_instead_of_duplicating() {
    let root = TempDir::new().expect("tempdir");
    let cache = foo_fixture(root.path());

    cache.cache_apps(root.path()).expect("first scan");
    let first = cache.get_app_action_names("Foo").expect("Foo is cached");

    cache.cache_apps(root.path()).expect("second scan");
    let second = cache.get_app_action_names("Foo").expect("Foo is cached");

    assert_eq!(first, second);
    assert_eq!(cache.app_names(), vec!["Foo".to_string()]);
}

#[test]
fn test_clear_forgets_every_app() {
    let root = TempDir::new().expect("tempdir");
    let cache = foo_fixture(root.path());
    cache.cache_apps(root.path()).expect("scan succeeds");

    cache.clear();

    assert!(matches!(
        cache.get_app("Foo"),
        Err(LookupError::UnknownApp(_))
    ));
    assert!(matches!(
        cache.get_app_action("Foo", "bar"),
        Err(LookupError::UnknownApp(_))
    ));
    assert!(cache.app_names().is_empty());
}

#[test]
fn test_broken_plugins_do_not_poison_the_scan() {
    let root = TempDir::new().expect("tempdir");
    write_manifest(
        root.path(),
        "foo",
        &serde_json::json!({
            "name": "Foo",
            "version": "1.0.0",
            "capabilities": [{ "name": "bar", "kind": "action" }]
        }),
    );

    // Unparseable manifest.
    let garbled = root.path().join("garbled");
    std::fs::create_dir_all(&garbled).expect("create plugin dir");
    std::fs::write(garbled.join(MANIFEST_FILE), "{ not json").expect("write manifest");

    // Manifest declares a handler the module does not export.
    write_manifest(
        root.path(),
        "ghost",
        &serde_json::json!({
            "name": "Ghost",
            "version": "1.0.0",
            "capabilities": [{ "name": "vanish", "kind": "action" }]
        }),
    );

    // Declared free, exported bound.
    write_manifest(
        root.path(),
        "mismatch",
        &serde_json::json!({
            "name": "Mismatch",
            "version": "1.0.0",
            "capabilities": [{ "name": "poll", "kind": "action", "binding": "free" }]
        }),
    );

    // Same action name declared twice.
    write_manifest(
        root.path(),
        "twice",
        &serde_json::json!({
            "name": "Twice",
            "version": "1.0.0",
            "capabilities": [
                { "name": "ping", "kind": "action" },
                { "name": "ping", "kind": "action" }
            ]
        }),
    );

    let loader = HostAppLoader::new();
    loader.register_module(
        "Foo",
        AppModuleBuilder::new()
            .free_handler("bar", Arc::new(Noop))
            .build(),
    );
    loader.register_module("Ghost", AppModuleBuilder::new().build());
    loader.register_module(
        "Mismatch",
        AppModuleBuilder::new()
            .instance_handler("poll", Arc::new(NoopBound))
            .build(),
    );
    loader.register_module(
        "Twice",
        AppModuleBuilder::new()
            .free_handler("ping", Arc::new(Noop))
            .build(),
    );
    let cache = AppCache::new();
    cache.register_loader(Arc::new(loader));

    let cached = cache.cache_apps(root.path()).expect("scan succeeds");

    assert_eq!(cached, vec!["Foo".to_string()]);
    assert!(cache.get_app_action("Foo", "bar").is_ok());
    for absent in ["Ghost", "Mismatch", "Twice"] {
        assert!(matches!(
            cache.get_app_action(absent, "anything"),
            Err(LookupError::UnknownApp(_))
        ));
    }
}

#[test]
fn test_is_app_action_bound() {
    let root = TempDir::new().expect("tempdir");
    let cache = foo_fixture(root.path());
    cache.cache_apps(root.path()).expect("scan succeeds");

    assert!(!cache.is_app_action_bound("Foo", "bar").expect("bar exists"));
    assert!(cache.is_app_action_bound("Foo", "poll").expect("poll exists"));
    assert!(matches!(
        cache.is_app_action_bound("Foo", "baz"),
        Err(LookupError::UnknownAppAction { .. })
    ));
    assert!(matches!(
        cache.is_app_action_bound("Bar", "bar"),
        Err(LookupError::UnknownApp(_))
    ));
}

#[test]
fn test_kind_scoped_lookups_on_an_action_only_app() {
    let root = TempDir::new().expect("tempdir");
    let cache = foo_fixture(root.path());
    cache.cache_apps(root.path()).expect("scan succeeds");

    // The app exists, so the kind-specific error is reported, never UnknownApp.
    assert!(cache
        .get_app_condition_names("Foo")
        .expect("Foo is cached")
        .is_empty());
    assert!(cache
        .get_app_transform_names("Foo")
        .expect("Foo is cached")
        .is_empty());
    assert!(matches!(
        cache.get_app_condition("Foo", "gate"),
        Err(LookupError::UnknownCondition { .. })
    ));
    assert!(matches!(
        cache.get_app_transform("Foo", "shape"),
        Err(LookupError::UnknownTransform { .. })
    ));
    // Capability names are scoped per kind: an action is not a condition.
    assert!(matches!(
        cache.get_app_condition("Foo", "bar"),
        Err(LookupError::UnknownCondition { .. })
    ));
}

#[test]
fn test_free_only_app_has_no_app_class() {
    let root = TempDir::new().expect("tempdir");
    write_manifest(
        root.path(),
        "util",
        &serde_json::json!({
            "name": "Util",
            "version": "1.0.0",
            "capabilities": [
                { "name": "checksum", "kind": "action" },
                { "name": "flatten", "kind": "transform" }
            ]
        }),
    );

    let loader = HostAppLoader::new();
    loader.register_module(
        "Util",
        AppModuleBuilder::new()
            .free_handler("checksum", Arc::new(Noop))
            .free_handler("flatten", Arc::new(Noop))
            .build(),
    );
    let cache = AppCache::new();
    cache.register_loader(Arc::new(loader));
    cache.cache_apps(root.path()).expect("scan succeeds");

    // No app class: absent for `get_app`, but its capabilities stay reachable.
    assert!(matches!(
        cache.get_app("Util"),
        Err(LookupError::UnknownApp(_))
    ));
    assert!(cache.get_app_action("Util", "checksum").is_ok());
    assert!(cache.get_app_transform("Util", "flatten").is_ok());
    assert_eq!(
        cache.get_app_transform_names("Util").expect("Util is cached"),
        vec!["flatten".to_string()]
    );
}

#[test]
fn test_names_preserve_declaration_order() {
    let root = TempDir::new().expect("tempdir");
    write_manifest(
        root.path(),
        "ops",
        &serde_json::json!({
            "name": "Ops",
            "version": "1.0.0",
            "capabilities": [
                { "name": "zeta", "kind": "action" },
                { "name": "alpha", "kind": "action" },
                { "name": "mid", "kind": "action" }
            ]
        }),
    );

    let loader = HostAppLoader::new();
    loader.register_module(
        "Ops",
        AppModuleBuilder::new()
            .free_handler("zeta", Arc::new(Noop))
            .free_handler("alpha", Arc::new(Noop))
            .free_handler("mid", Arc::new(Noop))
            .build(),
    );
    let cache = AppCache::new();
    cache.register_loader(Arc::new(loader));
    cache.cache_apps(root.path()).expect("scan succeeds");

    assert_eq!(
        cache.get_app_action_names("Ops").expect("Ops is cached"),
        vec!["zeta".to_string(), "alpha".to_string(), "mid".to_string()]
    );
}
