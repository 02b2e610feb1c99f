/// Emits the exports a cdylib app plugin needs for the dylib loader.
///
/// The expression is evaluated on every load and must yield an
/// `Arc<dyn AppModule>`.
#[macro_export]
macro_rules! declare_app_module {
    ($build:expr) => {
        #[no_mangle]
        pub static APPCACHE_MODULE_ABI_VERSION: u32 = $crate::APP_MODULE_ABI_VERSION;

        #[no_mangle]
        pub fn appcache_module_create() -> std::sync::Arc<dyn $crate::AppModule> {
            $build
        }
    };
}
