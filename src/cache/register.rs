use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    // 注册表只存放构造函数，锁中毒时数据仍然可用
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    registry.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
        .get(name)
        .cloned()
}

pub fn debug_object_cache_registry() {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if registry.is_empty() {
        tracing::debug!("No object cache plugins registered.");
    } else {
        let mut names: Vec<&String> = registry.keys().collect();
        names.sort();
        tracing::debug!("Registered object cache plugins: {:?}", names);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plugins_registered() {
        crate::cache::register_builtin_plugins();
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("redis").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }

    // 构造即失败的后端
    mod offline {
        use crate::cache::{CacheResult, ObjectCache};
        use async_trait::async_trait;

        pub struct OfflineCache;

        impl OfflineCache {
            pub fn new() -> std::result::Result<Self, String> {
                Err("Redis connection failed: refused".to_string())
            }
        }

        #[async_trait]
        impl ObjectCache for OfflineCache {
            async fn get_raw(&self, _key: &str) -> CacheResult<String> {
                CacheResult::NotFound
            }
            async fn insert_raw(&self, _key: String, _value: String, _ttl: u64) {}
            async fn remove(&self, _key: &str) {}
            async fn invalidate_all(&self) {}
        }

        crate::declare_object_cache_plugin!("offline", OfflineCache);
    }

    #[tokio::test]
    async fn test_backend_failure_is_cache_connection_error() {
        offline::register();
        let constructor = get_object_cache_plugin("offline").unwrap();
        let err = match constructor().await {
            Ok(_) => panic!("offline backend must not build"),
            Err(e) => e,
        };
        assert!(matches!(err, crate::errors::PortalError::CacheConnection(_)));
        assert!(err.message().contains("refused"));
    }
}
