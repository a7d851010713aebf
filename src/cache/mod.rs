//! 对象缓存
//!
//! 后端以插件形式注册到 [`register`] 中，启动时按配置的类型构建。

pub mod object_cache;
pub mod register;
pub mod traits;

use serde::{Serialize, de::DeserializeOwned};
use tracing::debug;

pub use traits::{CacheResult, ObjectCache};

/// 为缓存后端生成插件注册函数 `register()`
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        /// 将该后端注册到对象缓存插件表
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::PortalError::cache_connection)?;
                        let boxed: Box<dyn $crate::cache::ObjectCache> = Box::new(cache);
                        Ok::<_, $crate::errors::PortalError>(boxed)
                    })
                }),
            );
        }
    };
}

/// 注册内置的缓存后端
pub fn register_builtin_plugins() {
    object_cache::moka::register();
    object_cache::redis::register();
}

/// 读取并反序列化缓存值，反序列化失败时删除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 序列化后写入缓存
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

#[cfg(test)]
mod tests {
    use super::object_cache::moka::MokaCacheWrapper;
    use super::*;

    #[tokio::test]
    async fn test_json_round_trip_and_removal() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        insert_json(&cache, "user:idp_1".to_string(), &vec![1_i64, 2, 3], 0).await;

        let value: Option<Vec<i64>> = get_json(&cache, "user:idp_1").await;
        assert_eq!(value, Some(vec![1, 2, 3]));

        cache.remove("user:idp_1").await;
        let value: Option<Vec<i64>> = get_json(&cache, "user:idp_1").await;
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = MokaCacheWrapper::with_settings(100, 60);
        cache
            .insert_raw("user:bad".to_string(), "not json".to_string(), 0)
            .await;

        let value: Option<Vec<i64>> = get_json(&cache, "user:bad").await;
        assert!(value.is_none());
        assert_eq!(cache.get_raw("user:bad").await, CacheResult::NotFound);
    }
}
