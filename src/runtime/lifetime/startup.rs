use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{PortalError, Result};
use crate::models::users::entities::UserRole;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

// 按名称构建缓存后端
async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例
///
/// 配置的后端不可用时回退到 moka 内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(PortalError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 初始化管理员账号
///
/// 用户表为空且配置了管理员邮箱时，创建待关联的管理员账号，
/// 该邮箱首次通过身份提供方登录时完成关联。
async fn seed_admin(storage: &Arc<dyn Storage>) {
    let admin_email = AppConfig::get().app.admin_email.trim();
    if admin_email.is_empty() {
        debug!("No admin email configured, skipping admin seed");
        return;
    }

    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping admin seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating pending admin account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    match storage
        .create_pending_user(admin_email, "Administrator", UserRole::Admin)
        .await
    {
        Ok(user) => {
            warn!(
                "Pending admin account created (ID: {}, email: {}), it links on first sign-in",
                user.id, user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储、迁移、管理员账号与缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    // 重复安装时返回 Err，此时已有可用的 provider
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if !AppConfig::get().identity_configured() {
        warn!("Identity provider is not configured, every authenticated request will be rejected");
    }

    crate::cache::register_builtin_plugins();
    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
