use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::{AppConfig, CorsConfig};

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// 显式环境变量与配置键的对应关系，优先级最高
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_ENV", "app.environment"),
    ("RUST_LOG", "app.log_level"),
    ("ADMIN_EMAIL", "app.admin_email"),
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("UNIX_SOCKET", "server.unix_socket_path"),
    ("CPU_COUNT", "server.workers"),
    ("IDENTITY_JWT_SECRET", "identity.jwt_secret"),
    ("IDENTITY_PUBLIC_KEY", "identity.public_key_pem"),
    ("IDENTITY_ISSUER", "identity.issuer"),
    ("IDENTITY_AUDIENCE", "identity.audience"),
    ("DATABASE_URL", "database.url"),
    ("REDIS_URL", "cache.redis.url"),
    ("REDIS_KEY_PREFIX", "cache.redis.key_prefix"),
    ("CACHE_TTL", "cache.default_ttl"),
];

impl AppConfig {
    /// 加载配置
    ///
    /// 顺序：`config.toml` → `config.<APP_ENV>.toml` → `PORTAL__*` → 显式环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(File::with_name(&format!("config.{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("PORTAL")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut app_config: AppConfig = builder.build()?.try_deserialize()?;

        // 0 表示按 CPU 核数，受 max_workers 限制
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }
        app_config.app.admin_email = app_config.app.admin_email.trim().to_lowercase();

        Ok(app_config)
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 是否配置了令牌校验所需的密钥或公钥
    pub fn identity_configured(&self) -> bool {
        !self.identity.jwt_secret.is_empty() || !self.identity.public_key_pem.trim().is_empty()
    }

    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Unix 套接字路径，未配置时为 None
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        Some(self.server.unix_socket_path.as_str()).filter(|path| !path.is_empty())
    }
}

impl CorsConfig {
    /// 来源列表为空或包含 `*` 时允许任意来源
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overrides_are_unique() {
        let mut vars: Vec<&str> = ENV_OVERRIDES.iter().map(|(var, _)| *var).collect();
        let mut keys: Vec<&str> = ENV_OVERRIDES.iter().map(|(_, key)| *key).collect();
        vars.sort();
        vars.dedup();
        keys.sort();
        keys.dedup();
        assert_eq!(vars.len(), ENV_OVERRIDES.len());
        assert_eq!(keys.len(), ENV_OVERRIDES.len());
    }

    #[test]
    fn test_cors_any_origin() {
        let mut cors = CorsConfig {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string()],
            allowed_headers: Vec::new(),
            max_age: 60,
        };
        assert!(cors.allows_any_origin());

        cors.allowed_origins = vec!["https://portal.school.test".to_string()];
        assert!(!cors.allows_any_origin());

        cors.allowed_origins.clear();
        assert!(cors.allows_any_origin());
    }
}
