//! 身份提供方令牌校验
//!
//! 令牌由外部身份提供方签发，本服务只负责校验签名与声明，
//! 并从中解析出同步本地账号所需的用户资料。

use std::sync::OnceLock;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, IdentityConfig};
use crate::errors::{PortalError, Result};
use crate::models::auth::entities::IdentityProfile;

static VERIFIER: OnceLock<JwtUtils> = OnceLock::new();

// 身份令牌 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String, // 身份提供方中的用户 ID
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub iat: Option<usize>,
}

impl IdentityClaims {
    /// 优先使用 name，否则拼接 given_name 与 family_name
    pub fn full_name(&self) -> Option<String> {
        if let Some(name) = self.name.as_deref().map(str::trim)
            && !name.is_empty()
        {
            return Some(name.to_string());
        }
        let joined = format!(
            "{} {}",
            self.given_name.as_deref().unwrap_or_default(),
            self.family_name.as_deref().unwrap_or_default()
        );
        let joined = joined.trim();
        if joined.is_empty() {
            None
        } else {
            Some(joined.to_string())
        }
    }

    pub fn into_profile(self) -> IdentityProfile {
        IdentityProfile {
            full_name: self.full_name(),
            external_id: self.sub,
            email: self.email,
        }
    }
}

pub struct JwtUtils {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// 根据身份提供方配置构建校验器
    ///
    /// 配置了公钥时使用 RS256，否则使用共享密钥 HS256。
    pub fn from_config(config: &IdentityConfig) -> Result<Self> {
        let (decoding_key, algorithm) = if !config.public_key_pem.trim().is_empty() {
            let key = DecodingKey::from_rsa_pem(config.public_key_pem.as_bytes()).map_err(|e| {
                PortalError::authentication(format!("Invalid identity public key: {e}"))
            })?;
            (key, Algorithm::RS256)
        } else if !config.jwt_secret.is_empty() {
            (
                DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                Algorithm::HS256,
            )
        } else {
            return Err(PortalError::authentication(
                "Identity provider is not configured: set identity.jwt_secret or identity.public_key_pem",
            ));
        };

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway;
        if !config.issuer.is_empty() {
            validation.set_issuer(&[config.issuer.as_str()]);
        }
        if config.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(&[config.audience.as_str()]);
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// 校验令牌并返回 Claims
    pub fn verify(&self, token: &str) -> std::result::Result<IdentityClaims, jsonwebtoken::errors::Error> {
        decode::<IdentityClaims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
    }

    /// 使用全局配置校验身份令牌
    pub fn verify_identity_token(token: &str) -> Result<IdentityClaims> {
        let verifier = match VERIFIER.get() {
            Some(verifier) => verifier,
            None => {
                let built = Self::from_config(&AppConfig::get().identity)?;
                VERIFIER.get_or_init(|| built)
            }
        };

        verifier
            .verify(token)
            .map_err(|e| PortalError::authentication(format!("Invalid identity token: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-identity-secret";

    fn config(issuer: &str) -> IdentityConfig {
        IdentityConfig {
            jwt_secret: SECRET.to_string(),
            public_key_pem: String::new(),
            issuer: issuer.to_string(),
            audience: String::new(),
            leeway: 0,
        }
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    #[test]
    fn test_verify_valid_token() {
        let token = sign(
            serde_json::json!({
                "sub": "idp_123",
                "email": "ada@school.test",
                "given_name": "Ada",
                "family_name": "Lovelace",
                "exp": future_exp(),
            }),
            SECRET,
        );

        let verifier = JwtUtils::from_config(&config("")).unwrap();
        let claims = verifier.verify(&token).unwrap();
        assert_eq!(claims.sub, "idp_123");

        let profile = claims.into_profile();
        assert_eq!(profile.full_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(profile.email.as_deref(), Some("ada@school.test"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = sign(
            serde_json::json!({ "sub": "idp_1", "exp": future_exp() }),
            "another-secret",
        );
        let verifier = JwtUtils::from_config(&config("")).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = sign(
            serde_json::json!({ "sub": "idp_1", "exp": chrono::Utc::now().timestamp() - 600 }),
            SECRET,
        );
        let verifier = JwtUtils::from_config(&config("")).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_issuer_checked_when_configured() {
        let token = sign(
            serde_json::json!({ "sub": "idp_1", "iss": "https://other.example", "exp": future_exp() }),
            SECRET,
        );
        let verifier = JwtUtils::from_config(&config("https://id.school.test")).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_missing_key_configuration() {
        let mut cfg = config("");
        cfg.jwt_secret.clear();
        assert!(JwtUtils::from_config(&cfg).is_err());
    }

    #[test]
    fn test_name_claim_preferred() {
        let claims = IdentityClaims {
            sub: "idp_9".to_string(),
            email: None,
            name: Some("Grace Hopper".to_string()),
            given_name: Some("Ignored".to_string()),
            family_name: None,
            exp: 0,
            iat: None,
        };
        assert_eq!(claims.full_name().as_deref(), Some("Grace Hopper"));
    }
}
