/// 身份提供方令牌中解析出的用户资料，用于同步本地账号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub external_id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl IdentityProfile {
    /// 令牌未携带邮箱时使用的占位邮箱
    pub fn email_or_placeholder(&self) -> String {
        match self.email.as_deref().map(str::trim) {
            Some(email) if !email.is_empty() => email.to_string(),
            _ => format!("{}@placeholder.local", self.external_id),
        }
    }

    pub fn full_name_or_default(&self) -> String {
        match self.full_name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "New Student".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallbacks() {
        let profile = IdentityProfile {
            external_id: "idp_42".to_string(),
            email: Some("  ".to_string()),
            full_name: None,
        };
        assert_eq!(profile.email_or_placeholder(), "idp_42@placeholder.local");
        assert_eq!(profile.full_name_or_default(), "New Student");
    }
}
