//! # Pure Data Module / 纯数据模块
//!
//! Configuration DTO and its TOML mapping. No validation and no default
//! value calculation here: an empty string or zero is a fact, and the
//! wiring layer decides what it means.
//!
//! 此模块只包含数据结构定义，禁止验证逻辑与默认值计算。

/// Backend connection credentials.
///
/// 后端连接凭据。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackendSection {
    pub api_key: String,
    pub project_id: String,
}

/// Signed-in user override (empty means "use the development user").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSection {
    pub uid: String,
    pub name: String,
    pub avatar_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketSection {
    pub base_url: String,
    /// Seconds between market refreshes (0 = not set)
    pub refresh_interval_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AiSection {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

/// Application configuration DTO (pure data, no logic)
/// 应用配置 DTO（纯数据，无逻辑）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendSection,
    pub user: UserSection,
    pub market: MarketSection,
    pub ai: AiSection,
}

fn str_at(value: &toml::Value, section: &str, key: &str) -> String {
    value
        .get(section)
        .and_then(|s| s.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

impl AppConfig {
    /// Create AppConfig from TOML value
    /// 从 TOML 值创建 AppConfig
    ///
    /// Missing keys map to empty values. Negative intervals map to 0.
    pub fn from_toml(toml_value: &toml::Value) -> anyhow::Result<Self> {
        Ok(Self {
            backend: BackendSection {
                api_key: str_at(toml_value, "backend", "api_key"),
                project_id: str_at(toml_value, "backend", "project_id"),
            },
            user: UserSection {
                uid: str_at(toml_value, "user", "uid"),
                name: str_at(toml_value, "user", "name"),
                avatar_url: str_at(toml_value, "user", "avatar_url"),
            },
            market: MarketSection {
                base_url: str_at(toml_value, "market", "base_url"),
                refresh_interval_secs: toml_value
                    .get("market")
                    .and_then(|m| m.get("refresh_interval_secs"))
                    .and_then(|v| v.as_integer())
                    .and_then(|v| u64::try_from(v).ok())
                    .unwrap_or(0),
            },
            ai: AiSection {
                api_key: str_at(toml_value, "ai", "api_key"),
                base_url: str_at(toml_value, "ai", "base_url"),
                text_model: str_at(toml_value, "ai", "text_model"),
                image_model: str_at(toml_value, "ai", "image_model"),
            },
        })
    }

    /// Create empty AppConfig (all empty/default values)
    /// 创建空的 AppConfig
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_reads_all_sections() {
        let value: toml::Value = toml::from_str(
            r#"
            [backend]
            api_key = "k"
            project_id = "astra"

            [user]
            uid = "u1"

            [market]
            base_url = "http://localhost:1"
            refresh_interval_secs = 30

            [ai]
            api_key = "g"
            text_model = "m"
            "#,
        )
        .unwrap();

        let config = AppConfig::from_toml(&value).unwrap();
        assert_eq!(config.backend.api_key, "k");
        assert_eq!(config.backend.project_id, "astra");
        assert_eq!(config.user.uid, "u1");
        assert_eq!(config.user.name, "");
        assert_eq!(config.market.refresh_interval_secs, 30);
        assert_eq!(config.ai.text_model, "m");
        assert_eq!(config.ai.image_model, "");
    }

    #[test]
    fn test_missing_sections_are_empty_facts() {
        let value: toml::Value = toml::from_str("").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap(), AppConfig::empty());
    }

    #[test]
    fn test_negative_interval_is_zero() {
        let value: toml::Value = toml::from_str("[market]\nrefresh_interval_secs = -5").unwrap();
        assert_eq!(AppConfig::from_toml(&value).unwrap().market.refresh_interval_secs, 0);
    }
}
