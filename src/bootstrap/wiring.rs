//! # Dependency Injection / 依赖注入模块
//!
//! The only place that knows `ap-infra` and `ap-app` at the same time. It
//! turns the raw [`AppConfig`] into adapters and resolved settings; no
//! business decisions happen here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use ap_app::usecases::SeedGuard;
use ap_app::{AppDeps, AppSettings};
use ap_core::config::{AiSection, AppConfig, UserSection};
use ap_core::ids::UserId;
use ap_core::user::{Role, User};
use ap_infra::ai::{DEFAULT_GEMINI_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use ap_infra::market::DEFAULT_COINGECKO_BASE_URL;
use ap_infra::{CoinGeckoClient, GeminiClient, GeminiSettings, InMemoryDocumentStore, SystemClock};

/// Fallback for `[ai] api_key`.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.trim().to_string()
    }
}

/// Gemini settings with defaults applied. `env_key` fills an empty key.
pub fn resolve_gemini_settings(ai: &AiSection, env_key: Option<String>) -> GeminiSettings {
    let api_key = if ai.api_key.trim().is_empty() {
        env_key.unwrap_or_default()
    } else {
        ai.api_key.trim().to_string()
    };
    GeminiSettings {
        api_key,
        base_url: or_default(&ai.base_url, DEFAULT_GEMINI_BASE_URL),
        text_model: or_default(&ai.text_model, DEFAULT_TEXT_MODEL),
        image_model: or_default(&ai.image_model, DEFAULT_IMAGE_MODEL),
    }
}

/// The configured user, or the development admin when no uid is set.
pub fn resolve_user(section: &UserSection) -> User {
    let fallback = User::development_admin();
    if section.uid.trim().is_empty() {
        return fallback;
    }
    let uid = section.uid.trim().to_string();
    User {
        avatar_url: if section.avatar_url.trim().is_empty() {
            format!("https://i.pravatar.cc/150?u={uid}")
        } else {
            section.avatar_url.trim().to_string()
        },
        name: or_default(&section.name, &fallback.name),
        uid: UserId::from(uid),
        role: Role::Admin,
    }
}

/// Zero means "not set".
pub fn resolve_refresh_interval(secs: u64) -> Duration {
    if secs == 0 {
        DEFAULT_REFRESH_INTERVAL
    } else {
        Duration::from_secs(secs)
    }
}

/// Build every adapter and the resolved settings.
pub fn wire_dependencies(config: &AppConfig) -> anyhow::Result<(AppDeps, AppSettings)> {
    let market_base = or_default(&config.market.base_url, DEFAULT_COINGECKO_BASE_URL);
    let market = CoinGeckoClient::new(market_base.clone())
        .context("Failed to build market data client")?;

    let gemini_settings =
        resolve_gemini_settings(&config.ai, std::env::var(GEMINI_API_KEY_ENV).ok());
    if gemini_settings.api_key.is_empty() {
        tracing::warn!("no generative AI key configured; compose and research will fail");
    }
    let generative =
        GeminiClient::new(gemini_settings).context("Failed to build generative AI client")?;

    let settings = AppSettings {
        user: resolve_user(&config.user),
        market_refresh_interval: resolve_refresh_interval(config.market.refresh_interval_secs),
        seed_guard: Arc::new(SeedGuard::new()),
    };

    info!(
        project_id = %config.backend.project_id,
        market_base = %market_base,
        uid = %settings.user.uid,
        "dependencies wired"
    );

    let deps = AppDeps {
        store: Arc::new(InMemoryDocumentStore::new()),
        market: Arc::new(market),
        generative: Arc::new(generative),
        clock: Arc::new(SystemClock),
    };
    Ok((deps, settings))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_defaults_fill_empty_fields() {
        let settings = resolve_gemini_settings(&AiSection::default(), None);
        assert_eq!(settings.api_key, "");
        assert_eq!(settings.base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(settings.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(settings.image_model, DEFAULT_IMAGE_MODEL);
    }

    #[test]
    fn test_env_key_only_fills_an_empty_key() {
        let from_env = resolve_gemini_settings(&AiSection::default(), Some("env-key".into()));
        assert_eq!(from_env.api_key, "env-key");

        let configured = AiSection {
            api_key: "file-key".into(),
            ..AiSection::default()
        };
        let settings = resolve_gemini_settings(&configured, Some("env-key".into()));
        assert_eq!(settings.api_key, "file-key");
    }

    #[test]
    fn test_user_defaults_to_development_admin() {
        assert_eq!(resolve_user(&UserSection::default()), User::development_admin());

        let user = resolve_user(&UserSection {
            uid: "u-42".into(),
            name: String::new(),
            avatar_url: String::new(),
        });
        assert_eq!(user.uid.as_str(), "u-42");
        assert_eq!(user.name, "Admin User");
        assert_eq!(user.avatar_url, "https://i.pravatar.cc/150?u=u-42");
    }

    #[test]
    fn test_refresh_interval_zero_means_default() {
        assert_eq!(resolve_refresh_interval(0), DEFAULT_REFRESH_INTERVAL);
        assert_eq!(resolve_refresh_interval(15), Duration::from_secs(15));
    }

    #[test]
    fn test_wire_dependencies_builds_with_empty_config() {
        let (_deps, settings) = wire_dependencies(&AppConfig::default()).unwrap();
        assert_eq!(settings.market_refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert!(!settings.seed_guard.is_claimed());
    }
}
