//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML file into the [`AppConfig`] DTO. Pure data loading: no
//! validation and no defaults. Readiness is checked by the caller and
//! defaults are applied during wiring.

use std::path::PathBuf;

use anyhow::Context;
use ap_core::config::AppConfig;

/// Environment variable that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "ASTRA_PHOENIX_CONFIG";

const APP_DIR_NAME: &str = "astra-phoenix";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// Empty strings and missing sections are accepted as they are.
///
/// # Errors / 错误
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: PathBuf) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// `$ASTRA_PHOENIX_CONFIG`, else `<config dir>/astra-phoenix/config.toml`.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    let base = dirs::config_dir().context("No platform config directory available")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_reads_valid_toml() {
        let toml_content = r#"
            [backend]
            api_key = "key-123"
            project_id = "astra-prod"

            [market]
            refresh_interval_secs = 30

            [ai]
            text_model = "gemini-pro"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(temp_file.path().to_path_buf()).unwrap();
        assert_eq!(config.backend.api_key, "key-123");
        assert_eq!(config.backend.project_id, "astra-prod");
        assert_eq!(config.market.refresh_interval_secs, 30);
        assert_eq!(config.ai.text_model, "gemini-pro");
        assert_eq!(config.user.uid, "");
    }

    #[test]
    fn test_load_config_accepts_empty_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = load_config(temp_file.path().to_path_buf()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_config_returns_error_on_invalid_toml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[backend\napi_key = ").unwrap();

        let err = load_config(temp_file.path().to_path_buf()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_load_config_returns_error_on_missing_file() {
        let err = load_config(PathBuf::from("/nonexistent/astra/config.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
