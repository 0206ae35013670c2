//! Backend readiness check
//! 后端配置检查

use ap_core::config::BackendSection;

/// Placeholder shipped in sample configuration files.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendConfigError {
    #[error("backend api_key is not set")]
    MissingApiKey,

    #[error("backend api_key is still the placeholder value")]
    PlaceholderApiKey,

    #[error("backend project_id is not set")]
    MissingProjectId,
}

impl BackendConfigError {
    /// Fixed instructional text shown instead of the normal UI.
    pub fn instructions(&self) -> &'static str {
        "Backend configuration required.\n\
         \n\
         The dashboard cannot start until the backend connection is configured.\n\
         Open your config.toml and set the [backend] section:\n\
         \n\
         [backend]\n\
         api_key = \"<your api key>\"\n\
         project_id = \"<your project id>\"\n\
         \n\
         Then restart the application."
    }
}

/// Fails when the backend credentials are unset or still the placeholder.
pub fn check_backend_config(backend: &BackendSection) -> Result<(), BackendConfigError> {
    let api_key = backend.api_key.trim();
    if api_key.is_empty() {
        return Err(BackendConfigError::MissingApiKey);
    }
    if api_key == PLACEHOLDER_API_KEY {
        return Err(BackendConfigError::PlaceholderApiKey);
    }
    if backend.project_id.trim().is_empty() {
        return Err(BackendConfigError::MissingProjectId);
    }
    Ok(())
}
