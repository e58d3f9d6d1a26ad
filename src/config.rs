//! Session client configuration: endpoint, page paths, storage keys.
//!
//! Defaults match the deployed frontend. Each value can be overridden from
//! the environment, which is how the CLI and tests point at other backends.

pub const DEFAULT_LOGIN_ENDPOINT: &str = "http://localhost:8000/auth/login";
pub const DEFAULT_LOGIN_PAGE: &str = "/index.html";
pub const DEFAULT_DASHBOARD_PAGE: &str = "/dashboard/index.html";
pub const DEFAULT_TOKEN_KEY: &str = "app.auth.token";
pub const DEFAULT_USER_KEY: &str = "app.auth.user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Absolute URL of the `POST` login endpoint.
    pub login_endpoint: String,
    /// Path of the login page, relative to the current origin.
    pub login_page: String,
    /// Path of the default landing page after login.
    pub dashboard_page: String,
    /// Storage key holding the raw token string.
    pub token_key: String,
    /// Storage key holding the JSON-serialized user record.
    pub user_key: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            login_endpoint: DEFAULT_LOGIN_ENDPOINT.to_owned(),
            login_page: DEFAULT_LOGIN_PAGE.to_owned(),
            dashboard_page: DEFAULT_DASHBOARD_PAGE.to_owned(),
            token_key: DEFAULT_TOKEN_KEY.to_owned(),
            user_key: DEFAULT_USER_KEY.to_owned(),
        }
    }
}

impl SessionConfig {
    /// Build config from defaults plus environment overrides.
    ///
    /// Optional:
    /// - `SESSION_LOGIN_ENDPOINT`
    /// - `SESSION_LOGIN_PAGE`
    /// - `SESSION_DASHBOARD_PAGE`
    /// - `SESSION_TOKEN_KEY`
    /// - `SESSION_USER_KEY`
    ///
    /// Blank values are ignored.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        apply_override(&mut config.login_endpoint, "SESSION_LOGIN_ENDPOINT");
        apply_override(&mut config.login_page, "SESSION_LOGIN_PAGE");
        apply_override(&mut config.dashboard_page, "SESSION_DASHBOARD_PAGE");
        apply_override(&mut config.token_key, "SESSION_TOKEN_KEY");
        apply_override(&mut config.user_key, "SESSION_USER_KEY");
        config
    }
}

fn apply_override(slot: &mut String, key: &str) {
    if let Ok(raw) = std::env::var(key) {
        if let Some(value) = normalize_value(&raw) {
            *slot = value;
        }
    }
}

fn normalize_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
