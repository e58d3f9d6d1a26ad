use super::*;

/// # Safety
/// Tests that touch these vars run serially through `ENV_LOCK`.
unsafe fn clear_session_env() {
    unsafe {
        std::env::remove_var("SESSION_LOGIN_ENDPOINT");
        std::env::remove_var("SESSION_LOGIN_PAGE");
        std::env::remove_var("SESSION_DASHBOARD_PAGE");
        std::env::remove_var("SESSION_TOKEN_KEY");
        std::env::remove_var("SESSION_USER_KEY");
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

// =============================================================================
// defaults
// =============================================================================

#[test]
fn default_matches_deployed_frontend() {
    let cfg = SessionConfig::default();
    assert_eq!(cfg.login_endpoint, "http://localhost:8000/auth/login");
    assert_eq!(cfg.login_page, "/index.html");
    assert_eq!(cfg.dashboard_page, "/dashboard/index.html");
    assert_eq!(cfg.token_key, "app.auth.token");
    assert_eq!(cfg.user_key, "app.auth.user");
}

#[test]
fn normalize_value_trims_and_rejects_empty() {
    assert_eq!(normalize_value(""), None);
    assert_eq!(normalize_value("   "), None);
    assert_eq!(normalize_value("  /login "), Some("/login".to_owned()));
}

// =============================================================================
// from_env
// =============================================================================

#[test]
fn from_env_without_overrides_is_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe { clear_session_env() };

    assert_eq!(SessionConfig::from_env(), SessionConfig::default());
}

#[test]
fn from_env_applies_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SESSION_LOGIN_ENDPOINT", "https://api.example.test/auth/login");
        std::env::set_var("SESSION_LOGIN_PAGE", " /login ");
        std::env::set_var("SESSION_DASHBOARD_PAGE", "/home");
        std::env::set_var("SESSION_TOKEN_KEY", "t");
        std::env::set_var("SESSION_USER_KEY", "u");
    }

    let cfg = SessionConfig::from_env();
    assert_eq!(cfg.login_endpoint, "https://api.example.test/auth/login");
    assert_eq!(cfg.login_page, "/login");
    assert_eq!(cfg.dashboard_page, "/home");
    assert_eq!(cfg.token_key, "t");
    assert_eq!(cfg.user_key, "u");

    unsafe { clear_session_env() };
}

#[test]
fn from_env_ignores_blank_values() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    unsafe {
        clear_session_env();
        std::env::set_var("SESSION_LOGIN_PAGE", "   ");
    }

    assert_eq!(SessionConfig::from_env().login_page, DEFAULT_LOGIN_PAGE);

    unsafe { clear_session_env() };
}
