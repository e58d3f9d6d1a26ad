//! `SessionClient` — token and user persistence, the access guard, the
//! authorized fetch wrapper, and the login/logout lifecycle.
//!
//! STATE
//! =====
//! Two implicit states derived from storage: anonymous (no token) and
//! authenticated (non-empty token). Only a successful login or an explicit
//! logout moves between them; a failed login leaves storage untouched.
//!
//! ERROR HANDLING
//! ==============
//! Storage failures never reach the caller. Serialization problems degrade
//! to "no user", backend write failures are logged and dropped.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::login::{LoginOutcome, LoginRequest, parse_login_response};
use crate::store::SessionStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::window::{self, Window};

pub struct SessionClient<S, W, T> {
    config: SessionConfig,
    store: S,
    window: W,
    transport: T,
}

impl<S, W, T> SessionClient<S, W, T>
where
    S: SessionStore,
    W: Window,
    T: HttpTransport,
{
    #[must_use]
    pub fn new(config: SessionConfig, store: S, window: W, transport: T) -> Self {
        Self { config, store, window, transport }
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn window(&self) -> &W {
        &self.window
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    // =========================================================================
    // TOKEN / USER
    // =========================================================================

    /// The stored token, exactly as written.
    #[must_use]
    pub fn get_token(&self) -> Option<String> {
        self.store.get_item(&self.config.token_key)
    }

    /// Persist `token`. Empty tokens are ignored.
    pub fn set_token(&self, token: &str) {
        if token.is_empty() {
            return;
        }
        if let Err(e) = self.store.set_item(&self.config.token_key, token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }

    /// Persist the user record as JSON; `None` is stored as `null`.
    ///
    /// A record that cannot be serialized is not written.
    pub fn set_user<U: Serialize + ?Sized>(&self, user: Option<&U>) {
        let text = match serde_json::to_string(&user) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "user record not serializable; skipping write");
                return;
            }
        };
        if let Err(e) = self.store.set_item(&self.config.user_key, &text) {
            tracing::warn!(error = %e, "failed to persist session user");
        }
    }

    /// The stored user record, or `None` when unset, `null`, or unreadable.
    #[must_use]
    pub fn get_user<U: DeserializeOwned>(&self) -> Option<U> {
        let text = self.store.get_item(&self.config.user_key)?;
        if text.is_empty() {
            return None;
        }
        match serde_json::from_str::<Option<U>>(&text) {
            Ok(user) => user,
            Err(e) => {
                tracing::debug!(error = %e, "stored user record unreadable");
                None
            }
        }
    }

    /// Remove token and user. Safe to call repeatedly.
    pub fn clear_auth(&self) {
        for key in [&self.config.token_key, &self.config.user_key] {
            if let Err(e) = self.store.remove_item(key) {
                tracing::warn!(error = %e, %key, "failed to clear session entry");
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some_and(|token| !token.is_empty())
    }

    // =========================================================================
    // NAVIGATION
    // =========================================================================

    /// Absolute login page URL for the current location.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidUrl`] if the current href has no usable origin.
    pub fn login_redirect_url(&self, with_next: bool) -> Result<String, SessionError> {
        window::login_redirect_url(&self.window.href(), &self.config.login_page, with_next)
    }

    /// Replace-navigate to the login page, optionally carrying `next`.
    pub fn redirect_to_login(&self, with_next: bool) {
        let target = match self.login_redirect_url(with_next) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "cannot resolve login URL; using bare path");
                self.config.login_page.clone()
            }
        };
        self.window.replace(&target);
    }

    /// Access guard for pages that need a session. Redirects anonymous
    /// visitors to login and returns whether the page may continue.
    pub fn require_auth(&self) -> bool {
        if self.is_authenticated() {
            return true;
        }
        self.redirect_to_login(true);
        false
    }

    /// The `next` query value of the current URL, else the dashboard.
    #[must_use]
    pub fn post_login_destination(&self) -> String {
        window::next_destination(&self.window.href(), &self.config.dashboard_page)
    }

    // =========================================================================
    // REQUESTS
    // =========================================================================

    /// Send `request` with `Authorization: Bearer <token>` when a token is
    /// stored. The injected header replaces any caller-supplied one.
    ///
    /// A relative `request.url` resolves against the current page, as a
    /// same-origin `fetch("/api/...")` does.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidHeader`] if the token is not a valid
    /// header value, or whatever the transport reports.
    pub async fn auth_fetch(&self, mut request: HttpRequest) -> Result<HttpResponse, SessionError> {
        if let Some(token) = self.get_token().filter(|token| !token.is_empty()) {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))?;
            request.headers.insert(AUTHORIZATION, value);
        }
        request.url = window::resolve_url(&self.window.href(), &request.url);
        self.transport.send(request).await
    }

    /// Run the login call, store the session, and navigate onward.
    ///
    /// On failure nothing is stored and no navigation happens.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Http`] for a rejected login,
    /// [`SessionError::MalformedResponse`] or [`SessionError::Parse`] for an
    /// unusable success body, and transport errors unchanged.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginOutcome, SessionError> {
        let request = HttpRequest::post_json(self.config.login_endpoint.as_str(), &credentials.wire())?;
        let response = self.transport.send(request).await?;
        let parsed = parse_login_response(&response)?;

        if let Some(token) = parsed.token.as_deref() {
            self.set_token(token);
        }
        if let Some(user) = parsed.user.as_ref() {
            self.set_user(Some(user));
        }

        let destination = self.post_login_destination();
        tracing::info!(identifier = %credentials.identifier, %destination, "login succeeded");
        self.window.replace(&destination);
        Ok(LoginOutcome { user: parsed.user, destination })
    }

    /// Clear the session and show a fresh login page (no `next`).
    pub fn logout(&self) {
        self.clear_auth();
        tracing::info!("logged out");
        self.redirect_to_login(false);
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
