//! Page location, navigation, and the blocking alert dialog.
//!
//! [`Window`] is the slice of the browser window the session client needs.
//! The URL helpers compute the `next` round-trip: where to send an anonymous
//! user, and where to send them back after login.

use std::cell::RefCell;

use reqwest::Url;

use crate::error::SessionError;

/// Query parameter carrying the post-login destination.
pub const NEXT_PARAM: &str = "next";

pub trait Window {
    /// Full URL of the current page.
    fn href(&self) -> String;

    /// Navigate without adding a history entry. `url` may be relative.
    fn replace(&self, url: &str);

    /// Show a blocking message dialog.
    fn alert(&self, message: &str);
}

// =============================================================================
// URL HELPERS
// =============================================================================

/// Path, query, and fragment of `url`, as the browser reports them in
/// `pathname + search + hash`.
#[must_use]
pub fn location_suffix(url: &Url) -> String {
    let mut out = url.path().to_owned();
    if let Some(query) = url.query().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    if let Some(fragment) = url.fragment().filter(|f| !f.is_empty()) {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Absolute URL of the login page on the current origin.
///
/// With `with_next`, the current location is attached as `next` unless the
/// user is already on the login page itself.
///
/// # Errors
///
/// Returns [`SessionError::InvalidUrl`] if `href` is not an absolute URL with
/// a usable origin, or `login_page` cannot be joined onto it.
pub fn login_redirect_url(href: &str, login_page: &str, with_next: bool) -> Result<String, SessionError> {
    let current = parse_url(href)?;
    let origin = parse_url(&current.origin().ascii_serialization())?;
    let mut url = origin
        .join(login_page)
        .map_err(|e| SessionError::InvalidUrl(format!("{login_page}: {e}")))?;

    if with_next {
        let next = location_suffix(&current);
        if !next.is_empty() && next != login_page {
            url.query_pairs_mut().append_pair(NEXT_PARAM, &next);
        }
    }
    Ok(url.to_string())
}

/// The `next` query value of `href` when present and non-empty, else `default`.
#[must_use]
pub fn next_destination(href: &str, default: &str) -> String {
    let Ok(url) = Url::parse(href) else {
        return default.to_owned();
    };
    url.query_pairs()
        .find(|(key, _)| key == NEXT_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// `target` resolved against `href` the way the browser resolves `fetch`
/// inputs and `location.replace` targets.
///
/// Absolute targets pass through untouched; when `href` is not a usable base
/// the target is returned as given.
#[must_use]
pub fn resolve_url(href: &str, target: &str) -> String {
    if Url::parse(target).is_ok() {
        return target.to_owned();
    }
    match Url::parse(href).and_then(|base| base.join(target)) {
        Ok(resolved) => resolved.to_string(),
        Err(_) => target.to_owned(),
    }
}

fn parse_url(raw: &str) -> Result<Url, SessionError> {
    Url::parse(raw).map_err(|e| SessionError::InvalidUrl(format!("{raw}: {e}")))
}

// =============================================================================
// MEMORY WINDOW
// =============================================================================

/// Window that records navigations and alerts instead of performing them.
///
/// `replace` resolves the target against the current href and moves there,
/// so a sequence of redirects behaves like a real tab.
#[derive(Debug)]
pub struct MemoryWindow {
    href: RefCell<String>,
    navigations: RefCell<Vec<String>>,
    alerts: RefCell<Vec<String>>,
}

impl MemoryWindow {
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: RefCell::new(href.into()),
            navigations: RefCell::new(Vec::new()),
            alerts: RefCell::new(Vec::new()),
        }
    }

    /// Raw targets passed to [`Window::replace`], oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    #[must_use]
    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().cloned()
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.borrow().clone()
    }
}

impl Window for MemoryWindow {
    fn href(&self) -> String {
        self.href.borrow().clone()
    }

    fn replace(&self, url: &str) {
        self.navigations.borrow_mut().push(url.to_owned());
        let resolved = resolve_url(&self.href.borrow(), url);
        *self.href.borrow_mut() = resolved;
    }

    fn alert(&self, message: &str) {
        self.alerts.borrow_mut().push(message.to_owned());
    }
}

#[cfg(test)]
#[path = "window_test.rs"]
mod tests;
