//! Functions exported to page scripts.
//!
//! Each export runs against one lazily built [`BrowserClient`] per page,
//! created with the default configuration on first use. Building it also
//! routes `tracing` output and panics to the browser console.

use std::cell::OnceCell;
use std::rc::Rc;

use reqwest::Method;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::HtmlFormElement;

use crate::browser::{self, BrowserClient, DomLoginForm};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::login::LoginOutcome;
use crate::transport::{HttpRequest, HttpResponse};

thread_local! {
    static CLIENT: OnceCell<Option<Rc<BrowserClient>>> = const { OnceCell::new() };
}

fn client() -> Option<Rc<BrowserClient>> {
    CLIENT.with(|cell| {
        cell.get_or_init(|| {
            install_console_logging();
            browser::browser_client(SessionConfig::default()).map(Rc::new)
        })
        .clone()
    })
}

fn install_console_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        tracing::debug!(error = %e, "console logger already installed");
    }
}

// =============================================================================
// SESSION
// =============================================================================

#[wasm_bindgen(js_name = getToken)]
pub fn get_token() -> Option<String> {
    client()?.get_token()
}

/// The stored user record, or `null`.
#[wasm_bindgen(js_name = getUser)]
pub fn get_user() -> JsValue {
    let user = client().and_then(|client| client.get_user::<Value>());
    user_to_js(user.as_ref())
}

#[wasm_bindgen(js_name = isAuthenticated)]
pub fn is_authenticated() -> bool {
    client().is_some_and(|client| client.is_authenticated())
}

#[wasm_bindgen(js_name = clearAuth)]
pub fn clear_auth() {
    if let Some(client) = client() {
        client.clear_auth();
    }
}

#[wasm_bindgen(js_name = logout)]
pub fn logout() {
    if let Some(client) = client() {
        client.logout();
    }
}

/// Access guard. `false` means the page is being sent to login.
#[wasm_bindgen(js_name = requireAuth)]
pub fn require_auth() -> bool {
    match client() {
        Some(client) => client.require_auth(),
        None => {
            tracing::warn!("session storage unavailable; treating visitor as anonymous");
            false
        }
    }
}

// =============================================================================
// FETCH
// =============================================================================

/// `fetch(input, init)` with the bearer token added.
///
/// `init` may carry `method`, `headers` (a `Headers`, an array of pairs, or
/// a plain object), and a string `body`. Resolves to a `Response`.
///
/// # Errors
///
/// Rejects with an `Error` when the request cannot be built or sent.
#[wasm_bindgen(js_name = authFetch)]
pub async fn auth_fetch(input: String, init: JsValue) -> Result<web_sys::Response, JsValue> {
    let client = client().ok_or_else(|| js_error("session storage unavailable"))?;
    let request = request_from_init(input, &init).map_err(|e| js_error(&e.to_string()))?;
    let response = client.auth_fetch(request).await.map_err(|e| js_error(&e.to_string()))?;
    to_web_response(&response)
}

fn request_from_init(input: String, init: &JsValue) -> Result<HttpRequest, SessionError> {
    let mut request = HttpRequest::get(input);
    if !init.is_object() {
        return Ok(request);
    }
    if let Some(method) = property(init, "method").and_then(|value| value.as_string()) {
        request.method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|e| SessionError::Config(format!("invalid HTTP method {method}: {e}")))?;
    }
    if let Some(headers) = property(init, "headers") {
        for (name, value) in header_pairs(&headers) {
            request = request.with_header(&name, &value)?;
        }
    }
    if let Some(body) = property(init, "body") {
        match body.as_string() {
            Some(body) => request.body = Some(body),
            None => tracing::warn!("authFetch only forwards string bodies; body dropped"),
        }
    }
    Ok(request)
}

fn property(object: &JsValue, name: &str) -> Option<JsValue> {
    match js_sys::Reflect::get(object, &JsValue::from_str(name)) {
        Ok(value) if value.is_undefined() || value.is_null() => None,
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = ?e, %name, "fetch option unreadable");
            None
        }
    }
}

fn header_pairs(headers: &JsValue) -> Vec<(String, String)> {
    let entries: Vec<JsValue> = match js_sys::try_iter(headers) {
        Ok(Some(iter)) => iter.filter_map(Result::ok).collect(),
        Ok(None) if headers.is_object() => js_sys::Object::entries(headers.unchecked_ref()).iter().collect(),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!(error = ?e, "fetch headers unreadable");
            Vec::new()
        }
    };
    entries
        .iter()
        .filter_map(|entry| {
            let pair = js_sys::Array::from(entry);
            Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
        })
        .collect()
}

fn to_web_response(response: &HttpResponse) -> Result<web_sys::Response, JsValue> {
    let headers = web_sys::Headers::new()?;
    for (name, value) in &response.headers {
        if let Ok(value) = value.to_str() {
            headers.append(name.as_str(), value)?;
        }
    }
    let init = web_sys::ResponseInit::new();
    init.set_status(response.status.as_u16());
    init.set_headers(&headers);
    let body = (!response.body.is_empty()).then_some(response.body.as_str());
    web_sys::Response::new_with_opt_str_and_init(body, &init)
}

// =============================================================================
// LOGIN FORM
// =============================================================================

/// Bind the login flow to `form`: a selector string or a `<form>` element.
///
/// `options` may carry `onSuccess(user)` and `onError(error)` callbacks.
/// Returns whether a submit handler was attached.
#[wasm_bindgen(js_name = initLoginForm)]
pub fn init_login_form(form: JsValue, options: JsValue) -> bool {
    let Some(client) = client() else {
        tracing::warn!("session storage unavailable; login form not bound");
        return false;
    };
    let form = if let Some(selector) = form.as_string() {
        DomLoginForm::find(&selector)
    } else {
        match form.dyn_into::<HtmlFormElement>() {
            Ok(element) => Some(DomLoginForm::from_form(element)),
            Err(_) => None,
        }
    };
    let callbacks = LoginCallbacks::from_options(&options);
    browser::attach_login_form(client, form, move |result| callbacks.dispatch(result))
}

struct LoginCallbacks {
    on_success: Option<js_sys::Function>,
    on_error: Option<js_sys::Function>,
}

impl LoginCallbacks {
    fn from_options(options: &JsValue) -> Self {
        if !options.is_object() {
            return Self { on_success: None, on_error: None };
        }
        let function = |name: &str| match property(options, name)?.dyn_into::<js_sys::Function>() {
            Ok(callback) => Some(callback),
            Err(_) => {
                tracing::warn!(%name, "login option is not a function; ignored");
                None
            }
        };
        Self { on_success: function("onSuccess"), on_error: function("onError") }
    }

    fn dispatch(&self, result: &Result<LoginOutcome, SessionError>) {
        let called = match result {
            Ok(outcome) => self
                .on_success
                .as_ref()
                .map(|callback| callback.call1(&JsValue::NULL, &user_to_js(outcome.user.as_ref()))),
            // Shown in the form; callers only hear about failed login calls.
            Err(SessionError::Validation(_)) => None,
            Err(e) => self
                .on_error
                .as_ref()
                .map(|callback| callback.call1(&JsValue::NULL, &js_error(&e.to_string()))),
        };
        if let Some(Err(e)) = called {
            tracing::error!(error = ?e, "login callback threw");
        }
    }
}

// =============================================================================
// CONVERSIONS
// =============================================================================

fn user_to_js(user: Option<&Value>) -> JsValue {
    let Some(user) = user else {
        return JsValue::NULL;
    };
    let parsed = serde_json::to_string(user)
        .map_err(|e| JsValue::from_str(&e.to_string()))
        .and_then(|text| js_sys::JSON::parse(&text));
    match parsed {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(error = ?e, "user record not convertible to JS");
            JsValue::NULL
        }
    }
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}
