//! Browser bindings: `localStorage`, `window.location`, and DOM login forms.
//!
//! Requires a browser environment (wasm32 with the `hydrate` feature).
//! Every JS exception is logged and degraded; none propagate as panics.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event, FormData, HtmlFormElement};

use crate::client::SessionClient;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::form::{FormInit, LoginForm, LoginFormController};
use crate::login::LoginOutcome;
use crate::store::{SessionStore, StoreError};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::window::Window;

const SUBMIT_SELECTOR: &str = "[type=submit]";
const ALERT_SELECTOR: &str = "[data-login-alert]";
const HIDDEN_CLASS: &str = "d-none";

pub type BrowserClient = SessionClient<LocalStorage, BrowserWindow, ReqwestTransport>;

/// Client over this page's `localStorage`, location, and fetch.
///
/// Returns `None` outside a browser window or when storage is disabled.
#[must_use]
pub fn browser_client(config: SessionConfig) -> Option<BrowserClient> {
    let window = BrowserWindow::current()?;
    let store = LocalStorage::open()?;
    let transport = match ReqwestTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "HTTP transport unavailable");
            return None;
        }
    };
    Some(SessionClient::new(config, store, window, transport))
}

// =============================================================================
// STORAGE
// =============================================================================

pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    #[must_use]
    pub fn open() -> Option<Self> {
        match web_sys::window()?.local_storage() {
            Ok(Some(storage)) => Some(Self { storage }),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = ?e, "localStorage unavailable");
                None
            }
        }
    }
}

impl SessionStore for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = ?e, %key, "localStorage read failed");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.storage
            .remove_item(key)
            .map_err(|e| StoreError::Backend(format!("{e:?}")))
    }
}

// =============================================================================
// WINDOW
// =============================================================================

pub struct BrowserWindow {
    window: web_sys::Window,
}

impl BrowserWindow {
    #[must_use]
    pub fn current() -> Option<Self> {
        web_sys::window().map(|window| Self { window })
    }
}

impl Window for BrowserWindow {
    fn href(&self) -> String {
        match self.window.location().href() {
            Ok(href) => href,
            Err(e) => {
                tracing::warn!(error = ?e, "location.href unavailable");
                String::new()
            }
        }
    }

    fn replace(&self, url: &str) {
        if let Err(e) = self.window.location().replace(url) {
            tracing::error!(error = ?e, %url, "location.replace failed");
        }
    }

    fn alert(&self, message: &str) {
        if let Err(e) = self.window.alert_with_message(message) {
            tracing::warn!(error = ?e, "alert failed");
        }
    }
}

// =============================================================================
// DOM FORM
// =============================================================================

/// A `<form>` with `email`/`password` inputs, an optional submit control,
/// and an optional `[data-login-alert]` element for error text.
#[derive(Clone)]
pub struct DomLoginForm {
    form: HtmlFormElement,
    submit: Option<Element>,
    alert: Option<Element>,
}

impl DomLoginForm {
    /// Resolve `selector` in the current document.
    #[must_use]
    pub fn find(selector: &str) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let element = match document.query_selector(selector) {
            Ok(element) => element?,
            Err(e) => {
                tracing::warn!(error = ?e, %selector, "invalid login form selector");
                return None;
            }
        };
        match element.dyn_into::<HtmlFormElement>() {
            Ok(form) => Some(Self::from_form(form)),
            Err(_) => {
                tracing::warn!(%selector, "login form selector does not match a <form>");
                None
            }
        }
    }

    /// Wrap an already-resolved form element.
    #[must_use]
    pub fn from_form(form: HtmlFormElement) -> Self {
        let submit = query_child(&form, SUBMIT_SELECTOR);
        let alert = query_child(&form, ALERT_SELECTOR);
        Self { form, submit, alert }
    }
}

fn query_child(form: &HtmlFormElement, selector: &str) -> Option<Element> {
    match form.query_selector(selector) {
        Ok(element) => element,
        Err(e) => {
            tracing::warn!(error = ?e, %selector, "login form query failed");
            None
        }
    }
}

/// `<input type=submit>` labels live in `value`; buttons use their text.
fn is_input(element: &Element) -> bool {
    element.tag_name().eq_ignore_ascii_case("input")
}

impl LoginForm for DomLoginForm {
    fn field(&self, name: &str) -> Option<String> {
        let data = match FormData::new_with_form(&self.form) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(error = ?e, "form data unavailable");
                return None;
            }
        };
        data.get(name).as_string()
    }

    fn submit_label(&self) -> Option<String> {
        let submit = self.submit.as_ref()?;
        if is_input(submit) {
            Some(submit.get_attribute("value").unwrap_or_default())
        } else {
            Some(submit.text_content().unwrap_or_default())
        }
    }

    fn set_submit(&self, disabled: bool, label: &str) {
        let Some(submit) = &self.submit else {
            return;
        };
        let toggled = if disabled {
            submit.set_attribute("disabled", "")
        } else {
            submit.remove_attribute("disabled")
        };
        if let Err(e) = toggled {
            tracing::warn!(error = ?e, "submit control toggle failed");
        }
        if is_input(submit) {
            if let Err(e) = submit.set_attribute("value", label) {
                tracing::warn!(error = ?e, "submit label update failed");
            }
        } else {
            submit.set_text_content(Some(label));
        }
    }

    fn has_error_surface(&self) -> bool {
        self.alert.is_some()
    }

    fn show_error(&self, message: &str) {
        let Some(alert) = &self.alert else {
            return;
        };
        let classes = alert.class_list();
        if let Err(e) = classes.remove_1(HIDDEN_CLASS).and_then(|()| classes.add_2("alert", "alert-danger")) {
            tracing::warn!(error = ?e, "error surface class update failed");
        }
        alert.set_text_content(Some(message));
    }

    fn hide_error(&self) {
        let Some(alert) = &self.alert else {
            return;
        };
        if let Err(e) = alert.class_list().add_1(HIDDEN_CLASS) {
            tracing::warn!(error = ?e, "error surface class update failed");
        }
        alert.set_text_content(Some(""));
    }
}

// =============================================================================
// BINDING
// =============================================================================

/// Attach the login flow to the form matched by `selector`.
///
/// Returns `false` when nothing was bound: the form was not found, or a
/// session already existed and the page was redirected.
pub fn bind_login_form<S, W, T>(client: Rc<SessionClient<S, W, T>>, selector: &str) -> bool
where
    S: SessionStore + 'static,
    W: Window + 'static,
    T: HttpTransport + 'static,
{
    attach_login_form(client, DomLoginForm::find(selector), log_login_result)
}

/// Attach the login flow to an already-resolved `<form>`.
pub fn bind_login_form_element<S, W, T>(client: Rc<SessionClient<S, W, T>>, form: HtmlFormElement) -> bool
where
    S: SessionStore + 'static,
    W: Window + 'static,
    T: HttpTransport + 'static,
{
    attach_login_form(client, Some(DomLoginForm::from_form(form)), log_login_result)
}

/// Bind `form` and hand every finished submit to `on_result`.
///
/// Validation failures reach `on_result` too; they are shown in the form
/// before it runs.
pub fn attach_login_form<S, W, T, H>(client: Rc<SessionClient<S, W, T>>, form: Option<DomLoginForm>, on_result: H) -> bool
where
    S: SessionStore + 'static,
    W: Window + 'static,
    T: HttpTransport + 'static,
    H: Fn(&Result<LoginOutcome, SessionError>) + 'static,
{
    let form = match client.init_login_form(form) {
        FormInit::Bound(controller) => controller.form().clone(),
        FormInit::Missing | FormInit::Redirected(_) => return false,
    };

    let on_result = Rc::new(on_result);
    let target = form.form.clone();
    let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        event.prevent_default();
        let client = Rc::clone(&client);
        let on_result = Rc::clone(&on_result);
        let form = form.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let controller = LoginFormController::new(&client, form);
            let result = controller.submit().await;
            on_result(&result);
        });
    });

    if let Err(e) = target.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref()) {
        tracing::error!(error = ?e, "failed to attach login submit handler");
        return false;
    }
    // The listener lives as long as the page.
    on_submit.forget();
    true
}

fn log_login_result(result: &Result<LoginOutcome, SessionError>) {
    if let Err(e) = result {
        tracing::debug!(code = e.error_code(), "login attempt ended without a session");
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
#[path = "browser_test.rs"]
mod tests;
