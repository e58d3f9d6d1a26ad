//! Login form wiring.
//!
//! The page owns the widgets; [`LoginForm`] is the little it must expose.
//! [`LoginFormController::submit`] runs one attempt end to end and returns
//! the outcome, so the page decides what success or failure means beyond
//! the built-in behaviour (error display, redirect).

use crate::client::SessionClient;
use crate::error::SessionError;
use crate::login::{LoginOutcome, LoginRequest};
use crate::store::SessionStore;
use crate::transport::HttpTransport;
use crate::window::Window;

pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

/// Submit label while a login request is in flight.
pub const BUSY_LABEL: &str = "Signing in...";
pub const MISSING_FIELDS: &str = "Please enter your email and password.";
/// Shown when an error carries no text of its own.
pub const DEFAULT_ERROR: &str = "Authentication error.";

/// UI surface of a login form.
pub trait LoginForm {
    /// Current value of the named input, `None` if the form has no such field.
    fn field(&self, name: &str) -> Option<String>;

    /// Visible label of the submit control, `None` if there is no submit control.
    fn submit_label(&self) -> Option<String>;

    /// Enable or disable the submit control and set its label.
    fn set_submit(&self, disabled: bool, label: &str);

    /// Whether the form has a dedicated element for error text.
    fn has_error_surface(&self) -> bool;

    fn show_error(&self, message: &str);

    fn hide_error(&self);
}

/// Result of [`SessionClient::init_login_form`].
pub enum FormInit<'a, S, W, T, F> {
    /// No form was supplied; nothing bound.
    Missing,
    /// A session already existed; the page was sent to this destination.
    Redirected(String),
    /// The form is ready to submit.
    Bound(LoginFormController<'a, S, W, T, F>),
}

impl<S, W, T> SessionClient<S, W, T>
where
    S: SessionStore,
    W: Window,
    T: HttpTransport,
{
    /// Attach a login form.
    ///
    /// An already-authenticated visitor is redirected straight to the
    /// post-login destination and no controller is returned.
    pub fn init_login_form<F: LoginForm>(&self, form: Option<F>) -> FormInit<'_, S, W, T, F> {
        let Some(form) = form else {
            tracing::warn!("login form not found; nothing bound");
            return FormInit::Missing;
        };

        if self.is_authenticated() {
            let destination = self.post_login_destination();
            tracing::info!(%destination, "session already active; skipping login form");
            self.window().replace(&destination);
            return FormInit::Redirected(destination);
        }

        FormInit::Bound(LoginFormController::new(self, form))
    }
}

pub struct LoginFormController<'a, S, W, T, F> {
    client: &'a SessionClient<S, W, T>,
    form: F,
}

impl<'a, S, W, T, F> LoginFormController<'a, S, W, T, F>
where
    S: SessionStore,
    W: Window,
    T: HttpTransport,
    F: LoginForm,
{
    pub(crate) fn new(client: &'a SessionClient<S, W, T>, form: F) -> Self {
        Self { client, form }
    }

    #[must_use]
    pub fn form(&self) -> &F {
        &self.form
    }

    /// Run one login attempt from the form's current field values.
    ///
    /// The submit control is disabled for the duration and restored on
    /// every exit path. Errors are displayed on the form (or via the
    /// window's alert when the form has no error element) and returned.
    ///
    /// # Errors
    ///
    /// [`SessionError::Validation`] when a field is empty (no request is
    /// sent), otherwise whatever [`SessionClient::login`] returns.
    pub async fn submit(&self) -> Result<LoginOutcome, SessionError> {
        self.form.hide_error();
        let loading = Loading::enter(&self.form);

        let email = self.form.field(EMAIL_FIELD);
        let password = self.form.field(PASSWORD_FIELD);
        let Some(credentials) = LoginRequest::from_fields(email.as_deref(), password.as_deref()) else {
            drop(loading);
            let err = SessionError::Validation(MISSING_FIELDS.to_owned());
            self.display_error(&err);
            return Err(err);
        };

        let result = self.client.login(&credentials).await;
        if let Err(e) = &result {
            tracing::error!(error = %e, code = e.error_code(), "login failed");
            self.display_error(e);
        }
        drop(loading);
        result
    }

    fn display_error(&self, err: &SessionError) {
        let text = err.to_string();
        let message = if text.is_empty() { DEFAULT_ERROR } else { text.as_str() };
        if self.form.has_error_surface() {
            self.form.show_error(message);
        } else {
            self.client.window().alert(message);
        }
    }
}

/// Busy state of the submit control; restores the original label on drop.
struct Loading<'f, F: LoginForm> {
    form: &'f F,
    original: Option<String>,
}

impl<'f, F: LoginForm> Loading<'f, F> {
    fn enter(form: &'f F) -> Self {
        let original = form.submit_label();
        if original.is_some() {
            form.set_submit(true, BUSY_LABEL);
        }
        Self { form, original }
    }
}

impl<F: LoginForm> Drop for Loading<'_, F> {
    fn drop(&mut self) {
        if let Some(label) = &self.original {
            self.form.set_submit(false, label);
        }
    }
}

#[cfg(test)]
#[path = "form_test.rs"]
mod tests;
