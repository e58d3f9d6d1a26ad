//! Login protocol wire types and response interpretation.
//!
//! Request: `POST {"username": .., "password": ..}`.
//! Success: `{"token": "..", "user": {..}?}` with a 2xx status.
//! Failure: any other status, body is a plain-text reason.

use serde::Serialize;
use serde_json::Value;

use crate::error::SessionError;
use crate::transport::HttpResponse;

/// Shown when a failed login response has an empty body.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

/// Credentials read from the login form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginRequest {
    pub identifier: String,
    pub secret: String,
}

impl LoginRequest {
    /// Trim the identifier and require both fields to be non-empty.
    ///
    /// Returns `None` when either is missing.
    #[must_use]
    pub fn from_fields(identifier: Option<&str>, secret: Option<&str>) -> Option<Self> {
        let identifier = identifier.unwrap_or_default().trim();
        let secret = secret.unwrap_or_default();
        if identifier.is_empty() || secret.is_empty() {
            return None;
        }
        Some(Self { identifier: identifier.to_owned(), secret: secret.to_owned() })
    }

    pub(crate) fn wire(&self) -> WireRequest<'_> {
        WireRequest { username: &self.identifier, password: &self.secret }
    }
}

#[derive(Serialize)]
pub(crate) struct WireRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// A login response that passed protocol checks.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    /// The bearer token. `None` when the server sent a present but
    /// non-string token, which is accepted but never persisted.
    pub token: Option<String>,
    pub user: Option<Value>,
}

/// What a successful login produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginOutcome {
    pub user: Option<Value>,
    /// Where the client navigated after storing the session.
    pub destination: String,
}

/// Interpret a login endpoint response.
///
/// # Errors
///
/// - [`SessionError::Http`] for a non-success status, carrying the body text
///   or [`INVALID_CREDENTIALS`] when the body is empty.
/// - [`SessionError::Parse`] when a success body is not JSON.
/// - [`SessionError::MalformedResponse`] when the token is missing or empty.
pub fn parse_login_response(response: &HttpResponse) -> Result<LoginResponse, SessionError> {
    if !response.is_success() {
        let message = if response.body.is_empty() { INVALID_CREDENTIALS.to_owned() } else { response.body.clone() };
        return Err(SessionError::Http { status: response.status.as_u16(), message });
    }

    let mut body: Value = response.json()?;
    let token = take_field(&mut body, "token");
    if !is_present(&token) {
        return Err(SessionError::MalformedResponse);
    }

    let token = match token {
        Value::String(token) => Some(token),
        other => {
            tracing::warn!(kind = json_kind(&other), "login token is not a string; not persisting it");
            None
        }
    };
    let user = take_field(&mut body, "user");
    let user = if is_present(&user) { Some(user) } else { None };
    Ok(LoginResponse { token, user })
}

/// Remove `key` from an object body. Non-object bodies have no fields.
fn take_field(body: &mut Value, key: &str) -> Value {
    body.as_object_mut()
        .and_then(|fields| fields.remove(key))
        .unwrap_or(Value::Null)
}

/// JSON truthiness: `null`, `false`, `0`, and `""` count as absent.
/// Arrays and objects are present even when empty.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
