//! Shared fixtures for unit tests: a scripted transport, a scripted form,
//! and a client wired to in-memory collaborators.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use crate::client::SessionClient;
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::form::LoginForm;
use crate::store::MemoryStore;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::window::MemoryWindow;

pub const ORIGIN: &str = "http://localhost:8080";

pub type TestClient = SessionClient<MemoryStore, MemoryWindow, MockTransport>;

// =============================================================================
// MockTransport
// =============================================================================

/// Records every request and replies from a queue. An empty queue answers
/// with a transport error.
#[derive(Default)]
pub struct MockTransport {
    requests: RefCell<Vec<HttpRequest>>,
    responses: RefCell<VecDeque<Result<HttpResponse, SessionError>>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<HttpResponse, SessionError>>) -> Self {
        Self { requests: RefCell::new(Vec::new()), responses: RefCell::new(responses.into()) }
    }

    pub fn replying(status: u16, body: &str) -> Self {
        Self::new(vec![Ok(HttpResponse::new(status, body))])
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

#[async_trait::async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SessionError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(SessionError::Transport("no scripted response".into())))
    }
}

// =============================================================================
// MockForm
// =============================================================================

/// Form with fixed field values that records every UI change.
pub struct MockForm {
    pub fields: HashMap<String, String>,
    pub error_surface: bool,
    label: RefCell<Option<String>>,
    disabled: RefCell<bool>,
    error: RefCell<Option<String>>,
    pub submit_states: RefCell<Vec<(bool, String)>>,
}

impl MockForm {
    pub fn new(email: &str, password: &str) -> Self {
        let fields = HashMap::from([
            ("email".to_owned(), email.to_owned()),
            ("password".to_owned(), password.to_owned()),
        ]);
        Self {
            fields,
            error_surface: true,
            label: RefCell::new(Some("Sign in".to_owned())),
            disabled: RefCell::new(false),
            error: RefCell::new(None),
            submit_states: RefCell::new(Vec::new()),
        }
    }

    pub fn without_error_surface(mut self) -> Self {
        self.error_surface = false;
        self
    }

    pub fn without_submit(self) -> Self {
        *self.label.borrow_mut() = None;
        self
    }

    pub fn label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    pub fn disabled(&self) -> bool {
        *self.disabled.borrow()
    }

    pub fn error(&self) -> Option<String> {
        self.error.borrow().clone()
    }
}

impl LoginForm for MockForm {
    fn field(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    fn submit_label(&self) -> Option<String> {
        self.label.borrow().clone()
    }

    fn set_submit(&self, disabled: bool, label: &str) {
        *self.disabled.borrow_mut() = disabled;
        *self.label.borrow_mut() = Some(label.to_owned());
        self.submit_states.borrow_mut().push((disabled, label.to_owned()));
    }

    fn has_error_surface(&self) -> bool {
        self.error_surface
    }

    fn show_error(&self, message: &str) {
        *self.error.borrow_mut() = Some(message.to_owned());
    }

    fn hide_error(&self) {
        *self.error.borrow_mut() = None;
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Client on `ORIGIN + path` with default config and empty storage.
pub fn client_at(path: &str, transport: MockTransport) -> TestClient {
    SessionClient::new(
        SessionConfig::default(),
        MemoryStore::new(),
        MemoryWindow::new(format!("{ORIGIN}{path}")),
        transport,
    )
}
