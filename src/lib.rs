//! # session-client
//!
//! Client-side session handling for the web frontend: an opaque bearer token
//! and user profile kept in persistent storage, a redirect-based access
//! guard, a fetch wrapper that adds `Authorization: Bearer`, and the login
//! form flow against the backend's `POST /auth/login`.
//!
//! Storage, navigation, and HTTP are injected through [`SessionStore`],
//! [`Window`], and [`HttpTransport`]. The `hydrate` feature provides the
//! browser implementations (`localStorage`, `window.location`, fetch via
//! `reqwest`'s wasm backend), DOM form binding, and the functions page
//! scripts call (`initLoginForm`, `requireAuth`, `authFetch`, ...).

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod login;
pub mod store;
pub mod transport;
pub mod window;

#[cfg(feature = "hydrate")]
pub mod browser;
#[cfg(feature = "hydrate")]
pub mod page;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use client::SessionClient;
pub use config::SessionConfig;
pub use error::SessionError;
pub use form::{FormInit, LoginForm, LoginFormController};
pub use login::{LoginOutcome, LoginRequest, LoginResponse};
pub use store::{FileStore, MemoryStore, SessionStore, StoreError};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use window::{MemoryWindow, Window};
