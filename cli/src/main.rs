use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use session_client::{
    FileStore, FormInit, HttpRequest, LoginForm, MemoryWindow, ReqwestTransport, SessionClient, SessionConfig,
    SessionError,
};

type CliClient = SessionClient<FileStore, MemoryWindow, ReqwestTransport>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("request failed with HTTP {0}")]
    RequestFailed(u16),
}

#[derive(Parser, Debug)]
#[command(name = "session-cli", about = "Log in, inspect, and use a stored API session")]
struct Cli {
    /// Origin the session belongs to; page paths resolve against it.
    #[arg(long, env = "SESSION_ORIGIN", default_value = "http://localhost:8080")]
    origin: String,

    /// JSON file holding the stored token and user.
    #[arg(long, env = "SESSION_FILE", default_value = ".session.json")]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login(LoginArgs),
    /// Forget the stored session.
    Logout,
    /// Show whether a session is stored, and its user.
    Status,
    /// Check a page path against the access guard.
    Guard {
        /// Page path, e.g. `/reports/index.html?id=4`.
        path: String,
    },
    /// Send an authenticated request and print the response body.
    Fetch(FetchArgs),
}

#[derive(Args, Debug)]
struct LoginArgs {
    #[arg(long, env = "SESSION_EMAIL")]
    email: String,

    #[arg(long, env = "SESSION_PASSWORD", hide_env_values = true)]
    password: String,

    /// Destination to report after login instead of the dashboard.
    #[arg(long)]
    next: Option<String>,
}

#[derive(Args, Debug)]
struct FetchArgs {
    url: String,

    #[arg(long, short = 'X', default_value = "GET")]
    method: String,

    /// JSON body; sent with `Content-Type: application/json`.
    #[arg(long)]
    data: Option<String>,
}

/// Credentials from the command line, errors to stderr.
struct ArgsForm {
    email: String,
    password: String,
}

impl LoginForm for ArgsForm {
    fn field(&self, name: &str) -> Option<String> {
        match name {
            session_client::form::EMAIL_FIELD => Some(self.email.clone()),
            session_client::form::PASSWORD_FIELD => Some(self.password.clone()),
            _ => None,
        }
    }

    fn submit_label(&self) -> Option<String> {
        None
    }

    fn set_submit(&self, _disabled: bool, _label: &str) {}

    fn has_error_surface(&self) -> bool {
        true
    }

    fn show_error(&self, message: &str) {
        eprintln!("login failed: {message}");
    }

    fn hide_error(&self) {}
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: .env not loaded: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = SessionConfig::from_env();
    tracing::debug!(origin = %cli.origin, session_file = %cli.session_file.display(), "session cli starting");

    match cli.command {
        Command::Login(args) => {
            let href = login_href(&cli.origin, &config.login_page, args.next.as_deref())?;
            let client = build_client(href, &cli.session_file, config)?;
            run_login(&client, args).await
        }
        Command::Logout => {
            let client = build_client(page_href(&cli.origin, "/"), &cli.session_file, config)?;
            client.logout();
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            let client = build_client(page_href(&cli.origin, "/"), &cli.session_file, config)?;
            run_status(&client)
        }
        Command::Guard { path } => {
            let client = build_client(page_href(&cli.origin, &path), &cli.session_file, config)?;
            if client.require_auth() {
                println!("allowed");
            } else if let Some(target) = client.window().last_navigation() {
                println!("redirect {target}");
            }
            Ok(())
        }
        Command::Fetch(args) => {
            let client = build_client(page_href(&cli.origin, "/"), &cli.session_file, config)?;
            run_fetch(&client, args).await
        }
    }
}

fn build_client(href: String, session_file: &Path, config: SessionConfig) -> Result<CliClient, CliError> {
    Ok(SessionClient::new(
        config,
        FileStore::new(session_file),
        MemoryWindow::new(href),
        ReqwestTransport::new()?,
    ))
}

async fn run_login(client: &CliClient, args: LoginArgs) -> Result<(), CliError> {
    let form = ArgsForm { email: args.email, password: args.password };
    let controller = match client.init_login_form(Some(form)) {
        FormInit::Bound(controller) => controller,
        FormInit::Redirected(destination) => {
            println!("already logged in; continue to {destination}");
            return Ok(());
        }
        FormInit::Missing => return Ok(()),
    };

    let outcome = controller.submit().await?;
    if let Some(user) = &outcome.user {
        println!("{}", serde_json::to_string_pretty(user)?);
    }
    println!("logged in; continue to {}", outcome.destination);
    Ok(())
}

fn run_status(client: &CliClient) -> Result<(), CliError> {
    println!("authenticated: {}", client.is_authenticated());
    if let Some(user) = client.get_user::<Value>() {
        println!("{}", serde_json::to_string_pretty(&user)?);
    }
    Ok(())
}

async fn run_fetch(client: &CliClient, args: FetchArgs) -> Result<(), CliError> {
    let method = reqwest::Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .map_err(|_| CliError::InvalidMethod(args.method.clone()))?;
    let mut request = match args.data {
        Some(data) => {
            let body: Value = serde_json::from_str(&data)?;
            HttpRequest::post_json(args.url.as_str(), &body)?
        }
        None => HttpRequest::get(args.url.as_str()),
    };
    request.method = method;

    let response = client.auth_fetch(request).await?;
    println!("{}", response.body);
    if !response.is_success() {
        return Err(CliError::RequestFailed(response.status.as_u16()));
    }
    Ok(())
}

fn page_href(origin: &str, page: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), page)
}

/// Login page URL, carrying `next` the same way the access guard does.
fn login_href(origin: &str, login_page: &str, next: Option<&str>) -> Result<String, CliError> {
    let href = page_href(origin, login_page);
    let Some(next) = next else {
        return Ok(href);
    };
    let mut url = reqwest::Url::parse(&href).map_err(|e| SessionError::InvalidUrl(format!("{href}: {e}")))?;
    url.query_pairs_mut().append_pair(session_client::window::NEXT_PARAM, next);
    Ok(url.to_string())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
