//! Authentication against the Flock backend
//!
//! Password login, account registration, and Google identity exchange.
//! All three return the same `{token, user}` pair, persisted in the
//! config file until logout.

pub mod session;

pub use session::{SessionStore, StoredSession};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::models::{AuthResponse, GoogleProfile, LoginCredentials, RegisterData};

/// Message shown when the backend gives us nothing better to say.
const GENERIC_CONNECTIVITY_MESSAGE: &str =
    "Cannot reach the server. Check your connection and try again.";

/// Log in with email and password.
pub async fn login(email: String, password: String) -> Result<()> {
    let config = Config::load()?;
    let url = format!("{}/auth/login", config.api_base_url());
    let credentials = LoginCredentials { email, password };

    tracing::info!("Logging in as {}...", credentials.email);
    let auth = post_auth(&url, &serde_json::to_value(&credentials)?).await?;
    persist_session(config, auth)
}

/// Register a new member account.
pub async fn register(data: RegisterData) -> Result<()> {
    let config = Config::load()?;
    let url = format!("{}/auth/register", config.api_base_url());

    tracing::info!("Registering {}...", data.email);
    let auth = post_auth(&url, &serde_json::to_value(&data)?).await?;
    persist_session(config, auth)
}

/// Exchange a Google identity token for a backend session.
pub async fn google(id_token: String, profile: GoogleProfile) -> Result<()> {
    let config = Config::load()?;
    let url = format!("{}/auth/google", config.api_base_url());

    tracing::info!("Exchanging Google identity for {}...", profile.email);
    let payload = serde_json::json!({
        "idToken": id_token,
        "user": profile,
    });
    let auth = post_auth(&url, &payload).await?;
    persist_session(config, auth)
}

/// Clear the stored session and user record.
pub async fn logout() -> Result<()> {
    let mut config = Config::load()?;
    config.clear_session();
    config.save()?;
    println!("Logged out.");
    Ok(())
}

/// Show current authentication status.
pub async fn status() -> Result<()> {
    let config = Config::load()?;

    match config.get_session() {
        Some(session) if !session.is_expired() => {
            println!("Session:     valid");
            if let Some(exp) = session.expires_at {
                println!("  expires_at: {}", exp);
            }
        }
        Some(_) => println!("Session:     expired — run 'flock-cli login'"),
        None => println!("Session:     none — run 'flock-cli login'"),
    }

    match config.get_user() {
        Some(user) => {
            println!("User:        {} <{}>", user.full_name, user.email);
            println!("  role:       {}", user.role.as_str());
        }
        None => println!("User:        none"),
    }

    match config.rtc_app_id() {
        Some(_) => println!("RTC app id:  configured"),
        None => println!("RTC app id:  missing — group calls unavailable"),
    }

    Ok(())
}

/// POST an auth payload and parse the `{token, user}` response.
///
/// Backend errors are surfaced with the best message the response offers,
/// falling back to a generic connectivity message.
async fn post_auth(url: &str, payload: &serde_json::Value) -> Result<AuthResponse> {
    let http = reqwest::Client::new();

    let resp = http
        .post(url)
        .json(payload)
        .send()
        .await
        .with_context(|| GENERIC_CONNECTIVITY_MESSAGE.to_string())?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{}", extract_error_message(status.as_u16(), &body));
    }

    resp.json::<AuthResponse>()
        .await
        .context("Unexpected response from the server")
}

fn persist_session(mut config: Config, auth: AuthResponse) -> Result<()> {
    let name = auth.user.full_name.clone();
    config.set_session(auth.token, None);
    config.set_user(auth.user);
    config.save()?;
    println!("Signed in as {}.", name);
    Ok(())
}

/// Best-effort extraction of a human-readable error from an auth response.
///
/// Backend errors carry a `message` (sometimes `error`) field; anything
/// else collapses to the generic connectivity message.
pub(crate) fn extract_error_message(status: u16, body: &str) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(String::from)
        });

    match from_json {
        Some(msg) if !msg.trim().is_empty() => msg,
        _ if status == 401 => "Invalid email or password.".to_string(),
        _ => GENERIC_CONNECTIVITY_MESSAGE.to_string(),
    }
}
