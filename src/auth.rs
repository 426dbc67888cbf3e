//! Supabase Auth client used to obtain a user access token for write
//! mutations.
//!
//! [`SupabaseAuth::acquire_token`] signs in with a password first and only
//! signs the user up when that fails, so running it twice with the same
//! credentials is safe.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

const SIGN_IN_PATH: &str = "/auth/v1/token";
const SIGN_UP_PATH: &str = "/auth/v1/signup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenOutcome {
    /// Existing user signed in.
    SignedIn { access_token: String },
    /// New user created and confirmed automatically.
    SignedUp { access_token: String },
    /// New user created but the project requires email confirmation first.
    ConfirmationRequired { user_id: Option<String> },
}

impl TokenOutcome {
    pub fn access_token(&self) -> Option<&str> {
        match self {
            TokenOutcome::SignedIn { access_token } | TokenOutcome::SignedUp { access_token } => {
                Some(access_token)
            }
            TokenOutcome::ConfirmationRequired { .. } => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Error signing up: {0}")]
    SignUp(String),

    #[error("Error signing in: {0}")]
    SignIn(String),

    #[error("No access token received")]
    MissingToken,

    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl AuthError {
    /// Advice for the most common failures, matched on the server's message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            AuthError::SignUp(message) if message.contains("already registered") => Some(
                "This email is already registered. If you forgot your password, reset it in the \
                 Supabase dashboard. If the password is correct, run this command again and it \
                 will sign you in.",
            ),
            AuthError::SignUp(message) if message.contains("password") => Some(
                "Password requirements not met. Make sure your password is at least 6 characters \
                 long.",
            ),
            AuthError::SignUp(message) if message.contains("email") => {
                Some("Email format is invalid. Please use a valid email address.")
            }
            AuthError::SignIn(message) if message.contains("Email not confirmed") => Some(
                "Check your email for the confirmation link, or disable email confirmation in \
                 Supabase settings.",
            ),
            AuthError::SignIn(message) if message.contains("Invalid login credentials") => {
                Some("Double-check your email and password are correct.")
            }
            _ => None,
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    access_token: Option<String>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

/// Sign-up answers with a session when the user is confirmed immediately
/// and with the bare user object when confirmation is pending.
#[derive(Deserialize)]
struct SignUpResponse {
    access_token: Option<String>,
    id: Option<String>,
    user: Option<AuthUser>,
}

#[derive(Deserialize, Default)]
struct AuthErrorBody {
    msg: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupabaseAuth {
    client: Client,
    auth_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(client: Client, supabase_url: &str, anon_key: impl Into<String>) -> Self {
        Self {
            client,
            auth_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    pub async fn acquire_token(&self, email: &str, password: &str) -> AuthResult<TokenOutcome> {
        match self.sign_in(email, password).await {
            Ok(Some(access_token)) => return Ok(TokenOutcome::SignedIn { access_token }),
            Ok(None) => info!(email, "sign in returned no session, creating new user"),
            Err(AuthError::SignIn(message)) => {
                info!(email, error = %message, "sign in failed, creating new user")
            }
            Err(err) => return Err(err),
        }

        let signed_up = self.sign_up(email, password).await?;
        if let Some(access_token) = signed_up.access_token {
            return Ok(TokenOutcome::SignedUp { access_token });
        }
        let user_id = signed_up.user.map(|user| user.id).or(signed_up.id);
        if user_id.is_some() {
            return Ok(TokenOutcome::ConfirmationRequired { user_id });
        }

        debug!(email, "sign up returned neither user nor session, retrying sign in");
        self.sign_in(email, password)
            .await?
            .map(|access_token| TokenOutcome::SignedIn { access_token })
            .ok_or(AuthError::MissingToken)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<Option<String>> {
        let response = self
            .client
            .post(format!("{}{SIGN_IN_PATH}", self.auth_url))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::SignIn(Self::error_message(response).await));
        }
        Ok(response.json::<SessionResponse>().await?.access_token)
    }

    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<SignUpResponse> {
        let response = self
            .client
            .post(format!("{}{SIGN_UP_PATH}", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::SignUp(Self::error_message(response).await));
        }
        Ok(response.json::<SignUpResponse>().await?)
    }

    async fn error_message(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<AuthErrorBody>(&body).unwrap_or_default();
        let message = parsed
            .msg
            .or(parsed.error_description)
            .or(parsed.message)
            .or(parsed.error)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unexpected response from auth service")
                    .to_string()
            });
        warn!(status = status.as_u16(), %message, "auth service rejected request");
        message
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;
