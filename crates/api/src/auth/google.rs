//! Google ID token verification for social sign-in.
//!
//! Handlers depend on the [`IdentityVerifier`] trait; production wiring uses
//! [`GoogleVerifier`], which asks Google's `tokeninfo` endpoint to validate the
//! token and then checks the audience and email verification flag locally.

use async_trait::async_trait;
use inotebook_core::error::CoreError;
use serde::Deserialize;

/// Google's token introspection endpoint.
pub const GOOGLE_TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";

/// Google sign-in settings.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// OAuth client id; tokens must be issued for this audience.
    pub client_id: String,
}

impl GoogleConfig {
    /// Read `GOOGLE_CLIENT_ID`. Returns `None` when unset or blank.
    pub fn from_env() -> Option<Self> {
        std::env::var("GOOGLE_CLIENT_ID")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(|client_id| Self { client_id })
    }
}

/// A verified Google account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleIdentity {
    /// Stable Google account id (`sub`).
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Verifies a client-supplied ID token and returns the identity it asserts.
///
/// Implementations report every rejection as [`CoreError::Unauthorized`].
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, CoreError>;
}

/// `tokeninfo` returns booleans as strings ("true"), but accept both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlexBool {
    Bool(bool),
    Text(String),
}

impl FlexBool {
    fn is_true(&self) -> bool {
        match self {
            FlexBool::Bool(b) => *b,
            FlexBool::Text(s) => s.eq_ignore_ascii_case("true"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    aud: String,
    sub: String,
    email: Option<String>,
    email_verified: Option<FlexBool>,
    name: Option<String>,
    picture: Option<String>,
}

/// [`IdentityVerifier`] backed by Google's `tokeninfo` endpoint.
pub struct GoogleVerifier {
    client: reqwest::Client,
    client_id: String,
    tokeninfo_url: String,
}

impl GoogleVerifier {
    pub fn new(config: &GoogleConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: config.client_id.clone(),
            tokeninfo_url: GOOGLE_TOKENINFO_URL.to_string(),
        }
    }
}

#[async_trait]
impl IdentityVerifier for GoogleVerifier {
    async fn verify(&self, id_token: &str) -> Result<GoogleIdentity, CoreError> {
        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Google tokeninfo request failed");
                CoreError::Unauthorized("Unable to verify Google token".into())
            })?;

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Google rejected ID token");
            return Err(CoreError::Unauthorized("Invalid Google token".into()));
        }

        let info: TokenInfo = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "Malformed Google tokeninfo response");
            CoreError::Unauthorized("Invalid Google token".into())
        })?;

        identity_from_token_info(info, &self.client_id)
    }
}

/// Apply the audience and verified-email checks to a `tokeninfo` payload.
fn identity_from_token_info(
    info: TokenInfo,
    expected_audience: &str,
) -> Result<GoogleIdentity, CoreError> {
    if info.aud != expected_audience {
        return Err(CoreError::Unauthorized(
            "Google token was issued for a different client".into(),
        ));
    }
    if !info.email_verified.as_ref().is_some_and(FlexBool::is_true) {
        return Err(CoreError::Unauthorized(
            "Google account email is not verified".into(),
        ));
    }
    let email = info
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| CoreError::Unauthorized("Google token carries no email".into()))?;

    Ok(GoogleIdentity {
        subject: info.sub,
        email,
        name: info.name,
        picture: info.picture,
    })
}
