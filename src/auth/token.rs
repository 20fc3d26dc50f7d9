//! OAuth2 client-credentials token handling
//!
//! The [`TokenCredential`] owns token acquisition and refresh; the
//! session only ever asks it for a usable bearer string.

use std::time::{Duration, SystemTime};

use log::{debug, info};
use tokio::sync::Mutex;

use super::credentials::Credentials;
use crate::error::{Error, Result};

/// Refresh this long before the reported expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(300);

const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// An acquired access token with its expiry.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: SystemTime,
}

impl TokenInfo {
    fn is_usable(&self) -> bool {
        match self.expires_at.duration_since(SystemTime::now()) {
            Ok(remaining) => remaining > EXPIRY_SKEW,
            Err(_) => false,
        }
    }
}

/// Bearer credential handle: acquires tokens via the OAuth2
/// client-credentials flow and refreshes them transparently.
pub struct TokenCredential {
    tenant: String,
    credentials: Option<Credentials>,
    http_client: reqwest::Client,
    state: Mutex<Option<TokenInfo>>,
}

impl TokenCredential {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            tenant: credentials.tenant.clone(),
            credentials: Some(credentials),
            http_client: reqwest::Client::new(),
            state: Mutex::new(None),
        }
    }

    /// Wrap an already-acquired access token. The token is used as-is
    /// and never refreshed; useful for tests and for callers that manage
    /// tokens themselves.
    pub fn from_static(access_token: impl Into<String>) -> Self {
        let info = TokenInfo {
            access_token: access_token.into(),
            // Far enough out that the skew check never trips.
            expires_at: SystemTime::now() + Duration::from_secs(86_400 * 365),
        };
        Self {
            tenant: "common".to_string(),
            credentials: None,
            http_client: reqwest::Client::new(),
            state: Mutex::new(Some(info)),
        }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Return a valid access token, refreshing first if the cached one
    /// is missing or within the expiry skew.
    pub async fn bearer(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let Some(info) = state.as_ref() {
            if info.is_usable() {
                return Ok(info.access_token.clone());
            }
        }

        let credentials = self.credentials.as_ref().ok_or_else(|| {
            Error::Auth("static token expired and no credentials available for refresh".to_string())
        })?;

        let info = self.request_token(credentials).await?;
        let token = info.access_token.clone();
        *state = Some(info);
        Ok(token)
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<TokenInfo> {
        let token_url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            credentials.tenant
        );

        info!("Requesting access token for tenant {}", credentials.tenant);

        let response = self
            .http_client
            .post(&token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", credentials.client_id.as_str()),
                ("client_secret", credentials.client_secret.as_str()),
                ("scope", DEFAULT_SCOPE),
            ])
            .send()
            .await?;

        debug!("Token request status: {}", response.status());

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Auth(format!(
                "token request failed: {}",
                error_text
            )));
        }

        let token_data: serde_json::Value = response.json().await?;

        let access_token = token_data
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| Error::Auth("no access token in response".to_string()))?
            .to_string();

        // Default to 1 hour if the endpoint omits expires_in.
        let expires_in = token_data
            .get("expires_in")
            .and_then(|e| e.as_u64())
            .unwrap_or(3600);

        Ok(TokenInfo {
            access_token,
            expires_at: SystemTime::now() + Duration::from_secs(expires_in),
        })
    }
}

impl std::fmt::Debug for TokenCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCredential")
            .field("tenant", &self.tenant)
            .finish_non_exhaustive()
    }
}
