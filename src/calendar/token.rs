//! OAuth credential values.
//!
//! A [`Credential`] is a read-only value from the calendar port's point of
//! view. Refreshing never mutates anything in place: the exchange returns a
//! new credential and the caller decides what to do with it.

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::env;

use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

#[derive(Clone, Debug)]
pub struct Credential {
    access_token: SecretString,
    refresh: Option<RefreshConfig>,
}

#[derive(Clone, Debug)]
struct RefreshConfig {
    refresh_token: SecretString,
    client_id: String,
    client_secret: SecretString,
}

impl Credential {
    pub fn new(access_token: impl Into<String>) -> Self {
        let token: String = access_token.into();
        Self { access_token: token.into(), refresh: None }
    }

    /// Read `GOOGLE_ACCESS_TOKEN` and, when all three are present,
    /// `GOOGLE_REFRESH_TOKEN` / `GOOGLE_CLIENT_ID` / `GOOGLE_CLIENT_SECRET`
    /// for refresh support.
    pub fn from_env() -> Result<Self> {
        let access_token = env::var("GOOGLE_ACCESS_TOKEN")
            .map_err(|_| Error::TokenRefresh("GOOGLE_ACCESS_TOKEN not set".to_string()))?;

        let refresh = match (
            env::var("GOOGLE_REFRESH_TOKEN"),
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
        ) {
            (Ok(refresh_token), Ok(client_id), Ok(client_secret)) => Some(RefreshConfig {
                refresh_token: refresh_token.into(),
                client_id,
                client_secret: client_secret.into(),
            }),
            _ => None,
        };

        Ok(Self { access_token: access_token.into(), refresh })
    }

    /// The bearer token for Authorization headers.
    pub fn bearer(&self) -> &str {
        self.access_token.expose_secret()
    }

    /// Exchange the refresh token for a fresh access token. Returns a new
    /// credential carrying the same refresh configuration.
    pub async fn refreshed(&self, client: &Client, token_endpoint: &str) -> Result<Credential> {
        let refresh = self
            .refresh
            .as_ref()
            .ok_or_else(|| Error::TokenRefresh("no refresh token configured".to_string()))?;

        let params = [
            ("client_id", refresh.client_id.as_str()),
            ("client_secret", refresh.client_secret.expose_secret()),
            ("refresh_token", refresh.refresh_token.expose_secret()),
            ("grant_type", "refresh_token"),
        ];

        let response = client
            .post(token_endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| Error::TokenRefresh(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "<unreadable>".to_string());
            return Err(Error::TokenRefresh(format!("HTTP {} - {}", status, body)));
        }

        let body: Value =
            response.json().await.map_err(|e| Error::TokenRefresh(e.to_string()))?;
        let access_token = body
            .get("access_token")
            .and_then(|t| t.as_str())
            .ok_or_else(|| Error::TokenRefresh("response missing 'access_token'".to_string()))?;

        Ok(Credential {
            access_token: access_token.to_string().into(),
            refresh: self.refresh.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_exposes_token() {
        let cred = Credential::new("ya29.test");
        assert_eq!(cred.bearer(), "ya29.test");
    }

    #[tokio::test]
    async fn test_refresh_without_config_fails() {
        let cred = Credential::new("ya29.test");
        let client = Client::new();
        let err = cred.refreshed(&client, DEFAULT_TOKEN_ENDPOINT).await.unwrap_err();
        assert!(matches!(err, Error::TokenRefresh(_)));
    }
}
