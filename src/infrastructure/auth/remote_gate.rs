//! Credential gate backed by a remote credential service.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use crate::domain::credential_gate::CredentialGate;

/// Message the credential service returns for an accepted token.
pub const TOKEN_VALID_MESSAGE: &str = "Token is valid";

#[derive(Deserialize)]
struct VerifyResponse {
    message: Option<String>,
}

/// Asks `GET {base_url}/auth/verify` whether a token is valid.
///
/// The HTTP client is built once and reused for every check. Transport
/// failures, non-200 statuses, and unexpected bodies all count as "not
/// authorized".
pub struct RemoteCredentialGate {
    client: Client,
    verify_url: String,
}

impl RemoteCredentialGate {
    /// Creates a gate for the credential service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            verify_url: format!("{}/auth/verify", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl CredentialGate for RemoteCredentialGate {
    async fn is_authorized(&self, token: &str) -> bool {
        let response = match self
            .client
            .get(&self.verify_url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Credential service unreachable: {}", e);
                return false;
            }
        };

        if response.status() != StatusCode::OK {
            return false;
        }

        match response.json::<VerifyResponse>().await {
            Ok(body) => body.message.as_deref() == Some(TOKEN_VALID_MESSAGE),
            Err(e) => {
                warn!("Unexpected credential service response: {}", e);
                false
            }
        }
    }
}
