//! In-process credential gate.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::jwt::JwtIssuer;
use crate::domain::credential_gate::CredentialGate;

/// Verifies tokens with the co-located [`JwtIssuer`] instead of a network call.
pub struct LocalCredentialGate {
    issuer: Arc<JwtIssuer>,
}

impl LocalCredentialGate {
    pub fn new(issuer: Arc<JwtIssuer>) -> Self {
        Self { issuer }
    }
}

#[async_trait]
impl CredentialGate for LocalCredentialGate {
    async fn is_authorized(&self, token: &str) -> bool {
        match self.issuer.verify(token) {
            Ok(claims) => {
                debug!(sub = %claims.sub, "Token accepted");
                true
            }
            Err(e) => {
                debug!("Token rejected: {}", e);
                false
            }
        }
    }
}
