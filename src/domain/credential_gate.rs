//! The credential gate consulted before any write.

use async_trait::async_trait;

/// Answers "is this bearer token valid".
///
/// The contract is a plain boolean: a missing, malformed, expired, or rejected
/// token is `false`, and so is a gate that could not be reached. Callers must
/// consult the gate before causing any store or cache side effect.
///
/// # Implementations
///
/// - [`crate::infrastructure::auth::RemoteCredentialGate`] - asks a credential service over HTTP
/// - [`crate::infrastructure::auth::LocalCredentialGate`] - verifies JWTs in-process
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialGate: Send + Sync {
    async fn is_authorized(&self, token: &str) -> bool;
}
