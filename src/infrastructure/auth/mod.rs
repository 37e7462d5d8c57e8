//! Credential plumbing: JWT issuing, password hashing, and the two
//! [`crate::domain::credential_gate::CredentialGate`] implementations.

pub mod jwt;
pub mod local_gate;
pub mod password;
pub mod remote_gate;

pub use jwt::{Claims, JwtError, JwtIssuer};
pub use local_gate::LocalCredentialGate;
pub use remote_gate::{RemoteCredentialGate, TOKEN_VALID_MESSAGE};
