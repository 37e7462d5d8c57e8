//! Authorization header parsing.

use axum::http::{HeaderMap, header};

/// Extracts the credential from an `Authorization` header.
///
/// Accepts `Bearer <token>` (scheme matched case-insensitively) as well as a
/// bare token, which is what older clients send. Returns `None` when the header
/// is missing, not valid UTF-8, or empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}
