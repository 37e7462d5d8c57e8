//! DTOs for the shortening endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Warning attached to a successful response when the cache could not be primed.
pub const CACHE_UNAVAILABLE_WARNING: &str = "cache_unavailable";

/// Request to shorten a URL.
///
/// The URL is stored exactly as sent. Field aliases accept the camel-case and
/// `user_id` spellings used by existing clients.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(alias = "longURL")]
    pub long_url: String,

    #[serde(default, alias = "user_id")]
    #[validate(length(max = 255, message = "Owner must be at most 255 characters"))]
    pub owner: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub code: String,
    pub short_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_accepts_aliases() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"longURL": "https://example.com", "user_id": "u1"}"#).unwrap();
        assert_eq!(req.long_url, "https://example.com");
        assert_eq!(req.owner.as_deref(), Some("u1"));

        let req: ShortenRequest = serde_json::from_str(r#"{"long_url": ""}"#).unwrap();
        assert_eq!(req.long_url, "");
        assert!(req.owner.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_owner_length_limit() {
        let req = ShortenRequest {
            long_url: "https://example.com".to_string(),
            owner: Some("x".repeat(256)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_response_omits_absent_warning() {
        let body = serde_json::to_value(ShortenResponse {
            code: "aB3xY9".to_string(),
            short_url: "http://localhost:8080/aB3xY9".to_string(),
            warning: None,
        })
        .unwrap();

        assert!(body.get("warning").is_none());
    }
}
