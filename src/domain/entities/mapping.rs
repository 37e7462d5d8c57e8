//! Mapping entity: the durable `(code, long_url, owner)` record.

use chrono::{DateTime, Utc};

/// A short code and the URL it redirects to.
///
/// Mappings are written once by the allocation service and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub code: String,
    pub long_url: String,
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    pub fn new(
        id: i64,
        code: String,
        long_url: String,
        owner: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            long_url,
            owner,
            created_at,
        }
    }
}

/// Input data for inserting a mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub code: String,
    pub long_url: String,
    pub owner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_creation() {
        let now = Utc::now();
        let mapping = Mapping::new(
            1,
            "aB3xY9".to_string(),
            "https://example.com".to_string(),
            Some("u1".to_string()),
            now,
        );

        assert_eq!(mapping.code, "aB3xY9");
        assert_eq!(mapping.long_url, "https://example.com");
        assert_eq!(mapping.owner.as_deref(), Some("u1"));
        assert_eq!(mapping.created_at, now);
    }
}
