use regex::Regex;
use std::sync::LazyLock;

use super::error::FeedServiceError;
use super::model::{
    FeedAction, FeedRequest, ACCESS_KEY_LENGTH, DEFAULT_LIMIT, MAX_LIMIT, MAX_NAME_LENGTH,
};

static ACCESS_KEY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[A-Za-z0-9]{{{}}}$", ACCESS_KEY_LENGTH))
        .expect("access key pattern is valid")
});

/// Raw query string of `GET /rss/:access_key/:action`.
///
/// Everything is kept as text so that a stray non-numeric value is dropped
/// instead of rejecting the whole request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FeedQuery {
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub limit: Option<String>,
    pub name: Option<String>,
}

impl FeedQuery {
    /// Builds the query from decoded `key=value` pairs. The first occurrence
    /// of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "category" => &mut query.category,
                "subcategory" => &mut query.subcategory,
                "limit" => &mut query.limit,
                "name" => &mut query.name,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        query
    }
}

impl FeedRequest {
    /// Checks the path and query of an RSS request.
    ///
    /// Malformed keys and unknown actions are reported as not found so that
    /// probes learn nothing about the key format. Out-of-range categories are
    /// ignored rather than rejected.
    pub fn validate(
        access_key: &str,
        action: &str,
        query: FeedQuery,
    ) -> Result<Self, FeedServiceError> {
        if !ACCESS_KEY_PATTERN.is_match(access_key) {
            return Err(FeedServiceError::NotFound("Unknown feed".to_string()));
        }

        let action = FeedAction::from_path_segment(action)
            .ok_or_else(|| FeedServiceError::NotFound("Unknown action".to_string()))?;

        let name = query.name.filter(|name| !name.is_empty());
        if let Some(name) = &name {
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(FeedServiceError::Invalid(format!(
                    "name must be at most {} characters",
                    MAX_NAME_LENGTH
                )));
            }
        }

        if action == FeedAction::Search && name.is_none() {
            return Err(FeedServiceError::NotFound(
                "Search requires a name".to_string(),
            ));
        }

        let category = parse_int(query.category.as_deref())
            .filter(|category| (1..=7).contains(category))
            .map(|category| category as u8);
        let subcategory = parse_int(query.subcategory.as_deref())
            .filter(|subcategory| (9..=36).contains(subcategory))
            .map(|subcategory| subcategory as u8);

        let limit = parse_int(query.limit.as_deref())
            .map(|limit| limit.clamp(1, i64::from(MAX_LIMIT)) as u32)
            .unwrap_or(DEFAULT_LIMIT);

        Ok(Self {
            access_key: access_key.to_string(),
            action,
            category,
            subcategory,
            limit,
            name,
        })
    }
}

fn parse_int(value: Option<&str>) -> Option<i64> {
    value.and_then(|v| v.trim().parse::<i64>().ok())
}
