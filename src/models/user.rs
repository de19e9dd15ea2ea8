//! User directory models and search filters.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of a user directory search result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: Uuid,
    pub display_name: String,
    pub username: String,
    pub group: String,
    pub country: Option<String>,
    pub email: Option<String>,
}

/// Typed backend query parameters for a user directory search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub keywords: Option<String>,
    pub groups: Vec<String>,
    pub country: Option<String>,
}

impl UserQuery {
    /// Render the non-empty filters as request query parameters. Group
    /// filters repeat the `groups` parameter, one value each.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(keywords) = &self.keywords {
            pairs.push(("keywords".to_string(), keywords.clone()));
        }
        for group in &self.groups {
            pairs.push(("groups".to_string(), group.clone()));
        }
        if let Some(country) = &self.country {
            pairs.push(("country".to_string(), country.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_repeat_the_parameter() {
        let query = UserQuery {
            keywords: None,
            groups: vec!["members".to_string(), "brokers".to_string()],
            country: Some("BR".to_string()),
        };
        let pairs = query.to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("groups".to_string(), "members".to_string()),
                ("groups".to_string(), "brokers".to_string()),
                ("country".to_string(), "BR".to_string()),
            ]
        );
    }
}
