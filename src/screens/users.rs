//! User directory search screen.

use std::sync::Arc;

use crate::models::menu::{ActiveMenu, Menu, MenuContext};
use crate::models::user::{UserQuery, UserRow};
use crate::rest::{PageRequest, RestClient};
use crate::services::search_page::{SearchFuture, SearchScreen};
use crate::services::state_cache::FilterValues;

use super::str_filter;

pub struct UsersSearch {
    client: Arc<RestClient>,
}

impl UsersSearch {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

impl SearchScreen for UsersSearch {
    type Params = UserQuery;
    type Row = UserRow;

    fn route(&self) -> &str {
        "/users/search"
    }

    fn form_control_names(&self) -> Vec<String> {
        ["keywords", "groups", "country"].map(String::from).to_vec()
    }

    fn to_search_params(&self, filters: &FilterValues) -> UserQuery {
        UserQuery {
            keywords: str_filter(filters, "keywords"),
            groups: filters
                .get("groups")
                .and_then(|v| v.as_array())
                .map(|groups| {
                    groups
                        .iter()
                        .filter_map(|g| g.as_str())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default(),
            country: str_filter(filters, "country"),
        }
    }

    fn do_search(&self, params: UserQuery, page: PageRequest) -> SearchFuture<UserRow> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let mut query = params.to_query_pairs();
            query.extend(page.to_query_pairs());
            client.search("/users", &query).await
        })
    }

    fn resolve_menu(&self, _context: &MenuContext) -> Option<ActiveMenu> {
        Some(ActiveMenu::new(Menu::Users))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn group_filter_reads_array_values() {
        let client = Arc::new(RestClient::new(&AppConfig::default()).unwrap());
        let screen = UsersSearch::new(client);
        let filters = FilterValues::from([
            ("groups".to_string(), serde_json::json!(["members", "brokers"])),
            ("country".to_string(), "NL".into()),
        ]);

        let params = screen.to_search_params(&filters);
        assert_eq!(params.groups, vec!["members", "brokers"]);
        assert_eq!(params.country.as_deref(), Some("NL"));
        assert_eq!(params.keywords, None);
    }
}
