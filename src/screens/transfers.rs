//! Transfer search and transfer detail screens.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::menu::{ActiveMenu, Menu, MenuContext};
use crate::models::transfer::{TransferKind, TransferQuery, TransferRow};
use crate::rest::{PageRequest, RestClient};
use crate::services::page::{LoadFuture, PageContent};
use crate::services::search_page::{SearchFuture, SearchScreen};
use crate::services::state_cache::FilterValues;

use super::{date_filter, str_filter};

/// The transfers history search screen.
pub struct TransfersSearch {
    client: Arc<RestClient>,
}

impl TransfersSearch {
    pub fn new(client: Arc<RestClient>) -> Self {
        Self { client }
    }
}

impl SearchScreen for TransfersSearch {
    type Params = TransferQuery;
    type Row = TransferRow;

    fn route(&self) -> &str {
        "/banking/transfers"
    }

    fn form_control_names(&self) -> Vec<String> {
        ["keywords", "status", "dateFrom", "dateTo", "minAmount", "maxAmount"]
            .map(String::from)
            .to_vec()
    }

    fn to_search_params(&self, filters: &FilterValues) -> TransferQuery {
        TransferQuery {
            keywords: str_filter(filters, "keywords"),
            status: filters
                .get("status")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            date_from: date_filter(filters, "dateFrom"),
            date_to: date_filter(filters, "dateTo"),
            min_amount: str_filter(filters, "minAmount"),
            max_amount: str_filter(filters, "maxAmount"),
        }
    }

    fn do_search(&self, params: TransferQuery, page: PageRequest) -> SearchFuture<TransferRow> {
        let client = Arc::clone(&self.client);
        Box::pin(async move {
            let mut query = params.to_query_pairs();
            query.extend(page.to_query_pairs());
            client.search("/transfers", &query).await
        })
    }

    fn resolve_menu(&self, _context: &MenuContext) -> Option<ActiveMenu> {
        Some(ActiveMenu::new(Menu::Banking))
    }
}

/// The transfer detail view page.
pub struct TransferView {
    client: Arc<RestClient>,
    id: Uuid,
}

impl TransferView {
    pub fn new(client: Arc<RestClient>, id: Uuid) -> Self {
        Self { client, id }
    }
}

impl PageContent for TransferView {
    type Data = TransferRow;

    fn load(&self) -> LoadFuture<TransferRow> {
        let client = Arc::clone(&self.client);
        let id = self.id;
        Box::pin(async move { client.get(&format!("/transfers/{id}")).await })
    }

    /// Imported transfers are administered under operations; everything else
    /// is regular banking. Only known once the record is loaded.
    fn resolve_menu(&self, data: &TransferRow, _context: &MenuContext) -> Option<ActiveMenu> {
        let menu = match data.kind {
            TransferKind::Import => Menu::Operations,
            _ => Menu::Banking,
        };
        Some(ActiveMenu::new(menu))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::models::transfer::TransferStatus;

    fn screen() -> TransfersSearch {
        let client = RestClient::new(&AppConfig::default()).unwrap();
        TransfersSearch::new(Arc::new(client))
    }

    #[test]
    fn to_search_params_is_pure_and_deterministic() {
        let screen = screen();
        let filters = FilterValues::from([
            ("keywords".to_string(), "rent".into()),
            ("status".to_string(), "open".into()),
            ("dateFrom".to_string(), "2026-01-01T00:00:00Z".into()),
            ("minAmount".to_string(), "5.00".into()),
        ]);

        let first = screen.to_search_params(&filters);
        let second = screen.to_search_params(&filters);
        assert_eq!(first, second);
        assert_eq!(first.keywords.as_deref(), Some("rent"));
        assert_eq!(first.status, Some(TransferStatus::Open));
        assert!(first.date_from.is_some());
        assert_eq!(first.date_to, None);
        assert_eq!(first.min_amount.as_deref(), Some("5.00"));
    }

    #[test]
    fn unset_controls_map_to_no_filters() {
        let screen = screen();
        let params = screen.to_search_params(&screen.default_filters());
        assert_eq!(params, TransferQuery::default());
        assert!(!params.has_date_filters());
    }

    #[test]
    fn bad_status_value_is_ignored() {
        let screen = screen();
        let filters = FilterValues::from([("status".to_string(), "garbage".into())]);
        assert_eq!(screen.to_search_params(&filters).status, None);
    }
}
