//! Transfer (payment) models and search filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransferKind {
    Payment,
    ScheduledPayment,
    ChargeBack,
    Import,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TransferStatus {
    Open,
    Closed,
    Reversed,
}

/// One row of a transfer search result. Amounts travel as decimal strings,
/// matching the backend's JSON representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TransferRow {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub amount: String,
    pub currency: String,
    pub kind: TransferKind,
    pub status: TransferStatus,
    pub from_account: String,
    pub to_account: String,
    pub description: Option<String>,
}

/// Typed backend query parameters for a transfer search.
///
/// Built fresh on every search invocation from the current filter values;
/// never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferQuery {
    pub keywords: Option<String>,
    pub status: Option<TransferStatus>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

impl TransferQuery {
    /// Whether any amount-range filter is active.
    pub fn has_amount_filters(&self) -> bool {
        self.min_amount.is_some() || self.max_amount.is_some()
    }

    /// Whether any date-range filter is active.
    pub fn has_date_filters(&self) -> bool {
        self.date_from.is_some() || self.date_to.is_some()
    }

    /// Render the non-empty filters as request query parameters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(keywords) = &self.keywords {
            pairs.push(("keywords".to_string(), keywords.clone()));
        }
        if let Some(status) = self.status {
            let value = serde_json::to_value(status).unwrap_or_default();
            if let Some(s) = value.as_str() {
                pairs.push(("status".to_string(), s.to_string()));
            }
        }
        if let Some(from) = self.date_from {
            pairs.push(("dateFrom".to_string(), from.to_rfc3339()));
        }
        if let Some(to) = self.date_to {
            pairs.push(("dateTo".to_string(), to.to_rfc3339()));
        }
        if let Some(min) = &self.min_amount {
            pairs.push(("minAmount".to_string(), min.clone()));
        }
        if let Some(max) = &self.max_amount {
            pairs.push(("maxAmount".to_string(), max.clone()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_renders_no_pairs() {
        assert!(TransferQuery::default().to_query_pairs().is_empty());
        assert!(!TransferQuery::default().has_amount_filters());
    }

    #[test]
    fn query_pairs_use_backend_field_names() {
        let query = TransferQuery {
            keywords: Some("rent".to_string()),
            status: Some(TransferStatus::Open),
            min_amount: Some("10.00".to_string()),
            ..Default::default()
        };
        let pairs = query.to_query_pairs();
        assert!(pairs.contains(&("keywords".to_string(), "rent".to_string())));
        assert!(pairs.contains(&("status".to_string(), "open".to_string())));
        assert!(pairs.contains(&("minAmount".to_string(), "10.00".to_string())));
    }

    #[test]
    fn transfer_row_deserializes_from_backend_json() {
        let json = serde_json::json!({
            "id": "8b9e2f8a-7a54-4d2e-b0a3-111111111111",
            "date": "2026-01-15T10:30:00Z",
            "amount": "25.50",
            "currency": "UNIT",
            "kind": "payment",
            "status": "closed",
            "fromAccount": "alice",
            "toAccount": "bob",
            "description": "groceries"
        });
        let row: TransferRow = serde_json::from_value(json).unwrap();
        assert_eq!(row.amount, "25.50");
        assert_eq!(row.kind, TransferKind::Payment);
        assert_eq!(row.status, TransferStatus::Closed);
    }
}
