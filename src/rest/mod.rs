//! REST transport: the HTTP collaborator every search screen calls through.
//!
//! List endpoints follow one convention: filter query parameters plus
//! `page`/`pageSize`/`sort` fields on the request, a JSON array body plus
//! `X-*` pagination headers on the response.

use std::time::Duration;

use serde::de::DeserializeOwned;
use validator::Validate;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::pagination::PaginationData;

/// Sort order for a search, rendered as `field` or `-field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub field: String,
    pub descending: bool,
}

impl SortOrder {
    pub fn ascending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: false,
        }
    }

    pub fn descending(field: &str) -> Self {
        Self {
            field: field.to_string(),
            descending: true,
        }
    }

    fn render(&self) -> String {
        if self.descending {
            format!("-{}", self.field)
        } else {
            self.field.clone()
        }
    }
}

/// Pagination fields of one search request.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PageRequest {
    pub page: u32,
    #[validate(range(min = 1, max = 1000))]
    pub page_size: u32,
    pub sort: Option<SortOrder>,
}

impl PageRequest {
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page: 0,
            page_size,
            sort: None,
        }
    }

    /// Render as request query parameters.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ];
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.render()));
        }
        pairs
    }
}

/// Decoded search response: array body plus pagination geometry.
#[derive(Debug, Clone)]
pub struct SearchResponse<T> {
    pub rows: Vec<T>,
    pub pagination: PaginationData,
}

/// Thin REST client over the backend API.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Run one search request and decode body plus pagination headers.
    pub async fn search<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<SearchResponse<T>, AppError> {
        let url = self.url(path);
        tracing::debug!(%url, params = query.len(), "Issuing search request");

        let response = self.http.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let headers = response.headers().clone();
        let body = response.bytes().await?;
        let rows: Vec<T> = serde_json::from_slice(&body)?;
        let pagination = PaginationData::from_headers(&headers, rows.len());
        Ok(SearchResponse { rows, pagination })
    }

    /// Fetch a single JSON document (reference data, view pages).
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let url = self.url(path);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
