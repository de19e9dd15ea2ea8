//! Route-keyed cache of search-page state.
//!
//! Navigating away from a search page and back must restore the exact prior
//! view (same filters, same page), not a reset form. The cache is session
//! scoped and only ever touched from the UI flow, so a plain mutex suffices;
//! it is cleared only by process restart.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::rest::SortOrder;

/// Loosely-typed filter form values, keyed by control name.
pub type FilterValues = BTreeMap<String, serde_json::Value>;

/// Everything needed to reconstruct a search page's view.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedSearchState {
    pub filters: FilterValues,
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<SortOrder>,
}

/// Session-wide store of the last state of each search route.
#[derive(Debug, Default)]
pub struct RouteStateCache {
    entries: Mutex<HashMap<String, CachedSearchState>>,
}

impl RouteStateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, route: &str) -> Option<CachedSearchState> {
        self.entries.lock().unwrap().get(route).cloned()
    }

    pub fn put(&self, route: &str, state: CachedSearchState) {
        self.entries
            .lock()
            .unwrap()
            .insert(route.to_string(), state);
    }

    pub fn clear(&self, route: &str) {
        self.entries.lock().unwrap().remove(route);
    }
}
