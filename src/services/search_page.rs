//! Generic search-screen driver.
//!
//! A concrete screen supplies the `SearchScreen` contract (filter controls,
//! a pure filters-to-params conversion, and exactly one backend search
//! operation); the driver owns the rest of the lifecycle: restoring cached
//! state on activation, debouncing filter edits, page/size/sort transitions,
//! and binding responses into the screen's `TableDataSource`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use validator::Validate;

use crate::datasource::{TableDataSource, TableState};
use crate::errors::AppError;
use crate::models::menu::{ActiveMenu, MenuContext};
use crate::rest::{PageRequest, SearchResponse, SortOrder};
use crate::services::state_cache::{CachedSearchState, FilterValues, RouteStateCache};
use crate::Session;

pub type SearchFuture<R> = Pin<Box<dyn Future<Output = Result<SearchResponse<R>, AppError>> + Send>>;

/// What a concrete search screen supplies to the driver.
pub trait SearchScreen: Send + Sync + 'static {
    /// Typed backend query parameters.
    type Params: Send + 'static;
    /// One result row.
    type Row: Send + Sync + 'static;

    /// Route key under which this screen's state is cached.
    fn route(&self) -> &str;

    /// The filter controls this screen's form exposes.
    fn form_control_names(&self) -> Vec<String>;

    /// Initial filter values. Defaults to every control unset.
    fn default_filters(&self) -> FilterValues {
        self.form_control_names()
            .into_iter()
            .map(|name| (name, serde_json::Value::Null))
            .collect()
    }

    /// Pure, deterministic conversion from raw filter values to typed
    /// backend query parameters.
    fn to_search_params(&self, filters: &FilterValues) -> Self::Params;

    /// Invoke the screen's single backend search operation.
    fn do_search(&self, params: Self::Params, page: PageRequest) -> SearchFuture<Self::Row>;

    /// Which menu entry to highlight for this screen.
    fn resolve_menu(&self, _context: &MenuContext) -> Option<ActiveMenu> {
        None
    }
}

struct FormState {
    filters: FilterValues,
    page: u32,
    page_size: u32,
    sort: Option<SortOrder>,
    pending: Option<JoinHandle<()>>,
}

struct Inner<S: SearchScreen> {
    screen: S,
    cache: Arc<RouteStateCache>,
    results: TableDataSource<S::Row>,
    state: Mutex<FormState>,
    debounce: Duration,
}

/// Driver for one activated search screen.
pub struct SearchPageDriver<S: SearchScreen> {
    inner: Arc<Inner<S>>,
}

impl<S: SearchScreen> SearchPageDriver<S> {
    /// Activate the screen: restore the route's cached state if present
    /// (back-navigation must land on the exact prior view), otherwise use
    /// the screen's defaults and the layout's page size, then issue the
    /// initial search.
    pub fn activate(screen: S, session: &Session, context: &MenuContext) -> Self {
        let (filters, page, page_size, sort) = match session.route_cache.get(screen.route()) {
            Some(cached) => (cached.filters, cached.page, cached.page_size, cached.sort),
            None => {
                let mut filters = screen.default_filters();
                for name in screen.form_control_names() {
                    filters.entry(name).or_insert(serde_json::Value::Null);
                }
                (filters, 0, session.layout.default_page_size(), None)
            }
        };

        if let Some(menu) = screen.resolve_menu(context) {
            session.layout.set_active_menu(Some(menu));
        }

        let driver = Self {
            inner: Arc::new(Inner {
                screen,
                cache: Arc::clone(&session.route_cache),
                results: TableDataSource::new(Arc::clone(&session.errors)),
                state: Mutex::new(FormState {
                    filters,
                    page,
                    page_size,
                    sort,
                    pending: None,
                }),
                debounce: Duration::from_millis(session.config.search_debounce_ms),
            }),
        };
        driver.inner.run_search();
        driver
    }

    /// Consumer-side view of the results.
    pub fn results(&self) -> watch::Receiver<TableState<S::Row>> {
        self.inner.results.watch()
    }

    /// Current results snapshot.
    pub fn current_results(&self) -> TableState<S::Row> {
        self.inner.results.current()
    }

    /// Current raw filter values.
    pub fn filters(&self) -> FilterValues {
        self.inner.state.lock().unwrap().filters.clone()
    }

    pub fn page(&self) -> u32 {
        self.inner.state.lock().unwrap().page
    }

    pub fn page_size(&self) -> u32 {
        self.inner.state.lock().unwrap().page_size
    }

    /// Update one filter control. Resets to the first page and re-searches
    /// after the debounce interval; rapid edits coalesce into one search.
    pub fn set_filter(
        &self,
        name: &str,
        value: serde_json::Value,
    ) -> Result<(), AppError> {
        if !self
            .inner
            .screen
            .form_control_names()
            .iter()
            .any(|n| n == name)
        {
            return Err(AppError::Validation(format!(
                "Unknown filter control: {name}"
            )));
        }

        let mut state = self.inner.state.lock().unwrap();
        state.filters.insert(name.to_string(), value);
        state.page = 0;

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        let weak = Arc::downgrade(&self.inner);
        let delay = self.inner.debounce;
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.run_search();
            }
        }));
        Ok(())
    }

    /// Re-run the search immediately with the current state.
    pub fn search(&self) {
        self.inner.cancel_pending();
        self.inner.run_search();
    }

    /// Jump to a page, keeping filters and sort.
    pub fn set_page(&self, page: u32) {
        self.inner.cancel_pending();
        self.inner.state.lock().unwrap().page = page;
        self.inner.run_search();
    }

    /// Change the page size, keeping filters and the current page index.
    pub fn set_page_size(&self, page_size: u32) {
        self.inner.cancel_pending();
        self.inner.state.lock().unwrap().page_size = page_size;
        self.inner.run_search();
    }

    /// Change the sort order, resetting to the first page.
    pub fn set_sort(&self, sort: Option<SortOrder>) {
        self.inner.cancel_pending();
        {
            let mut state = self.inner.state.lock().unwrap();
            state.sort = sort;
            state.page = 0;
        }
        self.inner.run_search();
    }
}

impl<S: SearchScreen> Inner<S> {
    fn cancel_pending(&self) {
        if let Some(pending) = self.state.lock().unwrap().pending.take() {
            pending.abort();
        }
    }

    fn run_search(&self) {
        let (params, request, cached) = {
            let mut state = self.state.lock().unwrap();
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            let request = PageRequest {
                page: state.page,
                page_size: state.page_size,
                sort: state.sort.clone(),
            };
            let cached = CachedSearchState {
                filters: state.filters.clone(),
                page: state.page,
                page_size: state.page_size,
                sort: state.sort.clone(),
            };
            let params = self.screen.to_search_params(&state.filters);
            (params, request, cached)
        };

        if let Err(error) = request.validate() {
            // Contract violation by the caller; routed through the standard
            // failure path so the current results stay visible.
            self.results.subscribe(async move {
                Err(AppError::Validation(error.to_string()))
            });
            return;
        }

        // Persist before the response lands: back-navigation restores this
        // view even if the user leaves mid-flight.
        self.cache.put(self.screen.route(), cached);
        tracing::debug!(route = self.screen.route(), page = request.page, "Running search");
        self.results.subscribe(self.screen.do_search(params, request));
    }
}

impl<S: SearchScreen> Drop for Inner<S> {
    fn drop(&mut self) {
        if let Some(pending) = self.state.lock().unwrap().pending.take() {
            pending.abort();
        }
    }
}
