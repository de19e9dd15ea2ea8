//! Push-based result container backing every results table.
//!
//! A `TableDataSource` owns at most one in-flight search at a time. Starting
//! a new search supersedes the previous one: the prior task is aborted and,
//! should its response still arrive, a request-token check drops it. A slow,
//! stale response can therefore never overwrite a newer search's results.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::{AppError, SharedReporter};
use crate::models::pagination::PaginationData;
use crate::rest::SearchResponse;

/// Snapshot of the container: the current rows (absent before the first
/// result lands) and the pagination geometry of the response that produced
/// them (absent for client-computed lists).
#[derive(Debug)]
pub struct TableState<T> {
    rows: Option<Arc<Vec<T>>>,
    pagination: Option<PaginationData>,
}

impl<T> TableState<T> {
    fn initial() -> Self {
        Self {
            rows: None,
            pagination: None,
        }
    }

    pub fn rows(&self) -> &[T] {
        self.rows.as_deref().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the rows have ever been set.
    pub fn has_results(&self) -> bool {
        self.rows.is_some()
    }

    pub fn pagination(&self) -> Option<&PaginationData> {
        self.pagination.as_ref()
    }

    /// Derived empty flag, recomputed on every update.
    pub fn is_empty(&self) -> bool {
        self.rows.as_ref().map(|r| r.is_empty()).unwrap_or(true)
    }
}

impl<T> Clone for TableState<T> {
    fn clone(&self) -> Self {
        Self {
            rows: self.rows.clone(),
            pagination: self.pagination.clone(),
        }
    }
}

/// Asynchronous result container with an at-most-one-active-subscription
/// invariant.
pub struct TableDataSource<T> {
    tx: watch::Sender<TableState<T>>,
    latest: Arc<AtomicU64>,
    reporter: SharedReporter,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> TableDataSource<T> {
    pub fn new(reporter: SharedReporter) -> Self {
        let (tx, _) = watch::channel(TableState::initial());
        Self {
            tx,
            latest: Arc::new(AtomicU64::new(0)),
            reporter,
            task: Mutex::new(None),
        }
    }

    /// Subscribe to a consumer-side view of the container.
    pub fn watch(&self) -> watch::Receiver<TableState<T>> {
        self.tx.subscribe()
    }

    /// Current snapshot.
    pub fn current(&self) -> TableState<T> {
        self.tx.borrow().clone()
    }

    /// Bind a search response future into the container.
    ///
    /// Supersedes any in-flight search. On success the rows and pagination
    /// are published; on failure the error is reported once and the current
    /// state is left untouched, so stale-but-valid results stay visible.
    pub fn subscribe<F>(&self, future: F)
    where
        F: Future<Output = Result<SearchResponse<T>, AppError>> + Send + 'static,
    {
        let token = self.advance();
        let latest = Arc::clone(&self.latest);
        let tx = self.tx.clone();
        let reporter = Arc::clone(&self.reporter);

        let handle = tokio::spawn(async move {
            match future.await {
                Ok(response) => {
                    if latest.load(Ordering::SeqCst) == token {
                        tx.send_replace(TableState {
                            rows: Some(Arc::new(response.rows)),
                            pagination: Some(response.pagination),
                        });
                    } else {
                        tracing::debug!(token, "Dropping superseded search response");
                    }
                }
                Err(error) => {
                    if latest.load(Ordering::SeqCst) == token {
                        reporter.report(&error);
                    }
                }
            }
        });

        let prior = self.task.lock().unwrap().replace(handle);
        if let Some(prior) = prior {
            prior.abort();
        }
    }

    /// Set the rows directly (client-computed or already-paged-in-memory
    /// lists). Clears pagination and supersedes any in-flight search.
    pub fn next(&self, rows: Vec<T>) {
        self.advance();
        if let Some(prior) = self.task.lock().unwrap().take() {
            prior.abort();
        }
        self.tx.send_replace(TableState {
            rows: Some(Arc::new(rows)),
            pagination: None,
        });
    }

    fn advance(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }
}

impl<T> Drop for TableDataSource<T> {
    fn drop(&mut self) {
        // No updates may leak out after the owning view is gone.
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
    }
}
