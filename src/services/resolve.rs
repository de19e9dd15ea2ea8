//! Session-lifetime reference-data cache with single-flight fetching.
//!
//! Reference data (countries, registration groups) is fetched at most once
//! per session. The cache moves `NotRequested → Requested → Done`; a failed
//! fetch takes the back-edge to `NotRequested` so the next access retries.
//! There is no edge out of `Done`.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::watch;

use crate::errors::AppError;

type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, AppError>> + Send>>;
type FetchFn<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;
type HookFn<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// Broadcast slot for callers that arrive while a fetch is in flight.
/// Failures are shared by message; the driving caller keeps the original
/// error value.
type Broadcast<T> = watch::Receiver<Option<Result<Arc<T>, String>>>;

enum ResolveState<T> {
    NotRequested,
    Requested(Broadcast<T>),
    Done(Arc<T>),
}

/// At-most-once resolver for shared reference data.
///
/// The first `get` drives exactly one fetch; concurrent callers during the
/// fetch share its outcome, and every successful caller receives the same
/// `Arc` value.
pub struct SingletonResolve<T> {
    fetch: FetchFn<T>,
    on_fetched: Option<HookFn<T>>,
    state: Mutex<ResolveState<T>>,
}

impl<T: Send + Sync + 'static> SingletonResolve<T> {
    pub fn new<F, Fut>(fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        Self {
            fetch: Arc::new(move || Box::pin(fetch())),
            on_fetched: None,
            state: Mutex::new(ResolveState::NotRequested),
        }
    }

    /// Install a hook run exactly once on the fetched value, before any
    /// caller observes it as resolved. Used to build derived lookup
    /// structures.
    pub fn with_hook(mut self, hook: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.on_fetched = Some(Arc::new(hook));
        self
    }

    /// Resolve the value, fetching it if this is the first access.
    pub async fn get(&self) -> Result<Arc<T>, AppError> {
        enum Role<T> {
            Drive(watch::Sender<Option<Result<Arc<T>, String>>>),
            Wait(Broadcast<T>),
        }

        let role = {
            let mut state = self.state.lock().unwrap();
            match &*state {
                ResolveState::Done(value) => return Ok(Arc::clone(value)),
                ResolveState::Requested(rx) => Role::Wait(rx.clone()),
                ResolveState::NotRequested => {
                    let (tx, rx) = watch::channel(None);
                    *state = ResolveState::Requested(rx);
                    Role::Drive(tx)
                }
            }
        };

        match role {
            Role::Drive(tx) => {
                // If the driving caller is dropped mid-fetch, fall back to
                // NotRequested so a later access can retry.
                let guard = ResetGuard {
                    state: &self.state,
                    armed: true,
                };
                let result = (self.fetch)().await;
                self.finish(guard, tx, result)
            }
            Role::Wait(mut rx) => loop {
                if let Some(result) = rx.borrow_and_update().clone() {
                    return result.map_err(AppError::Internal);
                }
                if rx.changed().await.is_err() {
                    return Err(AppError::Internal(
                        "reference data fetch was cancelled".to_string(),
                    ));
                }
            },
        }
    }

    fn finish(
        &self,
        mut guard: ResetGuard<'_, T>,
        tx: watch::Sender<Option<Result<Arc<T>, String>>>,
        result: Result<T, AppError>,
    ) -> Result<Arc<T>, AppError> {
        guard.armed = false;
        match result {
            Ok(mut value) => {
                if let Some(hook) = &self.on_fetched {
                    hook(&mut value);
                }
                let value = Arc::new(value);
                *self.state.lock().unwrap() = ResolveState::Done(Arc::clone(&value));
                let _ = tx.send(Some(Ok(Arc::clone(&value))));
                Ok(value)
            }
            Err(error) => {
                tracing::debug!(error = %error, "Reference data fetch failed, will retry on next access");
                *self.state.lock().unwrap() = ResolveState::NotRequested;
                let _ = tx.send(Some(Err(error.to_string())));
                Err(error)
            }
        }
    }
}

struct ResetGuard<'a, T> {
    state: &'a Mutex<ResolveState<T>>,
    armed: bool,
}

impl<T> Drop for ResetGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            *self.state.lock().unwrap() = ResolveState::NotRequested;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counted_fetch(
        calls: Arc<AtomicUsize>,
        fail_first: bool,
    ) -> impl Fn() -> FetchFuture<Vec<String>> + Send + Sync + 'static {
        move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if fail_first && n == 1 {
                    Err(AppError::Api {
                        status: 503,
                        message: "unavailable".to_string(),
                    })
                } else {
                    Ok(vec!["BR".to_string(), "NL".to_string()])
                }
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_first_access_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = Arc::new(SingletonResolve::new(counted_fetch(calls.clone(), false)));

        let handles: Vec<_> = (0..5)
            .map(|_| {
                let resolve = Arc::clone(&resolve);
                tokio::spawn(async move { resolve.get().await })
            })
            .collect();

        let mut values = Vec::new();
        for handle in handles {
            values.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        for value in &values[1..] {
            assert!(Arc::ptr_eq(&values[0], value));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn done_state_is_terminal() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = SingletonResolve::new(counted_fetch(calls.clone(), false));

        let first = resolve.get().await.unwrap();
        let second = resolve.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_permits_retry_on_next_access() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = SingletonResolve::new(counted_fetch(calls.clone(), true));

        let first = resolve.get().await;
        assert!(matches!(first, Err(AppError::Api { status: 503, .. })));

        let second = resolve.get().await.unwrap();
        assert_eq!(second.as_slice(), ["BR".to_string(), "NL".to_string()]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn waiters_share_the_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = Arc::new(SingletonResolve::new(counted_fetch(calls.clone(), true)));

        let a = tokio::spawn({
            let resolve = Arc::clone(&resolve);
            async move { resolve.get().await }
        });
        let b = tokio::spawn({
            let resolve = Arc::clone(&resolve);
            async move { resolve.get().await }
        });

        assert!(a.await.unwrap().is_err());
        assert!(b.await.unwrap().is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn hook_runs_once_before_resolution() {
        let hook_runs = Arc::new(AtomicUsize::new(0));
        let calls = Arc::new(AtomicUsize::new(0));
        let resolve = SingletonResolve::new(counted_fetch(calls, false)).with_hook({
            let hook_runs = Arc::clone(&hook_runs);
            move |codes: &mut Vec<String>| {
                hook_runs.fetch_add(1, Ordering::SeqCst);
                codes.push("derived".to_string());
            }
        });

        let value = resolve.get().await.unwrap();
        assert!(value.contains(&"derived".to_string()));
        resolve.get().await.unwrap();
        assert_eq!(hook_runs.load(Ordering::SeqCst), 1);
    }
}
