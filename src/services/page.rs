//! Page lifecycle driver.
//!
//! A `PageDriver` composes with a `PageContent` implementation instead of
//! being inherited from: it registers the page with the layout, runs the
//! content's `load`, and publishes `Loading → Ready` transitions. `reload`
//! is observably identical to a fresh mount of the same content.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::{AppError, SharedReporter};
use crate::models::menu::{ActiveMenu, MenuContext};
use crate::services::layout::{Layout, PageId};

pub type LoadFuture<D> = Pin<Box<dyn Future<Output = Result<D, AppError>> + Send>>;

/// Observable page state.
#[derive(Debug, Clone, PartialEq)]
pub enum PageState<D> {
    Loading,
    Ready(D),
}

impl<D> PageState<D> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

/// What a concrete page supplies to the lifecycle driver.
pub trait PageContent: Send + Sync + 'static {
    type Data: Clone + Send + Sync + 'static;

    /// Fetch the page's data. Called once per mount and once per reload.
    fn load(&self) -> LoadFuture<Self::Data>;

    /// Invoked exactly once per lifecycle, on the first data assignment.
    fn on_data_initialized(&self, _data: &Self::Data) {}

    /// Invoked on every data assignment, including the first.
    fn on_after_set_data(&self, _data: &Self::Data) {}

    /// Which menu entry to highlight while this page is displayed.
    fn resolve_menu(&self, _data: &Self::Data, _context: &MenuContext) -> Option<ActiveMenu> {
        None
    }
}

/// Lifecycle scaffold for one mounted page.
pub struct PageDriver<P: PageContent> {
    content: P,
    id: PageId,
    layout: Arc<Layout>,
    reporter: SharedReporter,
    context: MenuContext,
    tx: watch::Sender<PageState<P::Data>>,
    initialized: AtomicBool,
    task: Mutex<Option<JoinHandle<()>>>,
    weak_self: Weak<Self>,
}

impl<P: PageContent> PageDriver<P> {
    /// Mount a page: register it as current, publish `Loading`, and start
    /// the content's load.
    pub fn mount(
        content: P,
        layout: Arc<Layout>,
        reporter: SharedReporter,
        context: MenuContext,
    ) -> Arc<Self> {
        let id = PageId::next();
        layout.register_page(id);
        let (tx, _) = watch::channel(PageState::Loading);
        let driver = Arc::new_cyclic(|weak_self| Self {
            content,
            id,
            layout,
            reporter,
            context,
            tx,
            initialized: AtomicBool::new(false),
            task: Mutex::new(None),
            weak_self: weak_self.clone(),
        });
        driver.start_load();
        driver
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn watch(&self) -> watch::Receiver<PageState<P::Data>> {
        self.tx.subscribe()
    }

    pub fn data(&self) -> Option<P::Data> {
        match &*self.tx.borrow() {
            PageState::Ready(data) => Some(data.clone()),
            PageState::Loading => None,
        }
    }

    /// Assign the page's data, running the initialization hook on the first
    /// assignment only (edge-triggered) and the after-set hook every time.
    pub fn set_data(&self, data: P::Data) {
        let first = !self.initialized.swap(true, Ordering::SeqCst);
        if first {
            self.content.on_data_initialized(&data);
            if let Some(menu) = self.content.resolve_menu(&data, &self.context) {
                self.layout.set_active_menu(Some(menu));
            }
        }
        self.content.on_after_set_data(&data);
        self.tx.send_replace(PageState::Ready(data));
    }

    /// Reset to the pristine state and re-run initialization. Produces the
    /// same observable state sequence as a fresh mount.
    pub fn reload(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
        self.initialized.store(false, Ordering::SeqCst);
        self.tx.send_replace(PageState::Loading);
        self.start_load();
    }

    fn start_load(&self) {
        let weak = self.weak_self.clone();
        let future = self.content.load();
        let handle = tokio::spawn(async move {
            let result = future.await;
            // The driver may be gone by the time the load lands.
            if let Some(driver) = weak.upgrade() {
                match result {
                    Ok(data) => driver.set_data(data),
                    Err(error) => driver.reporter.report(&error),
                }
            }
        });
        if let Some(prior) = self.task.lock().unwrap().replace(handle) {
            prior.abort();
        }
    }
}

impl<P: PageContent> Drop for PageDriver<P> {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            task.abort();
        }
        self.layout.unregister_page(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorReporter;
    use crate::models::menu::Menu;
    use crate::services::layout::Breakpoint;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    #[derive(Default)]
    struct Counters {
        initialized: AtomicUsize,
        after_set: AtomicUsize,
        errors: AtomicUsize,
    }

    impl ErrorReporter for Counters {
        fn report(&self, _error: &AppError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    enum Mode {
        Value(String),
        Fail,
        Never,
    }

    struct MockPage {
        counters: Arc<Counters>,
        mode: Mode,
        menu: Option<Menu>,
    }

    impl MockPage {
        fn new(counters: Arc<Counters>, mode: Mode) -> Self {
            Self {
                counters,
                mode,
                menu: None,
            }
        }
    }

    impl PageContent for MockPage {
        type Data = String;

        fn load(&self) -> LoadFuture<String> {
            match &self.mode {
                Mode::Value(value) => {
                    let value = value.clone();
                    Box::pin(async move { Ok(value) })
                }
                Mode::Fail => Box::pin(async {
                    Err(AppError::Api {
                        status: 500,
                        message: "boom".to_string(),
                    })
                }),
                Mode::Never => Box::pin(std::future::pending()),
            }
        }

        fn on_data_initialized(&self, _data: &String) {
            self.counters.initialized.fetch_add(1, Ordering::SeqCst);
        }

        fn on_after_set_data(&self, _data: &String) {
            self.counters.after_set.fetch_add(1, Ordering::SeqCst);
        }

        fn resolve_menu(&self, _data: &String, _context: &MenuContext) -> Option<ActiveMenu> {
            self.menu.map(ActiveMenu::new)
        }
    }

    fn layout() -> Arc<Layout> {
        Arc::new(Layout::new(Breakpoint::Lg))
    }

    async fn wait_ready<P: PageContent>(driver: &Arc<PageDriver<P>>) -> P::Data {
        let mut rx = driver.watch();
        tokio::time::timeout(Duration::from_secs(5), rx.wait_for(PageState::is_ready))
            .await
            .expect("timed out")
            .expect("driver gone");
        driver.data().expect("ready data")
    }

    #[tokio::test]
    async fn mount_publishes_loading_then_ready() {
        let counters = Arc::new(Counters::default());
        let driver = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Value("hello".to_string())),
            layout(),
            counters.clone(),
            MenuContext::default(),
        );
        assert!(driver.data().is_none());

        let data = wait_ready(&driver).await;
        assert_eq!(data, "hello");
        assert_eq!(counters.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(counters.after_set.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn data_initialization_is_edge_triggered() {
        let counters = Arc::new(Counters::default());
        let driver = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Never),
            layout(),
            counters.clone(),
            MenuContext::default(),
        );

        driver.set_data("x".to_string());
        driver.set_data("y".to_string());

        assert_eq!(counters.initialized.load(Ordering::SeqCst), 1);
        assert_eq!(counters.after_set.load(Ordering::SeqCst), 2);
        assert_eq!(driver.data().unwrap(), "y");
    }

    #[tokio::test]
    async fn reload_matches_fresh_mount_sequence() {
        let counters = Arc::new(Counters::default());
        let driver = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Value("data".to_string())),
            layout(),
            counters.clone(),
            MenuContext::default(),
        );
        wait_ready(&driver).await;

        driver.reload();
        // Synchronously back to the pristine loading state.
        assert!(driver.data().is_none());

        let data = wait_ready(&driver).await;
        assert_eq!(data, "data");
        // The initialization hook fired again: a reload is a fresh lifecycle.
        assert_eq!(counters.initialized.load(Ordering::SeqCst), 2);
        assert_eq!(counters.after_set.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_load_reports_and_stays_loading() {
        let counters = Arc::new(Counters::default());
        let driver = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Fail),
            layout(),
            counters.clone(),
            MenuContext::default(),
        );

        tokio::time::timeout(Duration::from_secs(5), async {
            while counters.errors.load(Ordering::SeqCst) == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("error never reported");

        assert_eq!(counters.errors.load(Ordering::SeqCst), 1);
        assert!(driver.data().is_none());
        assert_eq!(counters.initialized.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn destroyed_page_does_not_clobber_successor() {
        let counters = Arc::new(Counters::default());
        let shared_layout = layout();

        let first = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Never),
            shared_layout.clone(),
            counters.clone(),
            MenuContext::default(),
        );
        let second = PageDriver::mount(
            MockPage::new(counters.clone(), Mode::Never),
            shared_layout.clone(),
            counters.clone(),
            MenuContext::default(),
        );

        let second_id = second.id();
        drop(first);
        assert_eq!(shared_layout.current_page(), Some(second_id));
    }

    #[tokio::test]
    async fn menu_resolved_on_first_data() {
        let counters = Arc::new(Counters::default());
        let shared_layout = layout();
        let mut page = MockPage::new(counters.clone(), Mode::Value("v".to_string()));
        page.menu = Some(Menu::Operations);

        let driver = PageDriver::mount(
            page,
            shared_layout.clone(),
            counters.clone(),
            MenuContext::default(),
        );
        wait_ready(&driver).await;
        assert_eq!(shared_layout.active_menu().unwrap().menu, Menu::Operations);
    }
}
