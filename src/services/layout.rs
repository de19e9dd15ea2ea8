//! Layout collaborator: current-page registration, breakpoint queries, and
//! the active menu slot.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::models::menu::ActiveMenu;

/// Unique identity of a mounted page instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId(u64);

impl PageId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Screen-size class, driving result presentation defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakpoint {
    Xs,
    Sm,
    Md,
    Lg,
}

impl Breakpoint {
    /// Default results-per-page for this screen size.
    pub fn default_page_size(self) -> u32 {
        match self {
            Self::Xs => 10,
            Self::Sm => 20,
            Self::Md | Self::Lg => 40,
        }
    }
}

/// Shared layout state, session scoped.
#[derive(Debug)]
pub struct Layout {
    current: Mutex<Option<PageId>>,
    active_menu: Mutex<Option<ActiveMenu>>,
    breakpoint: Mutex<Breakpoint>,
}

impl Layout {
    pub fn new(breakpoint: Breakpoint) -> Self {
        Self {
            current: Mutex::new(None),
            active_menu: Mutex::new(None),
            breakpoint: Mutex::new(breakpoint),
        }
    }

    pub fn register_page(&self, id: PageId) {
        *self.current.lock().unwrap() = Some(id);
    }

    /// Unregister a page, but only if it is still the registered one. A page
    /// destroyed after its successor activated must not clobber the
    /// successor's registration.
    pub fn unregister_page(&self, id: PageId) {
        let mut current = self.current.lock().unwrap();
        if *current == Some(id) {
            *current = None;
        }
    }

    pub fn current_page(&self) -> Option<PageId> {
        *self.current.lock().unwrap()
    }

    pub fn set_active_menu(&self, menu: Option<ActiveMenu>) {
        *self.active_menu.lock().unwrap() = menu;
    }

    pub fn active_menu(&self) -> Option<ActiveMenu> {
        self.active_menu.lock().unwrap().clone()
    }

    pub fn set_breakpoint(&self, breakpoint: Breakpoint) {
        *self.breakpoint.lock().unwrap() = breakpoint;
    }

    pub fn breakpoint(&self) -> Breakpoint {
        *self.breakpoint.lock().unwrap()
    }

    /// Default page size for the current breakpoint.
    pub fn default_page_size(&self) -> u32 {
        self.breakpoint().default_page_size()
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(Breakpoint::Lg)
    }
}
