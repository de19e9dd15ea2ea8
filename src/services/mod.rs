//! Engine services: lifecycle drivers and session-scoped caches.

pub mod layout;
pub mod page;
pub mod resolve;
pub mod search_page;
pub mod state_cache;
