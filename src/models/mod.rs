//! Wire models and value objects for all domain entities.

pub mod country;
pub mod menu;
pub mod pagination;
pub mod transfer;
pub mod user;
