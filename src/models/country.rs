//! Reference data shared across screens: countries and registration groups.

use serde::{Deserialize, Serialize};

/// ISO country, as served by the backend's address reference endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Country {
    pub code: String,
    pub name: String,
}

/// A user group open for public registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationGroup {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}
