//! Session-lifetime reference data: countries and registration groups.

use std::collections::HashMap;
use std::sync::Arc;

use crate::models::country::{Country, RegistrationGroup};
use crate::rest::RestClient;
use crate::services::resolve::SingletonResolve;

/// Country list with a derived code lookup, built once after the fetch.
#[derive(Debug, Default)]
pub struct Countries {
    pub list: Vec<Country>,
    by_code: HashMap<String, String>,
}

impl Countries {
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub(crate) fn index(&mut self) {
        self.by_code = self
            .list
            .iter()
            .map(|c| (c.code.clone(), c.name.clone()))
            .collect();
    }
}

/// Resolver for the country list, fetched at most once per session.
pub fn countries(client: Arc<RestClient>) -> SingletonResolve<Countries> {
    SingletonResolve::new(move || {
        let client = Arc::clone(&client);
        async move {
            let list: Vec<Country> = client.get("/countries").await?;
            Ok(Countries {
                list,
                by_code: HashMap::new(),
            })
        }
    })
    .with_hook(Countries::index)
}

/// Resolver for the groups open for public registration.
pub fn registration_groups(client: Arc<RestClient>) -> SingletonResolve<Vec<RegistrationGroup>> {
    SingletonResolve::new(move || {
        let client = Arc::clone(&client);
        async move { client.get("/groups-for-registration").await }
    })
}
