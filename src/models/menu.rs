//! Navigation menu identities and resolution.
//!
//! Each page reports which logical menu entry should be highlighted while it
//! is displayed. For most screens this is a fixed entry; screens whose menu
//! depends on per-instance data (for example, which record type is being
//! viewed) resolve it from the navigation context at activation time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Logical top-level navigation entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Menu {
    Home,
    Banking,
    Marketplace,
    Users,
    Operations,
    Vouchers,
    Settings,
}

/// The menu entry to highlight for the current screen, optionally carrying
/// the context parameters that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMenu {
    pub menu: Menu,
    pub data: Option<BTreeMap<String, String>>,
}

impl ActiveMenu {
    pub fn new(menu: Menu) -> Self {
        Self { menu, data: None }
    }

    pub fn with_data(menu: Menu, data: BTreeMap<String, String>) -> Self {
        Self {
            menu,
            data: Some(data),
        }
    }
}

/// Narrow navigation context handed to conditional resolvers: the current
/// path segments plus the resolved route parameters.
#[derive(Debug, Clone, Default)]
pub struct MenuContext {
    pub path: Vec<String>,
    pub params: BTreeMap<String, String>,
}

impl MenuContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

/// How a screen maps to its menu entry: either a fixed entry or a function
/// of the navigation context, evaluated at navigation time.
#[derive(Clone)]
pub enum MenuResolver {
    Fixed(Menu),
    Conditional(fn(&MenuContext) -> Option<ActiveMenu>),
}

impl MenuResolver {
    pub fn resolve(&self, context: &MenuContext) -> Option<ActiveMenu> {
        match self {
            Self::Fixed(menu) => Some(ActiveMenu::new(*menu)),
            Self::Conditional(f) => f(context),
        }
    }
}
