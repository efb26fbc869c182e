//! Client-side routes and the side menu that maps onto them.

use std::fmt::{Display, Formatter};

use tracing::debug;

use crate::domain::Universe;

/// A navigable page. Detail and edit pages carry the record handed forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    UniverseList,
    CreateUniverse,
    EditUniverse(Universe),
    UniverseDetail(Universe),
    StockAnalysis,
    Holdings13F,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::UniverseList => String::from("/universes"),
            Self::CreateUniverse => String::from("/create_universe"),
            Self::EditUniverse(universe) => {
                format!("/edit_universe/{}", urlencoding::encode(&universe.name))
            }
            Self::UniverseDetail(universe) => {
                format!("/universes/{}", urlencoding::encode(&universe.name))
            }
            Self::StockAnalysis => String::from("/stock_analysis"),
            Self::Holdings13F => String::from("/holdings_13f"),
        }
    }

    /// Resolve a bare path. Routes that need a forwarded record return `None`.
    pub fn resolve(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 {
            trimmed.trim_end_matches('/')
        } else {
            trimmed
        };

        match normalized {
            "" | "/" | "/universes" => Some(Self::UniverseList),
            "/create_universe" => Some(Self::CreateUniverse),
            "/stock_analysis" => Some(Self::StockAnalysis),
            "/holdings_13f" => Some(Self::Holdings13F),
            _ => None,
        }
    }

    pub fn universe(&self) -> Option<&Universe> {
        match self {
            Self::EditUniverse(universe) | Self::UniverseDetail(universe) => Some(universe),
            _ => None,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path())
    }
}

/// Side menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Universes,
    CreateUniverse,
    StockAnalysis,
    Holdings13F,
}

impl MenuItem {
    pub const ALL: [Self; 4] = [
        Self::Universes,
        Self::CreateUniverse,
        Self::StockAnalysis,
        Self::Holdings13F,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Universes => "Universes",
            Self::CreateUniverse => "Create Universe",
            Self::StockAnalysis => "Stock Analysis",
            Self::Holdings13F => "13F Holdings",
        }
    }

    pub fn route(self) -> Route {
        match self {
            Self::Universes => Route::UniverseList,
            Self::CreateUniverse => Route::CreateUniverse,
            Self::StockAnalysis => Route::StockAnalysis,
            Self::Holdings13F => Route::Holdings13F,
        }
    }
}

/// Persistent shell holding the current route and the back stack.
#[derive(Debug, Clone)]
pub struct NavigationShell {
    current: Route,
    history: Vec<Route>,
}

impl Default for NavigationShell {
    fn default() -> Self {
        Self {
            current: Route::UniverseList,
            history: Vec::new(),
        }
    }
}

impl NavigationShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn navigate(&mut self, route: Route) {
        debug!(component = "navigation", event = "navigate", from = %self.current, to = %route);
        let previous = std::mem::replace(&mut self.current, route);
        self.history.push(previous);
    }

    pub fn select_menu(&mut self, item: MenuItem) {
        self.navigate(item.route());
    }

    /// Navigate to a bare path. Returns `false` when the path needs forwarded state.
    pub fn open_path(&mut self, path: &str) -> bool {
        match Route::resolve(path) {
            Some(route) => {
                self.navigate(route);
                true
            }
            None => false,
        }
    }

    pub fn back(&mut self) -> Option<&Route> {
        let previous = self.history.pop()?;
        self.current = previous;
        Some(&self.current)
    }

    pub fn menu(&self) -> Vec<(&'static str, bool)> {
        MenuItem::ALL
            .iter()
            .map(|item| (item.label(), item.route() == self.current))
            .collect()
    }
}
