//! Table of saved universes with id sort, row selection and batch delete.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::api::{ApiError, UniverseApi};
use crate::domain::{join_tickers, Universe, UniverseId};
use crate::loader::{Completion, LoadSlot, Loadable, RequestToken};
use crate::navigation::Route;

pub const EMPTY_LIST_MESSAGE: &str = "No universes available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListRow {
    Universe {
        id: UniverseId,
        name: String,
        tickers: String,
        date_range: String,
        measurement_period: u32,
        selected: bool,
    },
    Empty {
        message: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Nothing was selected; no request was sent.
    NothingSelected,
    Deleted(Vec<UniverseId>),
    Failed(ApiError),
}

#[derive(Debug)]
pub struct UniverseListView {
    universes: LoadSlot<Vec<Universe>>,
    direction: SortDirection,
    selected: BTreeSet<UniverseId>,
    page_error: Option<String>,
}

impl Default for UniverseListView {
    fn default() -> Self {
        Self {
            universes: LoadSlot::new(),
            direction: SortDirection::Ascending,
            selected: BTreeSet::new(),
            page_error: None,
        }
    }
}

impl UniverseListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the collection once and show it sorted ascending by id.
    pub async fn load(&mut self, api: &UniverseApi) -> Completion {
        let token = self.begin_load();
        let result = api.universes().await;
        self.finish_load(token, result)
    }

    /// Start a load. Any earlier outstanding load becomes stale.
    pub fn begin_load(&mut self) -> RequestToken {
        self.universes.begin()
    }

    /// Apply the result of the load started with `token`.
    pub fn finish_load(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Universe>, ApiError>,
    ) -> Completion {
        if !self.universes.is_current(token) {
            debug!(
                component = "universe_list",
                event = "universes.stale_result",
                token = %token
            );
            return Completion::Discarded;
        }

        match &result {
            Ok(universes) => {
                self.page_error = None;
                info!(
                    component = "universe_list",
                    event = "universes.loaded",
                    count = universes.len()
                );
            }
            Err(failure) => {
                warn!(
                    component = "universe_list",
                    event = "universes.load_failed",
                    error = %failure
                );
                self.page_error = Some(format!("Failed to load universes: {failure}"));
            }
        }

        self.direction = SortDirection::Ascending;
        self.selected.clear();
        let completion = self.universes.complete(token, result);
        self.apply_sort();
        completion
    }

    /// Seed the view with an already fetched collection.
    pub fn with_universes(universes: Vec<Universe>) -> Self {
        let mut view = Self::default();
        let token = view.universes.begin();
        view.universes.complete(token, Ok::<_, ApiError>(universes));
        view.apply_sort();
        view
    }

    pub fn cancel(&mut self) {
        self.universes.cancel();
    }

    pub fn state(&self) -> &Loadable<Vec<Universe>> {
        self.universes.state()
    }

    pub fn universes(&self) -> &[Universe] {
        self.universes.value().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn ids(&self) -> Vec<UniverseId> {
        self.universes().iter().map(|universe| universe.id).collect()
    }

    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn page_error(&self) -> Option<&str> {
        self.page_error.as_deref()
    }

    pub fn selected(&self) -> &BTreeSet<UniverseId> {
        &self.selected
    }

    /// Header click: flip the id sort over the held list. No re-fetch.
    pub fn toggle_sort(&mut self) {
        self.direction = self.direction.toggled();
        self.apply_sort();
    }

    /// Checkbox click: flip membership of `id` in the selection.
    ///
    /// Ids that are not in the held list are ignored.
    pub fn toggle_selected(&mut self, id: UniverseId) {
        if !self.universes().iter().any(|universe| universe.id == id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    pub fn is_selected(&self, id: UniverseId) -> bool {
        self.selected.contains(&id)
    }

    /// Table rows. The placeholder row only stands for a loaded, empty
    /// collection; a failed or pending load has no rows.
    pub fn rows(&self) -> Vec<ListRow> {
        let Some(universes) = self.universes.value() else {
            return Vec::new();
        };
        if universes.is_empty() {
            return vec![ListRow::Empty {
                message: EMPTY_LIST_MESSAGE,
            }];
        }

        universes
            .iter()
            .map(|universe| ListRow::Universe {
                id: universe.id,
                name: universe.name.clone(),
                tickers: join_tickers(&universe.tickers),
                date_range: universe.date_range.to_string(),
                measurement_period: universe.measurement_period.get(),
                selected: self.is_selected(universe.id),
            })
            .collect()
    }

    /// Route to the detail page for `id`, forwarding the held record.
    pub fn open(&self, id: UniverseId) -> Option<Route> {
        self.universes()
            .iter()
            .find(|universe| universe.id == id)
            .cloned()
            .map(Route::UniverseDetail)
    }

    /// Delete every selected id in one request.
    pub async fn delete_selected(&mut self, api: &UniverseApi) -> DeleteOutcome {
        if self.selected.is_empty() {
            return DeleteOutcome::NothingSelected;
        }

        let ids: Vec<UniverseId> = self.selected.iter().copied().collect();
        match api.delete_universes(&ids).await {
            Ok(()) => {
                if let Some(universes) = self.universes.value_mut() {
                    universes.retain(|universe| !self.selected.contains(&universe.id));
                }
                self.selected.clear();
                self.page_error = None;
                info!(
                    component = "universe_list",
                    event = "universes.deleted",
                    count = ids.len()
                );
                DeleteOutcome::Deleted(ids)
            }
            Err(failure) => {
                error!(
                    component = "universe_list",
                    event = "universes.delete_failed",
                    code = failure.code(),
                    error = %failure
                );
                self.page_error = Some(format!("Failed to delete universes: {failure}"));
                DeleteOutcome::Failed(failure)
            }
        }
    }

    fn apply_sort(&mut self) {
        let direction = self.direction;
        if let Some(universes) = self.universes.value_mut() {
            match direction {
                SortDirection::Ascending => universes.sort_by_key(|universe| universe.id),
                SortDirection::Descending => {
                    universes.sort_by_key(|universe| std::cmp::Reverse(universe.id))
                }
            }
        }
    }
}
