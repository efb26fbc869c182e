//! Universe create/edit form.
//!
//! The draft lives in a single [`FormState`] updated only through the pure
//! [`reduce`] function. [`UniverseForm`] wraps the state with the create or
//! edit mode, runs validation before submit, and issues exactly one write
//! per successful validation pass.

use thiserror::Error;
use time::Date;
use tracing::{error, info};

use crate::api::{ApiError, UniverseApi};
use crate::domain::{
    dedup_preserving_order, DateRange, MeasurementPeriod, Ticker, Universe, UniverseId,
    UniversePayload,
};
use crate::navigation::Route;

/// Operator-facing validation failures, checked in declaration order.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FormValidationError {
    #[error("Universe name is required.")]
    NameRequired,
    #[error("At least one stock must be selected.")]
    TickersRequired,
    #[error("Both begin and end dates are required.")]
    DatesRequired,
    #[error("Start date must be earlier than end date.")]
    DatesOutOfOrder,
}

/// A new value for exactly one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Name(String),
    Tickers(Vec<Ticker>),
    BeginDate(Option<Date>),
    EndDate(Option<Date>),
    MeasurementPeriod(MeasurementPeriod),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    SetField(FieldValue),
    SetError(String),
    ClearError,
}

/// Transient draft of a universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub name: String,
    pub tickers: Vec<Ticker>,
    pub begin_date: Option<Date>,
    pub end_date: Option<Date>,
    pub measurement_period: MeasurementPeriod,
    pub error: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            name: String::new(),
            tickers: Vec::new(),
            begin_date: None,
            end_date: None,
            measurement_period: MeasurementPeriod::DEFAULT,
            error: None,
        }
    }
}

impl FormState {
    pub fn from_universe(universe: &Universe) -> Self {
        Self {
            name: universe.name.clone(),
            tickers: universe.tickers.clone(),
            begin_date: Some(universe.date_range.begin()),
            end_date: Some(universe.date_range.end()),
            measurement_period: universe.measurement_period,
            error: None,
        }
    }

    /// Check the draft and build the write payload.
    pub fn validate(&self) -> Result<UniversePayload, FormValidationError> {
        if self.name.trim().is_empty() {
            return Err(FormValidationError::NameRequired);
        }

        if self.tickers.is_empty() {
            return Err(FormValidationError::TickersRequired);
        }

        let (Some(begin), Some(end)) = (self.begin_date, self.end_date) else {
            return Err(FormValidationError::DatesRequired);
        };

        let range = DateRange::new(begin, end).map_err(|_| FormValidationError::DatesOutOfOrder)?;

        Ok(UniversePayload::new(
            self.name.clone(),
            self.tickers.clone(),
            range,
            self.measurement_period,
        ))
    }
}

/// Apply one action. Every action is total and touches only what it names.
pub fn reduce(state: FormState, action: FormAction) -> FormState {
    match action {
        FormAction::SetField(value) => {
            let mut next = state;
            match value {
                FieldValue::Name(name) => next.name = name,
                FieldValue::Tickers(tickers) => next.tickers = dedup_preserving_order(tickers),
                FieldValue::BeginDate(date) => next.begin_date = date,
                FieldValue::EndDate(date) => next.end_date = date,
                FieldValue::MeasurementPeriod(period) => next.measurement_period = period,
            }
            next
        }
        FormAction::SetError(message) => FormState {
            error: Some(message),
            ..state
        },
        FormAction::ClearError => FormState {
            error: None,
            ..state
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(UniverseId),
}

/// Result of [`UniverseForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; no request was sent.
    Rejected(FormValidationError),
    /// The write succeeded; navigate here.
    Saved(Route),
    /// The write failed; the form error carries the reason.
    Failed(ApiError),
}

#[derive(Debug, Clone)]
pub struct UniverseForm {
    mode: FormMode,
    state: FormState,
}

impl UniverseForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            state: FormState::default(),
        }
    }

    /// Edit form seeded from a previously fetched record.
    pub fn edit(universe: &Universe) -> Self {
        Self {
            mode: FormMode::Edit(universe.id),
            state: FormState::from_universe(universe),
        }
    }

    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    pub fn dispatch(&mut self, action: FormAction) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    pub fn set_field(&mut self, value: FieldValue) {
        self.dispatch(FormAction::SetField(value));
    }

    /// Run validation, recording the outcome in the error slot.
    pub fn validate(&mut self) -> Result<UniversePayload, FormValidationError> {
        match self.state.validate() {
            Ok(payload) => {
                self.dispatch(FormAction::ClearError);
                Ok(payload)
            }
            Err(failure) => {
                self.dispatch(FormAction::SetError(failure.to_string()));
                Err(failure)
            }
        }
    }

    pub async fn submit(&mut self, api: &UniverseApi) -> SubmitOutcome {
        let payload = match self.validate() {
            Ok(payload) => payload,
            Err(failure) => return SubmitOutcome::Rejected(failure),
        };

        let result = match self.mode {
            FormMode::Create => api.create_universe(&payload).await,
            FormMode::Edit(id) => api.edit_universe(id, &payload).await,
        };

        match (self.mode, result) {
            (FormMode::Create, Ok(created)) => {
                info!(
                    component = "universe_form",
                    event = "universe.created",
                    name = %payload.name,
                    id = ?created.map(|universe| universe.id.get())
                );
                SubmitOutcome::Saved(Route::UniverseList)
            }
            (FormMode::Edit(id), Ok(updated)) => {
                info!(
                    component = "universe_form",
                    event = "universe.updated",
                    id = id.get()
                );
                let record = match updated {
                    Some(record) => record,
                    None => match payload.into_universe(id) {
                        Ok(record) => record,
                        Err(_) => return SubmitOutcome::Saved(Route::UniverseList),
                    },
                };
                SubmitOutcome::Saved(Route::UniverseDetail(record))
            }
            (mode, Err(failure)) => {
                error!(
                    component = "universe_form",
                    event = "universe.save_failed",
                    mode = ?mode,
                    code = failure.code(),
                    error = %failure
                );
                self.dispatch(FormAction::SetError(format!(
                    "Failed to save universe: {failure}"
                )));
                SubmitOutcome::Failed(failure)
            }
        }
    }
}
