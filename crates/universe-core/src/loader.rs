//! Load state for asynchronously fetched view data.
//!
//! Each view owns one [`LoadSlot`] per fetched resource. Starting a load
//! issues a fresh [`RequestToken`]; completing a load applies the result
//! only while that token is still the active one. A result carrying a
//! stale token (superseded by a newer load, or cancelled because the view
//! closed) is dropped.

use std::fmt::{Display, Formatter};

/// Generation number identifying one load of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl Display for RequestToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tri-state view of a fetched resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Loadable<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Loadable<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Outcome of [`LoadSlot::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The token no longer matches; the result was dropped.
    Discarded,
}

#[derive(Debug, Clone)]
pub struct LoadSlot<T> {
    state: Loadable<T>,
    generation: u64,
    active: Option<u64>,
}

impl<T> Default for LoadSlot<T> {
    fn default() -> Self {
        Self {
            state: Loadable::Idle,
            generation: 0,
            active: None,
        }
    }
}

impl<T> LoadSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a load and return its token. Any earlier outstanding token becomes stale.
    pub fn begin(&mut self) -> RequestToken {
        self.generation += 1;
        self.active = Some(self.generation);
        self.state = Loadable::Loading;
        RequestToken(self.generation)
    }

    pub fn complete<E: Display>(&mut self, token: RequestToken, result: Result<T, E>) -> Completion {
        if self.active != Some(token.0) {
            return Completion::Discarded;
        }

        self.active = None;
        self.state = match result {
            Ok(value) => Loadable::Ready(value),
            Err(error) => Loadable::Failed(error.to_string()),
        };
        Completion::Applied
    }

    /// Invalidate the outstanding load, if any. Its result will be discarded.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() && self.state.is_loading() {
            self.state = Loadable::Idle;
        }
    }

    pub fn is_current(&self, token: RequestToken) -> bool {
        self.active == Some(token.0)
    }

    pub fn state(&self) -> &Loadable<T> {
        &self.state
    }

    pub fn value(&self) -> Option<&T> {
        self.state.value()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match &mut self.state {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }
}
