use tracing::debug;

use crate::core::{action::Action, state::AppState};

/// Holds the current snapshot and applies actions one at a time. There is
/// exactly one store per client, passed explicitly to whoever dispatches.
#[derive(Debug, Default)]
pub struct Store {
    state: AppState,
    revision: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: AppState) -> Self {
        Self { state, revision: 0 }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Count of dispatches that changed the state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Applies one action. Returns whether anything changed.
    pub fn dispatch(&mut self, action: impl Into<Action>) -> bool {
        let action = action.into();
        let next = self.state.reduce(&action);
        let changed = next != self.state;
        debug!(
            container = ?action.container(),
            ?action,
            changed,
            "dispatch"
        );
        if changed {
            self.state = next;
            self.revision += 1;
        }
        changed
    }

    /// Applies actions in order; returns whether any of them changed state.
    pub fn dispatch_all<I>(&mut self, actions: I) -> bool
    where
        I: IntoIterator,
        I::Item: Into<Action>,
    {
        actions
            .into_iter()
            .fold(false, |changed, action| self.dispatch(action) || changed)
    }
}
