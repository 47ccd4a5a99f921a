use super::item::{Item, remove_item};

/// Lifecycle phase of the remote catalog load.
///
/// Representing the phase as an enum makes the loading/error exclusivity
/// structural: a state cannot be loading and failed at the same time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch has been issued yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch resolved with data.
    Succeeded,
    /// The last fetch rejected.
    Failed,
}

/// A tagged request to transition the fetch state machine.
///
/// The set is closed: [`FetchState::apply`] matches exhaustively, so an
/// unmapped action is a compile-time impossibility rather than a runtime
/// throw.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchAction {
    /// A fetch has been issued; enter Loading and clear any prior error.
    FetchStart,
    /// The fetch resolved; wholesale-replace the data with the payload.
    FetchSuccess(Vec<Item>),
    /// The fetch rejected; data is left as it was.
    FetchFailure,
    /// Remove one item by identity without touching the phase.
    RemoveItem(u64),
}

/// Tracked status and current data of the remote catalog load.
///
/// Created at session start with an empty list in the Idle phase; transitions
/// only through [`apply`](Self::apply). The machine is re-entrant and has no
/// terminal state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchState {
    pub data: Vec<Item>,
    pub phase: FetchPhase,
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn is_error(&self) -> bool {
        self.phase == FetchPhase::Failed
    }

    /// Pure transition function `(state, action) -> state`.
    ///
    /// Re-issuing `FetchStart` while already Loading is permitted and simply
    /// re-asserts the phase; no concurrent-fetch guard lives here (the
    /// dispatch layer handles stale resolutions).
    #[must_use]
    pub fn apply(&self, action: &FetchAction) -> FetchState {
        match action {
            FetchAction::FetchStart => FetchState {
                data: self.data.clone(),
                phase: FetchPhase::Loading,
            },
            FetchAction::FetchSuccess(payload) => FetchState {
                data: payload.clone(),
                phase: FetchPhase::Succeeded,
            },
            FetchAction::FetchFailure => FetchState {
                data: self.data.clone(),
                phase: FetchPhase::Failed,
            },
            FetchAction::RemoveItem(object_id) => FetchState {
                data: remove_item(&self.data, *object_id),
                phase: self.phase,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Vec<Item> {
        vec![
            Item::new(1, "Super Mario Bros.", 1985),
            Item::new(2, "Super Mario World", 1990),
        ]
    }

    #[test]
    fn test_initial_state() {
        let state = FetchState::default();

        assert!(state.data.is_empty());
        assert_eq!(state.phase, FetchPhase::Idle);
        assert!(!state.is_loading());
        assert!(!state.is_error());
    }

    #[test]
    fn test_fetch_start_sets_loading_and_keeps_data() {
        let state = FetchState {
            data: payload(),
            phase: FetchPhase::Succeeded,
        };

        let next = state.apply(&FetchAction::FetchStart);

        assert!(next.is_loading());
        assert!(!next.is_error());
        assert_eq!(next.data, payload());
    }

    #[test]
    fn test_fetch_start_clears_prior_error() {
        let failed = FetchState::default().apply(&FetchAction::FetchFailure);
        assert!(failed.is_error());

        let next = failed.apply(&FetchAction::FetchStart);

        assert!(next.is_loading());
        assert!(!next.is_error());
    }

    #[test]
    fn test_fetch_success_replaces_data() {
        let state = FetchState::default().apply(&FetchAction::FetchStart);
        let next = state.apply(&FetchAction::FetchSuccess(payload()));

        assert_eq!(next.phase, FetchPhase::Succeeded);
        assert!(!next.is_loading());
        assert!(!next.is_error());
        assert_eq!(next.data, payload());
    }

    #[test]
    fn test_fetch_failure_keeps_data() {
        let state = FetchState {
            data: payload(),
            phase: FetchPhase::Loading,
        };

        let next = state.apply(&FetchAction::FetchFailure);

        assert!(next.is_error());
        assert!(!next.is_loading());
        assert_eq!(next.data, payload());
    }

    #[test]
    fn test_restart_while_loading_is_permitted() {
        let state = FetchState::default().apply(&FetchAction::FetchStart);
        let next = state.apply(&FetchAction::FetchStart);

        assert!(next.is_loading());
        assert!(!next.is_error());
    }

    #[test]
    fn test_remove_item_keeps_phase() {
        let state = FetchState {
            data: payload(),
            phase: FetchPhase::Succeeded,
        };

        let next = state.apply(&FetchAction::RemoveItem(1));

        assert_eq!(next.phase, FetchPhase::Succeeded);
        assert_eq!(next.data.len(), 1);
        assert_eq!(next.data[0].object_id, 2);
    }

    #[test]
    fn test_remove_absent_item_is_noop() {
        let state = FetchState {
            data: payload(),
            phase: FetchPhase::Succeeded,
        };

        let next = state.apply(&FetchAction::RemoveItem(42));

        assert_eq!(next, state);
    }

    #[test]
    fn test_apply_does_not_mutate_original() {
        let state = FetchState::default();
        let _ = state.apply(&FetchAction::FetchStart);

        assert_eq!(state.phase, FetchPhase::Idle);
    }
}
