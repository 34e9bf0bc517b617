//! Modal Lifecycle
//!
//! `Closed -> Open -> Submitting -> Closed`, falling back to `Open`
//! when validation or the request fails.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    Open,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalEvent {
    Open,
    Submit,
    ValidationFailed,
    Succeeded,
    Failed,
    Dismiss,
}

impl ModalState {
    /// Next state; events that do not apply leave the state unchanged
    pub fn on(self, event: ModalEvent) -> Self {
        use ModalEvent as E;
        use ModalState as S;

        match (self, event) {
            (S::Closed, E::Open) => S::Open,
            (S::Open, E::Submit) => S::Submitting,
            (S::Open, E::ValidationFailed) => S::Open,
            (S::Submitting, E::ValidationFailed | E::Failed) => S::Open,
            (S::Submitting, E::Succeeded) => S::Closed,
            (S::Open, E::Dismiss) => S::Closed,
            (state, _) => state,
        }
    }

    pub fn is_open(self) -> bool {
        self != ModalState::Closed
    }

    pub fn is_submitting(self) -> bool {
        self == ModalState::Submitting
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = ModalState::default().on(ModalEvent::Open);
        assert_eq!(state, ModalState::Open);
        let state = state.on(ModalEvent::Submit);
        assert!(state.is_submitting());
        assert_eq!(state.on(ModalEvent::Succeeded), ModalState::Closed);
    }

    #[test]
    fn test_failures_return_to_open() {
        let submitting = ModalState::Open.on(ModalEvent::Submit);
        assert_eq!(submitting.on(ModalEvent::Failed), ModalState::Open);
        assert_eq!(submitting.on(ModalEvent::ValidationFailed), ModalState::Open);
    }

    #[test]
    fn test_dismiss_ignored_while_submitting() {
        assert_eq!(ModalState::Submitting.on(ModalEvent::Dismiss), ModalState::Submitting);
        assert_eq!(ModalState::Open.on(ModalEvent::Dismiss), ModalState::Closed);
        assert_eq!(ModalState::Closed.on(ModalEvent::Submit), ModalState::Closed);
    }
}
