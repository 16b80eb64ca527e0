use pbx_editor::state_machine::{allowed_transitions, validate_transition};
use pbx_editor::SessionState;
use proptest::prelude::*;

#[test]
fn test_idle_transitions() {
    assert!(validate_transition(SessionState::Idle, SessionState::BackedUp).is_ok());

    // Invalid
    assert!(validate_transition(SessionState::Idle, SessionState::Mutating).is_err());
    assert!(validate_transition(SessionState::Idle, SessionState::Verified).is_err());
}

#[test]
fn test_mutating_transitions() {
    assert!(validate_transition(SessionState::Mutating, SessionState::Verified).is_ok());
    assert!(validate_transition(SessionState::Mutating, SessionState::RolledBack).is_ok());

    assert!(validate_transition(SessionState::Mutating, SessionState::Idle).is_err());
}

#[test]
fn test_terminal_states_have_no_exits() {
    assert!(allowed_transitions(SessionState::Verified).is_empty());
    assert!(allowed_transitions(SessionState::RolledBack).is_empty());
}

proptest! {
    #[test]
    fn prop_all_transitions_are_subset_of_allowed(
        from in prop_oneof![
            Just(SessionState::Idle),
            Just(SessionState::BackedUp),
            Just(SessionState::Mutating),
            Just(SessionState::Verified),
            Just(SessionState::RolledBack),
        ],
        to in prop_oneof![
            Just(SessionState::Idle),
            Just(SessionState::BackedUp),
            Just(SessionState::Mutating),
            Just(SessionState::Verified),
            Just(SessionState::RolledBack),
        ]
    ) {
        let res = validate_transition(from, to);
        let allowed = allowed_transitions(from);

        if res.is_ok() {
            prop_assert!(allowed.contains(&to));
        } else {
            prop_assert!(!allowed.contains(&to));
        }
    }
}
