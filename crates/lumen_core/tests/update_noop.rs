use lumen_core::{update, update_background, BackgroundMsg, BackgroundState, Msg, TranslatorState};

#[test]
fn update_is_noop() {
    let state = TranslatorState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn background_update_is_noop() {
    let state = BackgroundState::new();
    let (next, effects) = update_background(state.clone(), BackgroundMsg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
